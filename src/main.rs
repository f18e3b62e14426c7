//! Anatomy - Entry Point
//!
//! Restores the configured save slot, or spawns a single player with the
//! default anatomy, and runs the debug console over stdin.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use hecs::World;

use anatomy::console;
use anatomy::data::DataManager;
use anatomy::ecs::{AnatomySystem, Name, Player};
use anatomy::host::LogSaveHook;
use anatomy::save::{load_anatomy, restore, save_exists};

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .init();

    log::info!("Starting anatomy console v{}", env!("CARGO_PKG_VERSION"));

    let data = DataManager::new();
    let mut world = World::new();
    let mut system = AnatomySystem::new(data.config().clone(), LogSaveHook);

    let slot = data.config().save_slot;
    let restored = if save_exists(slot) {
        match load_anatomy(slot).and_then(|save| restore(&mut world, &mut system, &save)) {
            Ok(owners) => owners,
            Err(e) => {
                log::warn!("Ignoring save slot {}: {}", slot, e);
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    if restored.is_empty() {
        let player = world.spawn((Name::new("Player"), Player));
        let parts = system.on_player_spawned(&mut world, player, data.part_templates())?;
        log::info!("Player assembled with {} parts", parts.len());
    }

    println!("Type `help` for commands, `quit` to exit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if matches!(line, "quit" | "exit") {
            break;
        }

        match console::run_line(line, &mut world, &mut system, data.part_templates()) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                log::warn!("Command failed: {}", e);
                println!("error: {}", e);
            }
        }

        for notification in system.drain_notifications() {
            log::debug!("{:?}", notification);
        }
    }

    log::info!("Anatomy console shut down cleanly");
    Ok(())
}
