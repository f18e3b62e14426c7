//! Debug console
//!
//! Text commands for poking at anatomies by part name. Targets come from the
//! system's registry; names match case-insensitively.

use std::fmt::Write as _;
use std::str::FromStr;

use hecs::{Entity, World};
use thiserror::Error;

use crate::ecs::{AnatomyPart, AnatomySystem};
use crate::error::AnatomyError;
use crate::events::{DamageEvent, HealEvent, KillEvent, ReviveEvent, Stimulus};
use crate::host::{PartFactory, SaveHook};
use crate::save::{save_anatomy, SaveError};

const HELP: &str = "\
commands:
  create_parts              reassemble every anatomy
  dmg <part> <amount>       damage a part
  dmg_all <amount>          damage every part
  heal <part> <amount>      heal a part
  heal_all <amount>         heal every part
  revive <part> <amount>    revive a dead part
  kill <part>               destroy a part
  health                    show every part's health
  save                      persist all anatomies
  help                      show this text";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{command}` is missing argument <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{0}` is not a valid amount")]
    InvalidAmount(String),

    #[error(transparent)]
    Anatomy(#[from] AnatomyError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateParts,
    Damage { part: String, amount: i32 },
    DamageAll { amount: i32 },
    Heal { part: String, amount: i32 },
    HealAll { amount: i32 },
    Revive { part: String, amount: i32 },
    Kill { part: String },
    Health,
    Save,
    Help,
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut args = line.split_whitespace();
        let Some(name) = args.next() else {
            return Ok(Command::Help);
        };

        let command = match name.to_lowercase().as_str() {
            "create_parts" | "createanatomyparts" => Command::CreateParts,
            "dmg" | "dmganatomypart" => Command::Damage {
                part: word(&mut args, "dmg", "part")?,
                amount: amount(&mut args, "dmg")?,
            },
            "dmg_all" | "dmganatomypartall" => Command::DamageAll {
                amount: amount(&mut args, "dmg_all")?,
            },
            "heal" | "healanatomypart" => Command::Heal {
                part: word(&mut args, "heal", "part")?,
                amount: amount(&mut args, "heal")?,
            },
            "heal_all" | "healanatomypartall" => Command::HealAll {
                amount: amount(&mut args, "heal_all")?,
            },
            "revive" | "reviveanatomypart" => Command::Revive {
                part: word(&mut args, "revive", "part")?,
                amount: amount(&mut args, "revive")?,
            },
            "kill" => Command::Kill {
                part: word(&mut args, "kill", "part")?,
            },
            "health" | "getanatomyparthealth" => Command::Health,
            "save" | "saveanatomy" => Command::Save,
            "help" => Command::Help,
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

fn word<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<String, ConsoleError> {
    args.next()
        .map(str::to_string)
        .ok_or(ConsoleError::MissingArgument { command, argument })
}

fn amount<'a>(args: &mut impl Iterator<Item = &'a str>, command: &'static str) -> Result<i32, ConsoleError> {
    let raw = args
        .next()
        .ok_or(ConsoleError::MissingArgument { command, argument: "amount" })?;
    match raw.parse::<i32>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(ConsoleError::InvalidAmount(raw.to_string())),
    }
}

/// Parse and run one line of input, returning text for the operator
pub fn run_line<H, F>(
    line: &str,
    world: &mut World,
    system: &mut AnatomySystem<H>,
    factory: &F,
) -> Result<String, ConsoleError>
where
    H: SaveHook,
    F: PartFactory + ?Sized,
{
    let command: Command = line.parse()?;
    execute(command, world, system, factory)
}

/// Run a parsed command
pub fn execute<H, F>(
    command: Command,
    world: &mut World,
    system: &mut AnatomySystem<H>,
    factory: &F,
) -> Result<String, ConsoleError>
where
    H: SaveHook,
    F: PartFactory + ?Sized,
{
    match command {
        Command::CreateParts => {
            let owners = system.registry().owners().to_vec();
            let mut created = 0;
            for owner in &owners {
                created += system.reassemble(world, *owner, factory)?.len();
            }
            Ok(format!("created {} parts for {} anatomies", created, owners.len()))
        }
        Command::Damage { part, amount } => {
            let targets = named(system, &part)?;
            send_all(world, system, &targets, |_| DamageEvent::new(amount).with_part_name(part.clone()).into())
        }
        Command::DamageAll { amount } => {
            let targets = every_part(system);
            send_all(world, system, &targets, |_| DamageEvent::new(amount).into())
        }
        Command::Heal { part, amount } => {
            let targets = named(system, &part)?;
            send_all(world, system, &targets, |_| HealEvent::new(amount).with_part_name(part.clone()).into())
        }
        Command::HealAll { amount } => {
            let targets = every_part(system);
            send_all(world, system, &targets, |_| HealEvent::new(amount).into())
        }
        Command::Revive { part, amount } => {
            let targets = named(system, &part)?;
            send_all(world, system, &targets, |_| ReviveEvent::new(amount).with_part_name(part.clone()).into())
        }
        Command::Kill { part } => {
            let targets = named(system, &part)?;
            send_all(world, system, &targets, |_| KillEvent::default().into())
        }
        Command::Health => {
            let report = system.health_report(world);
            if report.is_empty() {
                return Ok("no anatomies".to_string());
            }
            Ok(report.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))
        }
        Command::Save => {
            system.save_all(world);
            let slot = system.config().save_slot;
            let path = save_anatomy(world, system, slot)?;
            Ok(format!("saved to {}", path.display()))
        }
        Command::Help => Ok(HELP.to_string()),
    }
}

fn named<H: SaveHook>(system: &AnatomySystem<H>, name: &str) -> Result<Vec<Entity>, AnatomyError> {
    let targets = system.registry().find_parts(name);
    if targets.is_empty() {
        return Err(AnatomyError::UnknownPart(name.to_string()));
    }
    Ok(targets.to_vec())
}

fn every_part<H: SaveHook>(system: &AnatomySystem<H>) -> Vec<Entity> {
    system.registry().all_parts().map(|(_, p)| p.entity).collect()
}

fn send_all<H: SaveHook>(
    world: &mut World,
    system: &mut AnatomySystem<H>,
    targets: &[Entity],
    stimulus: impl Fn(Entity) -> Stimulus,
) -> Result<String, ConsoleError> {
    let mut out = String::new();
    for &entity in targets {
        system.handle(world, entity, stimulus(entity))?;

        let part = world
            .get::<&AnatomyPart>(entity)
            .map_err(|_| AnatomyError::NotAPart(entity))?;
        let _ = write!(out, "{} {}/{}", part.name, part.health, part.max_health);
        if !part.is_alive {
            out.push_str(" (destroyed)");
        }
        out.push('\n');
    }
    out.pop();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnatomyConfig;
    use crate::data::{default_part_templates, PartTemplates};
    use crate::ecs::Name;
    use crate::host::NullSaveHook;

    fn setup() -> (World, AnatomySystem<NullSaveHook>, PartTemplates) {
        let mut world = World::new();
        let mut system = AnatomySystem::new(AnatomyConfig::default(), NullSaveHook);
        let templates = default_part_templates();
        let player = world.spawn((Name::new("Hero"),));
        system.on_player_spawned(&mut world, player, &templates).unwrap();
        (world, system, templates)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "dmg Head 20".parse::<Command>().unwrap(),
            Command::Damage { part: "Head".to_string(), amount: 20 }
        );
        assert_eq!(
            "healAnatomyPartAll 5".parse::<Command>().unwrap(),
            Command::HealAll { amount: 5 }
        );
        assert_eq!("".parse::<Command>().unwrap(), Command::Help);
        assert_eq!("HEALTH".parse::<Command>().unwrap(), Command::Health);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("fly 3".parse::<Command>(), Err(ConsoleError::UnknownCommand(_))));
        assert!(matches!(
            "dmg head".parse::<Command>(),
            Err(ConsoleError::MissingArgument { argument: "amount", .. })
        ));
        assert!(matches!("heal head lots".parse::<Command>(), Err(ConsoleError::InvalidAmount(_))));
        assert!(matches!("heal head -4".parse::<Command>(), Err(ConsoleError::InvalidAmount(_))));
    }

    #[test]
    fn test_damage_by_name_is_case_insensitive() {
        let (mut world, mut system, templates) = setup();
        let out = run_line("dmg HEAD 20", &mut world, &mut system, &templates).unwrap();
        assert_eq!(out, "head 30/50");
    }

    #[test]
    fn test_unknown_part() {
        let (mut world, mut system, templates) = setup();
        let err = run_line("heal tail 5", &mut world, &mut system, &templates).unwrap_err();
        assert!(matches!(err, ConsoleError::Anatomy(AnatomyError::UnknownPart(_))));
    }

    #[test]
    fn test_damage_all_then_revive() {
        let (mut world, mut system, templates) = setup();
        let out = run_line("dmg_all 55", &mut world, &mut system, &templates).unwrap();
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("head 0/50 (destroyed)"));
        assert!(out.contains("torso 45/100"));

        let out = run_line("revive head 10", &mut world, &mut system, &templates).unwrap();
        assert_eq!(out, "head 10/50");
    }

    #[test]
    fn test_health_report_lists_parts() {
        let (mut world, mut system, templates) = setup();
        run_line("kill left_leg", &mut world, &mut system, &templates).unwrap();
        let out = run_line("health", &mut world, &mut system, &templates).unwrap();
        assert!(out.starts_with("Hero has the following anatomy health values:"));
        assert!(out.contains("left_leg has health: 0/75 (destroyed)"));
    }

    #[test]
    fn test_create_parts_reassembles() {
        let (mut world, mut system, templates) = setup();
        run_line("dmg torso 30", &mut world, &mut system, &templates).unwrap();
        let out = run_line("create_parts", &mut world, &mut system, &templates).unwrap();
        assert_eq!(out, "created 6 parts for 1 anatomies");

        let torso = system.registry().find_parts("torso");
        assert_eq!(torso.len(), 1);
        assert_eq!(world.get::<&AnatomyPart>(torso[0]).unwrap().health, 100);
    }

    #[test]
    fn test_create_parts_without_templates_keeps_anatomy() {
        let (mut world, mut system, _) = setup();
        run_line("dmg torso 30", &mut world, &mut system, &PartTemplates::default()).unwrap();

        let err = run_line("create_parts", &mut world, &mut system, &PartTemplates::default()).unwrap_err();
        assert!(matches!(err, ConsoleError::Anatomy(AnatomyError::UnknownTemplate(_))));

        let out = run_line("health", &mut world, &mut system, &PartTemplates::default()).unwrap();
        assert!(out.contains("torso has health: 70/100"));
    }
}
