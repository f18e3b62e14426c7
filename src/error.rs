//! Error types
//!
//! Rule violations (healing a dead part, reviving a live one, ...) are not
//! errors; they come back as outcomes. These cover broken host contracts.

use hecs::Entity;
use thiserror::Error;

/// Errors raised by the anatomy system
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnatomyError {
    /// A stimulus was addressed to an entity without an `AnatomyPart`
    #[error("entity {0:?} has no anatomy part")]
    NotAPart(Entity),

    /// The entity carries no `Anatomy` component
    #[error("entity {0:?} has no anatomy")]
    NoAnatomy(Entity),

    /// No part template with this id exists
    #[error("unknown part template `{0}`")]
    UnknownTemplate(String),

    /// Assembly was requested twice for the same owner
    #[error("anatomy of {0:?} is already assembled")]
    AlreadyAssembled(Entity),

    /// Effect history exists for a part with no skeletal details
    #[error("effect history recorded for `{0}`, which has no skeletal details")]
    OrphanEffectHistory(String),

    /// An effect outcome was appended for a part the skeleton doesn't know
    #[error("no skeletal details for part `{0}`")]
    UnknownSkeletalPart(String),

    /// A name lookup matched no registered part
    #[error("no part named `{0}`")]
    UnknownPart(String),
}

pub type Result<T> = std::result::Result<T, AnatomyError>;
