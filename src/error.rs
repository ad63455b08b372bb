use thiserror::Error;

use crate::randomness::Technique;

/// Broad classification of a [`DiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value could not be converted, was out of range, or named something unknown.
    InvalidArgument,
    /// The request was well formed but contradicts itself or a configured bound.
    PolicyViolation,
    /// An identifier did not match the roll grammar.
    NoSuchOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("{what} must be a value that converts to an integer, got {value}")]
    NotAnInteger { what: &'static str, value: String },

    #[error("{what} must be a positive integer, got {value}")]
    NotPositive { what: &'static str, value: i64 },

    #[error("{what} is out of range: {value}")]
    OutOfRange { what: &'static str, value: i64 },

    #[error("{count}d{sides} with a bonus of {bonus} can total more than {max}", max = i32::MAX)]
    TotalOutOfRange { sides: u32, count: u32, bonus: i32 },

    #[error("keep count {requested} cannot exceed die count {available}")]
    KeepExceedsDice { requested: u32, available: u32 },

    #[error(
        "unrecognized randomization technique {0:?}, must be one of {names}",
        names = Technique::NAMES.join(", ")
    )]
    UnknownTechnique(String),

    #[error(
        "bonus integrity failure: modifier specified in call arguments was {explicit}, \
         modifier specified in identifier was {encoded}"
    )]
    BonusMismatch { explicit: i32, encoded: i32 },

    #[error("ability score dice kept ({kept}) cannot exceed ability score dice rolled ({rolled})")]
    KeptExceedsRolled { kept: u32, rolled: u32 },

    #[error("no such operation: {0}")]
    NoSuchOperation(String),
}

impl DiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiceError::NotAnInteger { .. }
            | DiceError::NotPositive { .. }
            | DiceError::OutOfRange { .. }
            | DiceError::TotalOutOfRange { .. }
            | DiceError::KeepExceedsDice { .. }
            | DiceError::UnknownTechnique(_) => ErrorKind::InvalidArgument,
            DiceError::BonusMismatch { .. } | DiceError::KeptExceedsRolled { .. } => {
                ErrorKind::PolicyViolation
            }
            DiceError::NoSuchOperation(_) => ErrorKind::NoSuchOperation,
        }
    }
}
