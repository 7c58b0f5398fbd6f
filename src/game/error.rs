//! Caller-visible game errors. All variants are recoverable; they surface in
//! the message log as player feedback rather than aborting anything.

use thiserror::Error;

use super::resources::ResourceKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// A rate multiplier factor must be positive and finite; a zero or
    /// negative factor would make a resource stream permanently dead.
    #[error("invalid multiplier factor {factor}")]
    InvalidArgument { factor: f64 },

    #[error("unknown upgrade `{0}`")]
    UnknownUpgrade(String),

    #[error("upgrade `{0}` already purchased")]
    AlreadyPurchased(String),

    #[error("not enough {} ({required} needed, {available:.0} held)", kind.name())]
    InsufficientResources {
        kind: ResourceKind,
        required: f64,
        available: f64,
    },
}
