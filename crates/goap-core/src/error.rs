use thiserror::Error;

/// Configuration errors raised while declaring or registering actions.
///
/// These indicate a bug in action setup. Runtime failure of an action
/// (`perform` or the procedural check returning false) is not an error and
/// never surfaces here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoapError {
    #[error("action '{action}' has no precondition '{key}'")]
    MissingPrecondition { action: String, key: String },

    #[error("action '{action}' has no effect '{key}'")]
    MissingEffect { action: String, key: String },

    #[error("action '{action}' has invalid cost {cost} (must be finite and non-negative)")]
    InvalidCost { action: String, cost: f32 },

    #[error("action '{0}' is already registered")]
    DuplicateAction(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

pub type Result<T> = std::result::Result<T, GoapError>;
