/// Errors reported by the engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An operation ran before the build step it depends on.
    #[error("{operation} called before {requires}")]
    InvalidState {
        operation: &'static str,
        requires: &'static str,
    },
}
