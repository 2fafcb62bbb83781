//! Internal-error result type shared by the floorplanning crates.

use std::fmt;

/// Result of an operation that fails only when an internal invariant breaks.
///
/// Problems with the input design go through the crate error enums and the
/// diagnostic sink instead.
pub type StrataResult<T> = Result<T, InternalError>;

/// A broken invariant inside the floorplanner, such as a cyclic
/// "below" graph.
#[derive(Debug, thiserror::Error)]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
    /// Stage that detected the problem, outermost last.
    pub stages: Vec<&'static str>,
}

impl InternalError {
    /// Creates an internal error with no stage context.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Records the stage the error passed through.
    pub fn in_stage(mut self, stage: &'static str) -> Self {
        self.stages.push(stage);
        self
    }
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internal floorplanner error")?;
        for stage in self.stages.iter().rev() {
            write!(f, " in {stage}")?;
        }
        write!(f, ": {}", self.message)
    }
}
