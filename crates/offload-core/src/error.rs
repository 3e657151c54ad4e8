//! Error types for the offload pool

use core::fmt;

/// Result of an offloaded task as observed through its handle
pub type TaskResult<T> = Result<T, TaskError>;

/// Failure of an offloaded closure.
///
/// The only error kind the core itself produces: the submitted closure
/// panicked while a worker ran it. The panic payload is captured as a
/// message so the same error can be replayed on every `wait` call,
/// on any thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The closure panicked; carries the panic message
    Failed(String),
}

impl TaskError {
    /// The captured panic message
    pub fn message(&self) -> &str {
        match self {
            TaskError::Failed(msg) => msg,
        }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Failed(msg) => write!(f, "task failed: {}", msg),
        }
    }
}

impl std::error::Error for TaskError {}

/// Fatal pool construction failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Spawning a worker thread failed
    Spawn(String),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Spawn(msg) => write!(f, "failed to spawn worker thread: {}", msg),
        }
    }
}

impl std::error::Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = TaskError::Failed("BOOM".to_string());
        assert_eq!(format!("{}", e), "task failed: BOOM");
        assert_eq!(e.message(), "BOOM");

        let e = PoolError::Spawn("resource exhausted".to_string());
        assert_eq!(
            format!("{}", e),
            "failed to spawn worker thread: resource exhausted"
        );
    }

    #[test]
    fn test_error_replay_is_identical() {
        let e = TaskError::Failed("BOOM".to_string());
        let replayed = e.clone();
        assert_eq!(e, replayed);
    }
}
