//! Error types for the tuition model.
//!
//! Only two things can go wrong inside the engine: the program structure has
//! no billable credits, or the optimizer was handed an unusable search grid.
//! Everything else is about getting a configuration record off disk.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Program structure yields zero billable credit-units per year.
    #[error("Education config must include at least one term with billable credits.")]
    EmptyProgram,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid tuition search: {0}")]
    InvalidSearch(String),

    #[error("could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// True for failures caused by the configuration record itself.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ModelError::EmptyProgram
                | ModelError::InvalidConfig(_)
                | ModelError::Io { .. }
                | ModelError::Parse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_program_message() {
        let msg = ModelError::EmptyProgram.to_string();
        assert!(msg.contains("at least one term"));
    }

    #[test]
    fn test_config_error_classification() {
        assert!(ModelError::EmptyProgram.is_config_error());
        assert!(ModelError::InvalidConfig("x".into()).is_config_error());
        assert!(!ModelError::InvalidSearch("step".into()).is_config_error());
    }
}
