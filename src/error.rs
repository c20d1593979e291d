use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevstrapError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required tool is missing and was not (or could not be) installed.
    #[error("{tool} is required but is not installed")]
    PrerequisiteMissing { tool: String },

    #[error("{program} failed: {message}")]
    CommandFailed { program: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Dialog error: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl DevstrapError {
    /// Build a `CommandFailed` from a program name and whatever it printed on stderr.
    pub fn command(program: impl Into<String>, stderr: &[u8]) -> Self {
        let message = String::from_utf8_lossy(stderr).trim().to_string();
        DevstrapError::CommandFailed {
            program: program.into(),
            message: if message.is_empty() {
                "exited with a non-zero status".to_string()
            } else {
                message
            },
        }
    }

    /// Whether this error should end the run instead of being logged against a single step.
    ///
    /// A broken prompt means the terminal went away, so there is nobody left to ask.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DevstrapError::PrerequisiteMissing { .. } | DevstrapError::Dialog(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DevstrapError>;
