use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be >= 0")]
    Negative { field: &'static str },
    #[error("{field} must be > {min}")]
    AtOrBelow { field: &'static str, min: f64 },
    #[error("{field} must be <= {max}")]
    Above { field: &'static str, max: f64 },
}

impl InputError {
    pub fn field(&self) -> &'static str {
        match self {
            InputError::NonFinite { field }
            | InputError::Negative { field }
            | InputError::AtOrBelow { field, .. }
            | InputError::Above { field, .. } => *field,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to serialize projection: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input(_) => 2,
            CliError::Serialize(_) => 1,
        }
    }
}
