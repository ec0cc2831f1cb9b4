use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] voltick_core::ValidationError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no API key: pass --api-key, set VOLTICK_POLYGON_API_KEY, or save a credential file")]
    MissingCredential,

    #[error(transparent)]
    Analysis(#[from] voltick_core::AnalysisError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::InvalidArgument(_) => 2,
            Self::MissingCredential => 2,
            Self::Analysis(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
