use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    #[error("Screen {0} has no delete endpoint")]
    DeleteNotSupported(String),

    #[error("Invalid model data: {0}")]
    Model(#[from] schooldesk_model::ModelError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
