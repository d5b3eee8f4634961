use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidPagination(String),
    InvalidFilter(String),
    InvalidProfile(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidPagination(msg) => {
                write!(f, "invalid pagination: {msg}")
            }
            ModelError::InvalidFilter(msg) => write!(f, "invalid filter: {msg}"),
            ModelError::InvalidProfile(msg) => {
                write!(f, "invalid profile: {msg}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
