//! Error types for txreview-data

use std::io;
use thiserror::Error;
use txreview_core::{CoreError, Source};

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid dataset: {message}")]
    InvalidDataset { message: String },

    #[error("Page {page} is out of range ({total} transactions)")]
    PageOutOfRange { page: u32, total: usize },

    #[error("Employee id cannot be empty")]
    EmptyEmployeeId,

    #[error("Unknown employee: {id}")]
    UnknownEmployee { id: String },

    #[error("Unknown transaction: {id}")]
    UnknownTransaction { id: String },

    #[error("Could not read dataset: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl DataError {
    /// Report a failed read through the core error taxonomy
    pub fn into_fetch_error(self, origin: Source) -> CoreError {
        CoreError::FetchFailed {
            origin,
            message: self.to_string(),
        }
    }

    /// Report a rejected approval write through the core error taxonomy
    pub fn into_mutation_error(self, transaction_id: &str) -> CoreError {
        CoreError::MutationFailed {
            transaction_id: transaction_id.to_string(),
            message: self.to_string(),
        }
    }
}

impl From<DataError> for CoreError {
    fn from(error: DataError) -> Self {
        CoreError::DataError {
            message: error.to_string(),
        }
    }
}
