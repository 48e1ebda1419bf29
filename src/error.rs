use std::io;

/// User mistakes: reported, nothing changes.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a task to work on first.")]
    NoTaskSelected,
    #[error("Not enough points ({balance}) for a reward costing {cost}.")]
    InsufficientPoints { balance: u64, cost: u64 },
}

/// Import failures leave the current schedule untouched.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Nothing to import.")]
    EmptyInput,
    #[error("Could not find any day columns in the header row.")]
    NoDayColumns,
    #[error("Invalid Google Sheets link.")]
    InvalidLink,
    #[error("Failed to fetch the sheet ({0}). Make sure it is published or import a CSV file instead.")]
    Fetch(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("Failed to save state: {0}")]
    Storage(#[from] io::Error),
}

impl AppError {
    /// Empty imports are swallowed instead of reported.
    pub fn is_silent(&self) -> bool {
        matches!(self, AppError::Import(ImportError::EmptyInput))
    }
}
