use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid date range: start_date {start} is after end_date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid amount range: min_amount {min} is greater than max_amount {max}")]
    InvalidAmountRange { min: f64, max: f64 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

impl FilterError {
    /// Query parameter the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            FilterError::InvalidDateRange { .. } => "start_date",
            FilterError::InvalidAmountRange { .. } => "min_amount",
            FilterError::InvalidAmount(_) => "amount",
            FilterError::InvalidLimit(_) => "limit",
            FilterError::InvalidOffset(_) => "offset",
            FilterError::MissingParameter(name) => name,
        }
    }
}
