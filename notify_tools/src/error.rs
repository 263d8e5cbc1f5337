use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Delivery failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
