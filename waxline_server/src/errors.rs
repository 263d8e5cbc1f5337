use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use stripe_tools::webhook::WebhookError;
use thiserror::Error;
use waxline_engine::{db_types::OrderId, traits::OrderStoreError, OrderFlowError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Order {0} has already been settled; a checkout session can only be opened for a pending order")]
    OrderNotPending(OrderId),
    #[error("Webhook delivery failed verification. {0}")]
    WebhookAuthenticationFailed(String),
    #[error("Webhook payload was rejected. {0}")]
    WebhookPayloadError(String),
    #[error("The payment provider call failed. {0}")]
    PaymentProviderError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::WebhookAuthenticationFailed(_) => StatusCode::BAD_REQUEST,
            Self::WebhookPayloadError(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::OrderNotPending(_) => StatusCode::PRECONDITION_FAILED,
            Self::PaymentProviderError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::OrderNotFound(_) | OrderFlowError::ListingNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::EmptyOrder | OrderFlowError::MixedCurrencies(..) => Self::InvalidRequestBody(e.to_string()),
            OrderFlowError::StoreError(e) => e.into(),
        }
    }
}

impl From<OrderStoreError> for ServerError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderStoreError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<WebhookError> for ServerError {
    fn from(e: WebhookError) -> Self {
        match e {
            WebhookError::MalformedHeader(_) | WebhookError::SignatureMismatch | WebhookError::StaleTimestamp => {
                Self::WebhookAuthenticationFailed(e.to_string())
            },
            WebhookError::InvalidPayload(_) | WebhookError::MissingOrderId => Self::WebhookPayloadError(e.to_string()),
        }
    }
}
