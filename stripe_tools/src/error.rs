use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripeApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Webhook signature verification failed. {0}")]
    SignatureError(#[from] SignatureError),
    #[error("Unexpected event payload. {0}")]
    UnexpectedEventObject(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("The signature header is empty or could not be parsed")]
    MalformedHeader,
    #[error("No v1 signatures were found in the signature header")]
    NoSignatures,
    #[error("The event timestamp is outside the tolerance window")]
    TimestampOutsideTolerance,
    #[error("No signatures found matching the expected signature for the payload")]
    NoMatchingSignature,
    #[error("The webhook signing secret cannot be used as an HMAC key")]
    InvalidKey,
    #[error("No webhook signing secret has been configured")]
    MissingSecret,
}
