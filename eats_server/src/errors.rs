use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use eats_engine::{
    traits::{AccountApiError, OrderFlowError, RestaurantApiError},
    AuthApiError,
};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Could not create the checkout session. {0}")]
    PaymentGatewayError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::TokenIssueError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::AccountNotFound => StatusCode::UNAUTHORIZED,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal details stay in the log
        let message = if status.is_server_error() {
            error!("💻️ {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "success": false, "error": message }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided. Please log in.")]
    MissingToken,
    #[error("The access token is invalid. {0}")]
    InvalidToken(String),
    #[error("Incorrect email or password.")]
    InvalidCredentials,
    #[error("Could not issue an access token. {0}")]
    TokenIssueError(String),
    #[error("User account not found.")]
    AccountNotFound,
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::InvalidCredentials => Self::AuthenticationError(AuthError::InvalidCredentials),
            AuthApiError::EmailAlreadyRegistered(_) => Self::Conflict(e.to_string()),
            AuthApiError::ValidationError(s) => Self::ValidationError(s),
            AuthApiError::PasswordHashError(s) => Self::BackendError(s),
            AuthApiError::AccountError(e) => e.into(),
        }
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            AccountApiError::UserNotFound(_) => Self::AuthenticationError(AuthError::AccountNotFound),
            AccountApiError::EmailAlreadyRegistered(_) => Self::Conflict(e.to_string()),
            AccountApiError::ValidationError(s) => Self::ValidationError(s),
        }
    }
}

impl From<RestaurantApiError> for ServerError {
    fn from(e: RestaurantApiError) -> Self {
        match e {
            RestaurantApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            RestaurantApiError::RestaurantNotFound(_) | RestaurantApiError::MenuItemNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            RestaurantApiError::RestaurantAlreadyExists(_) => Self::Conflict(e.to_string()),
            RestaurantApiError::Forbidden(s) => Self::InsufficientPermissions(s),
            RestaurantApiError::ValidationError(s) => Self::ValidationError(s),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
            OrderFlowError::RestaurantNotFound(_) | OrderFlowError::OrderNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            OrderFlowError::OrderAlreadyExists(_) => Self::Conflict(e.to_string()),
            OrderFlowError::ValidationError(s) => Self::ValidationError(s),
            OrderFlowError::GatewayError(e) => Self::PaymentGatewayError(e.to_string()),
            OrderFlowError::ForbiddenStatusChange { .. } => Self::ValidationError(e.to_string()),
            OrderFlowError::Forbidden(s) => Self::InsufficientPermissions(s),
        }
    }
}
