/// Error Handling Module
///
/// Every layer owns a closed error enum so callers branch on variants, never on
/// message text:
/// 1. Input boundary (`ValidationError`)
/// 2. Collaborators of the use case (`StoreError`, `HashError`)
/// 3. Token signer (`TokenError`)
/// 4. Account lifecycle use case (`AccountError`)
/// 5. Process configuration (`ConfigError`)
/// 6. Transport (`AppError`), mapped to HTTP responses with structured logging

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use uuid::Uuid;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for wire input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is empty")]
    EmptyField(&'static str),
    #[error("{0} is too short (minimum {1} characters)")]
    TooShort(&'static str, usize),
    #[error("{0} is too long (maximum {1} characters)")]
    TooLong(&'static str, usize),
    #[error("{0} has invalid format")]
    InvalidFormat(&'static str),
    #[error("{0} contains suspicious content")]
    SuspiciousContent(&'static str),
    #[error("input contains potentially dangerous SQL patterns")]
    PossibleSQLInjection,
}

/// Account store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("account with email={0} is not found")]
    NotFoundByEmail(String),
    #[error("account with id={0} is not found")]
    NotFoundById(Uuid),
    /// The unique email constraint rejected a write.
    #[error("account with email={0} already exists")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored account is corrupt: {0}")]
    Corrupt(String),
}

/// Credential hasher errors
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("secret does not match the stored digest")]
    Mismatch,
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    /// bcrypt only reads the first 72 bytes, so longer secrets are refused.
    #[error("secret is {0} bytes, over the 72 byte limit")]
    SecretTooLong(usize),
}

/// Token signer errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The signature checked out but the claims have the wrong shape.
    #[error("token is non valid")]
    NonValid,
    #[error("token has expired")]
    Expired,
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("token rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),
}

/// Account lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("account already exists")]
    AccountAlreadyExist,
    #[error("no account matches the given email")]
    EmailIsWrong,
    #[error("password is wrong")]
    PasswordIsWrong,
    #[error("account is not active")]
    AccountIsNotActive,
    #[error("account does not exist")]
    AccountIsNotExist,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Hasher(#[from] HashError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required config: {0}")]
    MissingRequired(String),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
    #[error("Config load error: {0}")]
    Load(#[from] config::ConfigError),
}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type returned by controllers and route handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("Missing authentication token")]
    MissingToken,
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

impl AppError {
    /// Status, code and client-facing message.
    ///
    /// Credential failures share one answer so a client cannot tell which
    /// check fired. Server faults never echo their detail.
    fn classify(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", ""),
            AppError::Account(e) => match e {
                AccountError::AccountAlreadyExist => {
                    (StatusCode::CONFLICT, "DUPLICATE_ENTRY", "Account already exists")
                }
                AccountError::EmailIsWrong
                | AccountError::PasswordIsWrong
                | AccountError::AccountIsNotActive => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid credentials",
                ),
                AccountError::AccountIsNotExist => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", "Account not found")
                }
                AccountError::Store(e) => classify_store(e),
                AccountError::Hasher(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error",
                ),
            },
            AppError::Token(_) => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_INVALID",
                "Invalid or expired token",
            ),
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "MISSING_TOKEN",
                "Missing authentication token",
            ),
        }
    }
}

fn classify_store(err: &StoreError) -> (StatusCode, &'static str, &'static str) {
    match err {
        StoreError::NotFoundByEmail(_) | StoreError::NotFoundById(_) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", "Account not found")
        }
        StoreError::Duplicate(_) => {
            (StatusCode::CONFLICT, "DUPLICATE_ENTRY", "Account already exists")
        }
        StoreError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Database service temporarily unavailable",
        ),
        StoreError::Database(_) | StoreError::Corrupt(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            "Database error occurred",
        ),
    }
}

impl ErrorHandler for AppError {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse) {
        let (status, code, message) = self.classify();
        // Validation messages are the only ones safe to echo verbatim.
        let message = match self {
            AppError::Validation(e) => e.to_string(),
            _ => message.to_string(),
        };

        let error_response =
            ErrorResponse::new(request_id.to_string(), message, code.to_string(), status.as_u16());

        (status, error_response)
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Account(AccountError::AccountAlreadyExist)
            | AppError::Account(AccountError::Store(StoreError::Duplicate(_))) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Account(
                e @ (AccountError::EmailIsWrong
                | AccountError::PasswordIsWrong
                | AccountError::AccountIsNotActive),
            ) => {
                tracing::warn!(request_id = request_id, error = %e, "Invalid credentials attempt");
            }
            AppError::Token(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Token rejected");
            }
            AppError::MissingToken => {
                tracing::warn!(request_id = request_id, "Missing authentication token");
            }
            _ => {
                let (status, _, _) = self.classify();
                if status.is_server_error() {
                    tracing::error!(request_id = request_id, error = %self, "Request failed");
                } else {
                    tracing::warn!(request_id = request_id, error = %self, "Request rejected");
                }
            }
        }
    }
}

/// Implement ResponseError for Actix-web integration
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &request_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        self.classify().0
    }
}

// ============================================================================
// 4. ERROR CONTEXT ENRICHMENT
// ============================================================================

/// Per-operation context attached to success and failure logs
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub account_id: Option<Uuid>,
    pub operation: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            account_id: None,
            operation,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }
}
