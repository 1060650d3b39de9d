mod routes;
pub mod types;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

pub use routes::configure;

use crate::domain::order::OrderError;
use crate::session::{AuthError, SessionError};
use crate::workflows::WorkflowError;
use types::ErrorResponse;

// ============================================================================
// HTTP Error Mapping
// ============================================================================
//
// Every failure leaves the service as `{"error": "<message>"}` where the
// message is the error's Display text.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Session actor unavailable: {0}")]
    Mailbox(#[from] actix::MailboxError),
}

fn session_status(err: &SessionError) -> StatusCode {
    match err {
        SessionError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        SessionError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        SessionError::OrderNumbersExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::Order(OrderError::NotInitialized) => StatusCode::INTERNAL_SERVER_ERROR,
        SessionError::Order(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Session(e) => session_status(e),
            ApiError::Workflow(e) => match e {
                WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
                WorkflowError::NotLoggedIn => StatusCode::UNAUTHORIZED,
                WorkflowError::Session(inner) => session_status(inner),
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ApiError::Mailbox(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
