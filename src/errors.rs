use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    NotFound,
    PoolExhausted,
    PoolCreationFailed { reason: String, rolled_back: bool },
    AlreadySubmitted,
    Unauthorized,
    Validation(String),
    SubmitIncomplete { committed: usize, total: usize },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::PoolExhausted => write!(f, "All numbers have been assigned"),
            AppError::PoolCreationFailed { reason, rolled_back } => {
                if *rolled_back {
                    write!(f, "Meeting creation failed ({reason}); partial pool was removed")
                } else {
                    write!(
                        f,
                        "Meeting creation failed ({reason}); rollback also failed, partial pool may remain"
                    )
                }
            }
            AppError::AlreadySubmitted => {
                write!(f, "This form has already been answered by this participant")
            }
            AppError::Unauthorized => {
                write!(f, "An assigned number is required before answering forms")
            }
            AppError::Validation(msg) => write!(f, "{msg}"),
            AppError::SubmitIncomplete { committed, total } => write!(
                f,
                "Submission incomplete: {committed} of {total} answers were saved"
            ),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Db(_) | AppError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PoolExhausted | AppError::AlreadySubmitted => StatusCode::CONFLICT,
            AppError::PoolCreationFailed { .. } | AppError::SubmitIncomplete { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{self}");
        }
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}
