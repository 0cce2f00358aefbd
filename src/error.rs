use axum::http::StatusCode;

/// Failures coming back from the credential store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(&'static str),

    #[error("store call exceeded its {0:?} deadline")]
    Timeout(std::time::Duration),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Failures coming back from the remote movie catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("catalog responded with {status}")]
    Status { status: StatusCode, body: String },

    #[error("malformed catalog response: {0}")]
    Decode(String),
}

pub type Rejection = (StatusCode, String);

impl From<StoreError> for Rejection {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.to_string()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl From<CatalogError> for Rejection {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Status { status, body } => (status, body),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

pub fn bad_request(msg: impl Into<String>) -> Rejection {
    (StatusCode::BAD_REQUEST, msg.into())
}
