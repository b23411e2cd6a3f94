use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;

pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";

/// Shared key guarding routes registered with function-level auth.
#[derive(Clone, Debug, Default)]
pub struct FunctionKeyConfig {
    pub key: Option<String>,
}

impl FunctionKeyConfig {
    pub fn new(key: Option<String>) -> Self {
        Self { key }
    }
}

#[derive(Deserialize)]
struct KeyQuery {
    code: Option<String>,
}

/// Reject requests that do not present the function key.
///
/// The key is read from the `x-functions-key` header, falling back to the
/// `code` query parameter. With no key configured every request is rejected.
pub async fn function_key_middleware(
    State(config): State<FunctionKeyConfig>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = config.key.as_deref() else {
        tracing::error!("Function-level route reached with no function key configured");
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Function key authentication is not configured"
        )));
    };

    let provided = provided_key(req.headers(), req.uri().query());

    match provided {
        Some(key) if keys_match(expected, &key) => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "Rejected request with invalid function key");
            Err(AppError::Unauthorized(anyhow::anyhow!("Invalid function key")))
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "Rejected request without function key");
            Err(AppError::Unauthorized(anyhow::anyhow!("Missing function key")))
        }
    }
}

fn provided_key(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    if let Some(value) = headers
        .get(FUNCTION_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(value.to_string());
    }

    query
        .and_then(|q| serde_urlencoded::from_str::<KeyQuery>(q).ok())
        .and_then(|q| q.code)
}

fn keys_match(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();

    if expected.len() != provided.len() {
        return false;
    }

    expected.ct_eq(provided).into()
}
