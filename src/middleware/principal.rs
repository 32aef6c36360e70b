use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity resolved by the upstream gateway
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal(pub String);

impl Principal {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Reads the gateway-injected principal header and makes it available to
/// handlers as an `Extension<Principal>`.
pub async fn principal_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = extract_principal(request.headers(), &state.api.principal_header)
        .map_err(|msg| {
            tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
            ApiError::unauthorized(msg)
        })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn extract_principal(headers: &HeaderMap, header_name: &str) -> Result<Principal, String> {
    let value = headers
        .get(header_name)
        .ok_or_else(|| format!("Missing {} header", header_name))?;

    let principal = value
        .to_str()
        .map_err(|_| format!("Invalid {} header", header_name))?
        .trim();

    if principal.is_empty() {
        return Err(format!("Empty {} header", header_name));
    }
    Ok(Principal(principal.to_string()))
}
