use axum::body::Bytes;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::ApiConfig;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<String>,
}

/// 1-indexed page and a size clamped to `1..=max_page_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Pagination {
    pub fn from_query(query: &PageQuery, api: &ApiConfig) -> Result<Self, ApiError> {
        let page = parse_param("page", query.page.as_deref())?.unwrap_or(1).max(1);
        let size = page_size(query.size.as_deref(), api)?;
        Ok(Self { page, size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

/// Requested size, defaulted and clamped to the configured bounds
pub fn page_size(raw: Option<&str>, api: &ApiConfig) -> Result<i64, ApiError> {
    let size = parse_param("size", raw)?.unwrap_or(api.default_page_size);
    Ok(size.clamp(1, api.max_page_size.max(1)))
}

fn parse_param(name: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Invalid {} parameter", name))),
    }
}

/// Parse a request body that must be a JSON object
pub fn parse_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::invalid_json("Missing request body"));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::invalid_json("Request body must be a JSON object")),
        Err(e) => Err(ApiError::invalid_json(format!("Invalid JSON body: {}", e))),
    }
}

/// Path ids arrive percent-decoded; a blank one is treated as missing
pub fn require_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::bad_request("Missing id parameter"));
    }
    Ok(id)
}
