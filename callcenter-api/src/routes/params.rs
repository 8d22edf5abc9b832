/// Request pieces shared by several endpoints

use serde::Deserialize;

use callcenter_shared::models::pagination::Pagination;

use crate::error::{ApiError, ApiResult};

/// An integer the client may send as a number or as a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IntLike {
    Int(i64),
    Text(String),
}

impl IntLike {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            IntLike::Int(n) => Some(*n),
            IntLike::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Required integer field: `missing` when absent, `invalid` when not a number
pub fn required_int(value: Option<&IntLike>, missing: &str, invalid: &str) -> ApiResult<i64> {
    let value = value.ok_or_else(|| ApiError::BadRequest(missing.to_string()))?;
    value
        .as_i64()
        .ok_or_else(|| ApiError::BadRequest(invalid.to_string()))
}

/// Optional integer field: absent is fine, garbage is not
pub fn optional_int(value: Option<&IntLike>, invalid: &str) -> ApiResult<Option<i64>> {
    match value {
        None => Ok(None),
        Some(IntLike::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(invalid.to_string())),
    }
}

/// Parses a numeric path segment
pub fn path_id(raw: &str, what: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {} ID", what)))
}

/// `?page=&limit=` query string, kept raw so bad values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn requested_pagination(&self) -> Option<Pagination> {
        Pagination::from_query_if_requested(self.page.as_deref(), self.limit.as_deref())
    }
}
