/// Page/limit handling shared by every list endpoint
///
/// Query strings carry `page` and `limit` as free text. Anything missing,
/// unparsable or not positive falls back to the defaults (page 1, limit 10).

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

impl Pagination {
    /// Parses raw query values, applying defaults
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
        }
    }

    /// Like [`Pagination::from_query`], but `None` unless both values are
    /// present and non-empty
    pub fn from_query_if_requested(page: Option<&str>, limit: Option<&str>) -> Option<Self> {
        match (page, limit) {
            (Some(p), Some(l)) if !p.is_empty() && !l.is_empty() => {
                Some(Self::from_query(Some(p), Some(l)))
            }
            _ => None,
        }
    }

    /// Rows to skip
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        total / self.limit + i64::from(total % self.limit != 0)
    }
}

/// One page of rows plus the counts clients need to render a pager
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            data,
            total,
            page: pagination.page,
            total_pages: pagination.total_pages(total),
        }
    }

    /// Everything on a single page
    pub fn unpaginated(data: Vec<T>) -> Self {
        let total = data.len() as i64;
        Self {
            data,
            total,
            page: 1,
            total_pages: 1,
        }
    }
}
