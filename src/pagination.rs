/// Page arithmetic for list endpoints.

use serde::Deserialize;

use crate::error::ValidationError;
use crate::response::Paging;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Raw `?page=&pageSize=` query; values stay strings so that bad input
/// becomes a validation error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn parse(query: &PageQuery) -> Result<Self, ValidationError> {
        Ok(Self {
            page: parse_page(query.page.as_deref())?,
            page_size: parse_page_size(query.page_size.as_deref())?,
        })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn paging(&self, current_record: usize, total_record: i64) -> Paging {
        Paging {
            current_record: current_record as i64,
            current_page: self.page,
            total_record,
            total_page: total_pages(total_record, self.page_size),
        }
    }
}

/// Missing or below one means the first page.
pub fn parse_page(raw: Option<&str>) -> Result<i64, ValidationError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_PAGE),
        Some(raw) => raw,
    };

    let page = raw
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat("page".to_string()))?;

    Ok(page.max(DEFAULT_PAGE))
}

pub fn parse_page_size(raw: Option<&str>) -> Result<i64, ValidationError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_PAGE_SIZE),
        Some(raw) => raw,
    };

    match raw.parse::<i64>() {
        Ok(size) if size >= 1 => Ok(size),
        _ => Err(ValidationError::InvalidFormat("pageSize".to_string())),
    }
}

pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total - 1) / page_size + 1
}
