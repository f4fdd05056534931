use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    store::MAX_PAGE_SIZE,
};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Raw `page` / `page_size` query values; anything unparsable falls back to the defaults.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, default 1
    pub page: Option<String>,
    /// Items per page, 1 to 100, default 10
    pub page_size: Option<String>,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page.to_string()),
            page_size: Some(page_size.to_string()),
        }
    }

    /// Returns `(page, page_size, offset)`.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = parse(&self.page).filter(|p| *p >= 1).unwrap_or(1);
        let page_size = parse(&self.page_size)
            .filter(|s| (1..=MAX_PAGE_SIZE).contains(s))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(page_size);
        (page, page_size, offset)
    }
}

fn parse(value: &Option<String>) -> Option<i64> {
    value.as_deref().and_then(|v| v.trim().parse::<i64>().ok())
}

pub fn parse_order_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::validation(format!("invalid order id: {raw}")))
}
