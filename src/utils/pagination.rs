// src/utils/pagination.rs

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// Raw `?page=&per_page=` query parameters.
///
/// Kept as strings so a non-numeric value is reported by us as a 400
/// instead of by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl PageParams {
    /// Returns `(page, per_page)` with defaults applied and `per_page` capped.
    pub fn resolve(&self) -> Result<(i64, i64), AppError> {
        let invalid = || AppError::BadRequest("Invalid page or per_page parameter".to_string());

        let page = match &self.page {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| invalid())?,
            None => DEFAULT_PAGE,
        };

        let per_page = match &self.per_page {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| invalid())?,
            None => DEFAULT_PER_PAGE,
        };

        if per_page < 1 {
            return Err(invalid());
        }

        Ok((page, per_page.min(MAX_PER_PAGE)))
    }
}

/// Splits `count` rows into 1-based pages of `per_page` rows.
/// An empty result set still has one (empty) first page.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            (self.count + self.per_page - 1) / self.per_page
        }
    }

    pub fn page(&self, number: i64) -> Result<Page, AppError> {
        if number < 1 || number > self.num_pages() {
            return Err(AppError::BadRequest("Invalid page number".to_string()));
        }

        Ok(Page {
            number,
            per_page: self.per_page,
            num_pages: self.num_pages(),
            count: self.count,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: i64,
    pub per_page: i64,
    pub num_pages: i64,
    pub count: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            current_page: self.number,
            total_pages: self.num_pages,
            total_posts: self.count,
            has_next: self.has_next(),
            has_previous: self.has_previous(),
        }
    }
}

/// The `pagination` object of a post listing.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_posts: i64,
    pub has_next: bool,
    pub has_previous: bool,
}
