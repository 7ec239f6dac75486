//! Search and pagination over decoded lenses.
//!
//! Mirrors the dashboard list view: a case-insensitive substring search over
//! the name, both model selectors and the three prompts, followed by fixed-size
//! pages (or a single "All" page).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Lens;

/// Errors from query parameter parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// `perPage` is neither `All` nor a positive integer.
    #[error("invalid page size `{0}`: expected `All` or a positive integer")]
    InvalidPageSize(String),
}

/// Number of lenses per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// Everything on a single page.
    #[default]
    All,
    /// At most this many lenses per page; always >= 1.
    Count(usize),
}

impl FromStr for PageSize {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSize::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(PageSize::Count(n)),
            _ => Err(QueryError::InvalidPageSize(s.to_owned())),
        }
    }
}

/// Raw query string of `GET /lenses`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<usize>,
}

/// Validated list query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LensQuery {
    /// Lower-cased search needle; `None` matches everything.
    search: Option<String>,
    per_page: PageSize,
    /// 1-based page number; never 0.
    page: usize,
}

impl TryFrom<ListParams> for LensQuery {
    type Error = QueryError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let per_page = match params.per_page.as_deref() {
            Some(s) => s.parse()?,
            None => PageSize::All,
        };
        Ok(Self::new(params.search.as_deref(), per_page, params.page.unwrap_or(1)))
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LensPage {
    pub items: Vec<Lens>,
    /// Number of lenses matching the search, across all pages.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl LensQuery {
    /// Build a query; an empty `search` matches everything and page 0 means page 1.
    pub fn new(search: Option<&str>, per_page: PageSize, page: usize) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self {
            search,
            per_page,
            page: page.max(1),
        }
    }

    pub fn per_page(&self) -> PageSize {
        self.per_page
    }

    /// 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// `true` if `lens` matches the search needle.
    pub fn matches(&self, lens: &Lens) -> bool {
        let Some(needle) = &self.search else {
            return true;
        };
        [
            &lens.name,
            &lens.image_to_text_model,
            &lens.text_to_image_model,
            &lens.prompt,
            &lens.style_prompt,
            &lens.negative_prompt,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle.as_str()))
    }

    /// Filter then paginate `lenses`.
    pub fn apply(&self, lenses: Vec<Lens>) -> LensPage {
        let matched: Vec<Lens> = lenses.into_iter().filter(|l| self.matches(l)).collect();
        let total = matched.len();

        match self.per_page {
            PageSize::All => LensPage {
                items: matched,
                total,
                page: 1,
                total_pages: 1,
            },
            PageSize::Count(n) => {
                let page = self.page.max(1);
                let total_pages = total.div_ceil(n);
                let items = matched
                    .into_iter()
                    .skip((page - 1).saturating_mul(n))
                    .take(n)
                    .collect();
                LensPage {
                    items,
                    total,
                    page,
                    total_pages,
                }
            }
        }
    }
}
