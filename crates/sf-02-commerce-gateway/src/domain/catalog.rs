//! Catalog queries: product listing and category listing.

use super::types::QueryParams;
use serde::{Deserialize, Serialize};

/// Upper bound on `per_page` accepted upstream
pub const MAX_PER_PAGE: u32 = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("page must be >= 1, got {0}")]
    InvalidPage(u32),
    #[error("per_page must be between 1 and 100, got {0}")]
    InvalidPerPage(u32),
}

/// Product listing query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    pub page: u32,
    pub per_page: u32,
    /// Category id filter
    pub category: Option<String>,
    pub search: Option<String>,
    pub status: String,
    pub featured: Option<bool>,
    pub on_sale: Option<bool>,
    pub orderby: String,
    pub order: SortOrder,
    /// Passthrough parameters, applied last
    #[serde(skip)]
    pub extra: QueryParams,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            category: None,
            search: None,
            status: "publish".to_string(),
            featured: None,
            on_sale: None,
            orderby: "date".to_string(),
            order: SortOrder::Desc,
            extra: QueryParams::default(),
        }
    }
}

impl ProductQuery {
    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn on_sale(mut self, on_sale: bool) -> Self {
        self.on_sale = Some(on_sale);
        self
    }

    pub fn sort(mut self, orderby: impl Into<String>, order: SortOrder) -> Self {
        self.orderby = orderby.into();
        self.order = order;
        self
    }

    /// Add a passthrough parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra.set(key, value);
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page < 1 {
            return Err(QueryError::InvalidPage(self.page));
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            return Err(QueryError::InvalidPerPage(self.per_page));
        }
        Ok(())
    }

    /// Query parameters in upstream order, passthrough merged last.
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("page", self.page)
            .with("per_page", self.per_page)
            .with("status", &self.status)
            .with("orderby", &self.orderby)
            .with("order", self.order.as_str())
            .with_opt("category", self.category.as_ref())
            .with_opt("search", self.search.as_ref())
            .with_opt("featured", self.featured)
            .with_opt("on_sale", self.on_sale);
        params.merge(&self.extra);
        params
    }
}

/// Category listing query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryQuery {
    pub page: Option<u32>,
    pub per_page: u32,
    pub parent: Option<u64>,
    pub orderby: String,
    pub order: SortOrder,
    pub hide_empty: bool,
    #[serde(skip)]
    pub extra: QueryParams,
}

impl Default for CategoryQuery {
    fn default() -> Self {
        Self {
            page: None,
            per_page: MAX_PER_PAGE,
            parent: None,
            orderby: "name".to_string(),
            order: SortOrder::Asc,
            hide_empty: true,
            extra: QueryParams::default(),
        }
    }
}

impl CategoryQuery {
    pub fn parent(mut self, parent: u64) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn include_empty(mut self) -> Self {
        self.hide_empty = false;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra.set(key, value);
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if let Some(page) = self.page.filter(|p| *p < 1) {
            return Err(QueryError::InvalidPage(page));
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            return Err(QueryError::InvalidPerPage(self.per_page));
        }
        Ok(())
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with_opt("page", self.page)
            .with("per_page", self.per_page)
            .with_opt("parent", self.parent)
            .with("orderby", &self.orderby)
            .with("order", self.order.as_str())
            .with("hide_empty", self.hide_empty);
        params.merge(&self.extra);
        params
    }
}
