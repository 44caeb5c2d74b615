//! List query parameters shared by every storage backend.

use serde::{Deserialize, Serialize};

/// Field a character listing can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Level,
    Race,
    Class,
    #[default]
    CreatedAt,
}

impl SortKey {
    /// Parse a wire value, falling back to `createdAt` for unknown input.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "name" => Self::Name,
            "level" => Self::Level,
            "race" => Self::Race,
            "class" => Self::Class,
            _ => Self::CreatedAt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Level => "level",
            Self::Race => "race",
            Self::Class => "class",
            Self::CreatedAt => "createdAt",
        }
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a wire value, falling back to descending for unknown input.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters for the storage contract's list operation.
///
/// The HTTP layer enforces `page >= 1` and `limit` in 1..=100 before a query
/// reaches a backend; backends still behave sanely for out-of-range pages by
/// returning an empty page with the correct total.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub limit: u32,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    /// Case-insensitive substring matched against name, race, and class.
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            search: None,
        }
    }
}

impl ListQuery {
    /// Zero-based offset of the first record on this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.limit as usize
    }

    /// Search term normalized for matching; `None` when absent or blank.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}
