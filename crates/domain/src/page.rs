//! Page results for character listings.

use serde::{Deserialize, Serialize};

use crate::character::Character;

/// Pagination metadata computed over the filtered record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    /// Count of records after search filtering, not the page length.
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: usize) -> Self {
        let total_pages = total.div_ceil(limit.max(1) as usize);
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: (page as usize) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// One page of character records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterPage {
    pub data: Vec<Character>,
    pub pagination: Pagination,
}
