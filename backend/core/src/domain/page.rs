// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Pagination and sort value objects used by `search` / `get_all` reads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

/// Ordered list of sort keys; the first key is the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub orders: Vec<SortOrder>,
}

impl Sort {
    pub fn by(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            orders: vec![SortOrder {
                property: property.into(),
                direction,
            }],
        }
    }

    pub fn then(mut self, property: impl Into<String>, direction: Direction) -> Self {
        self.orders.push(SortOrder {
            property: property.into(),
            direction,
        });
        self
    }

    pub fn primary(&self) -> Option<&SortOrder> {
        self.orders.first()
    }
}

/// Requested page: zero-based page number, page size and optional sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    pub fn sorted(page: usize, size: usize, sort: Sort) -> Self {
        Self {
            page,
            size,
            sort: Some(sort),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// The two orders a listing can fall back to when the caller gave none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPolicy {
    /// Used for plain listings and empty search terms
    pub default: Sort,
    /// Used when a non-empty search term is present
    pub score: Sort,
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self {
            default: Sort::by("createdAt", Direction::Desc).then("name", Direction::Asc),
            score: Sort::by("score", Direction::Desc),
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cut `items` (already in the requested order) down to the requested page.
    pub fn from_ordered(items: Vec<T>, request: &PageRequest) -> Self {
        let total_elements = items.len();
        let total_pages = if request.size == 0 {
            0
        } else {
            total_elements.div_ceil(request.size)
        };
        let content = items
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slicing() {
        let page = Page::from_ordered((1..=7).collect::<Vec<_>>(), &PageRequest::new(1, 3));
        assert_eq!(page.content, vec![4, 5, 6]);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = Page::from_ordered(vec![1, 2], &PageRequest::new(4, 10));
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
