//! Pagination window for list operations.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// A clamped `limit`/`offset` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// Build a page from raw query values. A missing or non-positive limit
    /// falls back to the default; larger limits are capped. Negative offsets
    /// become zero.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if l > 0 => (l as u64).min(MAX_PAGE_LIMIT),
            _ => DEFAULT_PAGE_LIMIT,
        };
        let offset = offset.filter(|o| *o > 0).map(|o| o as u64).unwrap_or(0);
        Self { limit, offset }
    }

    /// Apply this window to an already ordered slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.offset as usize).min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Page::new(None, None), Page { limit: 20, offset: 0 });
        assert_eq!(Page::default(), Page::new(None, None));
    }

    #[test]
    fn test_clamping() {
        assert_eq!(Page::new(Some(0), Some(-5)), Page { limit: 20, offset: 0 });
        assert_eq!(Page::new(Some(-1), None).limit, 20);
        assert_eq!(Page::new(Some(500), Some(40)), Page { limit: 100, offset: 40 });
        assert_eq!(Page::new(Some(7), None).limit, 7);
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(Page::new(Some(3), Some(2)).slice(&items), &[2, 3, 4]);
        assert_eq!(Page::new(Some(5), Some(8)).slice(&items), &[8, 9]);
        assert!(Page::new(Some(5), Some(50)).slice(&items).is_empty());
    }
}
