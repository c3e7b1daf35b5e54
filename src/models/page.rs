//! Paginated response envelope

use serde::{Deserialize, Serialize};

/// One page of a remote list: `{ data, page, totalPages }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page, in server order
    pub data: Vec<T>,
    /// 1-based page number
    pub page: u32,
    /// Total number of pages for the query
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Whether more pages exist after this one
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// Cut page `page` (1-based, 0 treated as 1) out of a full result set
    pub fn slice(all: Vec<T>, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1) as usize;
        let total_pages = all.len().div_ceil(limit) as u32;
        let start = (page as usize - 1).saturating_mul(limit);

        let data = all.into_iter().skip(start).take(limit).collect();

        Self {
            data,
            page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_pages() {
        let all: Vec<u32> = (1..=25).collect();

        let first = Page::slice(all.clone(), 1, 10);
        assert_eq!(first.data, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert!(first.has_more());

        let last = Page::slice(all, 3, 10);
        assert_eq!(last.data, vec![21, 22, 23, 24, 25]);
        assert!(!last.has_more());
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let page = Page::slice(vec![1, 2, 3], 4, 2);
        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_deserialize_ignores_totals() {
        let json = r#"{"data":[1,2],"page":1,"totalPages":4,"totalMatches":8}"#;
        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.total_pages, 4);
    }
}
