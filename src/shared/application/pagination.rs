/// Pagination support for history queries
///
/// Page indexes are 0-based to match the import service contract.
use serde::{Deserialize, Serialize};

/// Page sizes offered to users of the import history
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 25, 50];

/// Pagination parameters for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Query string pairs for the HTTP layer
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("size", self.size.to_string())]
    }
}

/// One page of a server-side collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_pages: u32, total_elements: u64) -> Self {
        Self {
            content,
            total_pages,
            total_elements,
        }
    }

    /// Last valid 0-based page index, `None` for an empty collection
    pub fn last_page_index(&self) -> Option<u32> {
        self.total_pages.checked_sub(1)
    }

    /// True when `page` points past the end of a non-empty collection
    pub fn is_out_of_range(&self, page: u32) -> bool {
        self.total_pages > 0 && page >= self.total_pages
    }
}

/// 1-based inclusive range of rows shown on `page`, `(0, 0)` when empty
pub fn shown_range(page: u32, size: u32, total_elements: u64) -> (u64, u64) {
    if total_elements == 0 {
        return (0, 0);
    }
    let from = page as u64 * size as u64 + 1;
    let to = ((page as u64 + 1) * size as u64).min(total_elements);
    (from, to)
}
