use serde::{Deserialize, Serialize};

/// Page descriptor sent alongside a listing in the `X-Pagination` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_item_count: u64,
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u64,
}

impl PaginationMetadata {
    pub const HEADER: &'static str = "X-Pagination";

    /// `page_size` must already be clamped to at least 1.
    pub fn new(total_item_count: u64, page_size: u32, current_page: u32) -> Self {
        Self {
            total_item_count,
            page_size,
            current_page,
            total_pages: total_item_count.div_ceil(u64::from(page_size.max(1))),
        }
    }
}

/// Effective paging bounds after the server-side clamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Clamp caller-supplied values: both are raised to 1, page size is capped at `max_page_size`.
    pub fn clamped(page_number: Option<i64>, page_size: Option<i64>, default_page_size: u32, max_page_size: u32) -> Self {
        let page_number = page_number.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let requested = page_size.unwrap_or(i64::from(default_page_size));
        if requested > i64::from(max_page_size) {
            tracing::debug!("Page size {} exceeds max {}, capping to max", requested, max_page_size);
        }
        let page_size = requested.clamp(1, i64::from(max_page_size.max(1)));

        Self {
            page_number: u32::try_from(page_number).unwrap_or(u32::MAX),
            page_size: u32::try_from(page_size).unwrap_or(max_page_size),
        }
    }

    /// Number of records to skip before the page starts
    pub fn offset(&self) -> u64 {
        u64::from(self.page_size) * u64::from(self.page_number - 1)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PaginationMetadata::new(25, 10, 1).total_pages, 3);
        assert_eq!(PaginationMetadata::new(21, 20, 2).total_pages, 2);
    }

    #[test]
    fn total_pages_exact_multiple() {
        assert_eq!(PaginationMetadata::new(20, 10, 1).total_pages, 2);
        assert_eq!(PaginationMetadata::new(20, 20, 1).total_pages, 1);
    }

    #[test]
    fn total_pages_empty_collection() {
        let meta = PaginationMetadata::new(0, 10, 1);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.current_page, 1);
    }

    #[test]
    fn total_pages_matches_ceiling_for_small_inputs() {
        for total in 0u64..60 {
            for size in 1u32..25 {
                let expected = (total + u64::from(size) - 1) / u64::from(size);
                assert_eq!(PaginationMetadata::new(total, size, 1).total_pages, expected);
            }
        }
    }

    #[test]
    fn header_uses_camel_case_fields() {
        let json = serde_json::to_value(PaginationMetadata::new(3, 2, 1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"totalItemCount": 3, "pageSize": 2, "currentPage": 1, "totalPages": 2})
        );
    }

    #[test]
    fn page_size_is_capped() {
        let page = PageRequest::clamped(Some(1), Some(100), 10, 20);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn defaults_apply_when_absent() {
        let page = PageRequest::clamped(None, None, 10, 20);
        assert_eq!(page, PageRequest { page_number: 1, page_size: 10 });
    }

    #[test]
    fn non_positive_values_raise_to_one() {
        let page = PageRequest::clamped(Some(0), Some(-5), 10, 20);
        assert_eq!(page, PageRequest { page_number: 1, page_size: 1 });
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = PageRequest::clamped(Some(3), Some(10), 10, 20);
        assert_eq!(page.offset(), 20);
        assert_eq!(page.limit(), 10);
    }
}
