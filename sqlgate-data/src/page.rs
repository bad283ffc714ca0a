use serde::{Deserialize, Serialize};

/// Pagination request. Pages are 1-based.
///
/// A page or size of zero or less means "unpaged": every row is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pageable {
    pub page: i64,
    pub size: i64,
}

impl Default for Pageable {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

impl Pageable {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    pub fn is_unpaged(&self) -> bool {
        self.page <= 0 || self.size <= 0
    }

    /// Rows to skip; zero when unpaged.
    pub fn offset(&self) -> u64 {
        if self.is_unpaged() {
            0
        } else {
            ((self.page - 1) as u64).saturating_mul(self.size as u64)
        }
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    /// Row count of the whole table, independent of the page.
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: u64) -> Self {
        let total_pages = if pageable.is_unpaged() {
            u64::from(total_elements > 0)
        } else {
            total_elements.div_ceil(pageable.size as u64)
        };
        Self {
            content,
            page: pageable.page,
            size: pageable.size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(Pageable::new(1, 10).offset(), 0);
        assert_eq!(Pageable::new(3, 10).offset(), 20);
        assert_eq!(Pageable::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_unpaged() {
        assert!(Pageable::new(0, 10).is_unpaged());
        assert!(Pageable::new(2, 0).is_unpaged());
        assert!(Pageable::new(-1, -1).is_unpaged());
        assert!(!Pageable::new(1, 1).is_unpaged());
    }

    #[test]
    fn test_total_pages() {
        let page = Page::new(vec![1, 2], &Pageable::new(2, 2), 5);
        assert_eq!(page.total_pages, 3);

        let all = Page::new(vec![1, 2, 3], &Pageable::new(0, 0), 3);
        assert_eq!(all.total_pages, 1);

        let empty = Page::<i32>::new(vec![], &Pageable::new(0, 0), 0);
        assert_eq!(empty.total_pages, 0);
    }
}
