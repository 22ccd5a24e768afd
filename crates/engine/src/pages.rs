//! Offset pagination primitives shared by every list operation.

use crate::{EngineError, ResultEngine};

/// Default page size for budget listings.
pub const DEFAULT_PER_BUDGETS: u64 = 20;
/// Default page size for category listings.
pub const DEFAULT_PER_CATEGORIES: u64 = 50;
/// Default page size for transaction listings.
pub const DEFAULT_PER_TRANSACTIONS: u64 = 20;

/// A validated pagination request.
///
/// `page` is 1-based. Both values must be strictly positive; a missing value
/// falls back to the given default. A `page` past the last one is not an
/// error: it simply yields an empty page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per: u64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, per: Option<i64>, default_per: u64) -> ResultEngine<Self> {
        let page = match page {
            None => 1,
            Some(p) if p > 0 => p as u64,
            Some(p) => {
                return Err(EngineError::InvalidArgument(format!(
                    "page must be a positive integer, got {p}"
                )));
            }
        };
        let per = match per {
            None => default_per,
            Some(p) if p > 0 => p as u64,
            Some(p) => {
                return Err(EngineError::InvalidArgument(format!(
                    "per must be a positive integer, got {p}"
                )));
            }
        };
        Ok(Self { page, per })
    }

    /// First page with the given default size.
    pub fn first(default_per: u64) -> Self {
        Self {
            page: 1,
            per: default_per,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per(&self) -> u64 {
        self.per
    }

    /// The 0-based index sea-orm's paginator expects.
    pub(crate) fn index(&self) -> u64 {
        self.page - 1
    }
}

/// Pagination metadata over the *entire* filtered set, not just the slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u64,
    pub per: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

/// One page of records plus its metadata.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::new(None, None, DEFAULT_PER_CATEGORIES).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.per(), 50);
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let req = PageRequest::new(Some(3), Some(7), DEFAULT_PER_TRANSACTIONS).unwrap();
        assert_eq!(req.page(), 3);
        assert_eq!(req.per(), 7);
        assert_eq!(req.index(), 2);
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert!(PageRequest::new(Some(0), None, 20).is_err());
        assert!(PageRequest::new(Some(-1), None, 20).is_err());
        assert!(PageRequest::new(None, Some(0), 20).is_err());
        assert!(PageRequest::new(None, Some(-5), 20).is_err());
    }
}
