// ==============================================================================
// limits.rs - Query Limits
// ==============================================================================
// Description: Page size bounds and defaults applied to incoming view requests
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::query::PageRequest;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryLimits {
    pub max_page_size: usize,
    /// Page size of the gene page tables
    pub default_page_size: usize,
    /// Page size of the TWAS browse table
    pub browse_page_size: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_page_size: 500,
            default_page_size: 10,
            browse_page_size: 50,
        }
    }
}

impl QueryLimits {
    /// Validated page window for a request
    pub fn page(&self, page_current: usize, page_size: usize) -> Result<PageRequest, QueryError> {
        if page_size > self.max_page_size {
            return Err(QueryError::InvalidRequest(format!(
                "page_size {} exceeds max {}",
                page_size, self.max_page_size
            )));
        }
        PageRequest::new(page_current, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        let limits = QueryLimits::default();
        assert!(limits.page(3, 10).is_ok());
        assert!(limits.page(0, 500).is_ok());
        assert!(matches!(limits.page(0, 501), Err(QueryError::InvalidRequest(_))));
        assert!(matches!(limits.page(0, 0), Err(QueryError::InvalidRequest(_))));
    }
}
