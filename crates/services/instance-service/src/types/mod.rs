//! Shared request types for listing endpoints.

mod pagination;
mod sort;

pub use pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use sort::{Sort, SortDirection, SortField};
