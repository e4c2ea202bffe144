//! # Derma Store
//!
//! 诊断记录的会话内存储与派生视图计算。

pub mod store;
pub mod views;

pub use store::RecordStore;
pub use views::{
    aggregate_counts, filter_by_outcome, filter_by_search, paginate, query_records, total_pages,
    OutcomeFilter, RecordCounts, RecordPage, RecordQuery, DEFAULT_PAGE_SIZE,
};
