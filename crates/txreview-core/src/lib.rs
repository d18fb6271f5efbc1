//! Transaction view synchronization
//!
//! Keeps a reviewable list of transactions in sync with one of two feeds
//! (every transaction, paginated, or a single employee's transactions) and
//! layers user-confirmed approvals over the fetched data.
//!
//! - [`ViewController`]: feed selection, pagination, initial load sequencing
//! - [`ApprovalOverlayStore`]: effective approvals
//! - [`feeds`]: collaborator traits implemented by data backends

pub mod controller;
pub mod error;
pub mod feeds;
pub mod loading;
pub mod models;
pub mod overlay;
pub mod types;
pub mod view;

#[cfg(test)]
mod testing;

pub use controller::ViewController;
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use feeds::{
    ApprovalMutation, Collaborators, EmployeeDirectory, EmployeeTransactionFeed,
    PaginatedTransactionFeed,
};
pub use loading::{LoadingFlag, LoadingGuard};
pub use models::{Employee, PageResult, Transaction};
pub use overlay::ApprovalOverlayStore;
pub use types::{ActiveFeed, FetchOutcome, Source, FIRST_PAGE};
pub use view::{FilterOption, TransactionRow, ViewSnapshot};
