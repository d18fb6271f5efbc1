//! Collaborator contracts consumed by the view controller
//!
//! Transport, caching policy and retries belong to the implementations;
//! the engine only sees these traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::{Employee, PageResult, Transaction};

/// Supplies the list of employees
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Fetch every employee
    async fn fetch_all(&self) -> CoreResult<Vec<Employee>>;

    /// Drop any cached result
    fn invalidate(&self);
}

/// Supplies pages of all transactions
#[async_trait]
pub trait PaginatedTransactionFeed: Send + Sync {
    /// Fetch a page; `None` requests the first page
    async fn fetch_all(&self, page: Option<u32>) -> CoreResult<PageResult<Transaction>>;

    /// Drop any cached result
    fn invalidate_data(&self);
}

/// Supplies the full, unpaginated transaction set of one employee
#[async_trait]
pub trait EmployeeTransactionFeed: Send + Sync {
    async fn fetch_by_id(&self, employee_id: &str) -> CoreResult<Vec<Transaction>>;

    /// Drop any cached result
    fn invalidate_data(&self);
}

/// Writes an approval decision
#[async_trait]
pub trait ApprovalMutation: Send + Sync {
    /// Returns `Ok` only once the write is acknowledged
    async fn set_approval(&self, transaction_id: &str, value: bool) -> CoreResult<()>;
}

pub type DirectoryRef = Arc<dyn EmployeeDirectory>;
pub type PaginatedFeedRef = Arc<dyn PaginatedTransactionFeed>;
pub type EmployeeFeedRef = Arc<dyn EmployeeTransactionFeed>;
pub type MutationRef = Arc<dyn ApprovalMutation>;

/// Every collaborator a view controller needs
#[derive(Clone)]
pub struct Collaborators {
    pub directory: DirectoryRef,
    pub paginated: PaginatedFeedRef,
    pub by_employee: EmployeeFeedRef,
    pub mutation: MutationRef,
}
