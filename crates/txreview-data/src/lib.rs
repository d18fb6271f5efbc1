//! In-memory transaction backend
//!
//! Serves the four review feeds from a JSON dataset, with simulated latency
//! and per-request response caching.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use txreview_config::FeedConfig;
use txreview_core::{
    ApprovalMutation, Collaborators, CoreError, CoreResult, Employee, EmployeeDirectory,
    EmployeeTransactionFeed, PageResult, PaginatedTransactionFeed, Source, Transaction,
    FIRST_PAGE,
};

pub mod cache;
pub mod dataset;
pub mod error;

pub use cache::ResponseCache;
pub use dataset::Dataset;
pub use error::DataError;

/// Backend reference type
pub type BackendRef = Arc<MockBackend>;

/// Dataset plus the feed settings it is served with
pub struct MockBackend {
    dataset: RwLock<Dataset>,
    feed: FeedConfig,
    employees: ResponseCache<Vec<Employee>>,
    pages: ResponseCache<PageResult<Transaction>>,
    by_employee: ResponseCache<Vec<Transaction>>,
}

impl MockBackend {
    pub fn new(dataset: Dataset, feed: FeedConfig) -> Self {
        let cache_enable = feed.cache_enable;
        Self {
            dataset: RwLock::new(dataset),
            feed,
            employees: ResponseCache::new(cache_enable),
            pages: ResponseCache::new(cache_enable),
            by_employee: ResponseCache::new(cache_enable),
        }
    }

    /// Load the dataset file and wrap it in a backend
    pub async fn load(path: impl AsRef<Path>, feed: FeedConfig) -> CoreResult<BackendRef> {
        let path = path.as_ref();
        let dataset = Dataset::load(path).await.map_err(CoreError::from)?;
        info!(
            target: "txreview::data",
            "Loaded {} employees and {} transactions from {}",
            dataset.employees.len(),
            dataset.transactions.len(),
            path.display()
        );
        Ok(Arc::new(Self::new(dataset, feed)))
    }

    /// Collaborator handles backed by this dataset
    pub fn collaborators(self: &Arc<Self>) -> Collaborators {
        Collaborators {
            directory: Arc::new(MockDirectory(self.clone())),
            paginated: Arc::new(MockPaginatedFeed(self.clone())),
            by_employee: Arc::new(MockEmployeeFeed(self.clone())),
            mutation: Arc::new(MockApprovalMutation(self.clone())),
        }
    }

    pub fn feed_config(&self) -> &FeedConfig {
        &self.feed
    }

    /// Copy of the stored dataset
    pub async fn dataset(&self) -> Dataset {
        self.dataset.read().await.clone()
    }

    async fn simulate_latency(&self) {
        if self.feed.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.feed.latency_ms)).await;
        }
    }

    fn clear_caches(&self) {
        self.employees.clear();
        self.pages.clear();
        self.by_employee.clear();
    }
}

/// Employee directory served from the dataset
pub struct MockDirectory(BackendRef);

#[async_trait]
impl EmployeeDirectory for MockDirectory {
    async fn fetch_all(&self) -> CoreResult<Vec<Employee>> {
        let backend = &self.0;
        if let Some(cached) = backend.employees.get("employees") {
            debug!(target: "txreview::data", "employees served from cache");
            return Ok(cached);
        }

        backend.simulate_latency().await;
        let employees = backend.dataset.read().await.employees.clone();
        backend.employees.insert("employees", employees.clone());
        Ok(employees)
    }

    fn invalidate(&self) {
        self.0.employees.clear();
    }
}

/// Paginated feed of all transactions
pub struct MockPaginatedFeed(BackendRef);

#[async_trait]
impl PaginatedTransactionFeed for MockPaginatedFeed {
    async fn fetch_all(&self, page: Option<u32>) -> CoreResult<PageResult<Transaction>> {
        let backend = &self.0;
        let page = page.unwrap_or(FIRST_PAGE);
        let key = format!("paginatedTransactions:{}", page);
        if let Some(cached) = backend.pages.get(&key) {
            debug!(target: "txreview::data", "page {} served from cache", page);
            return Ok(cached);
        }

        backend.simulate_latency().await;
        let result = backend
            .dataset
            .read()
            .await
            .page(page, backend.feed.page_size)
            .map_err(|e| e.into_fetch_error(Source::PaginatedTransactions))?;
        debug!(
            target: "txreview::data",
            "page {}: {} transactions, more={}",
            page,
            result.data.len(),
            result.has_more()
        );
        backend.pages.insert(key, result.clone());
        Ok(result)
    }

    fn invalidate_data(&self) {
        self.0.pages.clear();
    }
}

/// Unpaginated feed of one employee's transactions
pub struct MockEmployeeFeed(BackendRef);

#[async_trait]
impl EmployeeTransactionFeed for MockEmployeeFeed {
    async fn fetch_by_id(&self, employee_id: &str) -> CoreResult<Vec<Transaction>> {
        let backend = &self.0;
        let key = format!("transactionsByEmployee:{}", employee_id);
        if let Some(cached) = backend.by_employee.get(&key) {
            debug!(target: "txreview::data", "employee {} served from cache", employee_id);
            return Ok(cached);
        }

        backend.simulate_latency().await;
        let transactions = backend
            .dataset
            .read()
            .await
            .by_employee(employee_id)
            .map_err(|e| e.into_fetch_error(Source::EmployeeTransactions))?;
        backend.by_employee.insert(key, transactions.clone());
        Ok(transactions)
    }

    fn invalidate_data(&self) {
        self.0.by_employee.clear();
    }
}

/// Approval writes against the stored baseline
pub struct MockApprovalMutation(BackendRef);

#[async_trait]
impl ApprovalMutation for MockApprovalMutation {
    async fn set_approval(&self, transaction_id: &str, value: bool) -> CoreResult<()> {
        let backend = &self.0;
        backend.simulate_latency().await;

        let result = backend.dataset.write().await.set_approval(transaction_id, value);
        if let Err(e) = result {
            warn!(target: "txreview::data", "approval write rejected: {}", e);
            backend.clear_caches();
            return Err(e.into_mutation_error(transaction_id));
        }

        debug!(
            target: "txreview::data",
            "transaction {} approved={}",
            transaction_id,
            value
        );
        Ok(())
    }
}
