//! View controller
//!
//! Decides which feed is authoritative, merges fetched data under the
//! approval overlay, continues pagination and sequences the initial load.
//!
//! The controller is single-threaded: every method takes `&self` and
//! operations interleave only at await points. Each fetch carries a
//! [`FeedTicket`]; a response whose ticket no longer matches the latest
//! selection is discarded instead of applied.

use std::cell::{Cell, RefCell};

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::feeds::{Collaborators, DirectoryRef, EmployeeFeedRef, PaginatedFeedRef};
use crate::loading::LoadingFlag;
use crate::models::{Employee, Transaction};
use crate::overlay::ApprovalOverlayStore;
use crate::types::{ActiveFeed, FetchOutcome, Source, FIRST_PAGE};
use crate::view::{filter_options, FilterOption, TransactionRow, ViewSnapshot};

const LOG_TARGET: &str = "txreview::controller";

#[derive(Debug, Default)]
struct ViewState {
    /// Feed whose data is displayed
    active: Option<ActiveFeed>,
    /// Latest requested feed, until its response is applied or fails
    pending: Option<ActiveFeed>,
    transactions: Vec<Transaction>,
    /// `nextPage` of the last applied page
    next_page: Option<u32>,
    employees: Option<Vec<Employee>>,
    initial_load_fired: bool,
}

/// Identifies the selection a fetch was issued for
#[derive(Debug, Clone)]
struct FeedTicket {
    epoch: u64,
    feed: ActiveFeed,
}

/// Orchestrates feeds, the accumulated list and the approval overlay
pub struct ViewController {
    directory: DirectoryRef,
    paginated: PaginatedFeedRef,
    by_employee: EmployeeFeedRef,
    overlay: ApprovalOverlayStore,
    state: RefCell<ViewState>,
    /// Bumped on every feed selection
    epoch: Cell<u64>,
    feed_loading: LoadingFlag,
    more_loading: LoadingFlag,
    directory_loading: LoadingFlag,
    auto_load: bool,
    logger: DefaultErrorLogger,
}

impl ViewController {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            directory: collaborators.directory,
            paginated: collaborators.paginated,
            by_employee: collaborators.by_employee,
            overlay: ApprovalOverlayStore::new(collaborators.mutation),
            state: RefCell::new(ViewState::default()),
            epoch: Cell::new(0),
            feed_loading: LoadingFlag::new(),
            more_loading: LoadingFlag::new(),
            directory_loading: LoadingFlag::new(),
            auto_load: true,
            logger: DefaultErrorLogger,
        }
    }

    /// Enable or disable the one-shot `select_all` after the directory settles
    pub fn with_auto_load(mut self, auto_load: bool) -> Self {
        self.auto_load = auto_load;
        self
    }

    // ==================== Employee Directory ====================

    /// Load the employee directory, then run the initial load.
    ///
    /// A failed directory load settles as an empty list so the transaction
    /// list still loads; the directory error is returned afterwards.
    pub async fn load_employees(&self) -> CoreResult<usize> {
        let fetched = {
            let _loading = self.directory_loading.acquire();
            self.directory.fetch_all().await
        };

        let (count, failure) = match fetched {
            Ok(employees) => {
                log::info!(target: LOG_TARGET, "Loaded {} employees", employees.len());
                let count = employees.len();
                self.state.borrow_mut().employees = Some(employees);
                (count, None)
            }
            Err(e) => {
                self.logger.log_error(
                    &e,
                    &ErrorContext::new("load_employees").with_feed(Source::EmployeeDirectory),
                );
                self.state.borrow_mut().employees = Some(Vec::new());
                (0, Some(e))
            }
        };

        self.on_directory_settled().await?;

        match failure {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }

    /// Forget the directory result and re-arm the initial load
    pub fn reset_employees(&self) {
        self.directory.invalidate();
        let mut state = self.state.borrow_mut();
        state.employees = None;
        state.initial_load_fired = false;
    }

    /// Fires `select_all` once per directory result, unless an employee is
    /// selected or being selected.
    async fn on_directory_settled(&self) -> CoreResult<Option<FetchOutcome>> {
        let fire = {
            let mut state = self.state.borrow_mut();
            let employee_selected = [&state.active, &state.pending]
                .into_iter()
                .flatten()
                .any(|feed| feed.employee_id().is_some());
            let fire = self.auto_load
                && !state.initial_load_fired
                && state.employees.is_some()
                && !employee_selected;
            if fire {
                state.initial_load_fired = true;
            }
            fire
        };

        if !fire {
            return Ok(None);
        }

        log::info!(target: LOG_TARGET, "Employee directory settled, loading all transactions");
        self.select_all().await.map(Some)
    }

    // ==================== Feed Selection ====================

    /// Switch to the paginated feed and load its first page
    pub async fn select_all(&self) -> CoreResult<FetchOutcome> {
        self.by_employee.invalidate_data();
        let ticket = self.begin_selection(ActiveFeed::all());
        let _loading = self.feed_loading.acquire();

        match self.paginated.fetch_all(Some(FIRST_PAGE)).await {
            Ok(page) => Ok(self.commit_selection(ticket, page.data, page.next_page)),
            Err(e) => self.abandon_selection(ticket, e, "select_all"),
        }
    }

    /// Switch to one employee's transactions
    pub async fn select_employee(&self, employee_id: &str) -> CoreResult<FetchOutcome> {
        if employee_id.is_empty() {
            return Err(CoreError::InvalidRequest {
                message: "Employee id cannot be empty".to_string(),
            });
        }
        if !self.is_known_employee(employee_id) {
            return Err(CoreError::EmployeeNotFound {
                id: employee_id.to_string(),
            });
        }

        self.paginated.invalidate_data();
        let ticket = self.begin_selection(ActiveFeed::employee(employee_id));
        let _loading = self.feed_loading.acquire();

        match self.by_employee.fetch_by_id(employee_id).await {
            Ok(data) => Ok(self.commit_selection(ticket, data, None)),
            Err(e) => self.abandon_selection(ticket, e, "select_employee"),
        }
    }

    /// Entry point for the employee filter input.
    ///
    /// `None` (cleared input) is ignored, the empty id selects every
    /// transaction, any other id filters by employee.
    pub async fn apply_filter(&self, employee_id: Option<&str>) -> CoreResult<FetchOutcome> {
        match employee_id {
            None => Ok(FetchOutcome::Skipped),
            Some("") => self.select_all().await,
            Some(id) => self.select_employee(id).await,
        }
    }

    /// Load the next page of the paginated feed and append it.
    ///
    /// Skipped unless the paginated feed is active with a next page and no
    /// other fetch is in flight.
    pub async fn view_more(&self) -> CoreResult<FetchOutcome> {
        if self.feed_loading.is_set() || self.more_loading.is_set() {
            self.logger.log_warning(
                "Fetch already in progress, ignoring view more",
                &ErrorContext::new("view_more"),
            );
            return Ok(FetchOutcome::Skipped);
        }

        let continuation = {
            let state = self.state.borrow();
            match (&state.active, state.next_page) {
                (Some(feed), Some(next)) if feed.is_all() && state.pending.is_none() => {
                    let ticket = FeedTicket {
                        epoch: self.epoch.get(),
                        feed: feed.clone(),
                    };
                    Some((ticket, next))
                }
                _ => None,
            }
        };
        let Some((ticket, page)) = continuation else {
            log::debug!(target: LOG_TARGET, "No further page to load");
            return Ok(FetchOutcome::Skipped);
        };

        let _loading = self.more_loading.acquire();
        log::debug!(target: LOG_TARGET, "Fetching page {} of all transactions", page);
        let result = self.paginated.fetch_all(Some(page)).await;

        let mut state = self.state.borrow_mut();
        if self.epoch.get() != ticket.epoch || state.active.as_ref() != Some(&ticket.feed) {
            log::debug!(
                target: LOG_TARGET,
                "Discarding stale page {} issued for {}",
                page,
                ticket.feed
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(more) => {
                let items = more.data.len();
                self.overlay.seed(&more.data);
                state.transactions.extend(more.data);
                state.active = Some(ActiveFeed::AllTransactions { cursor: page });
                state.next_page = more.next_page;
                log::info!(
                    target: LOG_TARGET,
                    "Appended {} transactions from page {} ({} displayed)",
                    items,
                    page,
                    state.transactions.len()
                );
                Ok(FetchOutcome::Applied { items })
            }
            Err(e) => {
                drop(state);
                self.logger.log_error(
                    &e,
                    &ErrorContext::new("view_more")
                        .with_feed(&ticket.feed)
                        .with_data("page", serde_json::json!(page)),
                );
                Err(e)
            }
        }
    }

    /// Write an approval; the overlay only changes once the write succeeds
    pub async fn toggle_approval(&self, transaction_id: &str, approved: bool) -> CoreResult<()> {
        match self.overlay.toggle(transaction_id, approved).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.logger.log_error(
                    &e,
                    &ErrorContext::new("toggle_approval")
                        .with_feed(Source::ApprovalMutation)
                        .with_data("approved", serde_json::json!(approved)),
                );
                Err(e)
            }
        }
    }

    fn begin_selection(&self, feed: ActiveFeed) -> FeedTicket {
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        self.state.borrow_mut().pending = Some(feed.clone());
        log::debug!(target: LOG_TARGET, "Selecting {} (epoch {})", feed, epoch);
        FeedTicket { epoch, feed }
    }

    fn is_current(&self, ticket: &FeedTicket, pending: Option<&ActiveFeed>) -> bool {
        ticket.epoch == self.epoch.get() && pending == Some(&ticket.feed)
    }

    fn commit_selection(
        &self,
        ticket: FeedTicket,
        data: Vec<Transaction>,
        next_page: Option<u32>,
    ) -> FetchOutcome {
        let mut state = self.state.borrow_mut();
        if !self.is_current(&ticket, state.pending.as_ref()) {
            log::debug!(target: LOG_TARGET, "Discarding stale response for {}", ticket.feed);
            return FetchOutcome::Stale;
        }

        let items = data.len();
        let seeded = self.overlay.seed(&data);
        log::info!(
            target: LOG_TARGET,
            "Showing {} transactions for {} ({} new approvals tracked)",
            items,
            ticket.feed,
            seeded
        );

        state.active = Some(ticket.feed);
        state.pending = None;
        state.transactions = data;
        state.next_page = next_page;
        FetchOutcome::Applied { items }
    }

    fn abandon_selection(
        &self,
        ticket: FeedTicket,
        error: CoreError,
        operation: &str,
    ) -> CoreResult<FetchOutcome> {
        {
            let mut state = self.state.borrow_mut();
            if !self.is_current(&ticket, state.pending.as_ref()) {
                log::debug!(
                    target: LOG_TARGET,
                    "Ignoring failure of stale request for {}: {}",
                    ticket.feed,
                    error
                );
                return Ok(FetchOutcome::Stale);
            }
            state.pending = None;
        }

        self.logger
            .log_error(&error, &ErrorContext::new(operation).with_feed(&ticket.feed));
        Err(error)
    }

    fn is_known_employee(&self, employee_id: &str) -> bool {
        match &self.state.borrow().employees {
            Some(employees) if !employees.is_empty() => {
                employees.iter().any(|e| e.id == employee_id)
            }
            _ => true,
        }
    }

    // ==================== Queries ====================

    pub fn active_feed(&self) -> Option<ActiveFeed> {
        self.state.borrow().active.clone()
    }

    /// Feed requested but not yet applied
    pub fn pending_feed(&self) -> Option<ActiveFeed> {
        self.state.borrow().pending.clone()
    }

    /// Last applied page of the paginated feed
    pub fn cursor(&self) -> Option<u32> {
        self.state.borrow().active.as_ref().and_then(ActiveFeed::cursor)
    }

    /// The accumulated list, in display order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.borrow().transactions.clone()
    }

    /// Displayed rows with effective approvals; `None` until a feed is applied
    pub fn rows(&self) -> Option<Vec<TransactionRow>> {
        let state = self.state.borrow();
        state.active.as_ref()?;
        Some(
            state
                .transactions
                .iter()
                .map(|tx| TransactionRow {
                    transaction: tx.clone(),
                    approved: self.overlay.effective(tx),
                })
                .collect(),
        )
    }

    /// Effective approval of a displayed transaction
    pub fn effective_approval(&self, transaction_id: &str) -> Option<bool> {
        let state = self.state.borrow();
        state
            .transactions
            .iter()
            .find(|tx| tx.id == transaction_id)
            .map(|tx| self.overlay.effective(tx))
    }

    /// Paginated feed active and its last page has a successor
    pub fn more_available(&self) -> bool {
        let state = self.state.borrow();
        state.active.as_ref().is_some_and(ActiveFeed::is_all) && state.next_page.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.feed_loading.is_set()
    }

    pub fn is_loading_more(&self) -> bool {
        self.more_loading.is_set()
    }

    pub fn is_loading_employees(&self) -> bool {
        self.directory_loading.is_set()
    }

    /// Directory result; `None` until it settles
    pub fn employees(&self) -> Option<Vec<Employee>> {
        self.state.borrow().employees.clone()
    }

    pub fn filter_options(&self) -> Vec<FilterOption> {
        filter_options(self.state.borrow().employees.as_deref())
    }

    pub fn overlay(&self) -> &ApprovalOverlayStore {
        &self.overlay
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            active_feed: self.active_feed(),
            transactions: self.rows(),
            more_available: self.more_available(),
            loading: self.is_loading(),
            loading_more: self.is_loading_more(),
            loading_employees: self.is_loading_employees(),
            filter_options: self.filter_options(),
        }
    }
}

// ==================== Tests ====================
