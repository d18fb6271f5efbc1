//! Basic types for the view synchronization engine

use serde::{Deserialize, Serialize};

/// First page of the paginated feed
pub const FIRST_PAGE: u32 = 1;

/// The transaction source currently driving the review list.
///
/// Exactly one feed is active at a time; switching feeds replaces the
/// accumulated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "feed", rename_all = "snake_case")]
pub enum ActiveFeed {
    /// Paginated feed of every transaction; `cursor` is the last page applied
    AllTransactions { cursor: u32 },
    /// Full transaction set of a single employee
    EmployeeFiltered { employee_id: String },
}

impl ActiveFeed {
    /// Paginated feed positioned on its first page
    pub fn all() -> Self {
        ActiveFeed::AllTransactions { cursor: FIRST_PAGE }
    }

    pub fn employee(employee_id: impl Into<String>) -> Self {
        ActiveFeed::EmployeeFiltered {
            employee_id: employee_id.into(),
        }
    }

    /// Current page cursor, only meaningful for the paginated feed
    pub fn cursor(&self) -> Option<u32> {
        match self {
            ActiveFeed::AllTransactions { cursor } => Some(*cursor),
            ActiveFeed::EmployeeFiltered { .. } => None,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ActiveFeed::AllTransactions { .. })
    }

    pub fn employee_id(&self) -> Option<&str> {
        match self {
            ActiveFeed::AllTransactions { .. } => None,
            ActiveFeed::EmployeeFiltered { employee_id } => Some(employee_id),
        }
    }
}

impl std::fmt::Display for ActiveFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveFeed::AllTransactions { cursor } => write!(f, "all(page={})", cursor),
            ActiveFeed::EmployeeFiltered { employee_id } => write!(f, "employee({})", employee_id),
        }
    }
}

/// External collaborators the engine talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Employee list provider
    EmployeeDirectory,
    /// Paginated "all transactions" feed
    PaginatedTransactions,
    /// Single-employee transaction feed
    EmployeeTransactions,
    /// Approval write endpoint
    ApprovalMutation,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::EmployeeDirectory => write!(f, "employee_directory"),
            Source::PaginatedTransactions => write!(f, "paginated_transactions"),
            Source::EmployeeTransactions => write!(f, "employee_transactions"),
            Source::ApprovalMutation => write!(f, "approval_mutation"),
        }
    }
}

/// What happened to a fetch issued by the view controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The response was merged into the view
    Applied { items: usize },
    /// The view moved on before the response arrived; it was discarded
    Stale,
    /// The request was not issued (not allowed in the current state)
    Skipped,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied { .. })
    }
}

impl std::fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchOutcome::Applied { items } => write!(f, "applied {} items", items),
            FetchOutcome::Stale => write!(f, "stale"),
            FetchOutcome::Skipped => write!(f, "skipped"),
        }
    }
}
