//! What the rendering layer reads from the controller

use serde::{Deserialize, Serialize};

use crate::models::{Employee, Transaction};
use crate::types::ActiveFeed;

/// A transaction paired with its effective approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub transaction: Transaction,
    /// Overlay value if present, else the transaction's baseline
    pub approved: bool,
}

/// Entry of the employee filter input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Employee id; empty for the "all employees" entry
    pub value: String,
    pub label: String,
}

impl From<&Employee> for FilterOption {
    fn from(employee: &Employee) -> Self {
        Self {
            value: employee.id.clone(),
            label: employee.full_name(),
        }
    }
}

/// Filter options led by the "all employees" entry; empty until the
/// directory has settled.
pub fn filter_options(employees: Option<&[Employee]>) -> Vec<FilterOption> {
    match employees {
        None => Vec::new(),
        Some(employees) => {
            let mut options = vec![FilterOption::from(&Employee::all_employees())];
            options.extend(employees.iter().map(FilterOption::from));
            options
        }
    }
}

/// Point-in-time view of the review list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSnapshot {
    /// Feed whose data is displayed
    pub active_feed: Option<ActiveFeed>,
    /// Displayed rows; `None` until a feed has been applied
    pub transactions: Option<Vec<TransactionRow>>,
    /// Whether "view more" can load another page
    pub more_available: bool,
    /// A feed selection fetch is in progress
    pub loading: bool,
    /// A pagination continuation is in progress
    pub loading_more: bool,
    /// The employee directory is loading
    pub loading_employees: bool,
    pub filter_options: Vec<FilterOption>,
}

impl ViewSnapshot {
    /// "View more" should be offered and enabled
    pub fn can_view_more(&self) -> bool {
        self.more_available && !self.loading && !self.loading_more
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_options_pending_directory() {
        assert!(filter_options(None).is_empty());
    }

    #[test]
    fn test_filter_options_lead_with_all_employees() {
        let employees = vec![Employee::new("e1", "James", "Smith")];
        let options = filter_options(Some(&employees));

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "");
        assert_eq!(options[0].label, "All Employees");
        assert_eq!(options[1].value, "e1");
        assert_eq!(options[1].label, "James Smith");
    }

    #[test]
    fn test_can_view_more_requires_idle() {
        let mut snapshot = ViewSnapshot {
            active_feed: Some(ActiveFeed::all()),
            transactions: Some(vec![]),
            more_available: true,
            loading: false,
            loading_more: false,
            loading_employees: false,
            filter_options: vec![],
        };
        assert!(snapshot.can_view_more());

        snapshot.loading_more = true;
        assert!(!snapshot.can_view_more());
    }
}
