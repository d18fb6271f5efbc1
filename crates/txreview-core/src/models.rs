//! Core data models for the review list

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Employee information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique employee identifier
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Sentinel entry standing for "no employee filter"
    pub fn all_employees() -> Self {
        Self::new("", "All", "Employees")
    }

    /// Display name ("First Last")
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Transaction information
///
/// The `approved` flag is the baseline returned by the data source; user
/// overrides live in the approval overlay, never in this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: String,
    /// Merchant name
    pub merchant: String,
    /// Transaction amount
    pub amount: Decimal,
    /// Transaction date
    pub date: NaiveDate,
    /// Snapshot of the employee who made the transaction
    pub employee: Employee,
    /// Baseline approval
    pub approved: bool,
}

impl Transaction {
    /// Check if the transaction was made by the given employee
    pub fn belongs_to(&self, employee_id: &str) -> bool {
        self.employee.id == employee_id
    }
}

/// One page of a paginated feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub data: Vec<T>,
    /// Next page to request; absent on the last page
    pub next_page: Option<u32>,
}

impl<T> PageResult<T> {
    pub fn new(data: Vec<T>, next_page: Option<u32>) -> Self {
        Self { data, next_page }
    }

    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            id: "t1".to_string(),
            merchant: "Uber".to_string(),
            amount: Decimal::new(2450, 2),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            employee: Employee::new("e1", "James", "Smith"),
            approved: false,
        }
    }

    #[test]
    fn test_employee_sentinel() {
        let all = Employee::all_employees();
        assert!(all.id.is_empty());
        assert_eq!(all.full_name(), "All Employees");
    }

    #[test]
    fn test_transaction_methods() {
        let tx = sample();
        assert!(tx.belongs_to("e1"));
        assert!(!tx.belongs_to("e2"));
    }

    #[test]
    fn test_transaction_json_shape() {
        let json = r#"{
            "id": "t9",
            "merchant": "Starbucks",
            "amount": 12.5,
            "date": "2024-01-31",
            "employee": {"id": "e2", "firstName": "Mary", "lastName": "Johnson"},
            "approved": true
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.employee.first_name, "Mary");
        assert_eq!(tx.amount, Decimal::new(125, 1));
        assert!(tx.approved);
    }

    #[test]
    fn test_page_result() {
        let json = r#"{"data": [], "nextPage": null}"#;
        let page: PageResult<Transaction> = serde_json::from_str(json).unwrap();
        assert!(!page.has_more());
        assert!(PageResult::<Transaction>::new(vec![], Some(2)).has_more());
    }
}
