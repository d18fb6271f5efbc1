//! In-memory dataset of employees and transactions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use txreview_core::{Employee, PageResult, Transaction, FIRST_PAGE};

use crate::error::DataError;

/// Employees and transactions as stored in the dataset file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Dataset {
    /// Read and validate a dataset file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&content)
    }

    /// Parse and validate a dataset from JSON text
    pub fn from_json(content: &str) -> Result<Self, DataError> {
        let dataset: Dataset = serde_json::from_str(content)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Ids must be unique and every transaction must name a known employee
    pub fn validate(&self) -> Result<(), DataError> {
        let mut employee_ids = HashSet::new();
        for employee in &self.employees {
            if employee.id.is_empty() {
                return Err(DataError::InvalidDataset {
                    message: "employee with empty id".to_string(),
                });
            }
            if !employee_ids.insert(employee.id.as_str()) {
                return Err(DataError::InvalidDataset {
                    message: format!("duplicate employee id {}", employee.id),
                });
            }
        }

        let mut transaction_ids = HashSet::new();
        for tx in &self.transactions {
            if !transaction_ids.insert(tx.id.as_str()) {
                return Err(DataError::InvalidDataset {
                    message: format!("duplicate transaction id {}", tx.id),
                });
            }
            if !employee_ids.contains(tx.employee.id.as_str()) {
                return Err(DataError::InvalidDataset {
                    message: format!(
                        "transaction {} references unknown employee {}",
                        tx.id, tx.employee.id
                    ),
                });
            }
        }

        Ok(())
    }

    /// One 1-based page of every transaction
    pub fn page(&self, page: u32, page_size: usize) -> Result<PageResult<Transaction>, DataError> {
        let total = self.transactions.len();
        let out_of_range = DataError::PageOutOfRange { page, total };
        if page < FIRST_PAGE || page_size == 0 {
            return Err(out_of_range);
        }

        let start = (page - FIRST_PAGE) as usize * page_size;
        if start >= total && page != FIRST_PAGE {
            return Err(out_of_range);
        }

        let end = (start + page_size).min(total);
        let next_page = if end < total { Some(page + 1) } else { None };
        Ok(PageResult::new(
            self.transactions[start.min(total)..end].to_vec(),
            next_page,
        ))
    }

    /// Every transaction of one employee
    pub fn by_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, DataError> {
        if employee_id.is_empty() {
            return Err(DataError::EmptyEmployeeId);
        }
        if !self.employees.iter().any(|e| e.id == employee_id) {
            return Err(DataError::UnknownEmployee {
                id: employee_id.to_string(),
            });
        }

        Ok(self
            .transactions
            .iter()
            .filter(|tx| tx.belongs_to(employee_id))
            .cloned()
            .collect())
    }

    /// Store a new baseline approval
    pub fn set_approval(&mut self, transaction_id: &str, value: bool) -> Result<(), DataError> {
        let tx = self
            .transactions
            .iter_mut()
            .find(|tx| tx.id == transaction_id)
            .ok_or_else(|| DataError::UnknownTransaction {
                id: transaction_id.to_string(),
            })?;
        tx.approved = value;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const FIXTURE: &str = r#"{
        "employees": [
            {"id": "e1", "firstName": "James", "lastName": "Smith"},
            {"id": "e2", "firstName": "Mary", "lastName": "Johnson"}
        ],
        "transactions": [
            {"id": "t1", "merchant": "Uber", "amount": 24.5, "date": "2024-01-02",
             "employee": {"id": "e1", "firstName": "James", "lastName": "Smith"}, "approved": false},
            {"id": "t2", "merchant": "Starbucks", "amount": 6.25, "date": "2024-01-03",
             "employee": {"id": "e2", "firstName": "Mary", "lastName": "Johnson"}, "approved": true},
            {"id": "t3", "merchant": "Delta", "amount": 412.0, "date": "2024-01-05",
             "employee": {"id": "e1", "firstName": "James", "lastName": "Smith"}, "approved": false}
        ]
    }"#;

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions.iter().map(|tx| tx.id.as_str()).collect()
    }

    #[test]
    fn test_pages() {
        let dataset = Dataset::from_json(FIXTURE).unwrap();

        let first = dataset.page(1, 2).unwrap();
        assert_eq!(ids(&first.data), vec!["t1", "t2"]);
        assert_eq!(first.next_page, Some(2));

        let second = dataset.page(2, 2).unwrap();
        assert_eq!(ids(&second.data), vec!["t3"]);
        assert_eq!(second.next_page, None);

        assert!(matches!(
            dataset.page(3, 2),
            Err(DataError::PageOutOfRange { page: 3, total: 3 })
        ));
        assert!(dataset.page(0, 2).is_err());
    }

    #[test]
    fn test_exact_multiple_has_no_next_page() {
        let dataset = Dataset::from_json(FIXTURE).unwrap();
        let page = dataset.page(1, 3).unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_empty_dataset_first_page() {
        let dataset = Dataset::default();
        let page = dataset.page(1, 5).unwrap();
        assert!(page.data.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_by_employee() {
        let dataset = Dataset::from_json(FIXTURE).unwrap();
        assert_eq!(ids(&dataset.by_employee("e1").unwrap()), vec!["t1", "t3"]);
        assert!(matches!(dataset.by_employee(""), Err(DataError::EmptyEmployeeId)));
        assert!(matches!(
            dataset.by_employee("e9"),
            Err(DataError::UnknownEmployee { .. })
        ));
    }

    #[test]
    fn test_set_approval() {
        let mut dataset = Dataset::from_json(FIXTURE).unwrap();
        dataset.set_approval("t1", true).unwrap();
        assert!(dataset.transactions[0].approved);
        assert!(dataset.set_approval("t9", true).is_err());
    }

    #[test]
    fn test_rejects_unknown_employee_reference() {
        let json = r#"{
            "employees": [],
            "transactions": [
                {"id": "t1", "merchant": "Uber", "amount": 1, "date": "2024-01-02",
                 "employee": {"id": "e1", "firstName": "James", "lastName": "Smith"}, "approved": false}
            ]
        }"#;
        assert!(matches!(
            Dataset::from_json(json),
            Err(DataError::InvalidDataset { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Dataset::from_json("{\"employees\": ["),
            Err(DataError::JsonError(_))
        ));
    }
}
