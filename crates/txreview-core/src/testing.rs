//! Scripted collaborators for unit tests

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::error::{CoreError, CoreResult};
use crate::feeds::{
    ApprovalMutation, Collaborators, EmployeeDirectory, EmployeeTransactionFeed,
    PaginatedTransactionFeed,
};
use crate::models::{Employee, PageResult, Transaction};
use crate::types::Source;

pub fn employee(id: &str) -> Employee {
    Employee::new(id, format!("First{id}"), format!("Last{id}"))
}

/// Transaction owned by employee "1"
pub fn tx(id: &str, approved: bool) -> Transaction {
    tx_for(id, "1", approved)
}

pub fn tx_for(id: &str, employee_id: &str, approved: bool) -> Transaction {
    Transaction {
        id: id.to_string(),
        merchant: format!("Merchant {id}"),
        amount: Decimal::new(1999, 2),
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        employee: employee(employee_id),
        approved,
    }
}

/// Holds a fetch open until released
#[derive(Default)]
pub struct Gate {
    started: Notify,
    release: Notify,
}

impl Gate {
    /// Wait until a gated fetch has been issued
    pub async fn started(&self) {
        self.started.notified().await;
    }

    pub fn open(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.started.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
pub struct ScriptedDirectory {
    employees: Mutex<Vec<Employee>>,
    fail: AtomicBool,
    pub fetches: AtomicUsize,
    pub invalidations: AtomicUsize,
}

impl ScriptedDirectory {
    pub fn set_employees(&self, employees: Vec<Employee>) {
        *self.employees.lock().unwrap() = employees;
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmployeeDirectory for ScriptedDirectory {
    async fn fetch_all(&self) -> CoreResult<Vec<Employee>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::fetch(Source::EmployeeDirectory, "scripted failure"));
        }
        Ok(self.employees.lock().unwrap().clone())
    }

    fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct ScriptedPages {
    pages: Mutex<HashMap<u32, PageResult<Transaction>>>,
    gates: Mutex<HashMap<u32, Arc<Gate>>>,
    fail: AtomicBool,
    pub requests: Mutex<Vec<u32>>,
    pub invalidations: AtomicUsize,
}

impl ScriptedPages {
    pub fn set_page(&self, page: u32, data: Vec<Transaction>, next_page: Option<u32>) {
        self.pages
            .lock()
            .unwrap()
            .insert(page, PageResult::new(data, next_page));
    }

    /// Hold the next request for `page` until the returned gate opens
    pub fn gate(&self, page: u32) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates.lock().unwrap().insert(page, gate.clone());
        gate
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<u32> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaginatedTransactionFeed for ScriptedPages {
    async fn fetch_all(&self, page: Option<u32>) -> CoreResult<PageResult<Transaction>> {
        let page = page.unwrap_or(1);
        self.requests.lock().unwrap().push(page);

        let gate = self.gates.lock().unwrap().remove(&page);
        if let Some(gate) = gate {
            gate.pass().await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::fetch(Source::PaginatedTransactions, "scripted failure"));
        }
        self.pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .ok_or_else(|| CoreError::fetch(Source::PaginatedTransactions, format!("no page {page}")))
    }

    fn invalidate_data(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct ScriptedEmployeeFeed {
    sets: Mutex<HashMap<String, Vec<Transaction>>>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
    fail: AtomicBool,
    pub invalidations: AtomicUsize,
}

impl ScriptedEmployeeFeed {
    pub fn set_transactions(&self, employee_id: &str, data: Vec<Transaction>) {
        self.sets
            .lock()
            .unwrap()
            .insert(employee_id.to_string(), data);
    }

    pub fn gate(&self, employee_id: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates
            .lock()
            .unwrap()
            .insert(employee_id.to_string(), gate.clone());
        gate
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmployeeTransactionFeed for ScriptedEmployeeFeed {
    async fn fetch_by_id(&self, employee_id: &str) -> CoreResult<Vec<Transaction>> {
        let gate = self.gates.lock().unwrap().remove(employee_id);
        if let Some(gate) = gate {
            gate.pass().await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::fetch(Source::EmployeeTransactions, "scripted failure"));
        }
        self.sets
            .lock()
            .unwrap()
            .get(employee_id)
            .cloned()
            .ok_or_else(|| CoreError::fetch(Source::EmployeeTransactions, "unknown employee"))
    }

    fn invalidate_data(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct ScriptedMutation {
    fail_next: AtomicBool,
    calls: Mutex<Vec<(String, bool)>>,
}

impl ScriptedMutation {
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApprovalMutation for ScriptedMutation {
    async fn set_approval(&self, transaction_id: &str, value: bool) -> CoreResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((transaction_id.to_string(), value));
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CoreError::MutationFailed {
                transaction_id: transaction_id.to_string(),
                message: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Handles on every scripted collaborator
#[derive(Default, Clone)]
pub struct Scripted {
    pub directory: Arc<ScriptedDirectory>,
    pub pages: Arc<ScriptedPages>,
    pub by_employee: Arc<ScriptedEmployeeFeed>,
    pub mutation: Arc<ScriptedMutation>,
}

impl Scripted {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            directory: self.directory.clone(),
            paginated: self.pages.clone(),
            by_employee: self.by_employee.clone(),
            mutation: self.mutation.clone(),
        }
    }
}
