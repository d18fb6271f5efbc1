//! Approval overlay
//!
//! User-confirmed approvals keyed by transaction id. An overlay entry always
//! wins over the baseline carried by a fetched transaction, and entries are
//! never removed for the lifetime of the store.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::error::{CoreError, CoreResult};
use crate::feeds::MutationRef;
use crate::models::Transaction;

/// Sole source of truth for effective approvals
pub struct ApprovalOverlayStore {
    entries: RefCell<HashMap<String, bool>>,
    mutation: MutationRef,
}

impl ApprovalOverlayStore {
    pub fn new(mutation: MutationRef) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            mutation,
        }
    }

    /// Effective approval: the overlay value if present, else `baseline`
    pub fn get(&self, id: &str, baseline: bool) -> bool {
        self.entries.borrow().get(id).copied().unwrap_or(baseline)
    }

    /// Effective approval of a fetched transaction
    pub fn effective(&self, transaction: &Transaction) -> bool {
        self.get(&transaction.id, transaction.approved)
    }

    /// Insert or overwrite an entry
    pub fn set(&self, id: &str, value: bool) {
        self.entries.borrow_mut().insert(id.to_string(), value);
    }

    /// Record baselines for ids not yet overlaid; existing entries are kept.
    /// Returns the number of new entries.
    pub fn seed<'a, I>(&self, transactions: I) -> usize
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut entries = self.entries.borrow_mut();
        let mut added = 0;
        for tx in transactions {
            if !entries.contains_key(&tx.id) {
                entries.insert(tx.id.clone(), tx.approved);
                added += 1;
            }
        }
        added
    }

    /// Write the approval through the mutation collaborator, then record it.
    ///
    /// The overlay is only updated after the write is acknowledged; on
    /// failure the previous effective value stays in place.
    pub async fn toggle(&self, transaction_id: &str, new_value: bool) -> CoreResult<()> {
        if let Err(e) = self.mutation.set_approval(transaction_id, new_value).await {
            let message = match e {
                CoreError::MutationFailed { message, .. } => message,
                other => other.to_string(),
            };
            return Err(CoreError::MutationFailed {
                transaction_id: transaction_id.to_string(),
                message,
            });
        }

        self.set(transaction_id, new_value);
        log::debug!(
            target: "txreview::overlay",
            "Approval for {} set to {}",
            transaction_id,
            new_value
        );
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Ordered copy of every entry
    pub fn snapshot(&self) -> BTreeMap<String, bool> {
        self.entries
            .borrow()
            .iter()
            .map(|(id, value)| (id.clone(), *value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tx, ScriptedMutation};
    use std::sync::Arc;

    fn store() -> (Arc<ScriptedMutation>, ApprovalOverlayStore) {
        let mutation = Arc::new(ScriptedMutation::default());
        let store = ApprovalOverlayStore::new(mutation.clone());
        (mutation, store)
    }

    #[test]
    fn test_get_falls_back_to_baseline() {
        let (_, store) = store();
        assert!(store.get("t1", true));
        assert!(!store.get("t1", false));

        store.set("t1", false);
        assert!(!store.get("t1", true));
    }

    #[test]
    fn test_seed_keeps_existing_entries() {
        let (_, store) = store();
        store.set("t1", true);

        let added = store.seed(&[tx("t1", false), tx("t2", true)]);

        assert_eq!(added, 1);
        assert!(store.get("t1", false));
        assert!(store.get("t2", false));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_records_acknowledged_value() {
        let (mutation, store) = store();
        let t1 = tx("t1", false);

        store.toggle("t1", true).await.unwrap();

        assert!(store.effective(&t1));
        assert_eq!(mutation.calls(), vec![("t1".to_string(), true)]);
    }

    #[tokio::test]
    async fn test_toggle_twice_is_idempotent() {
        let (_, store) = store();

        store.toggle("t1", true).await.unwrap();
        let once = store.snapshot();
        store.toggle("t1", true).await.unwrap();

        assert_eq!(store.snapshot(), once);
        assert!(store.get("t1", false));
    }

    #[tokio::test]
    async fn test_failed_toggle_leaves_overlay_untouched() {
        let (mutation, store) = store();
        store.set("t1", false);
        mutation.fail_next();

        let err = store.toggle("t1", true).await.unwrap_err();

        assert!(matches!(err, CoreError::MutationFailed { ref transaction_id, .. } if transaction_id == "t1"));
        assert!(!store.get("t1", true));
    }

    #[tokio::test]
    async fn test_failed_toggle_without_entry_keeps_baseline() {
        let (mutation, store) = store();
        mutation.fail_next();

        assert!(store.toggle("t9", true).await.is_err());
        assert!(!store.contains("t9"));
        assert!(!store.get("t9", false));
    }
}
