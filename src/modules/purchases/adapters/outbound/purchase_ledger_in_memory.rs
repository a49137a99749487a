use crate::modules::purchases::adapters::outbound::purchase_ledger::{LedgerError, PurchaseLedger};
use crate::modules::purchases::core::purchase::{NewPurchase, PurchaseRecord};
use crate::modules::purchases::core::transitions::{StatusChange, TransitionPatch};
use crate::shared::core::primitives::now_millis;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
struct LedgerRows {
    by_id: HashMap<String, PurchaseRecord>,
    by_external_id: HashMap<String, String>,
}

#[derive(Default)]
pub struct InMemoryPurchaseLedger {
    rows: RwLock<LedgerRows>,
    is_offline: bool,
    delay_transition_ms: AtomicU64,
}

impl InMemoryPurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Sleeps before every compare-and-set so concurrent callers interleave.
    pub fn set_delay_transition_ms(&self, delay_ms: u64) {
        self.delay_transition_ms.store(delay_ms, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), LedgerError> {
        if self.is_offline {
            return Err(LedgerError::Backend("Purchase ledger offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PurchaseLedger for InMemoryPurchaseLedger {
    async fn create_pending(&self, new: NewPurchase) -> Result<PurchaseRecord, LedgerError> {
        self.ensure_online()?;
        if new.user_id.trim().is_empty() {
            return Err(LedgerError::InvalidReference("user id is blank".into()));
        }
        if new.course_id.trim().is_empty() {
            return Err(LedgerError::InvalidReference("course id is blank".into()));
        }
        if new.amount.is_sign_negative() {
            return Err(LedgerError::InvalidReference(format!(
                "amount {} is negative",
                new.amount
            )));
        }

        let mut rows = self.rows.write().await;
        if rows.by_id.contains_key(&new.purchase_id) {
            return Err(LedgerError::DuplicatePurchase {
                purchase_id: new.purchase_id,
            });
        }
        let record = PurchaseRecord::pending(new);
        rows.by_id
            .insert(record.purchase_id.clone(), record.clone());
        Ok(record)
    }

    async fn attach_external_id(
        &self,
        purchase_id: &str,
        external_payment_id: &str,
    ) -> Result<PurchaseRecord, LedgerError> {
        self.ensure_online()?;
        let mut rows = self.rows.write().await;

        if let Some(owner) = rows.by_external_id.get(external_payment_id) {
            if owner != purchase_id {
                return Err(LedgerError::ExternalIdTaken {
                    external_payment_id: external_payment_id.to_string(),
                    owner: owner.clone(),
                });
            }
        }

        let record = rows
            .by_id
            .get_mut(purchase_id)
            .ok_or_else(|| LedgerError::NotFound {
                purchase_id: purchase_id.to_string(),
            })?;

        match record.external_payment_id.as_deref() {
            Some(existing) if existing == external_payment_id => return Ok(record.clone()),
            Some(existing) => {
                return Err(LedgerError::ConflictingExternalId {
                    purchase_id: purchase_id.to_string(),
                    existing: existing.to_string(),
                    attempted: external_payment_id.to_string(),
                });
            }
            None => {}
        }

        record.external_payment_id = Some(external_payment_id.to_string());
        record.updated_at = now_millis().max(record.updated_at);
        record.version += 1;
        let updated = record.clone();
        rows.by_external_id
            .insert(external_payment_id.to_string(), purchase_id.to_string());
        Ok(updated)
    }

    async fn find(&self, purchase_id: &str) -> Result<Option<PurchaseRecord>, LedgerError> {
        self.ensure_online()?;
        Ok(self.rows.read().await.by_id.get(purchase_id).cloned())
    }

    async fn find_by_external_id(
        &self,
        external_payment_id: &str,
    ) -> Result<Option<PurchaseRecord>, LedgerError> {
        self.ensure_online()?;
        let rows = self.rows.read().await;
        Ok(rows
            .by_external_id
            .get(external_payment_id)
            .and_then(|purchase_id| rows.by_id.get(purchase_id))
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PurchaseRecord>, LedgerError> {
        self.ensure_online()?;
        let rows = self.rows.read().await;
        let mut records: Vec<PurchaseRecord> = rows
            .by_id
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.purchase_id.cmp(&b.purchase_id))
        });
        Ok(records)
    }

    async fn transition(
        &self,
        purchase_id: &str,
        change: StatusChange,
        patch: TransitionPatch,
    ) -> Result<PurchaseRecord, LedgerError> {
        self.ensure_online()?;
        let delay_ms = self.delay_transition_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let mut rows = self.rows.write().await;
        let record = rows
            .by_id
            .get_mut(purchase_id)
            .ok_or_else(|| LedgerError::NotFound {
                purchase_id: purchase_id.to_string(),
            })?;

        if record.status != change.from() {
            return Err(LedgerError::StaleState {
                purchase_id: purchase_id.to_string(),
                expected: change.from(),
                actual: record.status,
            });
        }

        record.status = change.to();
        if let Some(amount) = patch.amount {
            record.amount = amount;
        }
        if let Some(refund_amount) = patch.refund_amount {
            record.refund_amount = Some(refund_amount);
        }
        if let Some(refund_reason) = patch.refund_reason {
            record.refund_reason = Some(refund_reason);
        }
        record.updated_at = patch.at;
        record.version += 1;
        Ok(record.clone())
    }
}
