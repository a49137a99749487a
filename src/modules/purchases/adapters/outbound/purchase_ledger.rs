use crate::modules::purchases::core::purchase::{NewPurchase, PurchaseRecord, PurchaseStatus};
use crate::modules::purchases::core::transitions::{StatusChange, TransitionPatch};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("purchase {purchase_id} not found")]
    NotFound { purchase_id: String },

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("purchase {purchase_id} already exists")]
    DuplicatePurchase { purchase_id: String },

    #[error(
        "purchase {purchase_id} cannot take external id {attempted}: already bound to {existing}"
    )]
    ConflictingExternalId {
        purchase_id: String,
        existing: String,
        attempted: String,
    },

    #[error("external id {external_payment_id} already belongs to purchase {owner}")]
    ExternalIdTaken {
        external_payment_id: String,
        owner: String,
    },

    #[error("stale state for purchase {purchase_id}: expected {expected}, actual {actual}")]
    StaleState {
        purchase_id: String,
        expected: PurchaseStatus,
        actual: PurchaseStatus,
    },

    #[error("backend error: {0}")]
    Backend(String),
}

/// Durable record of purchase attempts. Implementations must make
/// `transition` an atomic conditional write on the record's current status.
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    async fn create_pending(&self, new: NewPurchase) -> Result<PurchaseRecord, LedgerError>;

    /// Binding the same id twice is a no-op; a different id is a conflict.
    async fn attach_external_id(
        &self,
        purchase_id: &str,
        external_payment_id: &str,
    ) -> Result<PurchaseRecord, LedgerError>;

    async fn find(&self, purchase_id: &str) -> Result<Option<PurchaseRecord>, LedgerError>;

    async fn find_by_external_id(
        &self,
        external_payment_id: &str,
    ) -> Result<Option<PurchaseRecord>, LedgerError>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PurchaseRecord>, LedgerError>;

    /// Compare-and-set on status. Fails with `StaleState` when the record is
    /// no longer in `change.from()`.
    async fn transition(
        &self,
        purchase_id: &str,
        change: StatusChange,
        patch: TransitionPatch,
    ) -> Result<PurchaseRecord, LedgerError>;
}
