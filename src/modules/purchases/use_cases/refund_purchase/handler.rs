use crate::modules::purchases::adapters::outbound::catalog::CatalogStore;
use crate::modules::purchases::adapters::outbound::enrollment::withdraw_enrollment;
use crate::modules::purchases::adapters::outbound::identity::{IdentityStore, Role};
use crate::modules::purchases::adapters::outbound::purchase_ledger::{LedgerError, PurchaseLedger};
use crate::modules::purchases::core::purchase::{PurchaseRecord, PurchaseStatus};
use crate::modules::purchases::core::transitions::{
    InvalidTransition, LateSuccessPolicy, StatusChange, TransitionPatch,
};
use crate::modules::purchases::errors::PurchaseError;
use crate::modules::purchases::use_cases::refund_purchase::command::RefundPurchase;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Records a refund already issued through the provider and withdraws the
/// enrollment it paid for.
pub struct RefundPurchaseHandler<TLedger, TCatalog, TIdentity>
where
    TLedger: PurchaseLedger + 'static,
    TCatalog: CatalogStore + 'static,
    TIdentity: IdentityStore + 'static,
{
    ledger: Arc<TLedger>,
    catalog: Arc<TCatalog>,
    identity: Arc<TIdentity>,
}

impl<TLedger, TCatalog, TIdentity> RefundPurchaseHandler<TLedger, TCatalog, TIdentity>
where
    TLedger: PurchaseLedger + 'static,
    TCatalog: CatalogStore + 'static,
    TIdentity: IdentityStore + 'static,
{
    pub fn new(ledger: Arc<TLedger>, catalog: Arc<TCatalog>, identity: Arc<TIdentity>) -> Self {
        Self {
            ledger,
            catalog,
            identity,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(&self, command: RefundPurchase) -> Result<PurchaseRecord, PurchaseError> {
        let is_admin = self
            .identity
            .find_user(&command.actor_id)
            .await?
            .is_some_and(|actor| actor.role == Role::Admin);
        if !is_admin {
            return Err(PurchaseError::Forbidden(format!(
                "user {} may not refund purchases",
                command.actor_id
            )));
        }

        let record = self
            .ledger
            .find(&command.purchase_id)
            .await?
            .ok_or_else(|| PurchaseError::NotFound(format!("purchase {}", command.purchase_id)))?;

        if record.status == PurchaseStatus::Refunded {
            debug!(purchase_id = %record.purchase_id, "purchase already refunded");
            self.withdraw_enrollment(&record).await?;
            return Ok(record);
        }

        let change = StatusChange::new(
            record.status,
            PurchaseStatus::Refunded,
            LateSuccessPolicy::Terminal,
        )?;

        let reason = command.reason.trim();
        if reason.is_empty() {
            return Err(PurchaseError::InvalidRefund("a reason is required".into()));
        }
        let refund_amount = command.amount.unwrap_or(record.amount);
        if refund_amount <= Decimal::ZERO || refund_amount > record.amount {
            return Err(PurchaseError::InvalidRefund(format!(
                "refund of {refund_amount} must be positive and at most {}",
                record.amount
            )));
        }

        let patch = TransitionPatch::at(command.requested_at).with_refund(refund_amount, reason);
        let refunded = match self.ledger.transition(&record.purchase_id, change, patch).await {
            Ok(refunded) => refunded,
            Err(LedgerError::StaleState {
                actual: PurchaseStatus::Refunded,
                ..
            }) => self.ledger.find(&record.purchase_id).await?.ok_or_else(|| {
                PurchaseError::NotFound(format!("purchase {}", record.purchase_id))
            })?,
            Err(LedgerError::StaleState { actual, .. }) => {
                return Err(InvalidTransition {
                    from: actual,
                    to: PurchaseStatus::Refunded,
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            purchase_id = %refunded.purchase_id,
            refund_amount = %refund_amount,
            actor_id = %command.actor_id,
            "purchase refunded"
        );

        self.withdraw_enrollment(&refunded).await?;
        Ok(refunded)
    }

    async fn withdraw_enrollment(&self, record: &PurchaseRecord) -> Result<(), PurchaseError> {
        withdraw_enrollment(
            &*self.ledger,
            &*self.identity,
            &*self.catalog,
            &record.user_id,
            &record.course_id,
        )
        .await
    }
}
