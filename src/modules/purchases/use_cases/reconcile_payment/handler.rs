use crate::modules::purchases::adapters::outbound::catalog::CatalogStore;
use crate::modules::purchases::adapters::outbound::enrollment::{
    grant_enrollment, withdraw_enrollment,
};
use crate::modules::purchases::adapters::outbound::identity::IdentityStore;
use crate::modules::purchases::adapters::outbound::payment_gateway::{
    ClientConfirmation, PaymentGateway,
};
use crate::modules::purchases::adapters::outbound::purchase_ledger::{LedgerError, PurchaseLedger};
use crate::modules::purchases::core::notification::{PaymentNotification, PaymentOutcome};
use crate::modules::purchases::core::purchase::{PurchaseRecord, PurchaseStatus};
use crate::modules::purchases::core::transitions::LateSuccessPolicy;
use crate::modules::purchases::errors::PurchaseError;
use crate::modules::purchases::use_cases::reconcile_payment::decide::decide_reconcile;
use crate::modules::purchases::use_cases::reconcile_payment::decision::Decision;
use crate::shared::core::primitives::now_millis;
use std::sync::Arc;
use tracing::{debug, info, warn};

// Longest status chain: pending -> failed -> completed -> refunded.
const MAX_ATTEMPTS: usize = 4;

pub const CLIENT_CONFIRMATION_EVENT: &str = "client.payment_confirmed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledged {
    /// This delivery moved the purchase.
    Applied(PurchaseRecord),
    /// The purchase was already where this delivery would put it.
    AlreadyApplied(PurchaseRecord),
    /// Verified, but not an event that settles a purchase.
    Ignored { event_type: String },
}

impl Acknowledged {
    pub fn record(&self) -> Option<&PurchaseRecord> {
        match self {
            Acknowledged::Applied(record) | Acknowledged::AlreadyApplied(record) => Some(record),
            Acknowledged::Ignored { .. } => None,
        }
    }
}

pub struct ReconcilePaymentHandler<TLedger, TCatalog, TIdentity>
where
    TLedger: PurchaseLedger + 'static,
    TCatalog: CatalogStore + 'static,
    TIdentity: IdentityStore + 'static,
{
    ledger: Arc<TLedger>,
    catalog: Arc<TCatalog>,
    identity: Arc<TIdentity>,
    gateway: Arc<dyn PaymentGateway>,
    webhook_secret: String,
    policy: LateSuccessPolicy,
}

impl<TLedger, TCatalog, TIdentity> ReconcilePaymentHandler<TLedger, TCatalog, TIdentity>
where
    TLedger: PurchaseLedger + 'static,
    TCatalog: CatalogStore + 'static,
    TIdentity: IdentityStore + 'static,
{
    pub fn new(
        ledger: Arc<TLedger>,
        catalog: Arc<TCatalog>,
        identity: Arc<TIdentity>,
        gateway: Arc<dyn PaymentGateway>,
        webhook_secret: impl Into<String>,
        policy: LateSuccessPolicy,
    ) -> Self {
        Self {
            ledger,
            catalog,
            identity,
            gateway,
            webhook_secret: webhook_secret.into(),
            policy,
        }
    }

    pub fn signature_header(&self) -> &'static str {
        self.gateway.signature_header()
    }

    /// Verifies and applies one provider delivery. Safe to call any number of
    /// times, concurrently, for the same event.
    #[tracing::instrument(skip_all, fields(provider = %self.gateway.method()))]
    pub async fn handle(
        &self,
        raw_payload: &[u8],
        signature: Option<&str>,
    ) -> Result<Acknowledged, PurchaseError> {
        let signature = signature.unwrap_or_default();
        if signature.is_empty()
            || !self
                .gateway
                .verify_signature(raw_payload, signature, &self.webhook_secret)
        {
            warn!(provider = %self.gateway.method(), "webhook signature rejected");
            return Err(PurchaseError::AuthenticityFailure);
        }

        let notification = self.gateway.parse_notification(raw_payload)?;
        let Some(external_payment_id) = notification
            .outcome
            .external_payment_id()
            .map(str::to_string)
        else {
            debug!(
                event_id = %notification.event_id,
                event_type = %notification.event_type,
                "ignoring webhook event"
            );
            return Ok(Acknowledged::Ignored {
                event_type: notification.event_type,
            });
        };

        let record = self.locate(&notification, &external_payment_id).await?;
        self.settle(record, notification).await
    }

    /// Settles a purchase from the signed confirmation the provider's checkout
    /// widget returned to the buyer.
    #[tracing::instrument(skip_all, fields(provider = %self.gateway.method(), user_id = %user_id))]
    pub async fn confirm_client_payment(
        &self,
        user_id: &str,
        confirmation: ClientConfirmation,
    ) -> Result<Acknowledged, PurchaseError> {
        if confirmation.order_id.trim().is_empty()
            || confirmation.payment_id.trim().is_empty()
            || confirmation.signature.trim().is_empty()
        {
            return Err(PurchaseError::MalformedNotification(
                "payment confirmation details are missing".into(),
            ));
        }
        match self.gateway.verify_client_confirmation(&confirmation) {
            None => {
                return Err(PurchaseError::Unsupported(format!(
                    "{} payments settle through webhooks only",
                    self.gateway.method()
                )));
            }
            Some(false) => {
                warn!(order_id = %confirmation.order_id, "client payment confirmation rejected");
                return Err(PurchaseError::AuthenticityFailure);
            }
            Some(true) => {}
        }

        let record = self
            .ledger
            .find_by_external_id(&confirmation.order_id)
            .await?
            .ok_or_else(|| {
                PurchaseError::NotFound(format!("purchase for order {}", confirmation.order_id))
            })?;
        if record.user_id != user_id {
            return Err(PurchaseError::Forbidden(format!(
                "purchase {} belongs to another user",
                record.purchase_id
            )));
        }

        let notification = PaymentNotification {
            event_id: confirmation.payment_id,
            event_type: CLIENT_CONFIRMATION_EVENT.to_string(),
            purchase_id: Some(record.purchase_id.clone()),
            outcome: PaymentOutcome::Succeeded {
                external_payment_id: confirmation.order_id,
                amount_minor: None,
            },
        };
        self.settle(record, notification).await
    }

    /// Finds the purchase an event settles, binding the external id first when
    /// checkout stopped before it could.
    async fn locate(
        &self,
        notification: &PaymentNotification,
        external_payment_id: &str,
    ) -> Result<PurchaseRecord, PurchaseError> {
        if let Some(record) = self.ledger.find_by_external_id(external_payment_id).await? {
            return Ok(record);
        }

        if let Some(purchase_id) = notification.purchase_id.as_deref() {
            match self
                .ledger
                .attach_external_id(purchase_id, external_payment_id)
                .await
            {
                Ok(record) => {
                    info!(
                        %purchase_id,
                        external_payment_id,
                        event_id = %notification.event_id,
                        "bound external id from the provider's purchase reference"
                    );
                    return Ok(record);
                }
                Err(
                    err @ (LedgerError::NotFound { .. }
                    | LedgerError::ConflictingExternalId { .. }
                    | LedgerError::ExternalIdTaken { .. }),
                ) => {
                    warn!(%purchase_id, external_payment_id, error = %err, "purchase reference not usable");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            external_payment_id,
            event_id = %notification.event_id,
            "webhook references no known purchase"
        );
        Err(PurchaseError::NotFound(format!(
            "purchase for external payment {external_payment_id}"
        )))
    }

    async fn settle(
        &self,
        mut record: PurchaseRecord,
        notification: PaymentNotification,
    ) -> Result<Acknowledged, PurchaseError> {
        let purchase_id = record.purchase_id.clone();

        for _ in 0..MAX_ATTEMPTS {
            match decide_reconcile(&record, &notification.outcome, self.policy, now_millis()) {
                Decision::Ignored => {
                    return Ok(Acknowledged::Ignored {
                        event_type: notification.event_type,
                    });
                }
                Decision::AlreadyApplied { status } => {
                    debug!(%purchase_id, %status, event_type = %notification.event_type, "purchase already settled");
                    self.ensure_enrollment(&record).await?;
                    return Ok(Acknowledged::AlreadyApplied(record));
                }
                Decision::Transition { change, patch } => {
                    if let Some(captured) = patch.amount {
                        if captured != record.amount {
                            warn!(%purchase_id, quoted = %record.amount, %captured, "captured amount differs from quoted price");
                        }
                    }
                    match self.ledger.transition(&purchase_id, change, patch).await {
                        Ok(updated) => {
                            info!(
                                %purchase_id,
                                from = %change.from(),
                                to = %change.to(),
                                event_id = %notification.event_id,
                                "purchase reconciled"
                            );
                            self.ensure_enrollment(&updated).await?;
                            if updated.status == PurchaseStatus::Completed {
                                self.flag_duplicate_payment(&updated).await?;
                            }
                            return Ok(Acknowledged::Applied(updated));
                        }
                        Err(LedgerError::StaleState { actual, .. }) => {
                            debug!(%purchase_id, %actual, "lost a concurrent reconcile, re-reading");
                            record = self.ledger.find(&purchase_id).await?.ok_or_else(|| {
                                PurchaseError::NotFound(format!("purchase {purchase_id}"))
                            })?;
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            }
        }

        Err(PurchaseError::Ledger(LedgerError::Backend(format!(
            "purchase {purchase_id} kept changing during reconcile"
        ))))
    }

    /// Re-asserting the edge on every settled delivery repairs a crash
    /// between the status write and the grant. The record is read again once
    /// the grant has landed: a refund that committed meanwhile has already
    /// revoked, and the grant must not outlive it.
    async fn ensure_enrollment(&self, record: &PurchaseRecord) -> Result<(), PurchaseError> {
        if !record.grants_enrollment() {
            return Ok(());
        }
        grant_enrollment(
            &*self.identity,
            &*self.catalog,
            &record.user_id,
            &record.course_id,
            record.updated_at,
        )
        .await?;

        let current = self.ledger.find(&record.purchase_id).await?;
        if let Some(current) = current.filter(|current| !current.grants_enrollment()) {
            warn!(
                purchase_id = %current.purchase_id,
                status = %current.status,
                "purchase left completed while granting, withdrawing the grant"
            );
            withdraw_enrollment(
                &*self.ledger,
                &*self.identity,
                &*self.catalog,
                &current.user_id,
                &current.course_id,
            )
            .await?;
        }
        Ok(())
    }

    async fn flag_duplicate_payment(&self, record: &PurchaseRecord) -> Result<(), PurchaseError> {
        let others = self
            .ledger
            .list_for_user(&record.user_id)
            .await?
            .into_iter()
            .filter(|other| {
                other.course_id == record.course_id
                    && other.purchase_id != record.purchase_id
                    && other.status == PurchaseStatus::Completed
            })
            .count();
        if others > 0 {
            warn!(
                purchase_id = %record.purchase_id,
                user_id = %record.user_id,
                course_id = %record.course_id,
                "course paid more than once, refund candidate"
            );
        }
        Ok(())
    }
}
