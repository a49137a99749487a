use crate::modules::purchases::adapters::outbound::catalog::CatalogStore;
use crate::modules::purchases::adapters::outbound::identity::IdentityStore;
use crate::modules::purchases::adapters::outbound::payment_gateway::{
    CheckoutRequest, PaymentGateway,
};
use crate::modules::purchases::adapters::outbound::purchase_ledger::PurchaseLedger;
use crate::modules::purchases::core::purchase::{NewPurchase, PurchaseStatus};
use crate::modules::purchases::errors::PurchaseError;
use crate::modules::purchases::use_cases::initiate_checkout::command::InitiateCheckout;
use crate::shared::core::primitives::to_minor_units;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutStarted {
    pub purchase_id: String,
    pub checkout_url: String,
    pub external_payment_id: String,
}

pub struct InitiateCheckoutHandler<TLedger, TCatalog, TIdentity>
where
    TLedger: PurchaseLedger + 'static,
    TCatalog: CatalogStore + 'static,
    TIdentity: IdentityStore + 'static,
{
    ledger: Arc<TLedger>,
    catalog: Arc<TCatalog>,
    identity: Arc<TIdentity>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl<TLedger, TCatalog, TIdentity> InitiateCheckoutHandler<TLedger, TCatalog, TIdentity>
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
        currency: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            catalog,
            identity,
            gateway,
            currency: currency.into(),
        }
    }

    #[tracing::instrument(skip(self), fields(provider = %self.gateway.method()))]
    pub async fn handle(&self, command: InitiateCheckout) -> Result<CheckoutStarted, PurchaseError> {
        let course = self
            .catalog
            .find_course(&command.course_id)
            .await?
            .ok_or_else(|| PurchaseError::NotFound(format!("course {}", command.course_id)))?;
        let user = self
            .identity
            .find_user(&command.user_id)
            .await?
            .ok_or_else(|| {
                PurchaseError::InvalidReference(format!("user {} does not exist", command.user_id))
            })?;

        let already_paid = self
            .ledger
            .list_for_user(&user.user_id)
            .await?
            .iter()
            .any(|record| {
                record.course_id == course.course_id && record.status == PurchaseStatus::Completed
            });
        if already_paid
            || user.is_enrolled_in(&course.course_id)
            || course.enrolled_students.contains(&user.user_id)
        {
            return Err(PurchaseError::AlreadyPurchased {
                user_id: user.user_id,
                course_id: course.course_id,
            });
        }

        let amount_minor = to_minor_units(course.price).ok_or_else(|| {
            PurchaseError::InvalidReference(format!(
                "course {} has an unpayable price {}",
                course.course_id, course.price
            ))
        })?;

        let record = self
            .ledger
            .create_pending(NewPurchase {
                purchase_id: command.purchase_id,
                user_id: user.user_id,
                course_id: course.course_id,
                amount: course.price,
                currency: self.currency.clone(),
                payment_method: self.gateway.method(),
                created_at: command.requested_at,
            })
            .await?;

        let metadata = BTreeMap::from([
            ("purchaseId".to_string(), record.purchase_id.clone()),
            ("courseId".to_string(), record.course_id.clone()),
            ("userId".to_string(), record.user_id.clone()),
        ]);
        let request = CheckoutRequest {
            purchase_id: record.purchase_id.clone(),
            course_id: record.course_id.clone(),
            course_title: course.title,
            amount_minor,
            currency: record.currency.clone(),
            metadata,
        };

        let session = match self.gateway.create_session(request).await {
            Ok(session) => session,
            Err(err) => {
                warn!(purchase_id = %record.purchase_id, error = %err, "checkout session creation failed");
                return Err(err.into());
            }
        };

        let record = self
            .ledger
            .attach_external_id(&record.purchase_id, &session.session_id)
            .await?;
        info!(
            purchase_id = %record.purchase_id,
            external_payment_id = %session.session_id,
            amount = %record.amount,
            "checkout session created"
        );

        Ok(CheckoutStarted {
            purchase_id: record.purchase_id,
            checkout_url: session.redirect_url,
            external_payment_id: session.session_id,
        })
    }
}
