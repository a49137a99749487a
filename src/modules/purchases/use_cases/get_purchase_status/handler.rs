use crate::modules::purchases::adapters::outbound::purchase_ledger::PurchaseLedger;
use crate::modules::purchases::core::purchase::{PurchaseRecord, PurchaseStatus};
use crate::modules::purchases::errors::PurchaseError;
use crate::modules::purchases::use_cases::get_purchase_status::projection::PurchaseStatusView;
use std::sync::Arc;

pub struct GetPurchaseStatusHandler<TLedger>
where
    TLedger: PurchaseLedger + 'static,
{
    ledger: Arc<TLedger>,
}

impl<TLedger> GetPurchaseStatusHandler<TLedger>
where
    TLedger: PurchaseLedger + 'static,
{
    pub fn new(ledger: Arc<TLedger>) -> Self {
        Self { ledger }
    }

    /// The paid record wins over later abandoned attempts; otherwise the
    /// latest attempt speaks for the pair.
    #[tracing::instrument(skip(self))]
    pub async fn handle(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<PurchaseStatusView, PurchaseError> {
        let records: Vec<PurchaseRecord> = self
            .ledger
            .list_for_user(user_id)
            .await?
            .into_iter()
            .filter(|record| record.course_id == course_id)
            .collect();

        let paid = records
            .iter()
            .filter(|record| {
                matches!(
                    record.status,
                    PurchaseStatus::Completed | PurchaseStatus::Refunded
                )
            })
            .max_by_key(|record| record.updated_at);
        let latest = records.iter().max_by_key(|record| record.created_at);

        paid.or(latest)
            .cloned()
            .map(PurchaseStatusView::from)
            .ok_or_else(|| PurchaseError::NotFound(format!("purchase of course {course_id}")))
    }
}
