use crate::modules::purchases::core::purchase::{PaymentMethod, PurchaseRecord, PurchaseStatus};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStatusView {
    pub purchase_id: String,
    pub course_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PurchaseStatus,
    pub payment_method: PaymentMethod,
    pub refund_amount: Option<Decimal>,
    pub refund_reason: String,
    pub is_refundable: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<PurchaseRecord> for PurchaseStatusView {
    fn from(record: PurchaseRecord) -> Self {
        Self {
            is_refundable: record.status == PurchaseStatus::Completed,
            purchase_id: record.purchase_id,
            course_id: record.course_id,
            user_id: record.user_id,
            amount: record.amount.normalize(),
            currency: record.currency,
            status: record.status,
            payment_method: record.payment_method,
            refund_amount: record.refund_amount.map(|amount| amount.normalize()),
            refund_reason: record.refund_reason.unwrap_or_default(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
