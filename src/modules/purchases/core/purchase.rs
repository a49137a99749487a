use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
            PurchaseStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Stripe,
    Razorpay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Razorpay => "razorpay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stripe" => Ok(PaymentMethod::Stripe),
            "razorpay" => Ok(PaymentMethod::Razorpay),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Input to `PurchaseLedger::create_pending`. The amount is the course price
/// at initiation time, not a live reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    pub purchase_id: String,
    pub user_id: String,
    pub course_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub purchase_id: String,
    pub user_id: String,
    pub course_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PurchaseStatus,
    pub payment_method: PaymentMethod,
    pub external_payment_id: Option<String>,
    pub refund_amount: Option<Decimal>,
    pub refund_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub version: i64,
}

impl PurchaseRecord {
    pub fn pending(new: NewPurchase) -> Self {
        Self {
            purchase_id: new.purchase_id,
            user_id: new.user_id,
            course_id: new.course_id,
            amount: new.amount,
            currency: new.currency,
            status: PurchaseStatus::Pending,
            payment_method: new.payment_method,
            external_payment_id: None,
            refund_amount: None,
            refund_reason: None,
            created_at: new.created_at,
            updated_at: new.created_at,
            version: 0,
        }
    }

    /// Whether this record is the one backing an active enrollment.
    pub fn grants_enrollment(&self) -> bool {
        self.status == PurchaseStatus::Completed
    }
}
