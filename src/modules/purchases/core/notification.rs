/// Provider-neutral view of a verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotification {
    pub event_id: String,
    pub event_type: String,
    pub outcome: PaymentOutcome,
    /// Our purchase id as echoed back by the provider, when it carries one.
    pub purchase_id: Option<String>,
}

/// Metadata key under which checkout sends our purchase id to the provider.
pub const PURCHASE_ID_METADATA_KEY: &str = "purchaseId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded {
        external_payment_id: String,
        /// Captured amount as reported by the provider, in minor units.
        amount_minor: Option<i64>,
    },
    Failed {
        external_payment_id: String,
    },
    /// Any event kind that does not settle a purchase.
    Unrelated,
}

impl PaymentOutcome {
    pub fn external_payment_id(&self) -> Option<&str> {
        match self {
            PaymentOutcome::Succeeded {
                external_payment_id,
                ..
            }
            | PaymentOutcome::Failed {
                external_payment_id,
            } => Some(external_payment_id),
            PaymentOutcome::Unrelated => None,
        }
    }
}
