use crate::modules::purchases::core::purchase::PurchaseStatus;
use rust_decimal::Decimal;
use std::str::FromStr;

/// What a verified success notification does to a purchase that already failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LateSuccessPolicy {
    /// `failed` stays terminal.
    #[default]
    Terminal,
    /// `failed -> completed` is allowed when the provider later reports success.
    Reopen,
}

impl FromStr for LateSuccessPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "terminal" => Ok(LateSuccessPolicy::Terminal),
            "reopen" => Ok(LateSuccessPolicy::Reopen),
            other => Err(format!("unknown late success policy: {other}")),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: PurchaseStatus,
    pub to: PurchaseStatus,
}

/// An edge of the purchase state machine. Only valid edges can be built, so
/// the ledger never sees a transition it would have to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    from: PurchaseStatus,
    to: PurchaseStatus,
}

impl StatusChange {
    pub fn new(
        from: PurchaseStatus,
        to: PurchaseStatus,
        policy: LateSuccessPolicy,
    ) -> Result<Self, InvalidTransition> {
        use PurchaseStatus::*;
        let allowed = match (from, to) {
            (Pending, Completed) | (Pending, Failed) | (Completed, Refunded) => true,
            (Failed, Completed) => policy == LateSuccessPolicy::Reopen,
            _ => false,
        };
        if allowed {
            Ok(Self { from, to })
        } else {
            Err(InvalidTransition { from, to })
        }
    }

    pub fn from(&self) -> PurchaseStatus {
        self.from
    }

    pub fn to(&self) -> PurchaseStatus {
        self.to
    }
}

/// Fields written together with a status change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionPatch {
    pub at: i64,
    pub amount: Option<Decimal>,
    pub refund_amount: Option<Decimal>,
    pub refund_reason: Option<String>,
}

impl TransitionPatch {
    pub fn at(at: i64) -> Self {
        Self {
            at,
            ..Self::default()
        }
    }

    pub fn with_amount(mut self, amount: Option<Decimal>) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_refund(mut self, amount: Decimal, reason: impl Into<String>) -> Self {
        self.refund_amount = Some(amount);
        self.refund_reason = Some(reason.into());
        self
    }
}
