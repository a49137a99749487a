use crate::modules::purchases::core::purchase::PurchaseStatus;
use crate::modules::purchases::core::transitions::{StatusChange, TransitionPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Transition {
        change: StatusChange,
        patch: TransitionPatch,
    },
    /// The record already sits where this notification would move it, or the
    /// move is not allowed from its current status.
    AlreadyApplied { status: PurchaseStatus },
    /// The outcome does not settle a purchase.
    Ignored,
}
