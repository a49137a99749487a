use crate::modules::purchases::core::notification::PaymentOutcome;
use crate::modules::purchases::core::purchase::{PurchaseRecord, PurchaseStatus};
use crate::modules::purchases::core::transitions::{
    LateSuccessPolicy, StatusChange, TransitionPatch,
};
use crate::modules::purchases::use_cases::reconcile_payment::decision::Decision;
use crate::shared::core::primitives::from_minor_units;

pub fn decide_reconcile(
    record: &PurchaseRecord,
    outcome: &PaymentOutcome,
    policy: LateSuccessPolicy,
    at: i64,
) -> Decision {
    let (target, captured) = match outcome {
        PaymentOutcome::Succeeded { amount_minor, .. } => (
            PurchaseStatus::Completed,
            amount_minor.map(from_minor_units),
        ),
        PaymentOutcome::Failed { .. } => (PurchaseStatus::Failed, None),
        PaymentOutcome::Unrelated => return Decision::Ignored,
    };

    match StatusChange::new(record.status, target, policy) {
        Ok(change) => Decision::Transition {
            change,
            patch: TransitionPatch::at(at).with_amount(captured),
        },
        Err(_) => Decision::AlreadyApplied {
            status: record.status,
        },
    }
}
