use crate::modules::purchases::adapters::outbound::catalog::CatalogStore;
use crate::modules::purchases::adapters::outbound::identity::IdentityStore;
use crate::modules::purchases::adapters::outbound::purchase_ledger::PurchaseLedger;
use crate::modules::purchases::errors::PurchaseError;

/// Records the enrollment edge on both sides. Both writes are add-if-absent,
/// so repeating a grant is harmless.
pub async fn grant_enrollment(
    identity: &impl IdentityStore,
    catalog: &impl CatalogStore,
    user_id: &str,
    course_id: &str,
    enrolled_at: i64,
) -> Result<(), PurchaseError> {
    tokio::try_join!(
        async {
            identity
                .add_enrolled_course(user_id, course_id, enrolled_at)
                .await
                .map_err(PurchaseError::from)
        },
        async {
            catalog
                .add_enrolled_student(course_id, user_id)
                .await
                .map_err(PurchaseError::from)
        },
    )?;
    Ok(())
}

pub async fn revoke_enrollment(
    identity: &impl IdentityStore,
    catalog: &impl CatalogStore,
    user_id: &str,
    course_id: &str,
) -> Result<(), PurchaseError> {
    tokio::try_join!(
        async {
            identity
                .remove_enrolled_course(user_id, course_id)
                .await
                .map_err(PurchaseError::from)
        },
        async {
            catalog
                .remove_enrolled_student(course_id, user_id)
                .await
                .map_err(PurchaseError::from)
        },
    )?;
    Ok(())
}

/// Revokes the edge unless another completed purchase still pays for it.
pub async fn withdraw_enrollment(
    ledger: &impl PurchaseLedger,
    identity: &impl IdentityStore,
    catalog: &impl CatalogStore,
    user_id: &str,
    course_id: &str,
) -> Result<(), PurchaseError> {
    let still_paid = ledger
        .list_for_user(user_id)
        .await?
        .iter()
        .any(|other| other.course_id == course_id && other.grants_enrollment());
    if still_paid {
        return Ok(());
    }
    revoke_enrollment(identity, catalog, user_id, course_id).await
}
