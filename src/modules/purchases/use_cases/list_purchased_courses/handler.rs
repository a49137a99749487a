use crate::modules::purchases::adapters::outbound::catalog::CatalogStore;
use crate::modules::purchases::adapters::outbound::identity::IdentityStore;
use crate::modules::purchases::adapters::outbound::purchase_ledger::PurchaseLedger;
use crate::modules::purchases::core::purchase::PurchaseStatus;
use crate::modules::purchases::errors::PurchaseError;
use crate::modules::purchases::use_cases::list_purchased_courses::projection::{
    CourseSummary, PurchasedCourseView,
};
use std::sync::Arc;
use tracing::warn;

pub struct ListPurchasedCoursesHandler<TLedger, TCatalog, TIdentity>
where
    TLedger: PurchaseLedger + 'static,
    TCatalog: CatalogStore + 'static,
    TIdentity: IdentityStore + 'static,
{
    ledger: Arc<TLedger>,
    catalog: Arc<TCatalog>,
    identity: Arc<TIdentity>,
}

impl<TLedger, TCatalog, TIdentity> ListPurchasedCoursesHandler<TLedger, TCatalog, TIdentity>
where
    TLedger: PurchaseLedger + 'static,
    TCatalog: CatalogStore + 'static,
    TIdentity: IdentityStore + 'static,
{
    pub fn new(ledger: Arc<TLedger>, catalog: Arc<TCatalog>, identity: Arc<TIdentity>) -> Self {
        Self {
            ledger,
            catalog,
            identity,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(&self, user_id: &str) -> Result<Vec<PurchasedCourseView>, PurchaseError> {
        let completed = self
            .ledger
            .list_for_user(user_id)
            .await?
            .into_iter()
            .filter(|record| record.status == PurchaseStatus::Completed);

        let mut views = Vec::new();
        for record in completed {
            let Some(course) = self.catalog.find_course(&record.course_id).await? else {
                warn!(purchase_id = %record.purchase_id, course_id = %record.course_id, "purchased course no longer exists");
                continue;
            };
            let owner = self.identity.find_user(&course.owner_id).await?;
            views.push(PurchasedCourseView {
                purchase_id: record.purchase_id,
                purchased_at: record.updated_at,
                course: CourseSummary::new(course, owner),
            });
        }

        if views.is_empty() {
            return Err(PurchaseError::NotFound("purchased courses".into()));
        }
        Ok(views)
    }
}
