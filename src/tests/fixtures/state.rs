use crate::modules::purchases::adapters::outbound::catalog_in_memory::InMemoryCatalog;
use crate::modules::purchases::adapters::outbound::identity::Role;
use crate::modules::purchases::adapters::outbound::identity_in_memory::InMemoryIdentity;
use crate::modules::purchases::adapters::outbound::purchase_ledger_in_memory::InMemoryPurchaseLedger;
use crate::modules::purchases::adapters::outbound::payment_gateway::PaymentGateway;
use crate::modules::purchases::core::transitions::LateSuccessPolicy;
use crate::shell::state::{AppState, PurchaseSettings};
use crate::tests::fixtures::catalog::CourseBuilder;
use crate::tests::fixtures::gateway::{StubGateway, razorpay_gateway};
use crate::tests::fixtures::identity::UserBuilder;
use crate::tests::fixtures::signatures::{RAZORPAY_WEBHOOK_SECRET, STRIPE_WEBHOOK_SECRET};
use crate::tests::fixtures::tokens::{ACCESS_TOKEN_SECRET, access_token};
use std::sync::Arc;

pub const STUDENT: &str = "user-fixed-0001";
pub const ADMIN: &str = "user-admin-0001";
pub const INSTRUCTOR: &str = "user-instructor-0001";
pub const COURSE: &str = "course-fixed-0001";

/// An `AppState` over seeded in-memory stores, with handles kept for
/// assertions.
pub struct TestApp {
    pub ledger: Arc<InMemoryPurchaseLedger>,
    pub catalog: Arc<InMemoryCatalog>,
    pub identity: Arc<InMemoryIdentity>,
    pub gateway: Arc<StubGateway>,
    pub state: AppState,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(InMemoryPurchaseLedger::new(), LateSuccessPolicy::Terminal)
    }

    pub fn with_policy(policy: LateSuccessPolicy) -> Self {
        Self::build(InMemoryPurchaseLedger::new(), policy)
    }

    pub fn with_ledger(ledger: InMemoryPurchaseLedger) -> Self {
        Self::build(ledger, LateSuccessPolicy::Terminal)
    }

    /// Settles through the Razorpay adapter instead of the stub; checkouts
    /// still go to the stub.
    pub fn with_razorpay() -> Self {
        let mut app = Self::new();
        app.state = app.state_over(
            Arc::new(razorpay_gateway()),
            RAZORPAY_WEBHOOK_SECRET,
            LateSuccessPolicy::Terminal,
        );
        app
    }

    fn build(ledger: InMemoryPurchaseLedger, policy: LateSuccessPolicy) -> Self {
        let ledger = Arc::new(ledger);
        let catalog = Arc::new(InMemoryCatalog::with_courses([CourseBuilder::new()
            .course_id(COURSE)
            .owner_id(INSTRUCTOR)
            .build()]));
        let identity = Arc::new(InMemoryIdentity::with_users([
            UserBuilder::new().user_id(STUDENT).build(),
            UserBuilder::new()
                .user_id(ADMIN)
                .name("Ada Admin")
                .role(Role::Admin)
                .build(),
            UserBuilder::new()
                .user_id(INSTRUCTOR)
                .name("Ivy Instructor")
                .role(Role::Instructor)
                .build(),
        ]));
        let gateway = Arc::new(StubGateway::new());
        let state = AppState::new(
            ledger.clone(),
            catalog.clone(),
            identity.clone(),
            gateway.clone(),
            settings(STRIPE_WEBHOOK_SECRET, policy),
            ACCESS_TOKEN_SECRET,
        );
        Self {
            ledger,
            catalog,
            identity,
            gateway,
            state,
        }
    }

    fn state_over(
        &self,
        gateway: Arc<dyn PaymentGateway>,
        webhook_secret: &str,
        policy: LateSuccessPolicy,
    ) -> AppState {
        AppState::new(
            self.ledger.clone(),
            self.catalog.clone(),
            self.identity.clone(),
            gateway,
            settings(webhook_secret, policy),
            ACCESS_TOKEN_SECRET,
        )
    }
}

fn settings(webhook_secret: &str, policy: LateSuccessPolicy) -> PurchaseSettings {
    PurchaseSettings {
        currency: "INR".into(),
        webhook_secret: webhook_secret.into(),
        late_success_policy: policy,
    }
}

pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", access_token(user_id))
}
