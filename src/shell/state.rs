use crate::modules::purchases::adapters::outbound::catalog_in_memory::InMemoryCatalog;
use crate::modules::purchases::adapters::outbound::identity_in_memory::InMemoryIdentity;
use crate::modules::purchases::adapters::outbound::payment_gateway::PaymentGateway;
use crate::modules::purchases::adapters::outbound::purchase_ledger_in_memory::InMemoryPurchaseLedger;
use crate::modules::purchases::core::transitions::LateSuccessPolicy;
use crate::modules::purchases::use_cases::get_purchase_status::handler::GetPurchaseStatusHandler;
use crate::modules::purchases::use_cases::initiate_checkout::handler::InitiateCheckoutHandler;
use crate::modules::purchases::use_cases::list_purchased_courses::handler::ListPurchasedCoursesHandler;
use crate::modules::purchases::use_cases::reconcile_payment::handler::ReconcilePaymentHandler;
use crate::modules::purchases::use_cases::refund_purchase::handler::RefundPurchaseHandler;
use std::sync::Arc;

pub type Ledger = InMemoryPurchaseLedger;
pub type Catalog = InMemoryCatalog;
pub type Identity = InMemoryIdentity;

#[derive(Debug, Clone)]
pub struct PurchaseSettings {
    pub currency: String,
    pub webhook_secret: String,
    pub late_success_policy: LateSuccessPolicy,
}

#[derive(Clone)]
pub struct AppState {
    pub checkout_handler: Arc<InitiateCheckoutHandler<Ledger, Catalog, Identity>>,
    pub reconcile_handler: Arc<ReconcilePaymentHandler<Ledger, Catalog, Identity>>,
    pub refund_handler: Arc<RefundPurchaseHandler<Ledger, Catalog, Identity>>,
    pub status_handler: Arc<GetPurchaseStatusHandler<Ledger>>,
    pub purchased_courses_handler: Arc<ListPurchasedCoursesHandler<Ledger, Catalog, Identity>>,
    pub access_token_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        ledger: Arc<Ledger>,
        catalog: Arc<Catalog>,
        identity: Arc<Identity>,
        gateway: Arc<dyn PaymentGateway>,
        settings: PurchaseSettings,
        access_token_secret: &str,
    ) -> Self {
        Self {
            checkout_handler: Arc::new(InitiateCheckoutHandler::new(
                ledger.clone(),
                catalog.clone(),
                identity.clone(),
                gateway.clone(),
                settings.currency,
            )),
            reconcile_handler: Arc::new(ReconcilePaymentHandler::new(
                ledger.clone(),
                catalog.clone(),
                identity.clone(),
                gateway,
                settings.webhook_secret,
                settings.late_success_policy,
            )),
            refund_handler: Arc::new(RefundPurchaseHandler::new(
                ledger.clone(),
                catalog.clone(),
                identity.clone(),
            )),
            status_handler: Arc::new(GetPurchaseStatusHandler::new(ledger.clone())),
            purchased_courses_handler: Arc::new(ListPurchasedCoursesHandler::new(
                ledger, catalog, identity,
            )),
            access_token_secret: Arc::from(access_token_secret),
        }
    }
}
