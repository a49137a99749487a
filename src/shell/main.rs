use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use course_purchases::modules::purchases::adapters::outbound::payment_gateway::PaymentGateway;
use course_purchases::modules::purchases::adapters::outbound::purchase_ledger_in_memory::InMemoryPurchaseLedger;
use course_purchases::modules::purchases::adapters::outbound::razorpay_gateway::RazorpayGateway;
use course_purchases::modules::purchases::adapters::outbound::stripe_gateway::StripeGateway;
use course_purchases::shell::config::{AppConfig, ProviderConfig};
use course_purchases::shell::http::router;
use course_purchases::shell::seed::Seed;
use course_purchases::shell::state::{AppState, PurchaseSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env().context("loading configuration")?;

    // In-memory stores for now, optionally seeded from a JSON file
    let seed = match &config.seed_file {
        Some(path) => Seed::load(path).await?,
        None => Seed::default(),
    };
    let (identity, catalog) = seed.into_stores();

    let gateway: Arc<dyn PaymentGateway> = match &config.provider {
        ProviderConfig::Stripe { settings, .. } => Arc::new(StripeGateway::new(settings.clone())?),
        ProviderConfig::Razorpay { settings, .. } => {
            Arc::new(RazorpayGateway::new(settings.clone())?)
        }
    };

    let state = AppState::new(
        Arc::new(InMemoryPurchaseLedger::new()),
        Arc::new(catalog),
        Arc::new(identity),
        gateway,
        PurchaseSettings {
            currency: config.currency.clone(),
            webhook_secret: config.provider.webhook_secret().to_string(),
            late_success_policy: config.late_success_policy,
        },
        &config.access_token_secret,
    );

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(
        provider = %config.provider.method(),
        policy = ?config.late_success_policy,
        "API listening on http://{addr} (GraphQL at /gql)"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}
