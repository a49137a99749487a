use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::modules::purchases::adapters::outbound::razorpay_gateway::RazorpaySettings;
use crate::modules::purchases::adapters::outbound::stripe_gateway::StripeSettings;
use crate::modules::purchases::core::purchase::PaymentMethod;
use crate::modules::purchases::core::transitions::LateSuccessPolicy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Stripe {
        settings: StripeSettings,
        webhook_secret: String,
    },
    Razorpay {
        settings: RazorpaySettings,
        webhook_secret: String,
    },
}

impl ProviderConfig {
    pub fn method(&self) -> PaymentMethod {
        match self {
            ProviderConfig::Stripe { .. } => PaymentMethod::Stripe,
            ProviderConfig::Razorpay { .. } => PaymentMethod::Razorpay,
        }
    }

    pub fn webhook_secret(&self) -> &str {
        match self {
            ProviderConfig::Stripe { webhook_secret, .. }
            | ProviderConfig::Razorpay { webhook_secret, .. } => webhook_secret,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub client_url: String,
    pub access_token_secret: String,
    pub provider: ProviderConfig,
    pub currency: String,
    pub late_success_policy: LateSuccessPolicy,
    pub seed_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let client_url = env.required("CLIENT_URL")?.trim_end_matches('/').to_string();
        let timeout_ms = env.parsed("GATEWAY_TIMEOUT_MS", 15_000u64)?;

        let provider = match env.parsed("PAYMENT_PROVIDER", PaymentMethod::Stripe)? {
            PaymentMethod::Stripe => ProviderConfig::Stripe {
                settings: StripeSettings {
                    secret_key: env.required("STRIPE_SECRET_KEY")?,
                    api_base: env.or("STRIPE_API_BASE", "https://api.stripe.com"),
                    client_url: client_url.clone(),
                    timeout_ms,
                    webhook_tolerance_seconds: env.parsed("WEBHOOK_TOLERANCE_SECONDS", 300i64)?,
                },
                webhook_secret: env.required("STRIPE_WEBHOOK_SECRET")?,
            },
            PaymentMethod::Razorpay => ProviderConfig::Razorpay {
                settings: RazorpaySettings {
                    key_id: env.required("RAZORPAY_KEY_ID")?,
                    key_secret: env.required("RAZORPAY_KEY_SECRET")?,
                    api_base: env.or("RAZORPAY_API_BASE", "https://api.razorpay.com"),
                    client_url: client_url.clone(),
                    timeout_ms,
                },
                webhook_secret: env.required("RAZORPAY_WEBHOOK_SECRET")?,
            },
        };

        Ok(Self {
            host: env.or("HOST", "0.0.0.0"),
            port: env.parsed("PORT", 8080u16)?,
            client_url,
            access_token_secret: env.required("ACCESS_TOKEN_SECRET")?,
            provider,
            currency: env.or("CHECKOUT_CURRENCY", "INR").to_ascii_uppercase(),
            late_success_policy: env.parsed("LATE_SUCCESS_POLICY", LateSuccessPolicy::Terminal)?,
            seed_file: env.optional("SEED_FILE").map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &'static str) -> Option<String> {
        (self.0)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn or(&self, name: &'static str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            None => Ok(default),
            Some(raw) => raw.parse::<T>().map_err(|err| ConfigError::Invalid {
                name,
                reason: err.to_string(),
            }),
        }
    }
}
