use crate::modules::purchases::adapters::outbound::catalog::CatalogError;
use crate::modules::purchases::adapters::outbound::identity::IdentityError;
use crate::modules::purchases::adapters::outbound::payment_gateway::GatewayError;
use crate::modules::purchases::adapters::outbound::purchase_ledger::LedgerError;
use crate::modules::purchases::core::transitions::InvalidTransition;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("course {course_id} already purchased by user {user_id}")]
    AlreadyPurchased { user_id: String, course_id: String },

    #[error("payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("webhook authenticity check failed")]
    AuthenticityFailure,

    #[error("malformed notification: {0}")]
    MalformedNotification(String),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("invalid refund: {0}")]
    InvalidRefund(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Ledger(LedgerError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl From<LedgerError> for PurchaseError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound { purchase_id } => {
                PurchaseError::NotFound(format!("purchase {purchase_id}"))
            }
            LedgerError::InvalidReference(reason) => PurchaseError::InvalidReference(reason),
            other => PurchaseError::Ledger(other),
        }
    }
}

impl From<GatewayError> for PurchaseError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unavailable(reason) => PurchaseError::GatewayUnavailable(reason),
            GatewayError::MalformedNotification(reason) => {
                PurchaseError::MalformedNotification(reason)
            }
        }
    }
}
