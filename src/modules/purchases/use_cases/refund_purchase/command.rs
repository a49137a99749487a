use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundPurchase {
    pub purchase_id: String,
    pub actor_id: String,
    /// Defaults to the full captured amount.
    pub amount: Option<Decimal>,
    pub reason: String,
    pub requested_at: i64,
}
