#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiateCheckout {
    pub purchase_id: String,
    pub user_id: String,
    pub course_id: String,
    pub requested_at: i64,
}
