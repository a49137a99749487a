use async_graphql::{Context, ID, Object, Result as GqlResult, SimpleObject};

use crate::modules::purchases::use_cases::get_purchase_status::projection::PurchaseStatusView;
use crate::shell::graphql::{caller, to_gql_error};
use crate::shell::state::AppState;

#[derive(SimpleObject, Clone)]
pub struct GqlPurchaseStatus {
    pub purchase_id: ID,
    pub course_id: ID,
    pub user_id: ID,
    pub amount: String,
    pub currency: String,
    pub status: String,
    pub payment_method: String,
    pub refund_amount: Option<String>,
    pub refund_reason: String,
    pub is_refundable: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<PurchaseStatusView> for GqlPurchaseStatus {
    fn from(v: PurchaseStatusView) -> Self {
        Self {
            purchase_id: ID(v.purchase_id),
            course_id: ID(v.course_id),
            user_id: ID(v.user_id),
            amount: v.amount.to_string(),
            currency: v.currency,
            status: v.status.to_string(),
            payment_method: v.payment_method.to_string(),
            refund_amount: v.refund_amount.map(|amount| amount.to_string()),
            refund_reason: v.refund_reason,
            is_refundable: v.is_refundable,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Default)]
pub struct PurchaseStatusQuery;

#[Object]
impl PurchaseStatusQuery {
    async fn purchase_status(
        &self,
        context: &Context<'_>,
        course_id: ID,
    ) -> GqlResult<GqlPurchaseStatus> {
        let user = caller(context)?;
        let state = context.data_unchecked::<AppState>();
        let view = state
            .status_handler
            .handle(&user.user_id, &course_id)
            .await
            .map_err(to_gql_error)?;
        Ok(view.into())
    }
}
