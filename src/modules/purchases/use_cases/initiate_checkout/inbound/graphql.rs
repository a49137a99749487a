use async_graphql::{Context, ID, Object, Result as GqlResult, SimpleObject};
use chrono::Utc;
use uuid::Uuid;

use crate::modules::purchases::use_cases::initiate_checkout::command::InitiateCheckout;
use crate::shell::graphql::{caller, to_gql_error};
use crate::shell::state::AppState;

#[derive(SimpleObject, Clone)]
pub struct GqlCheckout {
    pub checkout_url: String,
    pub purchase_id: ID,
}

#[derive(Default)]
pub struct CheckoutMutation;

#[Object]
impl CheckoutMutation {
    async fn initiate_checkout(&self, context: &Context<'_>, course_id: ID) -> GqlResult<GqlCheckout> {
        let user = caller(context)?;
        let state = context.data_unchecked::<AppState>();

        let command = InitiateCheckout {
            purchase_id: Uuid::now_v7().to_string(),
            user_id: user.user_id.clone(),
            course_id: course_id.to_string(),
            requested_at: Utc::now().timestamp_millis(),
        };

        let started = state
            .checkout_handler
            .handle(command)
            .await
            .map_err(to_gql_error)?;
        Ok(GqlCheckout {
            checkout_url: started.checkout_url,
            purchase_id: ID(started.purchase_id),
        })
    }
}
