use async_graphql::{
    Context, EmptySubscription, Error, ErrorExtensions, MergedObject, Result as GqlResult, Schema,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Html,
};

use crate::modules::purchases::errors::PurchaseError;
use crate::modules::purchases::use_cases::get_purchase_status::inbound::graphql::PurchaseStatusQuery;
use crate::modules::purchases::use_cases::initiate_checkout::inbound::graphql::CheckoutMutation;
use crate::modules::purchases::use_cases::list_purchased_courses::inbound::graphql::PurchasedCoursesQuery;
use crate::shell::auth::{AuthenticatedUser, access_token_from, decode_access_token};
use crate::shell::http::status_for;
pub use crate::shell::state::AppState;

#[derive(MergedObject, Default)]
pub struct QueryRoot(PurchaseStatusQuery, PurchasedCoursesQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(CheckoutMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state)
        .finish()
}

pub fn caller<'a>(context: &'a Context<'_>) -> GqlResult<&'a AuthenticatedUser> {
    context.data::<AuthenticatedUser>().map_err(|_| {
        Error::new("missing or invalid access token")
            .extend_with(|_, ext| ext.set("code", StatusCode::UNAUTHORIZED.as_u16()))
    })
}

pub fn to_gql_error(err: PurchaseError) -> Error {
    let code = status_for(&err).as_u16();
    Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

/// Resolvers that need a caller read it from the request data; an invalid
/// token simply leaves it out.
pub async fn graphql(
    State(state): State<AppState>,
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(claims) = access_token_from(&headers)
        .and_then(|token| decode_access_token(token, &state.access_token_secret).ok())
    {
        request = request.data(AuthenticatedUser {
            user_id: claims.user_id,
        });
    }
    schema.execute(request).await.into()
}

pub async fn graphiql() -> Html<String> {
    use async_graphql::http::GraphiQLSource;
    Html(GraphiQLSource::build().endpoint("/gql").finish())
}
