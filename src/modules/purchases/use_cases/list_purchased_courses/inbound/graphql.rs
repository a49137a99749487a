use async_graphql::{Context, ID, Object, Result as GqlResult, SimpleObject};

use crate::modules::purchases::use_cases::list_purchased_courses::projection::{
    CourseSummary, OwnerSummary, PurchasedCourseView,
};
use crate::shell::graphql::{caller, to_gql_error};
use crate::shell::state::AppState;

#[derive(SimpleObject, Clone)]
pub struct GqlOwner {
    pub user_id: ID,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

impl From<OwnerSummary> for GqlOwner {
    fn from(v: OwnerSummary) -> Self {
        Self {
            user_id: ID(v.user_id),
            name: v.name,
            email: v.email,
            avatar: v.avatar,
            bio: v.bio,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlCourseSummary {
    pub course_id: ID,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub thumbnail: String,
    pub owner: Option<GqlOwner>,
}

impl From<CourseSummary> for GqlCourseSummary {
    fn from(v: CourseSummary) -> Self {
        Self {
            course_id: ID(v.course_id),
            title: v.title,
            subtitle: v.subtitle,
            description: v.description,
            category: v.category,
            thumbnail: v.thumbnail,
            owner: v.owner.map(Into::into),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlPurchasedCourse {
    pub purchase_id: ID,
    pub purchased_at: i64,
    pub course: GqlCourseSummary,
}

impl From<PurchasedCourseView> for GqlPurchasedCourse {
    fn from(v: PurchasedCourseView) -> Self {
        Self {
            purchase_id: ID(v.purchase_id),
            purchased_at: v.purchased_at,
            course: v.course.into(),
        }
    }
}

#[derive(Default)]
pub struct PurchasedCoursesQuery;

#[Object]
impl PurchasedCoursesQuery {
    async fn purchased_courses(&self, context: &Context<'_>) -> GqlResult<Vec<GqlPurchasedCourse>> {
        let user = caller(context)?;
        let state = context.data_unchecked::<AppState>();
        let list = state
            .purchased_courses_handler
            .handle(&user.user_id)
            .await
            .map_err(to_gql_error)?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}
