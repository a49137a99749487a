use crate::modules::purchases::adapters::outbound::catalog::Course;
use crate::modules::purchases::adapters::outbound::identity::User;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

impl From<User> for OwnerSummary {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            bio: user.bio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub thumbnail: String,
    /// Absent when the owner account no longer exists.
    pub owner: Option<OwnerSummary>,
}

impl CourseSummary {
    pub fn new(course: Course, owner: Option<User>) -> Self {
        Self {
            course_id: course.course_id,
            title: course.title,
            subtitle: course.subtitle,
            description: course.description,
            category: course.category,
            thumbnail: course.thumbnail,
            owner: owner.map(OwnerSummary::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedCourseView {
    pub purchase_id: String,
    pub purchased_at: i64,
    pub course: CourseSummary,
}
