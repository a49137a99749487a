use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Instructor,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// course id -> enrolled_at (epoch millis)
    #[serde(default)]
    pub enrolled_courses: BTreeMap<String, i64>,
}

impl User {
    pub fn is_enrolled_in(&self, course_id: &str) -> bool {
        self.enrolled_courses.contains_key(course_id)
    }
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, IdentityError>;

    /// Add-if-absent; an existing enrollment keeps its original `enrolled_at`.
    async fn add_enrolled_course(
        &self,
        user_id: &str,
        course_id: &str,
        enrolled_at: i64,
    ) -> Result<(), IdentityError>;

    /// Remove-if-present.
    async fn remove_enrolled_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<(), IdentityError>;
}
