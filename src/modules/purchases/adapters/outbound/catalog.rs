use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("course {0} not found")]
    CourseNotFound(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub thumbnail: String,
    pub owner_id: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub enrolled_students: BTreeSet<String>,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_course(&self, course_id: &str) -> Result<Option<Course>, CatalogError>;

    /// Add-if-absent.
    async fn add_enrolled_student(&self, course_id: &str, user_id: &str)
    -> Result<(), CatalogError>;

    /// Remove-if-present.
    async fn remove_enrolled_student(
        &self,
        course_id: &str,
        user_id: &str,
    ) -> Result<(), CatalogError>;
}
