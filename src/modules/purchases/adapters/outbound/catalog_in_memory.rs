use crate::modules::purchases::adapters::outbound::catalog::{CatalogError, CatalogStore, Course};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryCatalog {
    courses: RwLock<HashMap<String, Course>>,
    is_offline: bool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        Self {
            courses: RwLock::new(
                courses
                    .into_iter()
                    .map(|course| (course.course_id.clone(), course))
                    .collect(),
            ),
            is_offline: false,
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn insert_course(&self, course: Course) {
        self.courses
            .write()
            .await
            .insert(course.course_id.clone(), course);
    }

    fn ensure_online(&self) -> Result<(), CatalogError> {
        if self.is_offline {
            return Err(CatalogError::Backend("Catalog offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find_course(&self, course_id: &str) -> Result<Option<Course>, CatalogError> {
        self.ensure_online()?;
        Ok(self.courses.read().await.get(course_id).cloned())
    }

    async fn add_enrolled_student(
        &self,
        course_id: &str,
        user_id: &str,
    ) -> Result<(), CatalogError> {
        self.ensure_online()?;
        let mut courses = self.courses.write().await;
        let course = courses
            .get_mut(course_id)
            .ok_or_else(|| CatalogError::CourseNotFound(course_id.to_string()))?;
        course.enrolled_students.insert(user_id.to_string());
        Ok(())
    }

    async fn remove_enrolled_student(
        &self,
        course_id: &str,
        user_id: &str,
    ) -> Result<(), CatalogError> {
        self.ensure_online()?;
        let mut courses = self.courses.write().await;
        let course = courses
            .get_mut(course_id)
            .ok_or_else(|| CatalogError::CourseNotFound(course_id.to_string()))?;
        course.enrolled_students.remove(user_id);
        Ok(())
    }
}
