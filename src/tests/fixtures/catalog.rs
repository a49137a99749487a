use crate::modules::purchases::adapters::outbound::catalog::Course;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

pub struct CourseBuilder {
    inner: Course,
}

impl Default for CourseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CourseBuilder {
    pub fn new() -> Self {
        Self {
            inner: Course {
                course_id: "course-fixed-0001".to_string(),
                title: "Rust for Web Developers".to_string(),
                subtitle: Some("From zero to axum".to_string()),
                description: Some("Build and ship a REST API in Rust".to_string()),
                category: "programming".to_string(),
                price: Decimal::from(500),
                thumbnail: "https://cdn.example.com/thumbnails/rust.png".to_string(),
                owner_id: "user-instructor-0001".to_string(),
                is_published: true,
                enrolled_students: BTreeSet::new(),
            },
        }
    }

    pub fn course_id(mut self, v: impl Into<String>) -> Self {
        self.inner.course_id = v.into();
        self
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.inner.title = v.into();
        self
    }

    pub fn price(mut self, v: Decimal) -> Self {
        self.inner.price = v;
        self
    }

    pub fn owner_id(mut self, v: impl Into<String>) -> Self {
        self.inner.owner_id = v.into();
        self
    }

    pub fn build(self) -> Course {
        self.inner
    }
}
