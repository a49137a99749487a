use crate::modules::purchases::adapters::outbound::identity::{Role, User};
use std::collections::BTreeMap;

pub struct UserBuilder {
    inner: User,
}

impl Default for UserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl UserBuilder {
    pub fn new() -> Self {
        Self {
            inner: User {
                user_id: "user-fixed-0001".to_string(),
                name: "Teddy Test".to_string(),
                email: "teddy@example.com".to_string(),
                role: Role::Student,
                avatar: None,
                bio: None,
                enrolled_courses: BTreeMap::new(),
            },
        }
    }

    pub fn user_id(mut self, v: impl Into<String>) -> Self {
        self.inner.user_id = v.into();
        self
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.inner.name = v.into();
        self
    }

    pub fn role(mut self, v: Role) -> Self {
        self.inner.role = v;
        self
    }

    pub fn enrolled_in(mut self, course_id: impl Into<String>, at: i64) -> Self {
        self.inner.enrolled_courses.insert(course_id.into(), at);
        self
    }

    pub fn build(self) -> User {
        self.inner
    }
}
