use crate::modules::purchases::adapters::outbound::identity::{IdentityError, IdentityStore, User};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryIdentity {
    users: RwLock<HashMap<String, User>>,
    is_offline: bool,
    delay_grant_ms: AtomicU64,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(
                users
                    .into_iter()
                    .map(|user| (user.user_id.clone(), user))
                    .collect(),
            ),
            is_offline: false,
            delay_grant_ms: AtomicU64::new(0),
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Sleeps before every enrollment add so a racing revoke can overtake it.
    pub fn set_delay_grant_ms(&self, delay_ms: u64) {
        self.delay_grant_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.user_id.clone(), user);
    }

    fn ensure_online(&self) -> Result<(), IdentityError> {
        if self.is_offline {
            return Err(IdentityError::Backend("Identity store offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityStore for InMemoryIdentity {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, IdentityError> {
        self.ensure_online()?;
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn add_enrolled_course(
        &self,
        user_id: &str,
        course_id: &str,
        enrolled_at: i64,
    ) -> Result<(), IdentityError> {
        self.ensure_online()?;
        let delay_ms = self.delay_grant_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| IdentityError::UserNotFound(user_id.to_string()))?;
        user.enrolled_courses
            .entry(course_id.to_string())
            .or_insert(enrolled_at);
        Ok(())
    }

    async fn remove_enrolled_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<(), IdentityError> {
        self.ensure_online()?;
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| IdentityError::UserNotFound(user_id.to_string()))?;
        user.enrolled_courses.remove(course_id);
        Ok(())
    }
}
