use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::modules::purchases::adapters::outbound::catalog::Course;
use crate::modules::purchases::adapters::outbound::catalog_in_memory::InMemoryCatalog;
use crate::modules::purchases::adapters::outbound::identity::User;
use crate::modules::purchases::adapters::outbound::identity_in_memory::InMemoryIdentity;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse seed file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Users and courses to preload into the in-memory stores.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Seed {
    pub fn from_json(path: &str, raw: &str) -> Result<Self, SeedError> {
        serde_json::from_str(raw).map_err(|source| SeedError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let display = path.display().to_string();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: display.clone(),
                source,
            })?;
        Self::from_json(&display, &raw)
    }

    pub fn into_stores(self) -> (InMemoryIdentity, InMemoryCatalog) {
        (
            InMemoryIdentity::with_users(self.users),
            InMemoryCatalog::with_courses(self.courses),
        )
    }
}
