use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Module, ModuleEngagementEvent, ModuleRole, PersonalizationPreferences};

mod memory;

pub use memory::{InMemoryEngagementStore, InMemoryPreferenceStore, InMemoryRoleStore};

/// Append-only log of engagement events.
#[async_trait]
pub trait EngagementStore: Send + Sync {
    async fn append_event(&self, event: ModuleEngagementEvent) -> Result<()>;

    /// Full event log for a member, oldest first.
    async fn events_for_user(&self, user_id: Uuid) -> Result<Vec<ModuleEngagementEvent>>;
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<PersonalizationPreferences>>;

    async fn put(&self, preferences: PersonalizationPreferences) -> Result<()>;

    /// Read preferences, creating and persisting defaults on first access.
    async fn get_or_init(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PersonalizationPreferences> {
        match self.get(user_id).await? {
            Some(preferences) => Ok(preferences),
            None => {
                let preferences = PersonalizationPreferences::new(user_id, now);
                self.put(preferences.clone()).await?;
                Ok(preferences)
            }
        }
    }
}

/// Module roles held by members. A member holds at most one role per
/// module; `upsert_role` replaces any existing role in the same module.
/// Role selection flows are the only writers; the engine itself only
/// reads roles.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<ModuleRole>>;

    async fn upsert_role(&self, user_id: Uuid, role: ModuleRole) -> Result<()>;

    async fn clear_role(&self, user_id: Uuid, module: Module) -> Result<()>;
}

/// The three persistence seams bundled for construction.
#[derive(Clone)]
pub struct PersonalizationStores {
    pub engagement: Arc<dyn EngagementStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub roles: Arc<dyn RoleStore>,
}

impl PersonalizationStores {
    /// Fresh in-memory stores, mainly for tests and session-local use.
    pub fn in_memory() -> Self {
        Self {
            engagement: Arc::new(InMemoryEngagementStore::new()),
            preferences: Arc::new(InMemoryPreferenceStore::new()),
            roles: Arc::new(InMemoryRoleStore::new()),
        }
    }
}
