use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Module, ModuleEngagementEvent, ModuleRole, PersonalizationPreferences};

use super::{EngagementStore, PreferenceStore, RoleStore};

/// In-memory engagement log keyed by member. Events are kept in append
/// order, which doubles as chronological order for a single writer.
#[derive(Debug, Default)]
pub struct InMemoryEngagementStore {
    events: DashMap<Uuid, Vec<ModuleEngagementEvent>>,
}

impl InMemoryEngagementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EngagementStore for InMemoryEngagementStore {
    async fn append_event(&self, event: ModuleEngagementEvent) -> Result<()> {
        self.events.entry(event.user_id).or_default().push(event);
        Ok(())
    }

    async fn events_for_user(&self, user_id: Uuid) -> Result<Vec<ModuleEngagementEvent>> {
        Ok(self
            .events
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    preferences: DashMap<Uuid, PersonalizationPreferences>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<PersonalizationPreferences>> {
        Ok(self.preferences.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, preferences: PersonalizationPreferences) -> Result<()> {
        self.preferences.insert(preferences.user_id, preferences);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    roles: DashMap<Uuid, Vec<ModuleRole>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<ModuleRole>> {
        Ok(self
            .roles
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn upsert_role(&self, user_id: Uuid, role: ModuleRole) -> Result<()> {
        let mut roles = self.roles.entry(user_id).or_default();
        roles.retain(|held| held.module != role.module);
        roles.push(role);
        Ok(())
    }

    async fn clear_role(&self, user_id: Uuid, module: Module) -> Result<()> {
        if let Some(mut roles) = self.roles.get_mut(&user_id) {
            roles.retain(|held| held.module != module);
        }
        Ok(())
    }
}
