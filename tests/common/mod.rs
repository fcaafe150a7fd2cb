#![allow(dead_code)]

// Shared fixtures for the integration tests: stubbed search backends
// with scriptable behavior, plus failing and slow store doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use personalization_service::{
    ActionKind, AppError, CommunityEvent, EngagementStore, EventSearch, FamilyProfile,
    FamilySearch, JobPosting, JobSearch, ListingSearch, MarketplaceListing, Module,
    ModuleEngagementEvent, ModuleRole, Personalization, PersonalizationConfig,
    PersonalizationPreferences, PersonalizationStores, PreferenceStore, Result, RoleStore,
    SearchCollaborators,
};

/// How a stubbed search backend behaves.
#[derive(Clone)]
pub enum Behavior {
    /// Return this many items.
    Items(usize),
    /// Fail with an error.
    Fail,
    /// Sleep, then return this many items.
    Slow(Duration, usize),
}

async fn run(behavior: &Behavior) -> anyhow::Result<usize> {
    match behavior {
        Behavior::Items(count) => Ok(*count),
        Behavior::Fail => anyhow::bail!("search backend unavailable"),
        Behavior::Slow(delay, count) => {
            tokio::time::sleep(*delay).await;
            Ok(*count)
        }
    }
}

pub struct JobsStub {
    behavior: Behavior,
    pub calls: AtomicUsize,
}

#[async_trait]
impl JobSearch for JobsStub {
    async fn search(&self, _user_id: Uuid, _limit: usize) -> anyhow::Result<Vec<JobPosting>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let count = run(&self.behavior).await?;
        Ok((0..count)
            .map(|i| JobPosting {
                id: Uuid::new_v4(),
                title: format!("Job {i}"),
                company_name: "North Shore Cafe".to_string(),
                location_city: "Toronto".to_string(),
                job_type: "full_time".to_string(),
            })
            .collect())
    }
}

pub struct FamiliesStub {
    behavior: Behavior,
    pub calls: AtomicUsize,
}

#[async_trait]
impl FamilySearch for FamiliesStub {
    async fn search(&self, _user_id: Uuid, _limit: usize) -> anyhow::Result<Vec<FamilyProfile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let count = run(&self.behavior).await?;
        Ok((0..count)
            .map(|i| FamilyProfile {
                id: Uuid::new_v4(),
                family_name: format!("Family {i}"),
                location: "North York".to_string(),
                children_count: 2,
            })
            .collect())
    }
}

pub struct EventsStub {
    behavior: Behavior,
    pub calls: AtomicUsize,
}

#[async_trait]
impl EventSearch for EventsStub {
    async fn search(&self, _user_id: Uuid, _limit: usize) -> anyhow::Result<Vec<CommunityEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let count = run(&self.behavior).await?;
        Ok((0..count)
            .map(|i| CommunityEvent {
                id: Uuid::new_v4(),
                title: format!("Event {i}"),
                location: "Community Hall".to_string(),
                starts_at: Utc::now() + chrono::Duration::days(7),
            })
            .collect())
    }
}

pub struct ListingsStub {
    behavior: Behavior,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ListingSearch for ListingsStub {
    async fn search(
        &self,
        _user_id: Uuid,
        _limit: usize,
    ) -> anyhow::Result<Vec<MarketplaceListing>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let count = run(&self.behavior).await?;
        Ok((0..count)
            .map(|i| MarketplaceListing {
                id: Uuid::new_v4(),
                title: format!("Listing {i}"),
                price: 25.0 + i as f64,
                currency: "CAD".to_string(),
                category: "household".to_string(),
            })
            .collect())
    }
}

/// The four stubs kept addressable so tests can assert call counts.
pub struct StubbedSearch {
    pub jobs: Arc<JobsStub>,
    pub families: Arc<FamiliesStub>,
    pub events: Arc<EventsStub>,
    pub marketplace: Arc<ListingsStub>,
}

impl StubbedSearch {
    pub fn new(jobs: Behavior, families: Behavior, events: Behavior, marketplace: Behavior) -> Self {
        Self {
            jobs: Arc::new(JobsStub {
                behavior: jobs,
                calls: AtomicUsize::new(0),
            }),
            families: Arc::new(FamiliesStub {
                behavior: families,
                calls: AtomicUsize::new(0),
            }),
            events: Arc::new(EventsStub {
                behavior: events,
                calls: AtomicUsize::new(0),
            }),
            marketplace: Arc::new(ListingsStub {
                behavior: marketplace,
                calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn plenty() -> Self {
        Self::new(
            Behavior::Items(10),
            Behavior::Items(10),
            Behavior::Items(10),
            Behavior::Items(10),
        )
    }

    pub fn collaborators(&self) -> SearchCollaborators {
        SearchCollaborators {
            jobs: self.jobs.clone(),
            families: self.families.clone(),
            events: self.events.clone(),
            marketplace: self.marketplace.clone(),
        }
    }
}

pub fn service_with(
    stores: &PersonalizationStores,
    search: &StubbedSearch,
    config: PersonalizationConfig,
) -> Personalization {
    Personalization::new(stores.clone(), search.collaborators(), config)
}

pub fn default_service(stores: &PersonalizationStores) -> Personalization {
    service_with(stores, &StubbedSearch::plenty(), PersonalizationConfig::default())
}

pub async fn seed_event(
    stores: &PersonalizationStores,
    user_id: Uuid,
    module: Module,
    action: ActionKind,
    occurred_at: DateTime<Utc>,
) {
    stores
        .engagement
        .append_event(ModuleEngagementEvent {
            user_id,
            module,
            action,
            occurred_at,
        })
        .await
        .unwrap();
}

/// Store double where every operation fails.
pub struct FailingStores;

#[async_trait]
impl EngagementStore for FailingStores {
    async fn append_event(&self, _event: ModuleEngagementEvent) -> Result<()> {
        Err(AppError::Store("engagement store down".to_string()))
    }

    async fn events_for_user(&self, _user_id: Uuid) -> Result<Vec<ModuleEngagementEvent>> {
        Err(AppError::Store("engagement store down".to_string()))
    }
}

#[async_trait]
impl PreferenceStore for FailingStores {
    async fn get(&self, _user_id: Uuid) -> Result<Option<PersonalizationPreferences>> {
        Err(AppError::Store("preference store down".to_string()))
    }

    async fn put(&self, _preferences: PersonalizationPreferences) -> Result<()> {
        Err(AppError::Store("preference store down".to_string()))
    }
}

#[async_trait]
impl RoleStore for FailingStores {
    async fn roles_for_user(&self, _user_id: Uuid) -> Result<Vec<ModuleRole>> {
        Err(AppError::Store("role store down".to_string()))
    }

    async fn upsert_role(&self, _user_id: Uuid, _role: ModuleRole) -> Result<()> {
        Err(AppError::Store("role store down".to_string()))
    }

    async fn clear_role(&self, _user_id: Uuid, _module: Module) -> Result<()> {
        Err(AppError::Store("role store down".to_string()))
    }
}

pub fn failing_stores() -> PersonalizationStores {
    PersonalizationStores {
        engagement: Arc::new(FailingStores),
        preferences: Arc::new(FailingStores),
        roles: Arc::new(FailingStores),
    }
}

/// Store double where every read sleeps first, for deadline tests.
pub struct SlowStores {
    pub delay: Duration,
}

#[async_trait]
impl EngagementStore for SlowStores {
    async fn append_event(&self, _event: ModuleEngagementEvent) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn events_for_user(&self, _user_id: Uuid) -> Result<Vec<ModuleEngagementEvent>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

#[async_trait]
impl PreferenceStore for SlowStores {
    async fn get(&self, _user_id: Uuid) -> Result<Option<PersonalizationPreferences>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn put(&self, _preferences: PersonalizationPreferences) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[async_trait]
impl RoleStore for SlowStores {
    async fn roles_for_user(&self, _user_id: Uuid) -> Result<Vec<ModuleRole>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn upsert_role(&self, _user_id: Uuid, _role: ModuleRole) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn clear_role(&self, _user_id: Uuid, _module: Module) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

pub fn slow_stores(delay: Duration) -> PersonalizationStores {
    PersonalizationStores {
        engagement: Arc::new(SlowStores { delay }),
        preferences: Arc::new(SlowStores { delay }),
        roles: Arc::new(SlowStores { delay }),
    }
}
