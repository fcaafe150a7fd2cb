// ============================================
// Recommendation Gateway
// ============================================
//
// Thin dispatch layer in front of the per-module search collaborators.
// The gateway normalizes module-specific items into one lightweight
// card shape and contains collaborator failures: a category that errors
// or misses its deadline yields an empty list, never an error.
//
// No caching and no retries live here; callers decide how often to ask.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::RecommendationConfig;
use crate::error::Result;
use crate::models::Module;
use crate::utils::with_deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Jobs,
    Families,
    Events,
    Marketplace,
}

impl RecommendationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationCategory::Jobs => "jobs",
            RecommendationCategory::Families => "families",
            RecommendationCategory::Events => "events",
            RecommendationCategory::Marketplace => "marketplace",
        }
    }

    /// Category fed by a module's engagement, when one exists. Modules
    /// without a recommendation source resolve to `None`.
    pub fn for_module(module: Module) -> Option<RecommendationCategory> {
        match module {
            Module::Jobs => Some(RecommendationCategory::Jobs),
            Module::AuPair => Some(RecommendationCategory::Families),
            Module::Events => Some(RecommendationCategory::Events),
            Module::Marketplace => Some(RecommendationCategory::Marketplace),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized recommendation card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub category: RecommendationCategory,
}

impl Recommendation {
    /// Detail route for the recommended item.
    pub fn detail_route(&self) -> String {
        match self.category {
            RecommendationCategory::Jobs => format!("/jobs/{}", self.id),
            RecommendationCategory::Families => format!("/au-pair/families/{}", self.id),
            RecommendationCategory::Events => format!("/events/{}", self.id),
            RecommendationCategory::Marketplace => format!("/marketplace/{}", self.id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub location_city: String,
    pub job_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyProfile {
    pub id: Uuid,
    pub family_name: String,
    pub location: String,
    pub children_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityEvent {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceListing {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub category: String,
}

impl From<JobPosting> for Recommendation {
    fn from(job: JobPosting) -> Self {
        Recommendation {
            id: job.id,
            title: job.title,
            subtitle: format!("{}, {}", job.company_name, job.location_city),
            category: RecommendationCategory::Jobs,
        }
    }
}

impl From<FamilyProfile> for Recommendation {
    fn from(family: FamilyProfile) -> Self {
        Recommendation {
            id: family.id,
            title: family.family_name,
            subtitle: format!("{} ({} children)", family.location, family.children_count),
            category: RecommendationCategory::Families,
        }
    }
}

impl From<CommunityEvent> for Recommendation {
    fn from(event: CommunityEvent) -> Self {
        Recommendation {
            id: event.id,
            title: event.title,
            subtitle: format!("{} on {}", event.location, event.starts_at.format("%Y-%m-%d")),
            category: RecommendationCategory::Events,
        }
    }
}

impl From<MarketplaceListing> for Recommendation {
    fn from(listing: MarketplaceListing) -> Self {
        Recommendation {
            id: listing.id,
            title: listing.title,
            subtitle: format!("{} {:.2}", listing.currency, listing.price),
            category: RecommendationCategory::Marketplace,
        }
    }
}

#[async_trait]
pub trait JobSearch: Send + Sync {
    async fn search(&self, user_id: Uuid, limit: usize) -> anyhow::Result<Vec<JobPosting>>;
}

#[async_trait]
pub trait FamilySearch: Send + Sync {
    async fn search(&self, user_id: Uuid, limit: usize) -> anyhow::Result<Vec<FamilyProfile>>;
}

#[async_trait]
pub trait EventSearch: Send + Sync {
    async fn search(&self, user_id: Uuid, limit: usize) -> anyhow::Result<Vec<CommunityEvent>>;
}

#[async_trait]
pub trait ListingSearch: Send + Sync {
    async fn search(&self, user_id: Uuid, limit: usize) -> anyhow::Result<Vec<MarketplaceListing>>;
}

/// The four per-category search backends the gateway dispatches to.
#[derive(Clone)]
pub struct SearchCollaborators {
    pub jobs: Arc<dyn JobSearch>,
    pub families: Arc<dyn FamilySearch>,
    pub events: Arc<dyn EventSearch>,
    pub marketplace: Arc<dyn ListingSearch>,
}

/// One home-surface section of recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSection {
    pub category: RecommendationCategory,
    pub items: Vec<Recommendation>,
}

#[derive(Clone)]
pub struct RecommendationGateway {
    search: SearchCollaborators,
    config: RecommendationConfig,
}

impl RecommendationGateway {
    pub fn new(search: SearchCollaborators, config: RecommendationConfig) -> Self {
        Self { search, config }
    }

    /// Fetch up to `limit` recommendations for one category. Anonymous
    /// viewers, a zero limit, collaborator failures and missed deadlines
    /// all yield an empty list.
    pub async fn get_recommendations(
        &self,
        viewer: Option<Uuid>,
        category: RecommendationCategory,
        limit: usize,
    ) -> Vec<Recommendation> {
        let Some(user_id) = viewer else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }
        let limit = limit.min(self.config.max_limit);

        match with_deadline(self.config.fetch_timeout(), self.fetch(user_id, category, limit))
            .await
        {
            Ok(mut items) => {
                // Collaborators may ignore the limit hint.
                items.truncate(limit);
                debug!(
                    user_id = %user_id,
                    category = %category,
                    count = items.len(),
                    "fetched recommendations"
                );
                items
            }
            Err(err) => {
                warn!(
                    user_id = %user_id,
                    category = %category,
                    error = %err,
                    "recommendation fetch degraded to empty"
                );
                Vec::new()
            }
        }
    }

    /// Fetch several categories concurrently. Each section stands on its
    /// own: one failing category never empties its neighbors. Duplicate
    /// categories collapse into the first occurrence.
    pub async fn get_recommendation_sections(
        &self,
        viewer: Option<Uuid>,
        categories: &[RecommendationCategory],
        limit_per_category: usize,
    ) -> Vec<RecommendationSection> {
        if viewer.is_none() {
            return Vec::new();
        }

        let mut unique: Vec<RecommendationCategory> = Vec::new();
        for category in categories {
            if !unique.contains(category) {
                unique.push(*category);
            }
        }

        let fetches = unique.into_iter().map(|category| async move {
            RecommendationSection {
                category,
                items: self
                    .get_recommendations(viewer, category, limit_per_category)
                    .await,
            }
        });

        join_all(fetches).await
    }

    async fn fetch(
        &self,
        user_id: Uuid,
        category: RecommendationCategory,
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        let items = match category {
            RecommendationCategory::Jobs => self
                .search
                .jobs
                .search(user_id, limit)
                .await?
                .into_iter()
                .map(Recommendation::from)
                .collect(),
            RecommendationCategory::Families => self
                .search
                .families
                .search(user_id, limit)
                .await?
                .into_iter()
                .map(Recommendation::from)
                .collect(),
            RecommendationCategory::Events => self
                .search
                .events
                .search(user_id, limit)
                .await?
                .into_iter()
                .map(Recommendation::from)
                .collect(),
            RecommendationCategory::Marketplace => self
                .search
                .marketplace
                .search(user_id, limit)
                .await?
                .into_iter()
                .map(Recommendation::from)
                .collect(),
        };
        Ok(items)
    }
}
