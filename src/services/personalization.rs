//! The personalization facade. One explicitly constructed instance wires
//! the tracker, aggregator, role inference, routing resolver and the
//! recommendation gateway over shared store handles.
//!
//! Every entry point takes `viewer: Option<Uuid>`; `None` means an
//! anonymous session, for which the engine stays inert. Read operations
//! degrade (empty, `None`, `/home`) instead of surfacing errors, so the
//! rendering layer never has a personalization failure to handle.

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::PersonalizationConfig;
use crate::error::Result;
use crate::models::{
    ActionKind, Module, ModuleEngagementScore, ModuleRole, PersonalizationPreferences,
    PreferencesUpdate, RoleType,
};
use crate::services::engagement::EngagementAggregator;
use crate::services::recommendations::{
    Recommendation, RecommendationCategory, RecommendationGateway, RecommendationSection,
    SearchCollaborators,
};
use crate::services::roles::RoleInferenceEngine;
use crate::services::routing::RoutingResolver;
use crate::services::tracker::EngagementTracker;
use crate::stores::{PersonalizationStores, PreferenceStore, RoleStore};

use std::sync::Arc;

#[derive(Clone)]
pub struct Personalization {
    tracker: EngagementTracker,
    engagement: EngagementAggregator,
    inference: RoleInferenceEngine,
    resolver: RoutingResolver,
    gateway: RecommendationGateway,
    preference_store: Arc<dyn PreferenceStore>,
    role_store: Arc<dyn RoleStore>,
}

impl Personalization {
    pub fn new(
        stores: PersonalizationStores,
        search: SearchCollaborators,
        config: PersonalizationConfig,
    ) -> Self {
        let aggregator =
            EngagementAggregator::new(stores.engagement.clone(), config.engagement.clone());

        Self {
            tracker: EngagementTracker::new(stores.engagement.clone(), stores.preferences.clone()),
            inference: RoleInferenceEngine::new(stores.roles.clone(), aggregator.clone()),
            resolver: RoutingResolver::new(
                stores.roles.clone(),
                stores.preferences.clone(),
                aggregator.clone(),
                config.routing,
            ),
            gateway: RecommendationGateway::new(search, config.recommendations),
            engagement: aggregator,
            preference_store: stores.preferences,
            role_store: stores.roles,
        }
    }

    /// Record an engagement action. Never fails; see [`EngagementTracker`].
    pub async fn track(&self, viewer: Option<Uuid>, module: Module, action: ActionKind) {
        self.tracker.track(viewer, module, action).await
    }

    /// Ranked per-module engagement. Anonymous viewers and store failures
    /// read as no engagement.
    pub async fn get_engagement(&self, viewer: Option<Uuid>) -> Vec<ModuleEngagementScore> {
        let Some(user_id) = viewer else {
            return Vec::new();
        };
        match self.engagement.get_engagement(user_id).await {
            Ok(scores) => scores,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "engagement read degraded to empty");
                Vec::new()
            }
        }
    }

    /// The viewer's primary role, or `None` without roles (or on failure).
    pub async fn get_primary_role(&self, viewer: Option<Uuid>) -> Option<ModuleRole> {
        let user_id = viewer?;
        match self.inference.get_primary_role(user_id).await {
            Ok(role) => role,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "primary role read degraded to none");
                None
            }
        }
    }

    /// Landing route for the viewer. Always yields a route.
    pub async fn resolve_landing_route(&self, viewer: Option<Uuid>) -> String {
        self.resolver.resolve_landing_route(viewer).await
    }

    /// Up to `limit` recommendations in one category.
    pub async fn get_recommendations(
        &self,
        viewer: Option<Uuid>,
        category: RecommendationCategory,
        limit: usize,
    ) -> Vec<Recommendation> {
        self.gateway.get_recommendations(viewer, category, limit).await
    }

    /// Concurrent multi-category fetch; see [`RecommendationGateway`].
    pub async fn get_recommendation_sections(
        &self,
        viewer: Option<Uuid>,
        categories: &[RecommendationCategory],
        limit_per_category: usize,
    ) -> Vec<RecommendationSection> {
        self.gateway
            .get_recommendation_sections(viewer, categories, limit_per_category)
            .await
    }

    /// Home-page recommendations: empty unless the member keeps
    /// recommendations enabled, holds a primary role, and that role's
    /// module has a recommendation category.
    pub async fn home_recommendations(
        &self,
        viewer: Option<Uuid>,
        limit: usize,
    ) -> Vec<Recommendation> {
        let Some(user_id) = viewer else {
            return Vec::new();
        };

        let Some(preferences) = self.preferences(Some(user_id)).await else {
            return Vec::new();
        };
        if !preferences.show_recommendations {
            return Vec::new();
        }

        let Some(primary) = self.get_primary_role(Some(user_id)).await else {
            return Vec::new();
        };
        let Some(category) = RecommendationCategory::for_module(primary.module) else {
            debug!(
                user_id = %user_id,
                module = %primary.module,
                "primary module has no recommendation surface"
            );
            return Vec::new();
        };

        self.get_recommendations(Some(user_id), category, limit).await
    }

    /// Read preferences, creating defaults on first read. Anonymous
    /// viewers and store failures read as `None`.
    pub async fn preferences(&self, viewer: Option<Uuid>) -> Option<PersonalizationPreferences> {
        let user_id = viewer?;
        match self.preference_store.get_or_init(user_id, Utc::now()).await {
            Ok(preferences) => Some(preferences),
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "preferences read degraded to none");
                None
            }
        }
    }

    /// Apply a partial preferences update. Returns whether it persisted.
    pub async fn update_preferences(
        &self,
        viewer: Option<Uuid>,
        update: PreferencesUpdate,
    ) -> bool {
        let Some(user_id) = viewer else {
            return false;
        };
        match self.apply_preferences_update(user_id, update).await {
            Ok(()) => true,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "preferences update failed");
                false
            }
        }
    }

    /// Add a favorite module. Idempotent: adding an existing favorite
    /// succeeds without a write.
    pub async fn add_favorite_module(&self, viewer: Option<Uuid>, module: Module) -> bool {
        self.edit_favorites(viewer, module, true).await
    }

    /// Remove a favorite module. Idempotent like [`Self::add_favorite_module`].
    pub async fn remove_favorite_module(&self, viewer: Option<Uuid>, module: Module) -> bool {
        self.edit_favorites(viewer, module, false).await
    }

    /// Held roles, most recently activated first. Degrades to empty.
    pub async fn roles(&self, viewer: Option<Uuid>) -> Vec<ModuleRole> {
        let Some(user_id) = viewer else {
            return Vec::new();
        };
        match self.role_store.roles_for_user(user_id).await {
            Ok(mut roles) => {
                roles.sort_by(|a, b| b.activated_at.cmp(&a.activated_at));
                roles
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "roles read degraded to empty");
                Vec::new()
            }
        }
    }

    /// Whether the viewer holds any of the required (module, role) pairs.
    /// An empty requirement list never matches.
    pub async fn has_any_role(
        &self,
        viewer: Option<Uuid>,
        required: &[(Module, RoleType)],
    ) -> bool {
        let held = self.roles(viewer).await;
        required.iter().any(|(module, role_type)| {
            held.iter()
                .any(|role| role.module == *module && role.role_type == *role_type)
        })
    }

    async fn apply_preferences_update(
        &self,
        user_id: Uuid,
        update: PreferencesUpdate,
    ) -> Result<()> {
        let now = Utc::now();
        let mut preferences = self.preference_store.get_or_init(user_id, now).await?;
        preferences.apply(update, now);
        self.preference_store.put(preferences).await
    }

    async fn edit_favorites(&self, viewer: Option<Uuid>, module: Module, add: bool) -> bool {
        let Some(user_id) = viewer else {
            return false;
        };
        let now = Utc::now();

        let result: Result<()> = async {
            let mut preferences = self.preference_store.get_or_init(user_id, now).await?;
            let changed = if add {
                preferences.add_favorite(module, now)
            } else {
                preferences.remove_favorite(module, now)
            };
            if changed {
                self.preference_store.put(preferences).await?;
            }
            Ok(())
        }
        .await;

        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    user_id = %user_id,
                    module = %module,
                    error = %err,
                    "favorites update failed"
                );
                false
            }
        }
    }
}
