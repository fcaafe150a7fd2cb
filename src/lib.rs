//! Engagement-driven personalization for the community platform.
//!
//! The crate turns a per-member engagement log into ranked module
//! scores, infers the member's primary role, resolves the post-login
//! landing route and fronts the per-module recommendation backends
//! behind one normalized card shape.
//!
//! All state sits behind store traits; a [`Personalization`] instance
//! owns nothing global. Reads degrade to neutral defaults (empty lists,
//! `None`, the generic home route) so callers never have to handle a
//! personalization failure.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

pub use config::{EngagementConfig, PersonalizationConfig, RecommendationConfig, RoutingConfig};
pub use error::{AppError, Result};
pub use models::{
    ActionKind, DigestFrequency, Module, ModuleEngagementEvent, ModuleEngagementScore, ModuleRole,
    PersonalizationPreferences, PreferencesUpdate, RoleType,
};
pub use services::engagement::{EngagementAggregator, EngagementScorer};
pub use services::personalization::Personalization;
pub use services::recommendations::{
    CommunityEvent, EventSearch, FamilyProfile, FamilySearch, JobPosting, JobSearch,
    ListingSearch, MarketplaceListing, Recommendation, RecommendationCategory,
    RecommendationGateway, RecommendationSection, SearchCollaborators,
};
pub use services::roles::{select_primary_role, RoleInferenceEngine};
pub use services::routing::{role_home_route, RoutingResolver, HOME_ROUTE};
pub use services::tracker::EngagementTracker;
pub use stores::{
    EngagementStore, InMemoryEngagementStore, InMemoryPreferenceStore, InMemoryRoleStore,
    PersonalizationStores, PreferenceStore, RoleStore,
};
