// ============================================
// Landing Route Resolution
// ============================================
//
// Decides where a member lands after sign-in or onboarding:
// 1. Primary role's home surface
// 2. Last visited module (home excluded)
// 3. Top engaged module (home excluded)
// 4. Generic home
//
// Resolution is read-only and bounded: any store failure or a missed
// deadline degrades to the generic home instead of blocking navigation.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::RoutingConfig;
use crate::error::Result;
use crate::models::{Module, RoleType};
use crate::services::engagement::EngagementAggregator;
use crate::services::roles::select_primary_role;
use crate::stores::{PreferenceStore, RoleStore};
use crate::utils::with_deadline;

pub const HOME_ROUTE: &str = "/home";

/// Home surface for a (module, role) pair. Pairs without a dedicated
/// surface, including mismatched ones, resolve to `None` and the caller
/// falls through to the next routing rule.
pub fn role_home_route(module: Module, role_type: RoleType) -> Option<&'static str> {
    match (module, role_type) {
        (Module::Jobs, RoleType::JobSeeker) => Some("/jobs"),
        (Module::Jobs, RoleType::Employer) => Some("/my-jobs"),
        (Module::AuPair, RoleType::AuPair) => Some("/au-pair/families"),
        (Module::AuPair, RoleType::HostFamily) => Some("/au-pair/browse"),
        (Module::Events, RoleType::Attendee) => Some("/events"),
        (Module::Events, RoleType::Organizer) => Some("/events/my-events"),
        (Module::Marketplace, RoleType::Buyer) => Some("/marketplace"),
        (Module::Marketplace, RoleType::Seller) => Some("/marketplace/my-listings"),
        (Module::Education, RoleType::Student) => Some("/education"),
        (Module::Education, RoleType::Educator) => Some("/education/my-programs"),
        (Module::Visa, RoleType::Applicant) => Some("/visa"),
        (Module::Visa, RoleType::Consultant) => Some("/visa/dashboard"),
        (Module::Community, RoleType::Member) => Some("/community"),
        (Module::Community, RoleType::Moderator) => Some("/admin/community"),
        _ => None,
    }
}

#[derive(Clone)]
pub struct RoutingResolver {
    roles: Arc<dyn RoleStore>,
    preferences: Arc<dyn PreferenceStore>,
    engagement: EngagementAggregator,
    config: RoutingConfig,
}

impl RoutingResolver {
    pub fn new(
        roles: Arc<dyn RoleStore>,
        preferences: Arc<dyn PreferenceStore>,
        engagement: EngagementAggregator,
        config: RoutingConfig,
    ) -> Self {
        Self {
            roles,
            preferences,
            engagement,
            config,
        }
    }

    /// Resolve the landing route for a viewer. Always yields a route;
    /// anonymous viewers and every failure mode get the generic home.
    pub async fn resolve_landing_route(&self, viewer: Option<Uuid>) -> String {
        let Some(user_id) = viewer else {
            return HOME_ROUTE.to_string();
        };

        match with_deadline(self.config.resolve_timeout(), self.resolve_for_member(user_id)).await
        {
            Ok(route) => {
                debug!(user_id = %user_id, route = %route, "resolved landing route");
                route
            }
            Err(err) => {
                warn!(
                    user_id = %user_id,
                    error = %err,
                    "landing route resolution degraded to generic home"
                );
                HOME_ROUTE.to_string()
            }
        }
    }

    async fn resolve_for_member(&self, user_id: Uuid) -> Result<String> {
        let held = self.roles.roles_for_user(user_id).await?;
        let scores = self.engagement.get_engagement(user_id).await?;

        if let Some(primary) = select_primary_role(&held, &scores) {
            if let Some(route) = role_home_route(primary.module, primary.role_type) {
                return Ok(route.to_string());
            }
            debug!(
                user_id = %user_id,
                module = %primary.module,
                role_type = %primary.role_type,
                "primary role has no landing surface"
            );
        }

        // Reads with get(), never get_or_init(): resolution must not write.
        if let Some(preferences) = self.preferences.get(user_id).await? {
            if let Some(module) = preferences.last_visited_module {
                if module != Module::Home {
                    return Ok(module.route().to_string());
                }
            }
        }

        // Only the top entry is considered; a home-topped profile means
        // the member mostly browses the landing surface anyway.
        if let Some(top) = scores.first() {
            if top.module != Module::Home {
                return Ok(top.module.route().to_string());
            }
        }

        Ok(HOME_ROUTE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleType;

    #[test]
    fn test_every_role_has_a_home_surface() {
        for role_type in RoleType::ALL {
            let route = role_home_route(role_type.module(), role_type);
            assert!(route.is_some(), "{role_type} is missing a landing surface");
        }
    }

    #[test]
    fn test_role_specific_surfaces() {
        assert_eq!(role_home_route(Module::Jobs, RoleType::Employer), Some("/my-jobs"));
        assert_eq!(
            role_home_route(Module::AuPair, RoleType::HostFamily),
            Some("/au-pair/browse")
        );
        assert_eq!(
            role_home_route(Module::AuPair, RoleType::AuPair),
            Some("/au-pair/families")
        );
        assert_eq!(
            role_home_route(Module::Community, RoleType::Moderator),
            Some("/admin/community")
        );
    }

    #[test]
    fn test_mismatched_pair_has_no_surface() {
        assert_eq!(role_home_route(Module::Jobs, RoleType::Seller), None);
        assert_eq!(role_home_route(Module::Home, RoleType::Member), None);
    }
}
