//! Primary-role inference. A member may hold one role per module; the
//! primary role is the held role whose module the member engages with
//! most, so navigation and defaults can follow actual behavior instead
//! of onboarding order.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Module, ModuleEngagementScore, ModuleRole};
use crate::services::engagement::EngagementAggregator;
use crate::stores::RoleStore;

/// Pick the primary role among held roles given current engagement.
///
/// Roles are ranked by their module's engagement score; modules absent
/// from `scores` rank as zero, which keeps freshly activated roles
/// eligible but below anything the member actually uses. Ties go to the
/// most recently activated role, then to role name for determinism.
pub fn select_primary_role(
    roles: &[ModuleRole],
    scores: &[ModuleEngagementScore],
) -> Option<ModuleRole> {
    let score_of = |module: Module| -> f64 {
        scores
            .iter()
            .find(|s| s.module == module)
            .map(|s| s.engagement_score)
            .unwrap_or(0.0)
    };

    roles.iter().copied().max_by(|a, b| {
        score_of(a.module)
            .partial_cmp(&score_of(b.module))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.activated_at.cmp(&b.activated_at))
            .then_with(|| b.role_type.as_str().cmp(a.role_type.as_str()))
    })
}

#[derive(Clone)]
pub struct RoleInferenceEngine {
    roles: Arc<dyn RoleStore>,
    engagement: EngagementAggregator,
}

impl RoleInferenceEngine {
    pub fn new(roles: Arc<dyn RoleStore>, engagement: EngagementAggregator) -> Self {
        Self { roles, engagement }
    }

    /// The member's primary role, or `None` when no roles are held.
    pub async fn get_primary_role(&self, user_id: Uuid) -> Result<Option<ModuleRole>> {
        let held = self.roles.roles_for_user(user_id).await?;
        if held.is_empty() {
            return Ok(None);
        }

        let scores = self.engagement.get_engagement(user_id).await?;
        let primary = select_primary_role(&held, &scores);

        if let Some(role) = primary {
            debug!(
                user_id = %user_id,
                module = %role.module,
                role_type = %role.role_type,
                "selected primary role"
            );
        }
        Ok(primary)
    }
}
