//! Engagement tracking. Recording is strictly fire-and-forget: a failed
//! write is logged and dropped so tracking can sit on hot paths without
//! ever becoming a failure source for the surrounding feature.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ActionKind, Module, ModuleEngagementEvent};
use crate::stores::{EngagementStore, PreferenceStore};

#[derive(Clone)]
pub struct EngagementTracker {
    events: Arc<dyn EngagementStore>,
    preferences: Arc<dyn PreferenceStore>,
}

impl EngagementTracker {
    pub fn new(events: Arc<dyn EngagementStore>, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self {
            events,
            preferences,
        }
    }

    /// Record one engagement action. Anonymous viewers are a no-op.
    /// Visits additionally refresh the member's last visited module.
    pub async fn track(&self, viewer: Option<Uuid>, module: Module, action: ActionKind) {
        let Some(user_id) = viewer else {
            return;
        };

        if let ActionKind::Other(label) = &action {
            debug_assert!(!label.is_empty(), "custom action label must not be empty");
        }

        let is_visit = action == ActionKind::Visit;
        let event = ModuleEngagementEvent {
            user_id,
            module,
            action: action.clone(),
            occurred_at: Utc::now(),
        };

        match self.events.append_event(event).await {
            Ok(()) => debug!(
                user_id = %user_id,
                module = %module,
                action = %action,
                "engagement tracked"
            ),
            Err(err) => warn!(
                user_id = %user_id,
                module = %module,
                action = %action,
                error = %err,
                "failed to record engagement event"
            ),
        }

        if is_visit {
            if let Err(err) = self.touch_last_visited(user_id, module).await {
                warn!(
                    user_id = %user_id,
                    module = %module,
                    error = %err,
                    "failed to update last visited module"
                );
            }
        }
    }

    async fn touch_last_visited(&self, user_id: Uuid, module: Module) -> Result<()> {
        let now = Utc::now();
        let mut preferences = self.preferences.get_or_init(user_id, now).await?;
        preferences.touch_last_visited(module, now);
        self.preferences.put(preferences).await
    }
}
