// ============================================
// Engagement Aggregator
// ============================================
//
// Aggregates the append-only engagement log into per-module scores
// with time decay.
//
// Scoring formula (per module):
// raw = SUM(action_weight * 0.5^(age_hours / half_life_hours))
//   over events inside the lookback window
// engagement_score = 100 * raw / (raw + score_saturation)
//
// actions_count and last_engaged_at cover the full lifetime log, so a
// module a member was once active in keeps its history even after the
// score has decayed to zero.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::config::EngagementConfig;
use crate::error::Result;
use crate::models::{Module, ModuleEngagementEvent, ModuleEngagementScore};
use crate::stores::EngagementStore;
use crate::utils::{exponential_decay, saturating_score};

/// Pure scorer: turns an event log into ranked per-module scores.
#[derive(Debug, Clone)]
pub struct EngagementScorer {
    config: EngagementConfig,
}

impl EngagementScorer {
    pub fn new(config: EngagementConfig) -> Self {
        Self { config }
    }

    /// Score a member's event log as of `now`.
    ///
    /// 1. Group events by module
    /// 2. Decay each event inside the lookback window
    /// 3. Saturate the weighted sum onto [0, 100]
    /// 4. Order by score, then recency, then module name
    ///
    /// Modules without any events never appear in the output.
    pub fn score_events(
        &self,
        events: &[ModuleEngagementEvent],
        now: DateTime<Utc>,
    ) -> Vec<ModuleEngagementScore> {
        if events.is_empty() {
            return Vec::new();
        }

        let lookback_hours = self.config.lookback_days as f64 * 24.0;
        let mut per_module: HashMap<Module, (f64, u64, DateTime<Utc>)> = HashMap::new();

        for event in events {
            let entry = per_module
                .entry(event.module)
                .or_insert((0.0, 0, event.occurred_at));

            entry.1 += 1;
            if event.occurred_at > entry.2 {
                entry.2 = event.occurred_at;
            }

            // Future timestamps (clock skew) count as age zero.
            let age_hours = ((now - event.occurred_at).num_seconds() as f64 / 3600.0).max(0.0);
            if age_hours > lookback_hours {
                continue;
            }
            entry.0 +=
                event.action.weight() * exponential_decay(age_hours, self.config.half_life_hours);
        }

        let mut scores: Vec<ModuleEngagementScore> = per_module
            .into_iter()
            .map(
                |(module, (weighted, actions_count, last_engaged_at))| ModuleEngagementScore {
                    module,
                    engagement_score: saturating_score(weighted, self.config.score_saturation),
                    actions_count,
                    last_engaged_at,
                },
            )
            .collect();

        scores.sort_by(|a, b| {
            b.engagement_score
                .partial_cmp(&a.engagement_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.last_engaged_at.cmp(&a.last_engaged_at))
                .then_with(|| a.module.as_str().cmp(b.module.as_str()))
        });

        scores
    }
}

/// Reads the engagement log and exposes ranked module scores. Scores are
/// recomputed from the log on every read; nothing is cached.
#[derive(Clone)]
pub struct EngagementAggregator {
    store: Arc<dyn EngagementStore>,
    scorer: EngagementScorer,
}

impl EngagementAggregator {
    pub fn new(store: Arc<dyn EngagementStore>, config: EngagementConfig) -> Self {
        Self {
            store,
            scorer: EngagementScorer::new(config),
        }
    }

    pub async fn get_engagement(&self, user_id: Uuid) -> Result<Vec<ModuleEngagementScore>> {
        self.get_engagement_at(user_id, Utc::now()).await
    }

    /// Deterministic variant for callers that fix the clock.
    pub async fn get_engagement_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<ModuleEngagementScore>> {
        let events = self.store.events_for_user(user_id).await?;
        let scores = self.scorer.score_events(&events, now);
        debug!(
            user_id = %user_id,
            module_count = scores.len(),
            "aggregated module engagement"
        );
        Ok(scores)
    }
}
