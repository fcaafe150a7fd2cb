use std::env;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PersonalizationConfig {
    pub engagement: EngagementConfig,
    pub recommendations: RecommendationConfig,
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngagementConfig {
    /// Events older than this no longer contribute to the score.
    pub lookback_days: i64,
    /// Half-life of the recency decay applied inside the lookback window.
    pub half_life_hours: f64,
    /// Raw weighted sum at which the score reaches 50 of 100.
    pub score_saturation: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    pub fetch_timeout_ms: u64,
    pub max_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    pub resolve_timeout_ms: u64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            half_life_hours: 168.0,
            score_saturation: 10.0,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 3000,
            max_limit: 50,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: 2000,
        }
    }
}

impl Default for PersonalizationConfig {
    fn default() -> Self {
        Self {
            engagement: EngagementConfig::default(),
            recommendations: RecommendationConfig::default(),
            routing: RoutingConfig::default(),
        }
    }
}

impl RecommendationConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl RoutingConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}

impl PersonalizationConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        PersonalizationConfig {
            engagement: EngagementConfig {
                lookback_days: env::var("ENGAGEMENT_LOOKBACK_DAYS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("ENGAGEMENT_LOOKBACK_DAYS must be a valid i64"),
                half_life_hours: env::var("ENGAGEMENT_HALF_LIFE_HOURS")
                    .unwrap_or_else(|_| "168".to_string())
                    .parse()
                    .expect("ENGAGEMENT_HALF_LIFE_HOURS must be a valid f64"),
                score_saturation: env::var("ENGAGEMENT_SCORE_SATURATION")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("ENGAGEMENT_SCORE_SATURATION must be a valid f64"),
            },
            recommendations: RecommendationConfig {
                fetch_timeout_ms: env::var("RECOMMENDATION_FETCH_TIMEOUT_MS")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .expect("RECOMMENDATION_FETCH_TIMEOUT_MS must be a valid u64"),
                max_limit: env::var("RECOMMENDATION_MAX_LIMIT")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()
                    .expect("RECOMMENDATION_MAX_LIMIT must be a valid usize"),
            },
            routing: RoutingConfig {
                resolve_timeout_ms: env::var("ROUTING_RESOLVE_TIMEOUT_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()
                    .expect("ROUTING_RESOLVE_TIMEOUT_MS must be a valid u64"),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.engagement.lookback_days <= 0 {
            return Err("lookback_days must be positive".to_string());
        }
        if self.engagement.half_life_hours <= 0.0 {
            return Err("half_life_hours must be positive".to_string());
        }
        if self.engagement.score_saturation <= 0.0 {
            return Err("score_saturation must be positive".to_string());
        }
        if self.recommendations.fetch_timeout_ms == 0 {
            return Err("fetch_timeout_ms must be positive".to_string());
        }
        if self.recommendations.max_limit == 0 {
            return Err("max_limit must be positive".to_string());
        }
        if self.routing.resolve_timeout_ms == 0 {
            return Err("resolve_timeout_ms must be positive".to_string());
        }
        Ok(())
    }
}
