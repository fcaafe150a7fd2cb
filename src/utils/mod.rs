// Utility functions for personalization-service

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::error::{AppError, Result};

/// Compute exponential decay for time-based scoring
pub fn exponential_decay(age_hours: f64, half_life_hours: f64) -> f64 {
    (-std::f64::consts::LN_2 * age_hours / half_life_hours).exp()
}

/// Map a raw weighted sum onto [0, 100] with diminishing returns.
/// `saturation` is the raw weight at which the score reaches 50.
pub fn saturating_score(weighted: f64, saturation: f64) -> f64 {
    if weighted <= 0.0 {
        return 0.0;
    }
    100.0 * weighted / (weighted + saturation)
}

/// Execute a fallible future under a deadline
pub async fn with_deadline<F, T>(deadline: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(deadline, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(deadline)),
    }
}
