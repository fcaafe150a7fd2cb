//! Integration tests: engagement tracking and aggregation
//!
//! Coverage:
//! - Tracked actions surface as ordered per-module scores with lifetime
//!   counts; untouched modules stay absent
//! - Recency outweighs stale high-intent activity across modules
//! - Events outside the scoring window still count toward history
//! - Primary-role inference follows engagement through the facade
//! - Logs are isolated per member and tracking never fails

mod common;

use chrono::{Duration, Utc};
use common::{default_service, failing_stores, seed_event, service_with, StubbedSearch};
use personalization_service::{
    ActionKind, Module, ModuleRole, PersonalizationConfig, PersonalizationStores, PreferenceStore,
    RoleStore, RoleType,
};
use uuid::Uuid;

#[tokio::test]
async fn test_tracked_actions_rank_modules() {
    let stores = PersonalizationStores::in_memory();
    let service = default_service(&stores);
    let user_id = Uuid::new_v4();

    for _ in 0..3 {
        service.track(Some(user_id), Module::Jobs, ActionKind::Visit).await;
    }
    service.track(Some(user_id), Module::Jobs, ActionKind::Save).await;
    service.track(Some(user_id), Module::Events, ActionKind::Visit).await;

    let scores = service.get_engagement(Some(user_id)).await;
    assert_eq!(scores.len(), 2, "marketplace and the rest stay absent");

    assert_eq!(scores[0].module, Module::Jobs);
    assert_eq!(scores[0].actions_count, 4);
    assert_eq!(scores[1].module, Module::Events);
    assert_eq!(scores[1].actions_count, 1);
    assert!(scores[0].engagement_score > scores[1].engagement_score);
    assert!(scores[0].engagement_score <= 100.0);
}

#[tokio::test]
async fn test_recent_activity_outranks_stale_intent() {
    let stores = PersonalizationStores::in_memory();
    let service = default_service(&stores);
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    // A high-intent apply from 25 days ago decays well below a visit
    // from just now (3.0 * 0.5^(600/168) < 1.0).
    seed_event(
        &stores,
        user_id,
        Module::Jobs,
        ActionKind::Apply,
        now - Duration::days(25),
    )
    .await;
    seed_event(&stores, user_id, Module::Events, ActionKind::Visit, now).await;

    let scores = service.get_engagement(Some(user_id)).await;
    assert_eq!(scores[0].module, Module::Events);
    assert_eq!(scores[1].module, Module::Jobs);
    assert!(scores[1].engagement_score > 0.0, "still inside the window");
}

#[tokio::test]
async fn test_window_expiry_keeps_lifetime_history() {
    let stores = PersonalizationStores::in_memory();
    let service = default_service(&stores);
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    seed_event(
        &stores,
        user_id,
        Module::Marketplace,
        ActionKind::Save,
        now - Duration::days(40),
    )
    .await;
    seed_event(
        &stores,
        user_id,
        Module::Marketplace,
        ActionKind::Save,
        now - Duration::days(41),
    )
    .await;
    seed_event(&stores, user_id, Module::Education, ActionKind::Visit, now).await;

    let scores = service.get_engagement(Some(user_id)).await;
    assert_eq!(scores[0].module, Module::Education);

    let marketplace = scores.iter().find(|s| s.module == Module::Marketplace).unwrap();
    assert_eq!(marketplace.engagement_score, 0.0);
    assert_eq!(marketplace.actions_count, 2);
    assert_eq!(marketplace.last_engaged_at, now - Duration::days(40));
}

#[tokio::test]
async fn test_primary_role_tracks_behavior() {
    let stores = PersonalizationStores::in_memory();
    let service = default_service(&stores);
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    stores
        .roles
        .upsert_role(user_id, ModuleRole::new(RoleType::JobSeeker, now - Duration::days(20)))
        .await
        .unwrap();
    stores
        .roles
        .upsert_role(user_id, ModuleRole::new(RoleType::Attendee, now))
        .await
        .unwrap();

    // No engagement yet: the most recently activated role leads.
    let primary = service.get_primary_role(Some(user_id)).await.unwrap();
    assert_eq!(primary.role_type, RoleType::Attendee);

    for _ in 0..5 {
        service.track(Some(user_id), Module::Jobs, ActionKind::Apply).await;
    }

    let primary = service.get_primary_role(Some(user_id)).await.unwrap();
    assert_eq!(primary.role_type, RoleType::JobSeeker);
    assert_eq!(primary.module, Module::Jobs);
}

#[tokio::test]
async fn test_engagement_logs_are_per_member() {
    let stores = PersonalizationStores::in_memory();
    let service = default_service(&stores);
    let active = Uuid::new_v4();
    let bystander = Uuid::new_v4();

    service.track(Some(active), Module::Community, ActionKind::Visit).await;

    assert_eq!(service.get_engagement(Some(active)).await.len(), 1);
    assert!(service.get_engagement(Some(bystander)).await.is_empty());
}

#[tokio::test]
async fn test_favorites_do_not_clobber_last_visited() {
    let stores = PersonalizationStores::in_memory();
    let service = default_service(&stores);
    let user_id = Uuid::new_v4();

    service.track(Some(user_id), Module::Jobs, ActionKind::Visit).await;
    assert!(service.add_favorite_module(Some(user_id), Module::Events).await);

    let prefs = stores.preferences.get(user_id).await.unwrap().unwrap();
    assert_eq!(prefs.last_visited_module, Some(Module::Jobs));
    assert_eq!(prefs.favorite_modules, vec![Module::Events]);
}

#[tokio::test]
async fn test_tracking_survives_total_store_failure() {
    let service = service_with(
        &failing_stores(),
        &StubbedSearch::plenty(),
        PersonalizationConfig::default(),
    );
    let user_id = Uuid::new_v4();

    // Both the event append and the preference write fail inside.
    service.track(Some(user_id), Module::Jobs, ActionKind::Visit).await;

    // Reads degrade rather than error.
    assert!(service.get_engagement(Some(user_id)).await.is_empty());
    assert_eq!(service.get_primary_role(Some(user_id)).await, None);
    assert!(service.preferences(Some(user_id)).await.is_none());
}
