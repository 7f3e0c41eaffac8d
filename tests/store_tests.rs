//! Hit store integration tests
//!
//! Exercises SeaOrmStorage against a real SQLite file: idempotent writes,
//! patch semantics, cascading deletes, range queries and durability.

use std::sync::Arc;
use std::sync::Once;

use tempfile::TempDir;

use sitebeacon::config::init_config;
use sitebeacon::storage::backend::SeaOrmStorage;
use sitebeacon::storage::{DeviceType, Hit, HitPatch, HitType, Site, TsRange};

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

/// Fresh storage per test; the TempDir must stay alive with it.
async fn new_storage() -> (TempDir, Arc<SeaOrmStorage>) {
    init_static_config();
    let temp_dir = TempDir::new().expect("create temp dir");
    let db_path = temp_dir.path().join("store_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("create storage"),
    );
    (temp_dir, storage)
}

fn site(id: &str, name: &str) -> Site {
    Site {
        id: id.to_string(),
        name: name.to_string(),
        domain: format!("{}.example.com", name),
        created_at: 1_700_000_000_000,
        is_active: true,
        session_timeout_min: 30,
    }
}

fn hit(id: &str, site_id: &str, ts: i64) -> Hit {
    Hit {
        id: id.to_string(),
        site_id: site_id.to_string(),
        hit_type: HitType::Pageview,
        ts,
        url: "/".to_string(),
        title: "Home".to_string(),
        referrer: String::new(),
        visitor_id: "v1".to_string(),
        session_id: "s1".to_string(),
        duration_ms: None,
        scroll_max: None,
        device_type: DeviceType::Desktop,
        browser: "Firefox".to_string(),
        os: "Linux".to_string(),
        lang: "en".to_string(),
        tz: "UTC".to_string(),
        country_hint: "Europe".to_string(),
        channel: "direct".to_string(),
        utm_source: None,
        utm_medium: None,
        utm_campaign: None,
        utm_term: None,
        utm_content: None,
        event_name: None,
        event_props: None,
    }
}

#[tokio::test]
async fn test_put_hit_idempotent() {
    let (_dir, storage) = new_storage().await;

    let h = hit("h_1", "site_a", 1000);
    storage.put_hit(h.clone()).await.unwrap();
    storage.put_hit(h.clone()).await.unwrap();

    assert_eq!(storage.count_hits("site_a").await.unwrap(), 1);
    let stored = storage.get_hit("h_1").await.unwrap().unwrap();
    assert_eq!(stored, h);
}

#[tokio::test]
async fn test_put_hit_replay_overwrites_in_place() {
    let (_dir, storage) = new_storage().await;

    storage.put_hit(hit("h_1", "site_a", 1000)).await.unwrap();
    let mut replay = hit("h_1", "site_a", 1000);
    replay.title = "Updated".to_string();
    storage.put_hit(replay).await.unwrap();

    let stored = storage.get_hit("h_1").await.unwrap().unwrap();
    assert_eq!(stored.title, "Updated");
    assert_eq!(storage.count_hits("site_a").await.unwrap(), 1);
}

#[tokio::test]
async fn test_patch_backfills_exit_fields_only() {
    let (_dir, storage) = new_storage().await;

    storage.put_hit(hit("h_1", "site_a", 1000)).await.unwrap();
    let applied = storage
        .patch_hit(
            "h_1",
            &HitPatch {
                duration_ms: Some(4500),
                scroll_max: Some(0.9),
            },
        )
        .await
        .unwrap();
    assert!(applied);

    let stored = storage.get_hit("h_1").await.unwrap().unwrap();
    assert_eq!(stored.duration_ms, Some(4500));
    assert_eq!(stored.scroll_max, Some(0.9));
    // Identity fields untouched
    assert_eq!(stored.ts, 1000);
    assert_eq!(stored.site_id, "site_a");
    assert_eq!(stored.visitor_id, "v1");
}

#[tokio::test]
async fn test_patch_missing_target_is_noop() {
    let (_dir, storage) = new_storage().await;

    let applied = storage
        .patch_hit(
            "nonexistent",
            &HitPatch {
                duration_ms: Some(500),
                scroll_max: None,
            },
        )
        .await
        .unwrap();

    assert!(!applied);
    // No record was created as a side effect
    assert!(storage.get_hit("nonexistent").await.unwrap().is_none());
}

#[tokio::test]
async fn test_partial_patch_leaves_absent_field() {
    let (_dir, storage) = new_storage().await;

    let mut h = hit("h_1", "site_a", 1000);
    h.scroll_max = Some(0.3);
    storage.put_hit(h).await.unwrap();

    storage
        .patch_hit(
            "h_1",
            &HitPatch {
                duration_ms: Some(2000),
                scroll_max: None,
            },
        )
        .await
        .unwrap();

    let stored = storage.get_hit("h_1").await.unwrap().unwrap();
    assert_eq!(stored.duration_ms, Some(2000));
    assert_eq!(stored.scroll_max, Some(0.3));
}

#[tokio::test]
async fn test_cascading_delete_spares_other_sites() {
    let (_dir, storage) = new_storage().await;

    storage.put_site(site("site_a", "alpha")).await.unwrap();
    storage.put_site(site("site_b", "beta")).await.unwrap();
    storage.put_hit(hit("h_1", "site_a", 1000)).await.unwrap();
    storage.put_hit(hit("h_2", "site_a", 2000)).await.unwrap();
    storage.put_hit(hit("h_3", "site_b", 3000)).await.unwrap();

    storage.delete_site("site_a").await.unwrap();

    assert!(storage.get_site("site_a").await.unwrap().is_none());
    assert_eq!(storage.count_hits("site_a").await.unwrap(), 0);
    // The other site and its hits are untouched
    assert!(storage.get_site("site_b").await.unwrap().is_some());
    assert_eq!(storage.count_hits("site_b").await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_missing_site_is_not_found() {
    let (_dir, storage) = new_storage().await;

    let err = storage.delete_site("site_missing").await.unwrap_err();
    assert_eq!(err.code(), "E005");
}

#[tokio::test]
async fn test_range_query_boundaries_inclusive() {
    let (_dir, storage) = new_storage().await;

    for (id, ts) in [("h_1", 100), ("h_2", 150), ("h_3", 200), ("h_4", 201)] {
        storage.put_hit(hit(id, "site_a", ts)).await.unwrap();
    }

    let range = TsRange::new(150, 200).unwrap();
    let hits = storage
        .hits_for_site("site_a", Some(range))
        .await
        .unwrap();

    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["h_2", "h_3"]);
}

#[tokio::test]
async fn test_hits_returned_in_ts_order() {
    let (_dir, storage) = new_storage().await;

    storage.put_hit(hit("h_1", "site_a", 3000)).await.unwrap();
    storage.put_hit(hit("h_2", "site_a", 1000)).await.unwrap();
    storage.put_hit(hit("h_3", "site_a", 2000)).await.unwrap();

    let hits = storage.hits_for_site("site_a", None).await.unwrap();
    let ts: Vec<i64> = hits.iter().map(|h| h.ts).collect();
    assert_eq!(ts, vec![1000, 2000, 3000]);
}

#[tokio::test]
async fn test_event_props_roundtrip() {
    let (_dir, storage) = new_storage().await;

    let mut h = hit("h_1", "site_a", 1000);
    h.hit_type = HitType::Event;
    h.event_name = Some("signup".to_string());
    h.event_props = Some(serde_json::json!({"plan": "pro", "seats": 3}));
    storage.put_hit(h).await.unwrap();

    let stored = storage.get_hit("h_1").await.unwrap().unwrap();
    assert_eq!(stored.event_props.unwrap()["seats"], 3);
}

#[tokio::test]
async fn test_wipe_all_drops_both_collections() {
    let (_dir, storage) = new_storage().await;

    storage.put_site(site("site_a", "alpha")).await.unwrap();
    storage.put_hit(hit("h_1", "site_a", 1000)).await.unwrap();

    storage.wipe_all().await.unwrap();

    assert!(storage.list_sites().await.unwrap().is_empty());
    assert_eq!(storage.count_hits("site_a").await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_sites_newest_first() {
    let (_dir, storage) = new_storage().await;

    let mut older = site("site_a", "alpha");
    older.created_at = 1_000;
    let mut newer = site("site_b", "beta");
    newer.created_at = 2_000;
    storage.put_site(older).await.unwrap();
    storage.put_site(newer).await.unwrap();

    let sites = storage.list_sites().await.unwrap();
    assert_eq!(sites[0].id, "site_b");
    assert_eq!(sites[1].id, "site_a");
}

#[tokio::test]
async fn test_put_site_upsert_overwrites() {
    let (_dir, storage) = new_storage().await;

    storage.put_site(site("site_a", "alpha")).await.unwrap();
    let mut renamed = site("site_a", "alpha-renamed");
    renamed.is_active = false;
    storage.put_site(renamed).await.unwrap();

    let stored = storage.get_site("site_a").await.unwrap().unwrap();
    assert_eq!(stored.name, "alpha-renamed");
    assert!(!stored.is_active);
    assert_eq!(storage.list_sites().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    init_static_config();
    let temp_dir = TempDir::new().expect("create temp dir");
    let db_path = temp_dir.path().join("durability_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    {
        let storage = SeaOrmStorage::new(&db_url, "sqlite").await.unwrap();
        storage.put_hit(hit("h_1", "site_a", 1000)).await.unwrap();
    }

    let reopened = SeaOrmStorage::new(&db_url, "sqlite").await.unwrap();
    let stored = reopened.get_hit("h_1").await.unwrap().unwrap();
    assert_eq!(stored.ts, 1000);
}

#[tokio::test]
async fn test_export_hits_ts_ascending_with_site_filter() {
    let (_dir, storage) = new_storage().await;

    storage.put_hit(hit("h_1", "site_a", 3000)).await.unwrap();
    storage.put_hit(hit("h_2", "site_b", 1000)).await.unwrap();

    let all = storage.export_hits(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "h_2");
    assert_eq!(all[1].id, "h_1");

    let only_a = storage.export_hits(Some("site_a")).await.unwrap();
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0].id, "h_1");
}
