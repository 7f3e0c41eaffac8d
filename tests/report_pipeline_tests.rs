//! End-to-end pipeline tests: gateway -> store -> sessions -> report
//!
//! Replays a small known traffic pattern through the real write path and
//! checks the numbers the dashboard would show.

use std::sync::Arc;
use std::sync::Once;

use tempfile::TempDir;

use sitebeacon::config::init_config;
use sitebeacon::gateway::{CollectorMessage, WriteGateway};
use sitebeacon::report::{active_visitors, calc_kpis, group_by_day, top_by};
use sitebeacon::sessions::page_breakdown;
use sitebeacon::storage::backend::SeaOrmStorage;
use sitebeacon::storage::{DeviceType, Hit, HitPatch, HitType, TsRange};

static INIT: Once = Once::new();

async fn new_env() -> (TempDir, Arc<SeaOrmStorage>, WriteGateway) {
    INIT.call_once(|| {
        init_config();
    });
    let temp_dir = TempDir::new().expect("create temp dir");
    let db_path = temp_dir.path().join("pipeline_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("create storage"),
    );
    let gateway = WriteGateway::new(storage.clone());
    (temp_dir, storage, gateway)
}

fn pv(id: &str, session: &str, visitor: &str, ts: i64, url: &str, channel: &str) -> Hit {
    Hit {
        id: id.to_string(),
        site_id: "site_a".to_string(),
        hit_type: HitType::Pageview,
        ts,
        url: url.to_string(),
        title: String::new(),
        referrer: String::new(),
        visitor_id: visitor.to_string(),
        session_id: session.to_string(),
        duration_ms: None,
        scroll_max: None,
        device_type: DeviceType::Desktop,
        browser: "Firefox".to_string(),
        os: "Linux".to_string(),
        lang: "en".to_string(),
        tz: "UTC".to_string(),
        country_hint: "Europe".to_string(),
        channel: channel.to_string(),
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
async fn test_known_traffic_produces_expected_report() {
    let (_dir, storage, gateway) = new_env().await;

    let day = 1_704_067_200_000i64; // 2024-01-01T00:00:00Z
    let two_days = day + 2 * 24 * 3_600_000;

    // Session s1 (v1): three pages on Jan 1, delivered out of order
    for h in [
        pv("h_1", "s1", "v1", day + 1000, "/a", "search"),
        pv("h_3", "s1", "v1", day + 3000, "/b", "search"),
        pv("h_2", "s1", "v1", day + 2000, "/c", "search"),
    ] {
        gateway.dispatch(CollectorMessage::Hit { payload: h }).await;
    }
    // Session s2 (v2): a bounce on Jan 3, channel left empty
    gateway
        .dispatch(CollectorMessage::Hit {
            payload: pv("h_4", "s2", "v2", two_days, "/a", ""),
        })
        .await;
    // Exit patch for the bounce
    gateway
        .dispatch(CollectorMessage::HitPatch {
            id: "h_4".to_string(),
            patch: HitPatch {
                duration_ms: Some(12_000),
                scroll_max: Some(0.4),
            },
        })
        .await;

    let hits = storage
        .hits_for_site("site_a", Some(TsRange::new(day, two_days + 1).unwrap()))
        .await
        .unwrap();
    assert_eq!(hits.len(), 4);

    let kpis = calc_kpis(&hits);
    assert_eq!(kpis.visits, 4);
    assert_eq!(kpis.visitors, 2);
    assert!((kpis.bounce_rate - 50.0).abs() < f64::EPSILON);
    // s1 spans 2000ms, s2 has an explicit 12000ms patch: avg 7000
    assert_eq!(kpis.avg_session_ms, 7000);

    let days = group_by_day(&hits);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day, "2024-01-01");
    assert_eq!(days[0].pageviews, 3);
    assert_eq!(days[1].day, "2024-01-03");

    // Empty channel of h_4 never ranks
    let channels = top_by(&hits, |h| Some(h.channel.clone()), 10);
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].key, "search");
    assert_eq!(channels[0].count, 3);

    // /a is entry of both sessions and exit of the bounce
    let pages = page_breakdown(&hits);
    let a = pages.iter().find(|p| p.url == "/a").unwrap();
    assert_eq!(a.entries, 2);
    assert_eq!(a.exits, 1);

    // Both visitors active when "now" is just after the last hit
    assert_eq!(active_visitors(&hits, 30, two_days + 1), 1);
    assert_eq!(
        active_visitors(&hits, 3 * 24 * 60, two_days + 1),
        2
    );
}
