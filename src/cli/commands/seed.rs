//! Demo traffic seeder
//!
//! Generates plausible visitor traffic through the write gateway, so the
//! report command has something to chew on without a deployed snippet.

use colored::Colorize;
use rand::RngExt;
use std::sync::Arc;

use crate::cli::CliError;
use crate::gateway::{CollectorMessage, WriteGateway};
use crate::storage::{DeviceType, Hit, HitPatch, HitType, SeaOrmStorage};
use crate::utils::{new_hit_id, random_token};

const PATHS: &[&str] = &["/", "/pricing", "/blog", "/blog/launch", "/docs", "/about"];
const CHANNELS: &[&str] = &["direct", "search", "referral", "social"];
const REFERRERS: &[&str] = &[
    "",
    "https://www.google.com/search",
    "https://news.ycombinator.com/",
    "https://duckduckgo.com/",
];
const BROWSERS: &[&str] = &["Firefox", "Chrome", "Safari", "Edge"];
const OSES: &[&str] = &["Linux", "Windows", "macOS", "Android", "iOS"];
const REGIONS: &[&str] = &["Europe", "America", "Asia", "Oceania"];

pub async fn seed_demo(
    storage: Arc<SeaOrmStorage>,
    site_id: String,
    days: i64,
    visitors: usize,
) -> Result<(), CliError> {
    if days <= 0 || visitors == 0 {
        return Err(CliError::ParseError(
            "days and visitors must be positive".to_string(),
        ));
    }

    storage
        .get_site(&site_id)
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load site: {}", e)))?
        .ok_or_else(|| {
            CliError::CommandError(format!(
                "Site not found: {} (run `sitebeacon site add` first)",
                site_id
            ))
        })?;

    let gateway = WriteGateway::new(storage);
    let now = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let mut hit_count = 0usize;

    for _ in 0..visitors {
        let visitor_id = format!("v_{}", random_token(8));
        let device_type = match rng.random_range(0..10) {
            0..=5 => DeviceType::Desktop,
            6..=8 => DeviceType::Mobile,
            _ => DeviceType::Tablet,
        };
        let browser = BROWSERS[rng.random_range(0..BROWSERS.len())];
        let os = OSES[rng.random_range(0..OSES.len())];
        let region = REGIONS[rng.random_range(0..REGIONS.len())];

        for _ in 0..rng.random_range(1..=4) {
            let session_id = format!("s_{}", random_token(8));
            let channel_idx = rng.random_range(0..CHANNELS.len());
            let mut ts = now - rng.random_range(0..days * 24 * 3_600_000);
            let pages = rng.random_range(1..=5);

            for page in 0..pages {
                let hit = Hit {
                    id: new_hit_id(),
                    site_id: site_id.clone(),
                    hit_type: HitType::Pageview,
                    ts,
                    url: PATHS[rng.random_range(0..PATHS.len())].to_string(),
                    title: String::new(),
                    referrer: if page == 0 {
                        REFERRERS[channel_idx].to_string()
                    } else {
                        String::new()
                    },
                    visitor_id: visitor_id.clone(),
                    session_id: session_id.clone(),
                    duration_ms: None,
                    scroll_max: None,
                    device_type,
                    browser: browser.to_string(),
                    os: os.to_string(),
                    lang: "en".to_string(),
                    tz: "UTC".to_string(),
                    country_hint: region.to_string(),
                    channel: CHANNELS[channel_idx].to_string(),
                    utm_source: None,
                    utm_medium: None,
                    utm_campaign: None,
                    utm_term: None,
                    utm_content: None,
                    event_name: None,
                    event_props: None,
                };
                let hit_id = hit.id.clone();
                gateway.dispatch(CollectorMessage::Hit { payload: hit }).await;
                hit_count += 1;

                // Most pageviews get an exit patch, like a real unload beacon
                if rng.random_range(0..10) < 8 {
                    gateway
                        .dispatch(CollectorMessage::HitPatch {
                            id: hit_id,
                            patch: HitPatch {
                                duration_ms: Some(rng.random_range(2_000..180_000)),
                                scroll_max: Some(rng.random_range(0.1..1.0)),
                            },
                        })
                        .await;
                }

                ts += rng.random_range(5_000..180_000);
            }
        }
    }

    println!(
        "{} Seeded {} hits for {}",
        "✓".bold().green(),
        hit_count.to_string().green(),
        site_id.cyan()
    );
    Ok(())
}
