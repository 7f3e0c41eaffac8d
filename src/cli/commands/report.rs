//! Traffic report command
//!
//! Loads the site's hits for the requested range and runs the full
//! aggregation pipeline: KPIs, day series, breakdowns, realtime window.

use colored::Colorize;
use std::sync::Arc;

use crate::cli::CliError;
use crate::report::{
    self, RangeKey, TopEntry, active_visitors, calc_kpis, fmt_duration, group_by_day,
    realtime_window, top_by,
};
use crate::sessions::page_breakdown;
use crate::storage::{Hit, SeaOrmStorage, TsRange};

pub async fn run_report(
    storage: Arc<SeaOrmStorage>,
    site_id: String,
    range: String,
) -> Result<(), CliError> {
    let range: RangeKey = range.parse().map_err(CliError::ParseError)?;
    if !crate::utils::is_valid_id(&site_id) {
        return Err(CliError::ParseError(format!("invalid site id: {}", site_id)));
    }

    let site = storage
        .get_site(&site_id)
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load site: {}", e)))?
        .ok_or_else(|| CliError::CommandError(format!("Site not found: {}", site_id)))?;

    let now = chrono::Utc::now().timestamp_millis();
    let ts_range = TsRange::since(now - range.to_ms(), now)
        .map_err(|e| CliError::CommandError(e.to_string()))?;

    let hits = storage
        .hits_for_site(&site_id, Some(ts_range))
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load hits: {}", e)))?;

    println!(
        "{} {} ({}), last {}",
        "Report for".bold().green(),
        site.name.bold(),
        site.domain.blue(),
        range
    );
    println!();

    if hits.is_empty() {
        println!("{} No activity in this range", "ℹ".bold().blue());
        return Ok(());
    }

    let kpis = calc_kpis(&hits);
    println!("{}", "KPIs".bold());
    println!("  Visits:            {}", kpis.visits.to_string().green());
    println!("  Visitors:          {}", kpis.visitors.to_string().green());
    println!(
        "  Bounce rate:       {}",
        format!("{:.1}%", kpis.bounce_rate).green()
    );
    println!(
        "  Avg session:       {}",
        fmt_duration(kpis.avg_session_ms).green()
    );
    println!(
        "  Pages per session: {}",
        format!("{:.2}", kpis.pages_per_session).green()
    );
    println!();

    let config = crate::config::get_config();
    let limit = config.report.top_limit;

    print_top("Top pages", &top_by(&hits, |h| Some(h.url.clone()), limit));
    print_top(
        "Referrers",
        &top_by(&hits, |h| report::referrer_host(&h.referrer), limit),
    );
    print_top(
        "Channels",
        &top_by(&hits, |h| Some(h.channel.clone()), limit),
    );
    print_top(
        "Browsers",
        &top_by(&hits, |h| Some(h.browser.clone()), limit),
    );
    print_top("OS", &top_by(&hits, |h| Some(h.os.clone()), limit));
    print_top(
        "Devices",
        &top_by(&hits, |h| Some(h.device_type.to_string()), limit),
    );
    print_top(
        "Regions",
        &top_by(&hits, |h| Some(h.country_hint.clone()), limit),
    );

    println!("{}", "Daily traffic".bold());
    for day in group_by_day(&hits) {
        println!(
            "  {}  {:>6} views  {:>6} visitors  {:>6} sessions",
            day.day.cyan(),
            day.pageviews,
            day.visitors,
            day.sessions
        );
    }
    println!();

    println!("{}", "Pages".bold());
    for page in page_breakdown(&hits).into_iter().take(limit) {
        println!(
            "  {:>6} views  {:>5.1}% exit  {}  {}",
            page.views,
            page.exit_rate,
            fmt_duration(page.avg_duration_ms).dimmed(),
            page.url.cyan()
        );
    }
    println!();

    let realtime = realtime_window(&hits, config.report.realtime_window_min, now);
    let active = active_visitors(&hits, config.report.active_window_min, now);
    println!(
        "{} {} pageviews in the last {} min, {} active visitors (last {} min)",
        "ℹ".bold().blue(),
        realtime.len().to_string().green(),
        config.report.realtime_window_min,
        active.to_string().green(),
        config.report.active_window_min
    );

    print_hour_histogram(&hits);
    Ok(())
}

fn print_top(title: &str, entries: &[TopEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("{}", title.bold());
    for entry in entries {
        println!("  {:>6}  {}", entry.count, entry.key.cyan());
    }
    println!();
}

fn print_hour_histogram(hits: &[Hit]) {
    let histo = report::histogram(hits, |h| report::hour_of_day(h.ts), 24);
    let max = histo.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return;
    }
    println!();
    println!("{}", "Traffic by hour (UTC)".bold());
    for (hour, count) in histo.iter().enumerate() {
        let bar_len = (count * 40 / max) as usize;
        println!("  {:02}  {:>6}  {}", hour, count, "▇".repeat(bar_len).cyan());
    }
}
