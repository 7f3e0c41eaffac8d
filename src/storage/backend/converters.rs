use sea_orm::ActiveValue::{Set, Unchanged};

use crate::errors::{Result, SitebeaconError};
use crate::storage::models::{Hit, HitPatch, Site};
use migration::entities::{hit, site};

pub fn model_to_site(model: site::Model) -> Site {
    Site {
        id: model.id,
        name: model.name,
        domain: model.domain,
        created_at: model.created_at,
        is_active: model.is_active,
        session_timeout_min: model.session_timeout_min,
    }
}

pub fn site_to_active_model(s: &Site) -> site::ActiveModel {
    site::ActiveModel {
        id: Set(s.id.clone()),
        name: Set(s.name.clone()),
        domain: Set(s.domain.clone()),
        created_at: Set(s.created_at),
        is_active: Set(s.is_active),
        session_timeout_min: Set(s.session_timeout_min),
    }
}

/// Convert a stored row into a Hit.
///
/// Fails only when the categorical columns hold values outside the wire
/// vocabulary, which indicates a corrupted row rather than a caller error.
pub fn model_to_hit(model: hit::Model) -> Result<Hit> {
    let hit_type = model
        .hit_type
        .parse()
        .map_err(SitebeaconError::validation)?;
    let device_type = model
        .device_type
        .parse()
        .map_err(SitebeaconError::validation)?;

    // A malformed props blob degrades to None instead of poisoning the row
    let event_props = model
        .event_props
        .as_deref()
        .and_then(|s| serde_json::from_str(s).ok());

    Ok(Hit {
        id: model.id,
        site_id: model.site_id,
        hit_type,
        ts: model.ts,
        url: model.url,
        title: model.title,
        referrer: model.referrer,
        visitor_id: model.visitor_id,
        session_id: model.session_id,
        duration_ms: model.duration_ms,
        scroll_max: model.scroll_max,
        device_type,
        browser: model.browser,
        os: model.os,
        lang: model.lang,
        tz: model.tz,
        country_hint: model.country_hint,
        channel: model.channel,
        utm_source: model.utm_source,
        utm_medium: model.utm_medium,
        utm_campaign: model.utm_campaign,
        utm_term: model.utm_term,
        utm_content: model.utm_content,
        event_name: model.event_name,
        event_props,
    })
}

pub fn hit_to_active_model(h: &Hit) -> hit::ActiveModel {
    let event_props = h
        .event_props
        .as_ref()
        .and_then(|v| serde_json::to_string(v).ok());

    hit::ActiveModel {
        id: Set(h.id.clone()),
        site_id: Set(h.site_id.clone()),
        hit_type: Set(h.hit_type.as_str().to_string()),
        ts: Set(h.ts),
        url: Set(h.url.clone()),
        title: Set(h.title.clone()),
        referrer: Set(h.referrer.clone()),
        visitor_id: Set(h.visitor_id.clone()),
        session_id: Set(h.session_id.clone()),
        duration_ms: Set(h.duration_ms),
        scroll_max: Set(h.scroll_max),
        device_type: Set(h.device_type.as_str().to_string()),
        browser: Set(h.browser.clone()),
        os: Set(h.os.clone()),
        lang: Set(h.lang.clone()),
        tz: Set(h.tz.clone()),
        country_hint: Set(h.country_hint.clone()),
        channel: Set(h.channel.clone()),
        utm_source: Set(h.utm_source.clone()),
        utm_medium: Set(h.utm_medium.clone()),
        utm_campaign: Set(h.utm_campaign.clone()),
        utm_term: Set(h.utm_term.clone()),
        utm_content: Set(h.utm_content.clone()),
        event_name: Set(h.event_name.clone()),
        event_props: Set(event_props),
    }
}

/// Build the update for a patch: only the fields present in the patch are
/// set, everything else (including identity fields) stays untouched.
pub fn apply_patch(id: &str, patch: &HitPatch) -> hit::ActiveModel {
    let mut active = hit::ActiveModel {
        id: Unchanged(id.to_string()),
        ..Default::default()
    };
    if let Some(duration_ms) = patch.duration_ms {
        active.duration_ms = Set(Some(duration_ms));
    }
    if let Some(scroll_max) = patch.scroll_max {
        active.scroll_max = Set(Some(scroll_max));
    }
    active
}
