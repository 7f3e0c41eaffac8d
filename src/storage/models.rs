use serde::{Deserialize, Serialize};

/// A tracked site. `id` is the tenant key for all hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub domain: String,
    /// Epoch milliseconds
    pub created_at: i64,
    pub is_active: bool,
    pub session_timeout_min: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitType {
    Pageview,
    Event,
    Outbound,
}

impl HitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitType::Pageview => "pageview",
            HitType::Event => "event",
            HitType::Outbound => "outbound",
        }
    }
}

impl std::str::FromStr for HitType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pageview" => Ok(HitType::Pageview),
            "event" => Ok(HitType::Event),
            "outbound" => Ok(HitType::Outbound),
            other => Err(format!("unknown hit type: '{}'", other)),
        }
    }
}

impl std::fmt::Display for HitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
        }
    }
}

impl std::str::FromStr for DeviceType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(DeviceType::Desktop),
            "mobile" => Ok(DeviceType::Mobile),
            "tablet" => Ok(DeviceType::Tablet),
            other => Err(format!("unknown device type: '{}'", other)),
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded pageview, custom event, or outbound click.
///
/// Immutable once created except for a single optional patch backfilling
/// `duration_ms` / `scroll_max` on page exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub id: String,
    pub site_id: String,
    #[serde(rename = "type")]
    pub hit_type: HitType,
    /// Epoch milliseconds, assigned by the collector at capture time
    pub ts: i64,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub referrer: String,
    pub visitor_id: String,
    pub session_id: String,
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default)]
    pub scroll_max: Option<f64>,
    pub device_type: DeviceType,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub tz: String,
    #[serde(default)]
    pub country_hint: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
    #[serde(default)]
    pub utm_term: Option<String>,
    #[serde(default)]
    pub utm_content: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_props: Option<serde_json::Value>,
}

impl Hit {
    pub fn is_pageview(&self) -> bool {
        self.hit_type == HitType::Pageview
    }
}

/// Partial update applied to an existing hit on page exit.
///
/// Fields present in the patch overwrite; absent fields are untouched.
/// Identity fields (`id`, `site_id`, `ts`, `type`, `visitor_id`,
/// `session_id`) are not patchable by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitPatch {
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default)]
    pub scroll_max: Option<f64>,
}

impl HitPatch {
    pub fn is_empty(&self) -> bool {
        self.duration_ms.is_none() && self.scroll_max.is_none()
    }
}
