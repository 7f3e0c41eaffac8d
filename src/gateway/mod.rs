//! Write gateway for collector traffic
//!
//! The single entry point for hit and patch messages. The gateway owns no
//! state of its own: idempotency lives in the store's id-keyed upsert, so a
//! replayed message is safe no matter which gateway instance handles it.
//! Ingestion failures are logged and swallowed; analytics must never break
//! the page being measured.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::storage::{Hit, HitPatch, SeaOrmStorage};

/// A message from the collector, tagged by kind on the wire.
///
/// The hit travels under a `payload` key and the patch under a `patch`
/// key, next to the id of the hit it targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectorMessage {
    Hit { payload: Hit },
    HitPatch { id: String, patch: HitPatch },
}

#[derive(Clone)]
pub struct WriteGateway {
    storage: Arc<SeaOrmStorage>,
}

impl WriteGateway {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Record a hit. Storage errors are logged, never propagated.
    pub async fn record_hit(&self, hit: Hit) {
        let id = hit.id.clone();
        if let Err(e) = self.storage.put_hit(hit).await {
            if e.is_storage_unavailable() {
                warn!("Dropping hit {} (store unavailable): {}", id, e);
            } else {
                error!("Dropping hit {}: {}", id, e);
            }
        }
    }

    /// Apply an exit patch. A missing target is a silent no-op: the patch
    /// may arrive before its hit, or the hit may never have been delivered.
    pub async fn record_patch(&self, id: &str, patch: &HitPatch) {
        match self.storage.patch_hit(id, patch).await {
            Ok(true) => {}
            Ok(false) => debug!("Patch target not found, skipping: {}", id),
            Err(e) => warn!("Dropping patch for {}: {}", id, e),
        }
    }

    pub async fn dispatch(&self, msg: CollectorMessage) {
        match msg {
            CollectorMessage::Hit { payload } => self.record_hit(payload).await,
            CollectorMessage::HitPatch { id, patch } => self.record_patch(&id, &patch).await,
        }
    }

    /// Fire-and-forget submission: the caller returns immediately while the
    /// write completes in the background.
    pub fn submit(&self, msg: CollectorMessage) {
        let gateway = self.clone();
        tokio::spawn(async move {
            gateway.dispatch(msg).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DeviceType, HitType};

    fn sample_hit() -> Hit {
        Hit {
            id: "h_1".to_string(),
            site_id: "site_a".to_string(),
            hit_type: HitType::Pageview,
            ts: 1_700_000_000_000,
            url: "https://example.com/".to_string(),
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
            country_hint: String::new(),
            channel: "Direct".to_string(),
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            utm_term: None,
            utm_content: None,
            event_name: None,
            event_props: None,
        }
    }

    #[test]
    fn test_hit_message_wire_shape() {
        let msg = CollectorMessage::Hit {
            payload: sample_hit(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "hit");
        assert_eq!(json["payload"]["id"], "h_1");
        assert_eq!(json["payload"]["type"], "pageview");
        // Hit fields stay inside the payload envelope
        assert!(json.get("id").is_none());
        assert!(json.get("type").is_none());
    }

    #[test]
    fn test_patch_message_wire_shape() {
        let msg = CollectorMessage::HitPatch {
            id: "h_1".to_string(),
            patch: HitPatch {
                duration_ms: Some(1500),
                scroll_max: Some(0.8),
            },
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "hit_patch");
        assert_eq!(json["id"], "h_1");
        assert_eq!(json["patch"]["duration_ms"], 1500);
        assert!(json.get("duration_ms").is_none());

        let back: CollectorMessage = serde_json::from_value(json).unwrap();
        match back {
            CollectorMessage::HitPatch { id, patch } => {
                assert_eq!(id, "h_1");
                assert_eq!(patch.duration_ms, Some(1500));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_hit_message_roundtrip_defaults() {
        // A minimal collector payload still decodes, optional fields default
        let json = serde_json::json!({
            "kind": "hit",
            "payload": {
                "id": "h_2",
                "site_id": "site_a",
                "type": "event",
                "ts": 1_700_000_000_123_i64,
                "url": "https://example.com/pricing",
                "visitor_id": "v2",
                "session_id": "s2",
                "device_type": "mobile",
                "event_name": "signup"
            }
        });
        let msg: CollectorMessage = serde_json::from_value(json).unwrap();
        match msg {
            CollectorMessage::Hit { payload } => {
                assert_eq!(payload.hit_type, HitType::Event);
                assert_eq!(payload.event_name.as_deref(), Some("signup"));
                assert!(payload.title.is_empty());
                assert!(payload.duration_ms.is_none());
            }
            _ => panic!("wrong variant"),
        }
    }
}
