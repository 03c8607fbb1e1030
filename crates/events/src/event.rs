use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::ProductId;

/// Durable queue shared by the products API and the notifications service.
pub const PRODUCT_EVENTS_QUEUE: &str = "products.events";

/// Content type stamped on every published message.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Closed set of product event kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ProductCreated,
    ProductDeleted,
}

impl EventType {
    /// Stable wire name (e.g. `"product_created"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ProductCreated => "product_created",
            EventType::ProductDeleted => "product_deleted",
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable fact describing a completed catalog mutation.
///
/// Wire shape (JSON, versionless):
///
/// ```text
/// {"event_type":"product_created","product_id":7,"name":"Widget","timestamp":"2026-01-01T00:00:00Z"}
/// {"event_type":"product_deleted","product_id":7,"timestamp":"2026-01-01T00:00:00Z"}
/// ```
///
/// `name` is omitted entirely for deletions. `timestamp` is taken by the
/// producer when the event is built, not when the row was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEvent {
    pub event_type: EventType,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProductEvent {
    pub fn created(product_id: ProductId, name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: EventType::ProductCreated,
            product_id,
            name: Some(name.into()),
            timestamp,
        }
    }

    pub fn deleted(product_id: ProductId, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: EventType::ProductDeleted,
            product_id,
            name: None,
            timestamp,
        }
    }

    /// Serialize into the message body handed to the broker.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a message body received from the broker.
    pub fn from_bytes(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Body shape as read off the queue, before the timestamp is parsed.
#[derive(Deserialize)]
struct WireEvent {
    event_type: EventType,
    product_id: ProductId,
    #[serde(default)]
    name: Option<String>,
    timestamp: String,
}

/// A decoded event together with its timestamp exactly as the producer sent it.
///
/// Producers differ in sub-second precision and offset, so logs show the
/// original string rather than a re-rendered one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedEvent {
    pub event: ProductEvent,
    pub raw_timestamp: String,
}

impl ReceivedEvent {
    /// Decode a body; the timestamp must still be valid RFC 3339.
    pub fn from_bytes(body: &[u8]) -> Result<Self, serde_json::Error> {
        let wire: WireEvent = serde_json::from_slice(body)?;

        let timestamp = DateTime::parse_from_rfc3339(&wire.timestamp)
            .map_err(|e| <serde_json::Error as serde::de::Error>::custom(format!("timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(Self {
            event: ProductEvent {
                event_type: wire.event_type,
                product_id: wire.product_id,
                name: wire.name,
                timestamp,
            },
            raw_timestamp: wire.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn id(raw: i64) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    #[test]
    fn created_event_carries_all_four_fields() {
        let ev = ProductEvent::created(id(7), "Widget", new_year());
        let value: serde_json::Value = serde_json::from_slice(&ev.to_bytes().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "event_type": "product_created",
                "product_id": 7,
                "name": "Widget",
                "timestamp": "2026-01-01T00:00:00Z",
            })
        );
    }

    #[test]
    fn deleted_event_omits_name_key() {
        let ev = ProductEvent::deleted(id(9), new_year());
        let value: serde_json::Value = serde_json::from_slice(&ev.to_bytes().unwrap()).unwrap();

        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("name"));
        assert_eq!(obj["event_type"], "product_deleted");
        assert_eq!(obj["product_id"], 9);
    }

    #[test]
    fn decodes_body_published_by_another_producer() {
        let body = br#"{"event_type":"product_created","product_id":7,"name":"Widget","timestamp":"2026-01-01T00:00:00Z"}"#;
        let ev = ProductEvent::from_bytes(body).unwrap();

        assert_eq!(ev, ProductEvent::created(id(7), "Widget", new_year()));
    }

    #[test]
    fn received_event_keeps_timestamp_as_sent() {
        let body = br#"{"event_type":"product_created","product_id":7,"name":"Widget","timestamp":"2026-01-01T02:00:00.5+02:00"}"#;
        let received = ReceivedEvent::from_bytes(body).unwrap();

        assert_eq!(received.raw_timestamp, "2026-01-01T02:00:00.5+02:00");
        assert_eq!(
            received.event.timestamp,
            new_year() + chrono::Duration::milliseconds(500)
        );
        assert_eq!(received.event.name.as_deref(), Some("Widget"));
    }

    #[test]
    fn received_event_rejects_bad_timestamp() {
        let body = br#"{"event_type":"product_deleted","product_id":7,"timestamp":"yesterday"}"#;
        assert!(ReceivedEvent::from_bytes(body).is_err());
    }

    #[test]
    fn rejects_truncated_body() {
        let body = br#"{"event_type":"product_created","product_id":7,"na"#;
        assert!(ProductEvent::from_bytes(body).is_err());
    }

    #[test]
    fn rejects_unknown_event_type() {
        let body = br#"{"event_type":"product_renamed","product_id":7,"timestamp":"2026-01-01T00:00:00Z"}"#;
        assert!(ProductEvent::from_bytes(body).is_err());
    }

    #[test]
    fn rejects_non_positive_product_id() {
        let body = br#"{"event_type":"product_deleted","product_id":0,"timestamp":"2026-01-01T00:00:00Z"}"#;
        assert!(ProductEvent::from_bytes(body).is_err());
    }

    #[test]
    fn event_type_display_matches_wire_name() {
        assert_eq!(EventType::ProductCreated.to_string(), "product_created");
        assert_eq!(
            serde_json::to_string(&EventType::ProductDeleted).unwrap(),
            "\"product_deleted\""
        );
    }
}
