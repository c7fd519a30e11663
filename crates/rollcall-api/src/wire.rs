//! Wire format of the attendance dashboard feed.
//!
//! Outbound frames are adjacently tagged (`{"action": ..., "data": ...}`).
//! Inbound frames are either a keepalive ack (`{"type": "pong"}`) or a full
//! snapshot (`{"data": [department, ...]}`) where each department embeds its
//! employees under `result`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

// ── Outbound ─────────────────────────────────────────────────────────

/// Data topic named in a subscribe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Dashboard,
}

/// A frame sent from the client to the feed server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "lowercase")]
pub enum Outbound {
    /// Declares interest in a data topic. Sent once per successful open.
    Subscribe {
        #[serde(rename = "type")]
        topic: Topic,
    },
    /// Keepalive probe carrying the client clock in epoch milliseconds.
    Ping { timestamp: i64 },
}

impl Outbound {
    pub fn subscribe_dashboard() -> Self {
        Self::Subscribe {
            topic: Topic::Dashboard,
        }
    }

    /// A ping stamped with the current wall clock.
    pub fn ping_now() -> Self {
        Self::Ping {
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn to_json(&self) -> String {
        // Unit and integer fields only; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ── Inbound ──────────────────────────────────────────────────────────

/// One employee row as pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeePayload {
    pub id: i64,

    /// Human-assigned employee code. Some deployments send it as a number.
    #[serde(deserialize_with = "string_or_number")]
    pub employee_id: String,

    /// `0` when missing or null.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub department_id: i64,

    #[serde(default)]
    pub department_name: Option<String>,

    #[serde(default)]
    pub display_number: Option<i64>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub nick_name: Option<String>,

    /// Today's attendance: `true` checked in, `false` absent, `None` no data.
    #[serde(default, deserialize_with = "presence")]
    pub status: Option<bool>,
}

/// One department and its roster, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepartmentPayload {
    pub department_name: String,

    /// `0` when missing or null.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub display_number: i64,

    #[serde(default)]
    pub result: Vec<EmployeePayload>,
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Keepalive acknowledgement.
    Pong,
    /// A complete, non-empty snapshot of every department.
    Snapshot(Vec<DepartmentPayload>),
    /// A frame whose `data` array is empty or missing.
    Empty,
}

#[derive(Debug, Deserialize)]
struct RawInbound {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    data: Option<Vec<DepartmentPayload>>,
}

/// Decode a text frame from the feed.
pub fn parse_inbound(text: &str) -> Result<Inbound, Error> {
    let raw: RawInbound = serde_json::from_str(text).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: text.to_owned(),
    })?;

    if raw.kind.as_deref() == Some("pong") {
        return Ok(Inbound::Pong);
    }

    match raw.data {
        Some(departments) if !departments.is_empty() => Ok(Inbound::Snapshot(departments)),
        _ => Ok(Inbound::Empty),
    }
}

// ── Lenient field decoders ───────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Number(n) => n.to_string(),
    })
}

/// Presentation-only numbers: `null` decodes like a missing field.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PresenceRepr {
    Flag(bool),
    Code(i64),
    Text(String),
}

/// Accepts `true`/`false`, `1`/`0`, `"1"`/`"0"`/`"true"`/`"false"`, or null.
/// Anything else is treated as "no data" rather than a decode failure.
fn presence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<PresenceRepr>::deserialize(deserializer)? {
        Some(PresenceRepr::Flag(b)) => Some(b),
        Some(PresenceRepr::Code(n)) => Some(n != 0),
        Some(PresenceRepr::Text(s)) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        None => None,
    })
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn subscribe_frame_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&Outbound::subscribe_dashboard().to_json()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"action": "subscribe", "data": {"type": "dashboard"}})
        );
    }

    #[test]
    fn ping_frame_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&Outbound::Ping { timestamp: 1_700_000_000_123 }.to_json())
                .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"action": "ping", "data": {"timestamp": 1_700_000_000_123_i64}})
        );
    }

    #[test]
    fn ping_now_uses_epoch_millis() {
        let Outbound::Ping { timestamp } = Outbound::ping_now() else {
            panic!("expected ping");
        };
        // Anything after 2020-01-01 in milliseconds.
        assert!(timestamp > 1_577_836_800_000);
    }

    #[test]
    fn pong_is_recognized() {
        assert_eq!(parse_inbound(r#"{"type":"pong"}"#).unwrap(), Inbound::Pong);
    }

    #[test]
    fn snapshot_decodes_departments_and_employees() {
        let text = serde_json::json!({
            "data": [{
                "department_name": "Sales",
                "display_number": 2,
                "result": [{
                    "id": 7,
                    "employee_id": "E-007",
                    "department_id": 3,
                    "department_name": "Sales",
                    "display_number": 2,
                    "last_name": "Tanaka",
                    "nick_name": null,
                    "status": true
                }, {
                    "id": 8,
                    "employee_id": 1008,
                    "department_id": 3,
                    "last_name": "Suzuki",
                    "status": 0
                }]
            }]
        })
        .to_string();

        let Inbound::Snapshot(departments) = parse_inbound(&text).unwrap() else {
            panic!("expected snapshot");
        };
        assert_eq!(departments.len(), 1);
        let sales = &departments[0];
        assert_eq!(sales.department_name, "Sales");
        assert_eq!(sales.display_number, 2);
        assert_eq!(sales.result.len(), 2);
        assert_eq!(sales.result[0].employee_id, "E-007");
        assert_eq!(sales.result[0].status, Some(true));
        assert_eq!(sales.result[1].employee_id, "1008");
        assert_eq!(sales.result[1].status, Some(false));
        assert_eq!(sales.result[1].nick_name, None);
    }

    #[test]
    fn missing_or_null_status_means_no_data() {
        let text = r#"{"data":[{"department_name":"Ops","result":[
            {"id":1,"employee_id":"a","status":null},
            {"id":2,"employee_id":"b"},
            {"id":3,"employee_id":"c","status":"late"}
        ]}]}"#;
        let Inbound::Snapshot(departments) = parse_inbound(text).unwrap() else {
            panic!("expected snapshot");
        };
        let statuses: Vec<_> = departments[0].result.iter().map(|e| e.status).collect();
        assert_eq!(statuses, vec![None, None, None]);
    }

    #[test]
    fn null_ordering_and_department_ids_default_to_zero() {
        let text = r#"{"data":[{"department_name":"A","display_number":null,"result":[
            {"id":1,"employee_id":"x","department_id":null,"last_name":"Ito","status":true},
            {"id":2,"employee_id":"y","last_name":"Sato","status":false}
        ]}]}"#;
        let Inbound::Snapshot(departments) = parse_inbound(text).unwrap() else {
            panic!("expected snapshot");
        };
        assert_eq!(departments[0].display_number, 0);
        let ids: Vec<_> = departments[0].result.iter().map(|e| e.department_id).collect();
        assert_eq!(ids, vec![0, 0]);
        assert_eq!(departments[0].result[0].last_name.as_deref(), Some("Ito"));
    }

    #[test]
    fn empty_or_missing_data_is_empty() {
        assert_eq!(parse_inbound(r#"{"data":[]}"#).unwrap(), Inbound::Empty);
        assert_eq!(parse_inbound(r#"{"data":null}"#).unwrap(), Inbound::Empty);
        assert_eq!(parse_inbound(r#"{"message":"hello"}"#).unwrap(), Inbound::Empty);
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        let err = parse_inbound("not json at all").unwrap_err();
        match err {
            Error::Deserialization { body, .. } => assert_eq!(body, "not json at all"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn department_without_name_is_rejected() {
        assert!(parse_inbound(r#"{"data":[{"result":[]}]}"#).is_err());
    }
}
