use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use utils::dates::to_editable_date;

use crate::question::Question;

/// Client intake details for one engagement. Free-form by design: every
/// field is an unvalidated string, and anything the intake form does not
/// know about rides along in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientInfo {
    pub client_name: Option<String>,
    pub region: Option<String>,
    pub server_version: Option<String>,
    pub server_url: Option<String>,
    pub kickoff_date: Option<String>,
    pub go_live_date: Option<String>,
    pub primary_contact: Option<String>,
    pub meeting_cadence: Option<String>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, Value>,
}

impl ClientInfo {
    /// Assign one intake field by its wire name. Unknown names are kept
    /// in `extra` so older documents never lose fields on save.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        match field {
            "clientName" => self.client_name = Some(value),
            "region" => self.region = Some(value),
            "serverVersion" => self.server_version = Some(value),
            "serverUrl" => self.server_url = Some(value),
            "kickoffDate" => self.kickoff_date = Some(value),
            "goLiveDate" => self.go_live_date = Some(value),
            "primaryContact" => self.primary_contact = Some(value),
            "meetingCadence" => self.meeting_cadence = Some(value),
            other => {
                self.extra.insert(other.to_string(), Value::String(value));
            }
        }
    }
}

/// The root checklist document for one client engagement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Migration {
    pub id: String,
    #[serde(default)]
    pub client_info: ClientInfo,
    /// Ordered for display; order is not semantically enforced.
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_at: Option<DateTime<Utc>>,
    /// Server-maintained; refreshed on every successful save.
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

/// The two top-level fields a save pushes. Nothing else ever goes up.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMigration {
    pub client_info: ClientInfo,
    pub questions: Vec<Question>,
}

impl Migration {
    /// Copy of this document with the intake dates converted to the
    /// editable `YYYY-MM-DD` form. The receiver is left untouched and
    /// the questions are carried over as-is.
    pub fn with_editable_dates(&self) -> Migration {
        let mut doc = self.clone();
        doc.client_info.kickoff_date = doc
            .client_info
            .kickoff_date
            .map(|date| to_editable_date(&date));
        doc.client_info.go_live_date = doc
            .client_info
            .go_live_date
            .map(|date| to_editable_date(&date));
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migration() -> Migration {
        Migration {
            id: "64f1a2b3c4d5e6f7a8b9c0d1".to_string(),
            client_info: ClientInfo {
                client_name: Some("Acme Analytics".to_string()),
                kickoff_date: Some("2024-05-01T00:00:00.000Z".to_string()),
                go_live_date: Some("2024-08-15T22:00:00.000-05:00".to_string()),
                ..Default::default()
            },
            questions: Vec::new(),
            created_at: None,
            updated_at: None,
            updated_by: None,
        }
    }

    #[test]
    fn test_with_editable_dates_converts_both_intake_dates() {
        let doc = migration().with_editable_dates();
        assert_eq!(doc.client_info.kickoff_date.as_deref(), Some("2024-05-01"));
        // go-live crosses a day boundary in UTC
        assert_eq!(doc.client_info.go_live_date.as_deref(), Some("2024-08-16"));
    }

    #[test]
    fn test_with_editable_dates_never_mutates_the_source() {
        let original = migration();
        let _ = original.with_editable_dates();
        assert_eq!(
            original.client_info.kickoff_date.as_deref(),
            Some("2024-05-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_with_editable_dates_tolerates_absent_dates() {
        let mut doc = migration();
        doc.client_info.kickoff_date = None;
        let normalized = doc.with_editable_dates();
        assert_eq!(normalized.client_info.kickoff_date, None);
        assert_eq!(
            normalized.client_info.go_live_date.as_deref(),
            Some("2024-08-16")
        );
    }

    #[test]
    fn test_set_known_field() {
        let mut info = ClientInfo::default();
        info.set("clientName", "Acme Analytics");
        info.set("meetingCadence", "weekly");
        assert_eq!(info.client_name.as_deref(), Some("Acme Analytics"));
        assert_eq!(info.meeting_cadence.as_deref(), Some("weekly"));
    }

    #[test]
    fn test_set_unknown_field_lands_in_extra() {
        let mut info = ClientInfo::default();
        info.set("escalationContact", "ops@acme.example");
        assert_eq!(
            info.extra.get("escalationContact"),
            Some(&Value::String("ops@acme.example".to_string()))
        );
    }

    #[test]
    fn test_unknown_wire_fields_round_trip() {
        let info: ClientInfo = serde_json::from_value(serde_json::json!({
            "clientName": "Acme Analytics",
            "legacyTier": "gold",
        }))
        .unwrap();
        let back = serde_json::to_value(&info).unwrap();
        assert_eq!(back.get("legacyTier"), Some(&Value::String("gold".to_string())));
    }
}
