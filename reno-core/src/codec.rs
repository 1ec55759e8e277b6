use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Level, ReleaseRecord, ServiceEntry};

/// Errors produced when decoding a portable string
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not valid output of the binary-to-text transform
    #[error("not a valid portable string: {0}")]
    MalformedInput(String),

    /// The decoded content cannot be interpreted as a release record
    #[error("decoded content is not a release record: {0}")]
    Schema(String),
}

/// Serializes a record to its canonical JSON form: stable key order, with
/// `services` as an object keyed by service name in selection order.
pub fn to_canonical_json(record: &ReleaseRecord) -> Value {
    let mut root = Map::new();
    if let Some(date) = record.release_date {
        root.insert(
            "release_date".to_string(),
            Value::String(date.format("%Y-%m-%d").to_string()),
        );
    }
    root.insert("contact".to_string(), Value::String(record.contact.clone()));

    let mut services = Map::new();
    for entry in &record.services {
        let mut svc = Map::new();
        svc.insert("config_only".to_string(), Value::Bool(entry.config_only));
        svc.insert(
            "risk_level".to_string(),
            Value::String(entry.risk_level.to_string()),
        );
        svc.insert(
            "benefit_level".to_string(),
            Value::String(entry.benefit_level.to_string()),
        );
        svc.insert("version".to_string(), Value::String(entry.version.clone()));
        svc.insert(
            "known_issues".to_string(),
            Value::String(entry.known_issues.clone()),
        );
        svc.insert(
            "change_description".to_string(),
            Value::String(entry.change_description.clone()),
        );
        svc.insert("pr_links".to_string(), links_to_value(&entry.pr_links));
        svc.insert("design_links".to_string(), links_to_value(&entry.design_links));
        svc.insert(
            "code_quality_links".to_string(),
            links_to_value(&entry.code_quality_links),
        );
        svc.insert(
            "additional_links".to_string(),
            links_to_value(&entry.additional_links),
        );
        services.insert(entry.service.clone(), Value::Object(svc));
    }
    root.insert("services".to_string(), Value::Object(services));

    Value::Object(root)
}

fn links_to_value(links: &[String]) -> Value {
    Value::Array(links.iter().cloned().map(Value::String).collect())
}

/// Encodes a record into a single-line portable string: canonical JSON run
/// through a base64 transform so it pastes safely into plain-text fields.
pub fn encode(record: &ReleaseRecord) -> String {
    let json = serde_json::to_string_pretty(&to_canonical_json(record))
        .unwrap_or_else(|_| "{}".to_string());
    general_purpose::STANDARD.encode(json.as_bytes())
}

/// Decodes a portable string back into a record.
///
/// Field extraction is tolerant by design: missing or unknown fields inside
/// a service entry take their defaults rather than failing, so exports from
/// older schema revisions still load. An unparseable `release_date` yields
/// `None` instead of an error.
pub fn decode(portable: &str) -> Result<ReleaseRecord, CodecError> {
    let bytes = general_purpose::STANDARD
        .decode(portable.trim())
        .map_err(|e| CodecError::MalformedInput(e.to_string()))?;
    let json = String::from_utf8(bytes)
        .map_err(|_| CodecError::MalformedInput("payload is not valid UTF-8".to_string()))?;

    let value: Value = serde_json::from_str(&json)
        .map_err(|e| CodecError::Schema(e.to_string()))?;
    from_canonical_json(&value)
}

/// Interprets a JSON value as a record using the same default-on-absence
/// rules as [`decode`]. Also used by the CLI to read record files directly.
pub fn from_canonical_json(value: &Value) -> Result<ReleaseRecord, CodecError> {
    let root = value
        .as_object()
        .ok_or_else(|| CodecError::Schema("top-level value is not an object".to_string()))?;

    let release_date = root
        .get("release_date")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

    let contact = get_string(root, "contact");

    let mut services = Vec::new();
    if let Some(Value::Object(map)) = root.get("services") {
        for (name, details) in map {
            services.push(service_from_value(name, details));
        }
    }

    Ok(ReleaseRecord {
        release_date,
        contact,
        services,
    })
}

fn service_from_value(name: &str, value: &Value) -> ServiceEntry {
    let empty = Map::new();
    let details = value.as_object().unwrap_or(&empty);

    ServiceEntry {
        service: name.to_string(),
        config_only: details
            .get("config_only")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        risk_level: get_level(details, "risk_level"),
        benefit_level: get_level(details, "benefit_level"),
        version: get_string(details, "version"),
        change_description: get_string(details, "change_description"),
        known_issues: get_string(details, "known_issues"),
        pr_links: get_links(details, "pr_links"),
        design_links: get_links(details, "design_links"),
        code_quality_links: get_links(details, "code_quality_links"),
        additional_links: get_links(details, "additional_links"),
    }
}

fn get_string(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn get_level(map: &Map<String, Value>, key: &str) -> Level {
    map.get(key)
        .and_then(Value::as_str)
        .map(Level::parse_or_low)
        .unwrap_or_default()
}

fn get_links(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};
    use chrono::NaiveDate;

    fn sample_record() -> ReleaseRecord {
        let mut record = ReleaseRecord {
            release_date: Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            contact: "Alice".to_string(),
            services: Vec::new(),
        };

        let mut billing = ServiceEntry::new("Billing");
        billing.config_only = true;
        billing.risk_level = Level::High;
        billing.benefit_level = Level::Medium;
        billing.version = "2.4.1".to_string();
        billing.change_description = "Reworked invoice batching.\nSecond line.".to_string();
        billing.known_issues = "Retries may duplicate webhooks".to_string();
        billing.pr_links = vec!["https://x/1".to_string(), "https://x/2".to_string()];
        billing.design_links = vec!["https://design/doc".to_string()];
        record.add_service(billing);

        record.add_service(ServiceEntry::new("Auth"));
        record
    }

    fn encode_json(json: &str) -> String {
        general_purpose::STANDARD.encode(json.as_bytes())
    }

    #[test]
    fn test_round_trip() {
        let record = sample_record();
        let decoded = decode(&encode(&record)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_round_trip_preserves_service_order() {
        let record = sample_record();
        let decoded = decode(&encode(&record)).unwrap();
        assert_eq!(decoded.service_names(), vec!["Billing", "Auth"]);
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let err = decode("not base64 at all!!!").unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_decode_rejects_non_object_payload() {
        let err = decode(&encode_json("[1, 2, 3]")).unwrap_err();
        assert!(matches!(err, CodecError::Schema(_)));

        let err = decode(&encode_json("not json")).unwrap_err();
        assert!(matches!(err, CodecError::Schema(_)));
    }

    #[test]
    fn test_decode_trims_surrounding_whitespace() {
        let record = sample_record();
        let portable = format!("  {}\n", encode(&record));
        assert_eq!(decode(&portable).unwrap(), record);
    }

    #[test]
    fn test_decode_defaults_on_absent_fields() {
        // An older-schema export: no version, benefit_level, known_issues
        // or change_description on the service entry.
        let json = r#"{
            "release_date": "2023-11-05",
            "contact": "Bob",
            "services": {
                "Billing": {
                    "config_only": true,
                    "risk_level": "Medium",
                    "pr_links": ["https://x/9"]
                }
            }
        }"#;
        let record = decode(&encode_json(json)).unwrap();

        let billing = record.service("Billing").unwrap();
        assert!(billing.config_only);
        assert_eq!(billing.risk_level, Level::Medium);
        assert_eq!(billing.benefit_level, Level::Low);
        assert_eq!(billing.version, "");
        assert_eq!(billing.known_issues, "");
        assert_eq!(billing.change_description, "");
        assert_eq!(billing.pr_links, vec!["https://x/9"]);
        assert!(billing.design_links.is_empty());
        assert!(billing.additional_links.is_empty());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let json = r#"{
            "contact": "Bob",
            "reviewed_by": "Carol",
            "services": {
                "Auth": {"rollback_plan": "none", "risk_level": "High"}
            }
        }"#;
        let record = decode(&encode_json(json)).unwrap();
        assert_eq!(record.contact, "Bob");
        assert_eq!(record.service("Auth").unwrap().risk_level, Level::High);
    }

    #[test]
    fn test_decode_unparseable_date_yields_none() {
        let json = r#"{"release_date": "not-a-date", "contact": "Bob", "services": {}}"#;
        let record = decode(&encode_json(json)).unwrap();
        assert_eq!(record.release_date, None);
        assert_eq!(record.contact, "Bob");
    }

    #[test]
    fn test_decode_missing_services_yields_empty() {
        let record = decode(&encode_json(r#"{"contact": "Bob"}"#)).unwrap();
        assert!(record.services.is_empty());
    }

    #[test]
    fn test_encode_is_single_printable_line() {
        let portable = encode(&sample_record());
        assert!(!portable.contains('\n'));
        assert!(portable.is_ascii());
    }
}
