//! JSON contact plan loader (§4.7, §6).
//!
//! A plan file's top-level object holds a `contacts` array; rows use
//! `source`/`dest`/`startTime`/`endTime`/`rate`, matching the field names
//! of the reference corpus's own `from_tvgutil_file` TVG loader rather
//! than this crate's internal `from`/`to`/`start`/`end` naming.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::contact::Contact;
use crate::error::{PlanError, PlanResult};
use crate::types::{NodeId, Rate, Time};

use super::ContactPlan;

#[derive(Debug, Deserialize, Default)]
struct RawContact {
    #[serde(default)]
    source: NodeId,
    #[serde(default)]
    dest: NodeId,
    #[serde(default, rename = "startTime")]
    start_time: Time,
    #[serde(default, rename = "endTime")]
    end_time: Time,
    #[serde(default)]
    rate: Rate,
}

#[derive(Debug, Deserialize, Default)]
struct RawPlan {
    #[serde(default)]
    contacts: Vec<RawContact>,
}

/// Loads a contact plan from the JSON document at `path`.
///
/// `max_contacts`, if given, truncates the plan to its first N rows after
/// parsing (in file order) — useful for bounding memory on very large
/// plans without a second pass over the source file.
///
/// # Panics
///
/// Panics if any row's `endTime` does not exceed its `startTime`: a
/// malformed contact is a defect in the plan file, not a recoverable
/// runtime condition (§7).
pub fn load_contact_plan<P: AsRef<Path>>(path: P, max_contacts: Option<usize>) -> PlanResult<ContactPlan> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(PlanError::Io)?;
    let raw: RawPlan = serde_json::from_str(&text).map_err(PlanError::Malformed)?;

    let mut rows = raw.contacts;
    if let Some(max) = max_contacts {
        rows.truncate(max);
    }

    let contacts: Vec<Contact> = rows
        .into_iter()
        .map(|row| Contact::new(row.source, row.dest, row.start_time, row.end_time, row.rate))
        .collect();

    info!(path = %path.display(), contacts = contacts.len(), "loaded contact plan");
    Ok(ContactPlan::new(contacts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_plan(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp plan file");
        file.write_all(json.as_bytes()).expect("write temp plan file");
        file
    }

    #[test]
    fn loads_contacts_with_expected_field_mapping() {
        let file = write_plan(
            r#"{"contacts": [
                {"source": 1, "dest": 2, "startTime": 0, "endTime": 100, "rate": 10},
                {"source": 2, "dest": 3, "startTime": 0, "endTime": 50, "rate": 5}
            ]}"#,
        );
        let plan = load_contact_plan(file.path(), None).expect("valid plan");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.contacts()[0].from(), 1);
        assert_eq!(plan.contacts()[0].to(), 2);
        assert_eq!(plan.contacts()[1].end(), 50);
    }

    #[test]
    fn missing_contacts_key_yields_an_empty_plan() {
        let file = write_plan(r#"{}"#);
        let plan = load_contact_plan(file.path(), None).expect("valid plan");
        assert!(plan.is_empty());
    }

    #[test]
    fn max_contacts_truncates_in_file_order() {
        let file = write_plan(
            r#"{"contacts": [
                {"source": 1, "dest": 2, "startTime": 0, "endTime": 10, "rate": 1},
                {"source": 2, "dest": 3, "startTime": 0, "endTime": 10, "rate": 1},
                {"source": 3, "dest": 4, "startTime": 0, "endTime": 10, "rate": 1}
            ]}"#,
        );
        let plan = load_contact_plan(file.path(), Some(2)).expect("valid plan");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.contacts()[1].to(), 3);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let file = write_plan(
            r#"{"contacts": [
                {"source": 1, "dest": 2, "startTime": 0, "endTime": 10, "rate": 1, "note": "irrelevant"}
            ]}"#,
        );
        let plan = load_contact_plan(file.path(), None).expect("valid plan");
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn malformed_json_surfaces_as_plan_error() {
        let file = write_plan(r#"{"contacts": [ this is not json ] }"#);
        let err = load_contact_plan(file.path(), None).unwrap_err();
        assert!(matches!(err, PlanError::Malformed(_)));
    }

    #[test]
    fn missing_file_surfaces_as_io_error() {
        let err = load_contact_plan("/nonexistent/path/plan.json", None).unwrap_err();
        assert!(matches!(err, PlanError::Io(_)));
    }
}
