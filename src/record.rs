//! Wire types exchanged with the trace backend
//!
//! A raw call record is a JSON object whose keys are either the reserved
//! `subcalls` marker or a call name mapped to its formatted duration:
//!
//! ```json
//! {"Foo.run()":"1200ms","subcalls":[{"Bar.load()":"300ms"}]}
//! ```
//!
//! Instead of inspecting keys at use sites, the object is decoded once into an
//! ordered list of tagged [`RecordEntry`] values which the parser then merges.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Reserved key holding nested records
pub const SUBCALLS_KEY: &str = "subcalls";

/// One key of a raw call record, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEntry {
    /// `name -> "duration"` pair
    Call { name: String, duration: String },
    /// The reserved children list
    Children(Vec<CallRecord>),
    /// A key whose value is not a duration string, or a `subcalls` that is not a list
    Unusable { key: String },
}

/// Raw call record as produced by the backend
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallRecord {
    entries: Vec<RecordEntry>,
}

impl CallRecord {
    pub fn new(entries: Vec<RecordEntry>) -> Self {
        Self { entries }
    }

    /// Convenience constructor for a leaf or inner call
    pub fn call(name: &str, duration: &str, children: Option<Vec<CallRecord>>) -> Self {
        let mut entries = vec![RecordEntry::Call {
            name: name.to_string(),
            duration: duration.to_string(),
        }];
        if let Some(children) = children {
            entries.push(RecordEntry::Children(children));
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    /// Nested records under the reserved key, if present
    pub fn children(&self) -> Option<&[CallRecord]> {
        self.entries.iter().rev().find_map(|e| match e {
            RecordEntry::Children(children) => Some(children.as_slice()),
            _ => None,
        })
    }

    pub fn into_children(self) -> Option<Vec<CallRecord>> {
        self.entries.into_iter().rev().find_map(|e| match e {
            RecordEntry::Children(children) => Some(children),
            _ => None,
        })
    }

    /// Walk a child-index path down from this record
    pub fn descend(&self, path: &[usize]) -> Option<&CallRecord> {
        let mut current = self;
        for &index in path {
            current = current.children()?.get(index)?;
        }
        Some(current)
    }
}

/// Decode a `subcalls` value without failing on bad elements
///
/// A non-list value yields `None`. Elements that are not objects become empty
/// records, which the parser skips as malformed while their siblings keep
/// their indices.
fn records_from_value(value: Value) -> Option<Vec<CallRecord>> {
    let Value::Array(items) = value else {
        return None;
    };
    let records = items
        .into_iter()
        .map(|item| {
            CallRecord::deserialize(item).unwrap_or_else(|e| {
                tracing::debug!("Unusable subcall record: {}", e);
                CallRecord::default()
            })
        })
        .collect();
    Some(records)
}

fn lenient_subcalls<'de, D>(deserializer: D) -> Result<Vec<CallRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(records_from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

impl<'de> Deserialize<'de> for CallRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = CallRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a call record object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CallRecord, A::Error> {
                let mut entries = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == SUBCALLS_KEY {
                        match records_from_value(map.next_value()?) {
                            Some(children) => entries.push(RecordEntry::Children(children)),
                            None => entries.push(RecordEntry::Unusable { key }),
                        }
                        continue;
                    }
                    match map.next_value::<Value>()? {
                        Value::String(duration) => entries.push(RecordEntry::Call {
                            name: key,
                            duration,
                        }),
                        _ => entries.push(RecordEntry::Unusable { key }),
                    }
                }
                Ok(CallRecord { entries })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

impl Serialize for CallRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        for entry in &self.entries {
            match entry {
                RecordEntry::Call { name, duration } => map.serialize_entry(name, duration)?,
                RecordEntry::Children(children) => map.serialize_entry(SUBCALLS_KEY, children)?,
                RecordEntry::Unusable { key } => map.serialize_entry(key, &Value::Null)?,
            }
        }
        map.end()
    }
}

/// One entry of the top-level listing of a trace file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelCall {
    pub name: String,
    pub duration: String,
    pub line_number: u64,
    pub has_child: bool,
}

/// Response of a subcall fetch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubcallsResponse {
    #[serde(default, deserialize_with = "lenient_subcalls")]
    pub subcalls: Vec<CallRecord>,
}

/// Entry of the recent-files listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFile {
    pub path: String,
}

/// Currently active trace file on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFile {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keeps_key_order() {
        let record: CallRecord =
            serde_json::from_str(r#"{"a":"5ms","subcalls":[{"b":"1ms"}],"c":"7ms"}"#).unwrap();
        assert_eq!(record.entries().len(), 3);
        assert!(matches!(&record.entries()[0], RecordEntry::Call { name, .. } if name == "a"));
        assert!(matches!(&record.entries()[1], RecordEntry::Children(c) if c.len() == 1));
        assert!(matches!(&record.entries()[2], RecordEntry::Call { name, .. } if name == "c"));
    }

    #[test]
    fn test_decode_marks_non_string_values() {
        let record: CallRecord = serde_json::from_str(r#"{"a":12}"#).unwrap();
        assert_eq!(
            record.entries(),
            &[RecordEntry::Unusable { key: "a".into() }]
        );
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(serde_json::from_str::<CallRecord>("[1,2]").is_err());
    }

    #[test]
    fn test_descend_walks_child_indices() {
        let record: CallRecord = serde_json::from_str(
            r#"{"root":"10ms","subcalls":[{"x":"1ms"},{"y":"2ms","subcalls":[{"z":"1ms"}]}]}"#,
        )
        .unwrap();
        let z = record.descend(&[1, 0]).unwrap();
        assert_eq!(
            z.entries(),
            &[RecordEntry::Call {
                name: "z".into(),
                duration: "1ms".into()
            }]
        );
        assert!(record.descend(&[0, 0]).is_none());
        assert!(record.descend(&[5]).is_none());
        assert_eq!(record.descend(&[]), Some(&record));
    }

    #[test]
    fn test_non_object_subcall_becomes_empty_record() {
        let response: SubcallsResponse =
            serde_json::from_str(r#"{"subcalls":[{"good":"50ms"},7,{"also":"60ms"}]}"#).unwrap();
        assert_eq!(response.subcalls.len(), 3);
        assert!(response.subcalls[1].entries().is_empty());
        assert_eq!(response.subcalls[2].entries().len(), 1);
    }

    #[test]
    fn test_non_list_subcalls_is_unusable() {
        let record: CallRecord = serde_json::from_str(r#"{"bad":"9ms","subcalls":null}"#).unwrap();
        assert!(record.children().is_none());
        assert_eq!(
            record.entries()[1],
            RecordEntry::Unusable {
                key: SUBCALLS_KEY.into()
            }
        );

        let response: SubcallsResponse = serde_json::from_str(r#"{"subcalls":"oops"}"#).unwrap();
        assert!(response.subcalls.is_empty());
    }

    #[test]
    fn test_bad_grandchild_keeps_outer_record() {
        let record: CallRecord = serde_json::from_str(
            r#"{"main()":"1200ms","subcalls":[{"ok()":"300ms"},{"x()":"1ms","subcalls":[42]}]}"#,
        )
        .unwrap();
        let children = record.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].children().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_subcalls_response_defaults_to_empty() {
        let response: SubcallsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.subcalls.is_empty());
    }

    #[test]
    fn test_top_level_call_uses_backend_field_names() {
        let call: TopLevelCall = serde_json::from_str(
            r#"{"lineNumber":3,"hasChild":true,"name":"Foo.run()","duration":"12ms"}"#,
        )
        .unwrap();
        assert_eq!(call.line_number, 3);
        assert!(call.has_child);
    }

    #[test]
    fn test_serialize_round_trips_shape() {
        let record = CallRecord::call("a", "5ms", Some(vec![CallRecord::call("b", "1ms", None)]));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"a":"5ms","subcalls":[{"b":"1ms"}]}"#);
    }
}
