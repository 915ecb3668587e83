//! Text encoding of the persisted task list.
//!
//! The payload is a JSON array of `{"id", "title", "completed"}` objects in
//! list order. There is no version field.

use crate::model::collection::TaskCollection;

pub fn encode(collection: &TaskCollection) -> serde_json::Result<String> {
    serde_json::to_string(collection)
}

/// Decodes a payload; duplicate or empty ids are rejected as corrupt.
///
/// Titles are taken as stored, including blank ones written before empty
/// titles were rejected at input.
pub fn decode(payload: &str) -> serde_json::Result<TaskCollection> {
    serde_json::from_str(payload)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::model::collection::TaskCollection;
    use crate::model::task::{Task, TaskId};

    #[test]
    fn encode_writes_three_field_records() {
        let mut task = Task::with_id(TaskId::new("1"), "Buy milk").unwrap();
        task.completed = true;
        let collection = TaskCollection::from_tasks(vec![task]).unwrap();

        let value: serde_json::Value = serde_json::from_str(&encode(&collection).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "id": "1", "title": "Buy milk", "completed": true }])
        );
    }

    #[test]
    fn decode_accepts_payloads_with_legacy_random_ids() {
        let payload = r#"[
            {"id":"0.6180339887","title":"Water plants","completed":false},
            {"id":"0.3141592653","title":"Call mom","completed":true}
        ]"#;
        let collection = decode(payload).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.as_slice()[0].id, TaskId::new("0.6180339887"));
        assert!(collection.as_slice()[1].completed);
    }

    #[test]
    fn decode_keeps_blank_titles_from_older_payloads() {
        let collection = decode(r#"[{"id":"0.5","title":"","completed":false}]"#).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.as_slice()[0].id, TaskId::new("0.5"));
        assert_eq!(collection.as_slice()[0].title, "");
    }

    #[test]
    fn decode_rejects_duplicate_ids() {
        let payload = r#"[
            {"id":"1","title":"a","completed":false},
            {"id":"1","title":"b","completed":false}
        ]"#;
        let err = decode(payload).unwrap_err();
        assert!(err.to_string().contains("duplicate task id"), "{err}");
    }

    #[test]
    fn decode_rejects_non_list_payload() {
        assert!(decode(r#"{"id":"1"}"#).is_err());
        assert!(decode("not json").is_err());
    }
}
