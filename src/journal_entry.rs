use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mood::Mood;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub mood: Mood,
    pub text: String,
    /// Image embedded as a `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl JournalEntry {
    /// Creates an entry stamped with a fresh time-ordered id and the current time.
    pub fn new(mood: Mood, text: String, photo: Option<String>, tags: Vec<String>) -> Self {
        JournalEntry {
            id: Uuid::now_v7().to_string(),
            date: Utc::now(),
            mood,
            text,
            photo,
            tags,
        }
    }

    pub fn local_date(&self) -> DateTime<Local> {
        self.date.with_timezone(&Local)
    }

    /// Case-insensitive substring match against the text or any tag.
    /// `query` must already be lowercased.
    pub fn matches(&self, query: &str) -> bool {
        self.text.to_lowercase().contains(query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_records_written_by_a_browser_build() {
        let json = r#"{
            "id": "1718000000000",
            "date": "2024-06-10T06:13:20.000Z",
            "mood": "GOOD",
            "text": "Had a great walk",
            "tags": ["outdoors"]
        }"#;
        let entry: JournalEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "1718000000000");
        assert_eq!(entry.mood, Mood::Good);
        assert_eq!(entry.photo, None);
        assert_eq!(entry.tags, vec!["outdoors".to_string()]);
        assert_eq!(entry.date.to_rfc3339(), "2024-06-10T06:13:20+00:00");
    }

    #[test]
    fn absent_photo_is_not_written() {
        let entry = JournalEntry::new(Mood::Meh, "fine".into(), None, vec![]);
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("photo").is_none());
        assert_eq!(value["mood"], "MEH");
    }

    #[test]
    fn ids_are_unique() {
        let a = JournalEntry::new(Mood::Rad, "a".into(), None, vec![]);
        let b = JournalEntry::new(Mood::Rad, "b".into(), None, vec![]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn matches_text_or_tags_ignoring_case() {
        let entry = JournalEntry::new(
            Mood::Good,
            "A Calm morning".into(),
            None,
            vec!["Outdoors".into()],
        );
        assert!(entry.matches("calm"));
        assert!(entry.matches("door"));
        assert!(entry.matches(""));
        assert!(!entry.matches("storm"));
    }
}
