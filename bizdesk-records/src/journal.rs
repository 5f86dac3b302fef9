//! Notes and attachments kept on a record, and the timeline that merges them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{next_free_id, null_as_default};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NOTE: &str = "note";
const ATTACHMENT: &str = "attachment";

fn note_tag() -> String {
    NOTE.to_string()
}

fn attachment_tag() -> String {
    ATTACHMENT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Always `"note"`; kept so entries stay self-describing on disk.
    #[serde(rename = "type", default = "note_tag")]
    pub kind: String,
    pub id: u64,
    pub text: String,
    pub date: String,
}

/// An attached file. Only the name is kept; contents live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Always `"attachment"`.
    #[serde(rename = "type", default = "attachment_tag")]
    pub kind: String,
    pub id: u64,
    pub filename: String,
    pub date: String,
}

/// Notes and attachments for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Journal {
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub notes: Vec<Note>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub attachments: Vec<Attachment>,
}

impl Journal {
    fn next_id(&self) -> u64 {
        next_free_id(
            self.notes
                .iter()
                .map(|n| n.id)
                .chain(self.attachments.iter().map(|a| a.id)),
        )
    }

    /// Append a note dated `date`. Blank text is ignored.
    pub fn add_note(&mut self, text: &str, date: NaiveDate) -> Option<&Note> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.next_id();
        self.notes.push(Note {
            kind: note_tag(),
            id,
            text: text.to_string(),
            date: date.format(DATE_FORMAT).to_string(),
        });
        self.notes.last()
    }

    /// Record an attached file by name. A blank name is ignored.
    pub fn add_attachment(&mut self, filename: &str, date: NaiveDate) -> Option<&Attachment> {
        let filename = filename.trim();
        if filename.is_empty() {
            return None;
        }
        let id = self.next_id();
        self.attachments.push(Attachment {
            kind: attachment_tag(),
            id,
            filename: filename.to_string(),
            date: date.format(DATE_FORMAT).to_string(),
        });
        self.attachments.last()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.attachments.is_empty()
    }

    /// Notes and attachments together, newest date first.
    ///
    /// Entries sharing a date keep notes ahead of attachments, each in the
    /// order they were added.
    pub fn timeline(&self) -> Vec<TimelineEntry<'_>> {
        let mut entries: Vec<_> = self
            .notes
            .iter()
            .map(TimelineEntry::Note)
            .chain(self.attachments.iter().map(TimelineEntry::Attachment))
            .collect();
        entries.sort_by(|a, b| b.date().cmp(a.date()));
        entries
    }
}

/// A note or attachment. Serializes as the entry itself, which carries its
/// own `"type"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TimelineEntry<'a> {
    Note(&'a Note),
    Attachment(&'a Attachment),
}

impl TimelineEntry<'_> {
    pub fn date(&self) -> &str {
        match self {
            TimelineEntry::Note(n) => &n.date,
            TimelineEntry::Attachment(a) => &a.date,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TimelineEntry::Note(_) => NOTE,
            TimelineEntry::Attachment(_) => ATTACHMENT,
        }
    }

    /// The note text or the attachment's file name.
    pub fn summary(&self) -> &str {
        match self {
            TimelineEntry::Note(n) => &n.text,
            TimelineEntry::Attachment(a) => &a.filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn journal() -> Journal {
        let mut j = Journal::default();
        j.add_note("Initial call made.", day("2024-06-01"));
        j.add_note("Sent product brochure.", day("2024-06-03"));
        j.add_attachment("brochure.pdf", day("2024-06-03"));
        j
    }

    #[test]
    fn timeline_is_newest_first() {
        let j = journal();
        let timeline = j.timeline();
        let summaries: Vec<_> = timeline.iter().map(|e| e.summary()).collect();
        assert_eq!(
            summaries,
            vec!["Sent product brochure.", "brochure.pdf", "Initial call made."]
        );
    }

    #[test]
    fn ids_are_unique_across_notes_and_attachments() {
        let j = journal();
        let mut ids: Vec<_> = j
            .notes
            .iter()
            .map(|n| n.id)
            .chain(j.attachments.iter().map(|a| a.id))
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn blank_note_is_ignored() {
        let mut j = Journal::default();
        assert!(j.add_note("   ", day("2024-06-01")).is_none());
        assert!(j.add_attachment("", day("2024-06-01")).is_none());
        assert!(j.is_empty());
    }

    #[test]
    fn stored_entries_keep_their_type_key() {
        let raw = serde_json::json!({
            "notes": [{"id": 1, "type": "note", "text": "Met at expo.", "date": "2024-06-01"}],
            "attachments": [{"id": 2, "type": "attachment", "filename": "card.png", "date": "2024-06-02"}]
        });
        let j: Journal = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&j).unwrap(), raw);
    }

    #[test]
    fn entries_without_type_key_get_one() {
        let j: Journal = serde_json::from_str(
            r#"{"notes":[{"id":1,"text":"x","date":"2024-06-01"}],"attachments":null}"#,
        )
        .unwrap();
        assert_eq!(j.notes[0].kind, "note");
        assert!(j.attachments.is_empty());
    }

    #[test]
    fn note_ids_do_not_overflow() {
        let mut j = Journal::default();
        j.notes.push(Note {
            kind: note_tag(),
            id: u64::MAX,
            text: "last".into(),
            date: "2024-06-01".into(),
        });
        let id = j.add_note("next", day("2024-06-02")).unwrap().id;
        assert_eq!(id, 1);
    }

    #[test]
    fn timeline_entries_serialize_with_type_tag() {
        let j = journal();
        let json = serde_json::to_value(j.timeline()[1]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "attachment", "id": 3, "filename": "brochure.pdf", "date": "2024-06-03"})
        );
    }
}
