//! Append-only question/answer transcript

use serde::Serialize;

/// One question and the answer it received
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    question: String,
    answer: String,
}

impl TranscriptEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Chronological log of answered questions.
///
/// Entries can only be appended; nothing is ever removed, edited or reordered.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a reference to it
    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) -> &TranscriptEntry {
        self.entries.push(TranscriptEntry::new(question, answer));
        &self.entries[self.entries.len() - 1]
    }

    /// All entries in insertion order
    pub fn all(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a markdown block suitable for copy/paste
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "**You:** {}\n**Chatbot:** {}\n\n",
                entry.question, entry.answer
            ));
        }
        out
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_append_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.append("first?", "one");
        let entry = transcript.append("second?", "two");
        assert_eq!(entry.question(), "second?");

        let questions: Vec<&str> = transcript.iter().map(|e| e.question()).collect();
        assert_eq!(questions, vec!["first?", "second?"]);
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut transcript = Transcript::new();
        transcript.append("same?", "same");
        transcript.append("same?", "same");
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_to_markdown() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.to_markdown(), "");

        transcript.append("What is it?", "A report.");
        assert_eq!(transcript.to_markdown(), "**You:** What is it?\n**Chatbot:** A report.\n\n");
    }

    proptest! {
        #[test]
        fn test_append_only(pairs in proptest::collection::vec((".{0,20}", ".{0,40}"), 0..30)) {
            let mut transcript = Transcript::new();
            let mut snapshots: Vec<Vec<TranscriptEntry>> = Vec::new();

            for (q, a) in &pairs {
                transcript.append(q.as_str(), a.as_str());
                snapshots.push(transcript.all().to_vec());
            }

            prop_assert_eq!(transcript.len(), pairs.len());
            for snapshot in &snapshots {
                prop_assert!(transcript.all().starts_with(snapshot));
            }
            for (entry, (q, a)) in transcript.iter().zip(&pairs) {
                prop_assert_eq!(entry.question(), q.as_str());
                prop_assert_eq!(entry.answer(), a.as_str());
            }
        }
    }
}
