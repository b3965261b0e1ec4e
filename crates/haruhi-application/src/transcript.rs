//! In-memory conversation transcript.
//!
//! The transcript is the single source of truth for what a chat surface
//! currently shows. Use cases mutate it through `push`/`replace`/`clear`;
//! a front registers a [`TranscriptSink`] to hear about every visible change.

use haruhi_core::session::ChatMessage;
use std::sync::Arc;

/// Render seam between transcript state and a concrete front.
///
/// Implementations receive every visible change, in order. Assistant entries
/// may contain markup produced by the chat service; the transcript stores and
/// forwards them verbatim, so a front rendering into a markup-aware surface
/// must treat them as trusted service output.
pub trait TranscriptSink: Send + Sync {
    /// A single entry was appended to the current view.
    fn entry_appended(&self, entry: &ChatMessage);

    /// The whole view was replaced (session switch, new chat).
    fn view_replaced(&self, entries: &[ChatMessage]);
}

/// Ordered list of the chat entries currently on screen.
///
/// Not thread-safe on its own; owners wrap it in a `tokio::sync::Mutex`.
#[derive(Default)]
pub struct Transcript {
    entries: Vec<ChatMessage>,
    sink: Option<Arc<dyn TranscriptSink>>,
}

impl Transcript {
    /// Creates an empty transcript with no sink attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the sink that receives visible changes from now on.
    pub fn set_sink(&mut self, sink: Arc<dyn TranscriptSink>) {
        self.sink = Some(sink);
    }

    /// Appends one entry and notifies the sink.
    pub fn push(&mut self, entry: ChatMessage) {
        if let Some(sink) = &self.sink {
            sink.entry_appended(&entry);
        }
        self.entries.push(entry);
    }

    /// Replaces every entry at once and notifies the sink with the new view.
    pub fn replace(&mut self, entries: Vec<ChatMessage>) {
        self.entries = entries;
        if let Some(sink) = &self.sink {
            sink.view_replaced(&self.entries);
        }
    }

    /// Empties the view and notifies the sink.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Some(sink) = &self.sink {
            sink.view_replaced(&self.entries);
        }
    }

    /// The entries currently on screen, oldest first.
    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haruhi_core::session::MessageRole;
    use std::sync::Mutex;

    /// Sink double that records every notification it receives.
    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl TranscriptSink for RecordingSink {
        fn entry_appended(&self, entry: &ChatMessage) {
            self.events
                .lock()
                .unwrap()
                .push(format!("append:{}", entry.content));
        }

        fn view_replaced(&self, entries: &[ChatMessage]) {
            self.events
                .lock()
                .unwrap()
                .push(format!("replace:{}", entries.len()));
        }
    }

    #[test]
    fn test_push_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("first"));
        transcript.push(ChatMessage::assistant("second"));

        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, MessageRole::User);
        assert_eq!(entries[0].content, "first");
        assert_eq!(entries[1].role, MessageRole::Assistant);
        assert_eq!(entries[1].content, "second");
    }

    #[test]
    fn test_replace_drops_previous_entries() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("old"));

        transcript.replace(vec![
            ChatMessage::user("new question"),
            ChatMessage::assistant("new answer"),
        ]);

        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "new question");
        assert_eq!(entries[1].content, "new answer");
    }

    #[test]
    fn test_clear_empties_view() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("anything"));
        transcript.clear();

        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
    }

    #[test]
    fn test_sink_sees_changes_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let mut transcript = Transcript::new();
        transcript.set_sink(sink.clone());

        transcript.push(ChatMessage::user("hello"));
        transcript.replace(vec![
            ChatMessage::user("a"),
            ChatMessage::assistant("b"),
        ]);
        transcript.clear();

        let events = sink.events.lock().unwrap();
        assert_eq!(events.as_slice(), ["append:hello", "replace:2", "replace:0"]);
    }

    #[test]
    fn test_markup_is_stored_verbatim() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::assistant("<b>Hi!</b><br>More"));

        assert_eq!(transcript.entries()[0].content, "<b>Hi!</b><br>More");
    }
}
