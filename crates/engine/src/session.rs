//! Editor session: one document, one history stack, one active
//! representation.
//!
//! The session is the only writer of its document. Every successful
//! mutation of header or row content pushes a (deduplicated) history
//! snapshot and emits a change notification; overlay-only changes notify
//! without touching history.

use crate::codec::{ParseError, TextCodec};
use crate::document::{Document, DocumentModel};
use crate::events::{EventCallback, SessionEvent};
use crate::history::HistoryStack;

/// Which representation of the document is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Grid of cells.
    Structured,
    /// Single delimited-text blob.
    RawText,
    /// Raw text that failed to parse on the last switch attempt. The
    /// buffer holds the user's text verbatim until it parses again.
    RawTextError,
}

pub struct EditorSession {
    pub(crate) model: DocumentModel,
    history: HistoryStack,
    codec: Box<dyn TextCodec>,
    view: ViewMode,
    raw_text: Option<String>,
    parse_error: Option<ParseError>,
    pub(crate) selection: Option<(usize, usize)>,
    revision: u64,
    observers: Vec<EventCallback>,
    dirty: bool,
}

impl EditorSession {
    pub fn new(doc: Document, codec: Box<dyn TextCodec>) -> Self {
        let mut history = HistoryStack::new();
        history.push(doc.clone());
        Self {
            model: DocumentModel::new(doc),
            history,
            codec,
            view: ViewMode::Structured,
            raw_text: None,
            parse_error: None,
            selection: None,
            revision: 0,
            observers: Vec::new(),
            dirty: false,
        }
    }

    /// Open a session directly in the error state, preserving raw text
    /// that failed to parse (e.g. a malformed file opened from disk).
    pub fn recovering(codec: Box<dyn TextCodec>, raw_text: String, error: ParseError) -> Self {
        let mut session = Self::new(Document::new(), codec);
        session.view = ViewMode::RawTextError;
        session.raw_text = Some(raw_text);
        session.parse_error = Some(error);
        session
    }

    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    pub fn document(&self) -> &Document {
        self.model.document()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    /// The raw-text buffer, present only while a raw view is active.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Monotonic change counter; bumped on every notification.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn subscribe(&mut self, callback: EventCallback) {
        self.observers.push(callback);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // =========================================================================
    // Content mutation (structured mode only)
    // =========================================================================

    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> bool {
        if self.view != ViewMode::Structured {
            return false;
        }
        if self.model.set_cell(row, col, value) {
            self.commit();
            true
        } else {
            false
        }
    }

    pub fn insert_rows(&mut self, at: usize, count: usize) -> bool {
        if self.view != ViewMode::Structured {
            return false;
        }
        if self.model.insert_rows(at, count) {
            self.commit();
            true
        } else {
            false
        }
    }

    pub fn remove_rows(&mut self, at: usize, count: usize) -> bool {
        if self.view != ViewMode::Structured {
            return false;
        }
        if self.model.remove_rows(at, count) {
            self.commit();
            true
        } else {
            false
        }
    }

    pub fn insert_columns(&mut self, at: usize, count: usize) -> bool {
        if self.view != ViewMode::Structured {
            return false;
        }
        if self.model.insert_columns(at, count) {
            self.commit();
            true
        } else {
            false
        }
    }

    pub fn remove_columns(&mut self, at: usize, count: usize) -> bool {
        if self.view != ViewMode::Structured {
            return false;
        }
        if self.model.remove_columns(at, count) {
            self.commit();
            true
        } else {
            false
        }
    }

    pub fn set_header(&mut self, col: usize, name: &str) -> bool {
        if self.view != ViewMode::Structured {
            return false;
        }
        if self.model.set_header(col, name) {
            self.commit();
            true
        } else {
            false
        }
    }

    /// Replace the whole document (file open / reload). Resets history
    /// and the error state, and marks the session clean.
    pub fn replace_document(&mut self, doc: Document) {
        self.model.replace_document(doc);
        self.history.clear();
        self.history.push(self.model.document().clone());
        self.view = ViewMode::Structured;
        self.raw_text = None;
        self.parse_error = None;
        self.selection = None;
        self.notify();
        self.dirty = false;
    }

    // =========================================================================
    // Overlay mutation (no history; layout is independent of content)
    // =========================================================================

    pub fn set_row_color(&mut self, row: usize, color: Option<&str>) {
        self.model.set_row_color(row, color);
        self.notify();
    }

    pub fn set_row_colors<I>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (usize, String)>,
    {
        self.model.set_row_colors(mapping);
        self.notify();
    }

    pub fn set_custom_row_height(&mut self, row: usize, height: Option<u32>) {
        self.model.set_custom_row_height(row, height);
        self.notify();
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    /// Restore the previous snapshot. Overlay entries are kept (and
    /// re-normalized against the restored row count); they are not part
    /// of history.
    pub fn undo(&mut self) -> bool {
        if self.view != ViewMode::Structured {
            return false;
        }
        let snapshot = match self.history.undo() {
            Some(snapshot) => snapshot.clone(),
            None => return false,
        };
        self.model.replace_document(snapshot);
        self.notify();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.view != ViewMode::Structured {
            return false;
        }
        let snapshot = match self.history.redo() {
            Some(snapshot) => snapshot.clone(),
            None => return false,
        };
        self.model.replace_document(snapshot);
        self.notify();
        true
    }

    // =========================================================================
    // Dual-view synchronization
    // =========================================================================

    /// Switch to the raw-text representation and return the text to
    /// display. From structured mode this serializes the document; if a
    /// raw view is already active (including the error state) the
    /// preserved buffer is returned verbatim, so invalid edits survive
    /// view toggles.
    pub fn enter_raw_text(&mut self) -> &str {
        if self.view == ViewMode::Structured {
            let text = self.codec.serialize(self.model.document());
            self.raw_text = Some(text);
            self.view = ViewMode::RawText;
        }
        self.raw_text.as_deref().unwrap_or("")
    }

    /// Replace the raw-text buffer (one call per editor change). No
    /// reparse happens until a mode switch is attempted. Fails in
    /// structured mode.
    pub fn update_raw_text(&mut self, text: &str) -> bool {
        match self.view {
            ViewMode::RawText | ViewMode::RawTextError => {
                self.raw_text = Some(text.to_string());
                self.dirty = true;
                true
            }
            ViewMode::Structured => false,
        }
    }

    /// Attempt to switch to the structured representation by parsing the
    /// raw buffer. On failure the switch is rejected: the session stays
    /// in the error state, the buffer is untouched, and the previous
    /// valid document remains current.
    pub fn to_structured(&mut self) -> Result<(), ParseError> {
        if self.view == ViewMode::Structured {
            return Ok(());
        }
        let text = self.raw_text.clone().unwrap_or_default();
        match self.codec.parse(&text) {
            Ok(doc) => {
                self.model.replace_document(doc);
                self.view = ViewMode::Structured;
                self.raw_text = None;
                self.parse_error = None;
                self.selection = None;
                self.commit();
                Ok(())
            }
            Err(err) => {
                self.view = ViewMode::RawTextError;
                self.parse_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Structured access guard used by search, selection and other
    /// cell-coordinate operations. Equivalent to [`Self::to_structured`].
    pub fn ensure_structured(&mut self) -> Result<(), ParseError> {
        self.to_structured()
    }

    /// Serialize the current content for saving. In a raw view this is
    /// the buffer itself (so a save in the error state preserves the
    /// user's text); in structured mode the document is serialized.
    pub fn save_text(&self) -> String {
        match self.raw_text {
            Some(ref text) => text.clone(),
            None => self.codec.serialize(self.model.document()),
        }
    }

    /// Select a cell within the current extents. Requires structured
    /// access; a pending parse error blocks the selection.
    pub fn select_cell(&mut self, row: usize, col: usize) -> bool {
        if self.ensure_structured().is_err() {
            return false;
        }
        if row >= self.model.row_count() || col >= self.model.column_count() {
            return false;
        }
        self.selection = Some((row, col));
        true
    }

    // =========================================================================

    /// History push + notification, after a successful content mutation.
    pub(crate) fn commit(&mut self) {
        self.history.push(self.model.document().clone());
        self.notify();
    }

    pub(crate) fn notify(&mut self) {
        self.revision += 1;
        self.dirty = true;
        for observer in &mut self.observers {
            observer(SessionEvent::DocumentChanged);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Minimal newline/comma codec for engine-internal tests. The real
    /// delimited codec (with quoting) lives in the io crate.
    pub(crate) struct PlainCodec;

    impl TextCodec for PlainCodec {
        fn parse(&self, text: &str) -> Result<Document, ParseError> {
            let records: Vec<Vec<String>> = text
                .lines()
                .map(|line| line.split(',').map(str::to_string).collect())
                .collect();
            let mut records = records.into_iter();
            let header: Vec<String> = match records.next() {
                Some(header) => header,
                None => return Ok(Document::new()),
            };
            let expected = header.len();
            let mut rows = Vec::new();
            for (idx, record) in records.enumerate() {
                if record.len() != expected {
                    return Err(ParseError {
                        line: idx + 2,
                        expected,
                        actual: record.len(),
                    });
                }
                rows.push(record);
            }
            Ok(Document { header, rows })
        }

        fn serialize(&self, doc: &Document) -> String {
            let mut out = String::new();
            if !doc.header.is_empty() {
                out.push_str(&doc.header.join(","));
                out.push('\n');
            }
            for row in &doc.rows {
                out.push_str(&row.join(","));
                out.push('\n');
            }
            out
        }
    }

    pub(crate) fn session_2x2() -> EditorSession {
        let doc = Document {
            header: vec!["a".into(), "b".into()],
            rows: vec![
                vec!["1".into(), "2".into()],
                vec!["3".into(), "4".into()],
            ],
        };
        EditorSession::new(doc, Box::new(PlainCodec))
    }

    #[test]
    fn test_mutation_pushes_history_and_notifies() {
        let mut session = session_2x2();
        let fired = Rc::new(Cell::new(0));
        let observed = fired.clone();
        session.subscribe(Box::new(move |_| observed.set(observed.get() + 1)));

        assert!(session.set_cell(0, 0, "changed"));
        assert_eq!(fired.get(), 1);
        assert!(session.can_undo());

        // Same content again: notification fires, history dedups
        let len = session.history_len();
        assert!(session.set_cell(0, 0, "changed"));
        assert_eq!(fired.get(), 2);
        assert_eq!(session.history_len(), len);
    }

    #[test]
    fn test_undo_redo_restores_content() {
        let mut session = session_2x2();
        session.set_cell(0, 0, "x");
        session.set_cell(0, 0, "y");

        assert!(session.undo());
        assert_eq!(session.model().get_cell(0, 0), "x");
        assert!(session.undo());
        assert_eq!(session.model().get_cell(0, 0), "1");
        assert!(!session.undo());

        assert!(session.redo());
        assert_eq!(session.model().get_cell(0, 0), "x");
    }

    #[test]
    fn test_undo_does_not_restore_overlay() {
        let mut session = session_2x2();
        session.set_cell(0, 0, "x");
        session.set_row_color(0, Some("red"));

        session.undo();
        // Content went back, the color stayed: layout is outside history
        assert_eq!(session.model().get_cell(0, 0), "1");
        assert_eq!(session.model().row_color(0), Some("red"));
    }

    #[test]
    fn test_raw_text_round_trip() {
        let mut session = session_2x2();
        let text = session.enter_raw_text().to_string();
        assert_eq!(text, "a,b\n1,2\n3,4\n");
        assert_eq!(session.view_mode(), ViewMode::RawText);

        assert!(session.update_raw_text("a,b\n9,9\n"));
        assert!(session.to_structured().is_ok());
        assert_eq!(session.view_mode(), ViewMode::Structured);
        assert_eq!(session.model().get_cell(0, 0), "9");
        assert!(session.can_undo());
    }

    #[test]
    fn test_parse_failure_preserves_text_and_document() {
        let mut session = session_2x2();
        session.enter_raw_text();
        let corrupted = "a,b\n1,2,3\n";
        session.update_raw_text(corrupted);

        let err = session.to_structured().unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.expected, 2);
        assert_eq!(err.actual, 3);
        assert_eq!(session.view_mode(), ViewMode::RawTextError);

        // The buffer holds the corrupted text verbatim; the last valid
        // document is untouched
        assert_eq!(session.raw_text(), Some(corrupted));
        assert_eq!(session.model().get_cell(0, 0), "1");

        // Toggling views does not re-serialize over the broken text
        assert_eq!(session.enter_raw_text(), corrupted);

        // Keystrokes keep updating the preserved buffer without reparsing
        assert!(session.update_raw_text("a,b\n1,2\n"));
        assert_eq!(session.parse_error().map(|e| e.line), Some(2));

        // Once fixed, the switch succeeds and the error clears
        assert!(session.to_structured().is_ok());
        assert!(session.parse_error().is_none());
    }

    #[test]
    fn test_structured_mutations_blocked_in_raw_mode() {
        let mut session = session_2x2();
        session.enter_raw_text();
        assert!(!session.set_cell(0, 0, "nope"));
        assert!(!session.insert_rows(0, 1));
        assert!(!session.undo());
    }

    #[test]
    fn test_select_cell_blocked_by_parse_error() {
        let mut session = session_2x2();
        session.enter_raw_text();
        session.update_raw_text("a,b\nonly-one-field\n");
        assert!(!session.select_cell(0, 0));
        assert_eq!(session.view_mode(), ViewMode::RawTextError);

        session.update_raw_text("a,b\nx,y\n");
        assert!(session.select_cell(0, 1));
        assert_eq!(session.selection(), Some((0, 1)));
    }

    #[test]
    fn test_select_cell_parses_raw_buffer_first() {
        let mut session = session_2x2();
        session.enter_raw_text();
        session.update_raw_text("a,b\nnew,row\n");
        assert!(session.select_cell(0, 0));
        assert_eq!(session.model().get_cell(0, 0), "new");
    }

    #[test]
    fn test_save_text_in_error_state_keeps_user_text() {
        let mut session = session_2x2();
        session.enter_raw_text();
        session.update_raw_text("broken,text,here\nx\n");
        let _ = session.to_structured();
        assert_eq!(session.save_text(), "broken,text,here\nx\n");
    }

    #[test]
    fn test_recovering_session_starts_in_error_state() {
        let err = ParseError { line: 3, expected: 2, actual: 4 };
        let session = EditorSession::recovering(
            Box::new(PlainCodec),
            "a,b\n1,2\n1,2,3,4\n".to_string(),
            err.clone(),
        );
        assert_eq!(session.view_mode(), ViewMode::RawTextError);
        assert_eq!(session.parse_error(), Some(&err));
        assert_eq!(session.document().row_count(), 0);
    }

    #[test]
    fn test_replace_document_resets_state() {
        let mut session = session_2x2();
        session.set_cell(0, 0, "edit");
        assert!(session.is_dirty());

        session.replace_document(Document::with_template());
        assert!(!session.is_dirty());
        assert!(!session.can_undo());
        assert_eq!(session.document().header, vec!["column1"]);
        assert_eq!(session.view_mode(), ViewMode::Structured);
    }
}
