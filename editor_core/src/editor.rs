//! In-memory editor engine

use crate::buffer::{utf16_len, TextBuffer, TextRange};
use crate::engine::{EditorEngine, PointerPosition};
use crate::error::EditorError;
use crate::snapshot::{EditorSnapshot, HoverState};

/// Plain-text editor engine
///
/// Keeps just enough state for the bridge to be exercised end to end: the
/// document, a main selection, the read-only flag and pointer hover.
/// Read-only only gates user input; programmatic edits still apply.
#[derive(Debug, Clone, Default)]
pub struct TextEditor {
    buffer: TextBuffer,
    selection: TextRange,
    read_only: bool,
    hover: HoverState,
    revision: u64,
}

impl TextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.reset(text, false);
        editor
    }

    /// Moves the main selection
    pub fn select(&mut self, range: TextRange) -> Result<(), EditorError> {
        if !self.buffer.contains_range(range) {
            return Err(self.range_error(range));
        }
        self.selection = range;
        Ok(())
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Counts document changes, including no-op resets
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Captures the current state
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            text: self.buffer.as_str().to_string(),
            selection: self.selection,
            read_only: self.read_only,
            line_count: self.buffer.line_count(),
            hover: self.hover.clone(),
        }
    }

    fn range_error(&self, range: TextRange) -> EditorError {
        EditorError::Range {
            from: range.from as i64,
            to: range.to as i64,
            len: self.buffer.len(),
        }
    }
}

impl EditorEngine for TextEditor {
    fn reset(&mut self, text: &str, read_only: bool) {
        self.buffer = TextBuffer::from_string(text.to_string());
        self.read_only = read_only;
        self.selection = TextRange::caret(0);
        self.revision += 1;
    }

    fn text(&self) -> String {
        self.buffer.as_str().to_string()
    }

    fn read_only(&self) -> bool {
        self.read_only
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn selection(&self) -> TextRange {
        self.selection
    }

    fn selected_lines(&self) -> TextRange {
        self.buffer
            .line_range(self.selection)
            .unwrap_or_else(|| TextRange::new(0, self.buffer.len()))
    }

    fn replace_range(&mut self, range: TextRange, text: &str) -> Result<(), EditorError> {
        if !self.buffer.replace(range, text) {
            return Err(self.range_error(range));
        }
        self.selection = TextRange::caret(range.from + utf16_len(text));
        self.revision += 1;
        Ok(())
    }

    fn pointer_entered(&mut self, at: PointerPosition) {
        self.hover.inside = true;
        self.hover.last = Some((at.x, at.y));
        self.hover.entered += 1;
    }

    fn pointer_exited(&mut self, at: PointerPosition) {
        self.hover.inside = false;
        self.hover.last = Some((at.x, at.y));
        self.hover.exited += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::granularity::ReplaceGranularity;
    use proptest::prelude::*;

    #[test]
    fn test_reset_is_idempotent() {
        let mut editor = TextEditor::new();
        editor.reset("abc", false);
        assert_eq!(editor.text(), "abc");
        editor.reset("abc", false);
        assert_eq!(editor.text(), "abc");
        assert!(!editor.read_only());
        assert_eq!(editor.selection(), TextRange::caret(0));
    }

    #[test]
    fn test_clear_keeps_read_only() {
        let mut editor = TextEditor::new();
        editor.reset("draft", true);
        editor.clear();
        assert_eq!(editor.text(), "");
        assert!(editor.read_only());
    }

    #[test]
    fn test_programmatic_edits_ignore_read_only() {
        let mut editor = TextEditor::new();
        editor.reset("", true);
        editor.insert("hi", 0, 0).unwrap();
        assert_eq!(editor.text(), "hi");
    }

    #[test]
    fn test_insert_range_errors() {
        let mut editor = TextEditor::with_text("abc");
        assert_eq!(
            editor.insert("x", 5, 2),
            Err(EditorError::Range {
                from: 5,
                to: 2,
                len: 3
            })
        );
        assert!(editor.insert("x", 0, 4).is_err());
        assert!(editor.insert("x", -1, 0).is_err());
        assert_eq!(editor.text(), "abc");
    }

    #[test]
    fn test_insert_inside_surrogate_pair_fails() {
        let mut editor = TextEditor::with_text("😀");
        assert!(matches!(
            editor.insert("x", 1, 1),
            Err(EditorError::Range { .. })
        ));
        editor.insert("x", 2, 2).unwrap();
        assert_eq!(editor.text(), "😀x");
    }

    #[test]
    fn test_insert_moves_caret() {
        let mut editor = TextEditor::new();
        editor.insert("hello", 0, 0).unwrap();
        assert_eq!(editor.selection(), TextRange::caret(5));
    }

    #[test]
    fn test_hello_then_replace_line() {
        let mut editor = TextEditor::new();
        editor.insert("hello", 0, 0).unwrap();
        assert_eq!(editor.text(), "hello");
        editor.replace_scope("", ReplaceGranularity::Line);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_replace_line_keeps_other_lines() {
        let mut editor = TextEditor::with_text("one\ntwo\nthree");
        editor.select(TextRange::caret(5)).unwrap();
        editor.replace_scope("2", ReplaceGranularity::Line);
        assert_eq!(editor.text(), "one\n2\nthree");
        assert_eq!(editor.selection(), TextRange::caret(5));
    }

    #[test]
    fn test_replace_selection_and_document() {
        let mut editor = TextEditor::with_text("hello world");
        editor.select(TextRange::new(6, 11)).unwrap();
        editor.replace_scope("there", ReplaceGranularity::Selection);
        assert_eq!(editor.text(), "hello there");

        editor.replace_scope("bye", ReplaceGranularity::WholeDocument);
        assert_eq!(editor.text(), "bye");
    }

    #[test]
    fn test_select_rejects_invalid_range() {
        let mut editor = TextEditor::with_text("abc");
        assert!(editor.select(TextRange::new(2, 1)).is_err());
        assert!(editor.select(TextRange::new(0, 9)).is_err());
    }

    #[test]
    fn test_hover_tracking() {
        let mut editor = TextEditor::new();
        let at = PointerPosition { x: 10.0, y: 20.5 };
        editor.pointer_entered(at);
        editor.pointer_entered(at);
        assert!(editor.hover().inside);
        editor.pointer_exited(PointerPosition { x: 0.0, y: 0.0 });
        assert!(!editor.hover().inside);
        assert_eq!(editor.hover().entered, 2);
        assert_eq!(editor.hover().exited, 1);
        assert_eq!(editor.hover().last, Some((0.0, 0.0)));
    }

    #[test]
    fn test_snapshot() {
        let mut editor = TextEditor::with_text("a\nb");
        editor.select(TextRange::new(0, 1)).unwrap();
        let snapshot = editor.snapshot();
        assert_eq!(snapshot.text, "a\nb");
        assert_eq!(snapshot.line_count, 2);
        assert_eq!(snapshot.selection, TextRange::new(0, 1));
    }

    proptest! {
        #[test]
        fn prop_insert_matches_string_splice(
            base in "[a-z\\n]{0,20}",
            insert in "[a-z]{0,5}",
            a in 0usize..=20,
            b in 0usize..=20,
        ) {
            let len = base.len();
            let (from, to) = (a.min(b).min(len), a.max(b).min(len));
            let mut editor = TextEditor::with_text(&base);
            editor.insert(&insert, from as i64, to as i64).unwrap();

            let mut expected = base.clone();
            expected.replace_range(from..to, &insert);
            prop_assert_eq!(editor.text(), expected);
            prop_assert_eq!(editor.len(), editor.text().encode_utf16().count());
        }
    }
}
