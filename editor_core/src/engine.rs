//! The editing collaborator behind the bridge

use crate::buffer::TextRange;
use crate::error::EditorError;
use crate::granularity::ReplaceGranularity;

/// Pointer position reported with hover notifications, in view pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// The editor engine the bridge forwards operations to
///
/// Only the primitives are required; the composite operations are defined
/// in terms of them.
pub trait EditorEngine: Send {
    /// Replaces the whole document and the read-only flag
    fn reset(&mut self, text: &str, read_only: bool);

    fn text(&self) -> String;

    fn read_only(&self) -> bool;

    /// Document length in UTF-16 code units
    fn len(&self) -> usize;

    /// Main selection
    fn selection(&self) -> TextRange;

    /// Full lines covered by the main selection, without the trailing newline
    fn selected_lines(&self) -> TextRange;

    /// Replaces a range and puts the caret after the inserted text
    fn replace_range(&mut self, range: TextRange, text: &str) -> Result<(), EditorError>;

    fn pointer_entered(&mut self, at: PointerPosition);

    fn pointer_exited(&mut self, at: PointerPosition);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the document, keeping the read-only flag
    fn clear(&mut self) {
        let read_only = self.read_only();
        self.reset("", read_only);
    }

    /// Replaces `[from, to)`
    ///
    /// Positions arrive as signed wire integers, so negative values are
    /// range errors rather than conversion failures.
    fn insert(&mut self, text: &str, from: i64, to: i64) -> Result<(), EditorError> {
        let len = self.len();
        let range_error = || EditorError::Range { from, to, len };
        let from_u = usize::try_from(from).map_err(|_| range_error())?;
        let to_u = usize::try_from(to).map_err(|_| range_error())?;
        if from_u > to_u || to_u > len {
            return Err(range_error());
        }
        self.replace_range(TextRange::new(from_u, to_u), text)
    }

    /// Replaces the scope a granularity selects
    fn replace_scope(&mut self, text: &str, granularity: ReplaceGranularity) {
        let range = match granularity {
            ReplaceGranularity::Line => self.selected_lines(),
            ReplaceGranularity::Selection => self.selection(),
            ReplaceGranularity::WholeDocument => TextRange::new(0, self.len()),
        };
        // Scopes come from the engine itself, so they are always valid.
        if let Err(err) = self.replace_range(range, text) {
            tracing::warn!(%err, ?granularity, "engine produced an invalid scope");
        }
    }
}
