//! Editor snapshot for deterministic parity testing

use crate::buffer::TextRange;
use serde::{Deserialize, Serialize};

/// Pointer hover state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    pub inside: bool,
    /// Last reported pointer position
    pub last: Option<(f64, f64)>,
    pub entered: u64,
    pub exited: u64,
}

/// Complete editor state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub text: String,
    pub selection: TextRange,
    pub read_only: bool,
    pub line_count: usize,
    pub hover: HoverState,
}
