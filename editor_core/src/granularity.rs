//! Replace granularity

use wire_codec::wire_enum;

wire_enum! {
    /// Scope a `replaceText` call applies to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ReplaceGranularity {
        /// Full lines covered by the main selection
        Line => "line",
        /// The main selection
        Selection => "selection",
        /// Everything
        WholeDocument => "wholeDocument",
    }
}
