//! Operations of the editor-facing core module

use crate::granularity::ReplaceGranularity;
use module_contract::{Delivery, Operation};
use wire_codec::{wire_record, DomainInt, EnumTag};

wire_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct EmptyParams {}
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ResetEditorParams {
        pub text: String => "text",
        pub read_only: bool => "readOnly",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct InsertTextParams {
        pub text: String => "text",
        pub from: DomainInt => "from",
        pub to: DomainInt => "to",
    }
}

wire_record! {
    /// The granularity stays unresolved until the operation runs, so an
    /// unknown tag is an editor error rather than malformed parameters.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ReplaceTextParams {
        pub text: String => "text",
        pub granularity: EnumTag<ReplaceGranularity> => "granularity",
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct MouseParams {
        pub client_x: f64 => "clientX",
        pub client_y: f64 => "clientY",
    }
}

/// Replaces the document and read-only flag
pub struct ResetEditor;

impl Operation for ResetEditor {
    const NAME: &'static str = "resetEditor";
    type Params = ResetEditorParams;
    type Output = ();
}

/// Empties the document, keeping the read-only flag
pub struct ClearEditor;

impl Operation for ClearEditor {
    const NAME: &'static str = "clearEditor";
    type Params = EmptyParams;
    type Output = ();
}

pub struct GetEditorText;

impl Operation for GetEditorText {
    const NAME: &'static str = "getEditorText";
    type Params = EmptyParams;
    type Output = String;
}

/// Replaces `[from, to)`; fails with a range error
pub struct InsertText;

impl Operation for InsertText {
    const NAME: &'static str = "insertText";
    const FALLIBLE: bool = true;
    type Params = InsertTextParams;
    type Output = ();
}

/// Replaces the scope a granularity selects; fails on unknown tags
pub struct ReplaceText;

impl Operation for ReplaceText {
    const NAME: &'static str = "replaceText";
    const FALLIBLE: bool = true;
    type Params = ReplaceTextParams;
    type Output = ();
}

pub struct HandleMouseEntered;

impl Operation for HandleMouseEntered {
    const NAME: &'static str = "handleMouseEntered";
    const DELIVERY: Delivery = Delivery::Notification;
    type Params = MouseParams;
    type Output = ();
}

pub struct HandleMouseExited;

impl Operation for HandleMouseExited {
    const NAME: &'static str = "handleMouseExited";
    const DELIVERY: Delivery = Delivery::Notification;
    type Params = MouseParams;
    type Output = ();
}
