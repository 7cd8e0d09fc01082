//! Frame contract tests
//!
//! Invoke, reply and close frames exactly as they cross the link. The web
//! side parses these by hand, so any drift here is a breaking change.
