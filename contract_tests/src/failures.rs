//! Failure contract tests
//!
//! Failure kind names are matched by the far side as strings.
