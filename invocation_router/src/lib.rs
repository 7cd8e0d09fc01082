//! # Invocation Router
//!
//! Turns typed calls into envelopes on the way out, and envelopes into
//! handler calls on the way in.
//!
//! ## Philosophy
//!
//! - **Symmetric**: both sides run the same router; either can host modules
//!   and either can call the other
//! - **Handlers see only valid input**: parameters are checked against the
//!   declared shape before any handler runs
//! - **Malformed vs rejected**: callers can always tell "my request was
//!   wrong" from "the far side refused it" via the failure category
//! - **Never silence**: every acknowledged call ends in a typed success or a
//!   typed failure

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod router;

pub use dispatcher::Dispatcher;
pub use error::InvocationError;
pub use handle::ModuleHandle;
pub use router::InvocationRouter;
