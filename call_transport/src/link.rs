//! Frame links

use crate::error::LinkError;

/// Fire-and-forget delivery of one serialized frame to the far side
///
/// On the native side this wraps script evaluation in the web view; on the
/// web side it wraps posting a message to the native host. Implementations
/// must preserve send order.
pub trait Link: Send + Sync {
    fn send(&self, frame: String) -> Result<(), LinkError>;
}
