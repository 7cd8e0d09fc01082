//! Unique identifiers for bridge entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an editor surface
///
/// A surface is one hosted web view running the editor engine. Every
/// surface owns its own module registry and transport, so two windows
/// never share routing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    /// Creates a new random surface ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a surface ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Surface({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_id_creation() {
        let id1 = SurfaceId::new();
        let id2 = SurfaceId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_surface_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = SurfaceId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn test_surface_id_display() {
        let id = SurfaceId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("Surface("));
    }

    #[test]
    fn test_surface_id_serializes_as_uuid() {
        let id = SurfaceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}
