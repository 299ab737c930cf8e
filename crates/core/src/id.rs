//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a persisted record (party, document, product, project...).
///
/// Business crates wrap it in their own newtype so ids of different records
/// cannot be mixed up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for EntityId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<EntityId> for Uuid {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("EntityId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Declares a record-specific identifier wrapping [`EntityId`].
///
/// ```ignore
/// backoffice_core::typed_id!(
///     /// Document identifier.
///     DocumentId
/// );
/// ```
#[macro_export]
macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $crate::EntityId);

        impl $name {
            pub fn new(id: $crate::EntityId) -> Self {
                Self(id)
            }

            /// Fresh identifier, for records created in memory.
            pub fn generate() -> Self {
                Self($crate::EntityId::new())
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<$crate::EntityId>().map(Self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::typed_id!(
        /// Test-only id.
        SampleId
    );

    #[test]
    fn parses_uuid_strings() {
        let id = EntityId::new();
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_malformed_ids() {
        let err = "not-a-uuid".parse::<SampleId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("EntityId")),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }
}
