// ── Entity identity types ──
//
// Every platform entity is addressed by a (type, UUID) pair. The type
// selects the REST path segment for scoped queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ── EntityType ──────────────────────────────────────────────────────

/// Kind of platform entity an [`EntityId`] refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Tenant,
    Customer,
    User,
    Device,
    Asset,
    EntityView,
    Edge,
    Alarm,
    /// Any type this crate has no dedicated variant for.
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tenant => "TENANT",
            Self::Customer => "CUSTOMER",
            Self::User => "USER",
            Self::Device => "DEVICE",
            Self::Asset => "ASSET",
            Self::EntityView => "ENTITY_VIEW",
            Self::Edge => "EDGE",
            Self::Alarm => "ALARM",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "TENANT" => Self::Tenant,
            "CUSTOMER" => Self::Customer,
            "USER" => Self::User,
            "DEVICE" => Self::Device,
            "ASSET" => Self::Asset,
            "ENTITY_VIEW" => Self::EntityView,
            "EDGE" => Self::Edge,
            "ALARM" => Self::Alarm,
            _ => Self::Other(s),
        }
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        t.as_str().to_owned()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── EntityId ────────────────────────────────────────────────────────

/// Canonical reference to a platform entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub entity_type: EntityType,
    pub id: Uuid,
}

impl EntityId {
    pub fn new(entity_type: EntityType, id: Uuid) -> Self {
        Self { entity_type, id }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.id)
    }
}

/// Error returned when an `EntityId` string is not `TYPE:UUID`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected TYPE:UUID (e.g. DEVICE:784f394c-42b6-435a-983c-b7beff2784f9), got '{0}'")]
pub struct ParseEntityIdError(pub String);

impl FromStr for EntityId {
    type Err = ParseEntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| ParseEntityIdError(s.to_owned()))?;
        if kind.is_empty() {
            return Err(ParseEntityIdError(s.to_owned()));
        }
        let id = Uuid::parse_str(id.trim()).map_err(|_| ParseEntityIdError(s.to_owned()))?;
        Ok(Self::new(EntityType::from(kind.trim().to_owned()), id))
    }
}
