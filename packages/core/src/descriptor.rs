//! Immutable relationship descriptors
//!
//! A descriptor is built once, when the schema is assembled, and read by
//! the loader for the lifetime of the process. It carries everything the
//! batching layer needs to build a fetch for one relationship: the
//! local/remote key column pairs, cardinality, default ordering, and the
//! optional junction-table mapping for many-to-many relationships.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Stable identity of a relationship, used as registry and cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipId(String);

impl RelationshipId {
    /// Create a relationship id, conventionally `"Parent.field"`
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelationshipId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Cardinality of a relationship from the parent's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// At most one related row per parent
    ToOne,
    /// Zero or more related rows per parent
    ToMany,
}

/// Ordering direction for a sort column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending order (smallest first)
    #[default]
    Asc,
    /// Descending order (largest first)
    Desc,
}

/// One column of a relationship's declared ordering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortColumn {
    /// Column name on the target entity
    pub column: String,
    /// Sort direction
    pub direction: OrderDirection,
}

impl SortColumn {
    /// Ascending sort on the given column
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Descending sort on the given column
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Desc,
        }
    }
}

/// One local/remote column pair of a relationship's key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyColumnPair {
    /// Column on the parent entity
    pub local: String,
    /// Column on the target entity (or matched via the junction table)
    pub remote: String,
}

impl KeyColumnPair {
    /// Create a local/remote column pair
    pub fn new(local: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            remote: remote.into(),
        }
    }
}

/// Junction ("secondary") table mapping for many-to-many relationships
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryTable {
    /// Junction table name
    pub table: String,
    /// Junction columns holding the parent key, one per key pair
    pub parent_columns: Vec<String>,
    /// Junction columns joining to the target entity
    pub target_columns: Vec<String>,
}

impl SecondaryTable {
    /// Create a junction-table mapping
    pub fn new(
        table: impl Into<String>,
        parent_columns: Vec<String>,
        target_columns: Vec<String>,
    ) -> Self {
        Self {
            table: table.into(),
            parent_columns,
            target_columns,
        }
    }
}

/// Immutable description of one relationship
///
/// Validated on construction: misconfigured descriptors (no key pairs,
/// junction columns that do not line up) are rejected at schema-build
/// time rather than failing a batch later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDescriptor {
    id: RelationshipId,
    key_pairs: Vec<KeyColumnPair>,
    cardinality: Cardinality,
    order_by: Vec<SortColumn>,
    secondary: Option<SecondaryTable>,
}

impl RelationshipDescriptor {
    /// Create a descriptor for a plain (non-junction) relationship
    pub fn new(
        id: impl Into<RelationshipId>,
        key_pairs: Vec<KeyColumnPair>,
        cardinality: Cardinality,
    ) -> CoreResult<Self> {
        let id = id.into();
        if key_pairs.is_empty() {
            return Err(CoreError::EmptyKeyPairs {
                relationship: id.to_string(),
            });
        }
        Ok(Self {
            id,
            key_pairs,
            cardinality,
            order_by: Vec::new(),
            secondary: None,
        })
    }

    /// Set the default ordering columns
    pub fn order_by(mut self, order_by: Vec<SortColumn>) -> Self {
        self.order_by = order_by;
        self
    }

    /// Attach a junction-table mapping, making this a many-to-many
    /// relationship
    pub fn secondary(mut self, secondary: SecondaryTable) -> CoreResult<Self> {
        if secondary.parent_columns.len() != self.key_pairs.len() {
            return Err(CoreError::JunctionColumnMismatch {
                relationship: self.id.to_string(),
                table: secondary.table,
                expected: self.key_pairs.len(),
                actual: secondary.parent_columns.len(),
            });
        }
        if secondary.target_columns.is_empty() {
            return Err(CoreError::JunctionMissingTargetColumns {
                relationship: self.id.to_string(),
                table: secondary.table,
            });
        }
        self.secondary = Some(secondary);
        Ok(self)
    }

    /// Stable identity of this relationship
    pub fn id(&self) -> &RelationshipId {
        &self.id
    }

    /// Ordered local/remote key column pairs
    pub fn key_pairs(&self) -> &[KeyColumnPair] {
        &self.key_pairs
    }

    /// Column names on the remote side, in key order
    pub fn remote_columns(&self) -> Vec<String> {
        self.key_pairs
            .iter()
            .map(|pair| pair.remote.clone())
            .collect()
    }

    /// Cardinality from the parent's perspective
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Declared default ordering, possibly empty
    pub fn ordering(&self) -> &[SortColumn] {
        &self.order_by
    }

    /// Junction-table mapping, if this is a many-to-many relationship
    pub fn secondary_table(&self) -> Option<&SecondaryTable> {
        self.secondary.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pairs() -> Vec<KeyColumnPair> {
        vec![KeyColumnPair::new("id", "team_id")]
    }

    #[test]
    fn test_descriptor_requires_key_pairs() {
        let err = RelationshipDescriptor::new("Team.heroes", Vec::new(), Cardinality::ToMany);
        assert_matches!(err, Err(CoreError::EmptyKeyPairs { .. }));
    }

    #[test]
    fn test_descriptor_basic() {
        let descriptor =
            RelationshipDescriptor::new("Team.heroes", pairs(), Cardinality::ToMany).unwrap();
        assert_eq!(descriptor.id().as_str(), "Team.heroes");
        assert_eq!(descriptor.remote_columns(), vec!["team_id".to_string()]);
        assert!(descriptor.secondary_table().is_none());
    }

    #[test]
    fn test_junction_parent_columns_must_match_key_pairs() {
        let err = RelationshipDescriptor::new("Hero.powers", pairs(), Cardinality::ToMany)
            .unwrap()
            .secondary(SecondaryTable::new(
                "hero_powers",
                vec!["hero_id".into(), "extra".into()],
                vec!["power_id".into()],
            ));
        assert_matches!(err, Err(CoreError::JunctionColumnMismatch { expected: 1, actual: 2, .. }));
    }

    #[test]
    fn test_junction_requires_target_columns() {
        let err = RelationshipDescriptor::new("Hero.powers", pairs(), Cardinality::ToMany)
            .unwrap()
            .secondary(SecondaryTable::new("hero_powers", vec!["hero_id".into()], vec![]));
        assert_matches!(err, Err(CoreError::JunctionMissingTargetColumns { .. }));
    }

    #[test]
    fn test_valid_junction_descriptor() {
        let descriptor = RelationshipDescriptor::new("Hero.powers", pairs(), Cardinality::ToMany)
            .unwrap()
            .secondary(SecondaryTable::new(
                "hero_powers",
                vec!["hero_id".into()],
                vec!["power_id".into()],
            ))
            .unwrap();
        assert!(descriptor.secondary_table().is_some());
    }
}
