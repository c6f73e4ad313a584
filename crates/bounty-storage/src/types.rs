//! Storage-layer record types for programs and program relations.
//!
//! [`ProgramId`] lives here (not in the server) because the key format is a
//! storage concern: parsing a raw identifier fails with
//! [`StorageError::MalformedId`], the same way a database rejects a value
//! that does not fit its key column.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;

/// Unique identifier for a stored program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub Uuid);

impl ProgramId {
    /// Allocates a fresh random identifier.
    pub fn generate() -> Self {
        ProgramId(Uuid::new_v4())
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProgramId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(ProgramId)
            .map_err(|_| StorageError::MalformedId(s.to_string()))
    }
}

/// Unique identifier for a stored relation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationId(pub Uuid);

/// The kind of asset a program covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Web,
    Mobile,
}

impl AssetType {
    pub const ALL: [AssetType; 2] = [AssetType::Web, AssetType::Mobile];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Web => "web",
            AssetType::Mobile => "mobile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Whether a program currently accepts submissions.
///
/// Variant order matches the lexical order of the stored values, so sorting
/// by the enum and sorting by the column agree.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Eligibility {
    #[default]
    Eligible,
    Ineligible,
}

impl Eligibility {
    pub const ALL: [Eligibility; 2] = [Eligibility::Eligible, Eligibility::Ineligible];

    pub fn as_str(self) -> &'static str {
        match self {
            Eligibility::Eligible => "eligible",
            Eligibility::Ineligible => "ineligible",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == s)
    }
}

/// A persisted bug-bounty program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
    pub identifier: String,
    pub description: Option<String>,
    pub eligibility: Eligibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a program insert. Id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProgram {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub asset_type: Option<AssetType>,
    pub identifier: String,
    pub description: Option<String>,
    pub eligibility: Eligibility,
}

/// A directed link from a parent program to a related program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRelation {
    pub id: RelationId,
    pub parent_program_id: ProgramId,
    pub related_program_id: ProgramId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a relation insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewProgramRelation {
    pub parent_program_id: ProgramId,
    pub related_program_id: ProgramId,
}

/// Column a program listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    StartDate,
    Eligibility,
    CreatedAt,
}

impl SortColumn {
    /// The SQL column backing this sort key.
    pub fn column_name(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::StartDate => "start_date",
            SortColumn::Eligibility => "eligibility",
            SortColumn::CreatedAt => "created_at",
        }
    }
}

/// Direction of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordering applied to [`crate::ProgramStore::list_programs`].
///
/// Rows that compare equal on `column` keep insertion order (reversed for
/// `Desc`), so offset-based pages never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl ProgramOrder {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        ProgramOrder { column, direction }
    }
}

impl Default for ProgramOrder {
    fn default() -> Self {
        ProgramOrder::new(SortColumn::CreatedAt, SortDirection::Desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_id_parses_uuid() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        let id: ProgramId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn program_id_rejects_malformed_input() {
        for raw in ["invalid-uuid", "", "550e8400"] {
            let err = raw.parse::<ProgramId>().unwrap_err();
            assert!(matches!(err, StorageError::MalformedId(ref s) if s == raw));
        }
    }

    #[test]
    fn enums_round_trip_through_text() {
        for t in AssetType::ALL {
            assert_eq!(AssetType::parse(t.as_str()), Some(t));
        }
        for e in Eligibility::ALL {
            assert_eq!(Eligibility::parse(e.as_str()), Some(e));
        }
        assert_eq!(AssetType::parse("desktop"), None);
        assert_eq!(Eligibility::parse("Eligible"), None);
    }

    #[test]
    fn eligibility_order_matches_text_order() {
        assert!(Eligibility::Eligible < Eligibility::Ineligible);
        assert!(Eligibility::Eligible.as_str() < Eligibility::Ineligible.as_str());
    }

    #[test]
    fn program_serializes_with_camel_case_and_explicit_nulls() {
        let program = Program {
            id: ProgramId::generate(),
            name: "Acme".to_string(),
            start_date: Utc::now(),
            website: None,
            twitter: Some("@acme".to_string()),
            asset_type: Some(AssetType::Mobile),
            identifier: "com.acme.app".to_string(),
            description: None,
            eligibility: Eligibility::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&program).unwrap();
        assert_eq!(json["type"], "mobile");
        assert_eq!(json["eligibility"], "eligible");
        assert!(json["website"].is_null());
        assert!(json.get("startDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
