//! Storage abstraction for bug-bounty program records.
//!
//! Provides the [`ProgramStore`] trait defining the storage contract that all
//! backends implement, plus the [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: Program, ProgramRelation, ids, enums and ordering
//! - [`traits`]: ProgramStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::ProgramStore;
pub use types::{
    AssetType, Eligibility, NewProgram, NewProgramRelation, Program, ProgramId, ProgramOrder,
    ProgramRelation, RelationId, SortColumn, SortDirection,
};
