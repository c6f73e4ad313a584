//! The [`ProgramStore`] trait defining the storage contract for programs.
//!
//! All backends (InMemoryStore, SqliteStore) implement this trait, so the
//! service layer can be handed either one without changing its logic.
//!
//! Methods take `&self`: a store is shared across concurrently running
//! requests and is responsible for the atomicity of each individual call.
//! No method spans more than one call in a transaction.

use crate::error::StorageError;
use crate::types::{
    NewProgram, NewProgramRelation, Program, ProgramId, ProgramOrder, ProgramRelation,
};

/// The storage contract for program records.
pub trait ProgramStore: Send + Sync {
    // -------------------------------------------------------------------
    // Inserts
    // -------------------------------------------------------------------

    /// Inserts one program and returns the stored row, including the
    /// generated id and timestamps.
    fn insert_program(&self, program: &NewProgram) -> Result<Program, StorageError>;

    /// Inserts several programs atomically, returning rows in input order.
    fn insert_programs(&self, programs: &[NewProgram]) -> Result<Vec<Program>, StorageError>;

    /// Inserts relation rows atomically. Both ends of every relation must
    /// already exist.
    fn insert_relations(
        &self,
        relations: &[NewProgramRelation],
    ) -> Result<Vec<ProgramRelation>, StorageError>;

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Fetches a single program by id.
    fn get_program(&self, id: ProgramId) -> Result<Option<Program>, StorageError>;

    /// Fetches up to `limit` programs in `order`, skipping `offset` rows.
    fn list_programs(
        &self,
        order: ProgramOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Program>, StorageError>;

    /// Counts every stored program.
    fn count_programs(&self) -> Result<u64, StorageError>;

    /// Lists every stored relation, oldest first.
    fn list_relations(&self) -> Result<Vec<ProgramRelation>, StorageError>;

    // -------------------------------------------------------------------
    // Deletes
    // -------------------------------------------------------------------

    /// Deletes a program and returns the deleted rows in one atomic step.
    ///
    /// An empty result means nothing matched. Of several concurrent calls
    /// for the same id, exactly one observes the deleted row. Relations
    /// referencing the program on either end are removed with it.
    fn delete_program(&self, id: ProgramId) -> Result<Vec<Program>, StorageError>;

    /// Deletes every program (and therefore every relation). Returns the
    /// number of programs removed.
    fn delete_all_programs(&self) -> Result<u64, StorageError>;

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Flushes and releases backend resources at shutdown.
    fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
