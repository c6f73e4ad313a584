//! ProgramService: the single coordinator between HTTP handlers and the
//! record store.
//!
//! All business logic flows through [`ProgramService`]. Handlers are thin
//! wrappers that parse requests and delegate to these methods. The store is
//! injected at construction, so tests and the binary can hand in different
//! backends.
//!
//! Methods are synchronous and may block on I/O; async callers should run
//! them on the blocking pool.

use std::sync::Arc;

use serde_json::Value;

use bounty_storage::{NewProgramRelation, Program, ProgramId, ProgramStore, StorageError};

use crate::error::ServiceError;
use crate::query::ListQuery;
use crate::schema::programs::{Pagination, ProgramListResponse};
use crate::validation::validate_create_payload;

/// Coordinates listing, lookup, creation and deletion of programs.
#[derive(Clone)]
pub struct ProgramService {
    store: Arc<dyn ProgramStore>,
}

impl ProgramService {
    /// Creates a service over the given store handle.
    pub fn new(store: Arc<dyn ProgramStore>) -> Self {
        ProgramService { store }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<dyn ProgramStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// Returns one page of programs plus pagination metadata.
    ///
    /// The count and the page fetch are separate store calls without a
    /// shared snapshot: a concurrent insert or delete can land between them,
    /// so `totalCount` and the returned rows may disagree by that change.
    pub fn list_programs(&self, query: &ListQuery) -> Result<ProgramListResponse, ServiceError> {
        let total_count = self.store.count_programs()?;
        let pagination = Pagination::compute(query.page, query.limit, total_count);
        let programs = self
            .store
            .list_programs(query.order(), query.limit, query.offset())?;
        Ok(ProgramListResponse {
            programs,
            pagination,
        })
    }

    // -----------------------------------------------------------------------
    // Single items
    // -----------------------------------------------------------------------

    /// Fetches one program.
    ///
    /// A raw id that is not a valid key fails in the storage layer and comes
    /// back as [`ServiceError::Storage`], not [`ServiceError::NotFound`].
    pub fn get_program(&self, raw_id: &str) -> Result<Program, ServiceError> {
        let id: ProgramId = raw_id.parse()?;
        self.store.get_program(id)?.ok_or(ServiceError::NotFound)
    }

    /// Deletes one program (and, through the store, its relations) and
    /// returns the deleted row.
    ///
    /// Relies on the store's atomic delete-returning: there is no lookup
    /// before the delete, so concurrent callers for the same id get exactly
    /// one success and `NotFound` for the rest.
    pub fn delete_program(&self, raw_id: &str) -> Result<Program, ServiceError> {
        let id: ProgramId = raw_id.parse()?;
        let deleted = self
            .store
            .delete_program(id)?
            .into_iter()
            .next()
            .ok_or(ServiceError::NotFound)?;
        tracing::info!(program_id = %deleted.id, "program deleted");
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Validates a JSON payload and inserts the program and its relations.
    ///
    /// The relation rows are a second, separate insert. If it fails the
    /// program row stays in place and the error is returned.
    pub fn create_program(&self, payload: &Value) -> Result<Program, ServiceError> {
        let create = validate_create_payload(payload).map_err(ServiceError::ValidationFailed)?;

        let program = self.store.insert_program(&create.program)?;
        tracing::info!(program_id = %program.id, name = %program.name, "program created");

        if !create.related_programs.is_empty() {
            let relations: Vec<NewProgramRelation> = create
                .related_programs
                .iter()
                .map(|&related_program_id| NewProgramRelation {
                    parent_program_id: program.id,
                    related_program_id,
                })
                .collect();
            self.store.insert_relations(&relations).inspect_err(|err| {
                tracing::warn!(
                    program_id = %program.id,
                    error = %err,
                    "program created but related programs were not linked"
                );
            })?;
        }

        Ok(program)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Releases the store at shutdown.
    pub fn close(&self) -> Result<(), StorageError> {
        self.store.close()
    }
}
