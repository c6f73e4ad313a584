//! In-memory implementation of [`ProgramStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! servers. It keeps the same observable semantics as the SQLite backend:
//! insertion-order tie breaking, cascading relation deletes, referential
//! checks on relation insert, and atomic delete-returning.

use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::ProgramStore;
use crate::types::{
    NewProgram, NewProgramRelation, Program, ProgramId, ProgramOrder, ProgramRelation,
    RelationId, SortColumn, SortDirection,
};

/// Tables held by the in-memory backend. Vectors keep insertion order, which
/// plays the role of SQLite's rowid.
#[derive(Debug, Default)]
struct Tables {
    programs: Vec<Program>,
    relations: Vec<ProgramRelation>,
}

impl Tables {
    fn contains(&self, id: ProgramId) -> bool {
        self.programs.iter().any(|p| p.id == id)
    }

    fn insert(&mut self, program: &NewProgram) -> Program {
        let now = Utc::now();
        let row = Program {
            id: ProgramId::generate(),
            name: program.name.clone(),
            start_date: program.start_date,
            website: program.website.clone(),
            twitter: program.twitter.clone(),
            asset_type: program.asset_type,
            identifier: program.identifier.clone(),
            description: program.description.clone(),
            eligibility: program.eligibility,
            created_at: now,
            updated_at: now,
        };
        self.programs.push(row.clone());
        row
    }
}

/// In-memory implementation of [`ProgramStore`].
///
/// Every operation holds the table lock for its whole duration, which makes
/// each call atomic with respect to the others.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn compare(order: ProgramOrder, a: &Program, b: &Program) -> Ordering {
    match order.column {
        SortColumn::Name => a.name.cmp(&b.name),
        SortColumn::StartDate => a.start_date.cmp(&b.start_date),
        SortColumn::Eligibility => a.eligibility.cmp(&b.eligibility),
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

impl ProgramStore for InMemoryStore {
    fn insert_program(&self, program: &NewProgram) -> Result<Program, StorageError> {
        Ok(self.tables()?.insert(program))
    }

    fn insert_programs(&self, programs: &[NewProgram]) -> Result<Vec<Program>, StorageError> {
        let mut tables = self.tables()?;
        Ok(programs.iter().map(|p| tables.insert(p)).collect())
    }

    fn insert_relations(
        &self,
        relations: &[NewProgramRelation],
    ) -> Result<Vec<ProgramRelation>, StorageError> {
        let mut tables = self.tables()?;
        // Check every row before writing any, so a bad batch leaves no trace.
        for relation in relations {
            for id in [relation.parent_program_id, relation.related_program_id] {
                if !tables.contains(id) {
                    return Err(StorageError::IntegrityError {
                        reason: format!("relation references missing program {id}"),
                    });
                }
            }
        }
        let now = Utc::now();
        let inserted: Vec<ProgramRelation> = relations
            .iter()
            .map(|relation| ProgramRelation {
                id: RelationId(Uuid::new_v4()),
                parent_program_id: relation.parent_program_id,
                related_program_id: relation.related_program_id,
                created_at: now,
                updated_at: now,
            })
            .collect();
        tables.relations.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    fn get_program(&self, id: ProgramId) -> Result<Option<Program>, StorageError> {
        let tables = self.tables()?;
        Ok(tables.programs.iter().find(|p| p.id == id).cloned())
    }

    fn list_programs(
        &self,
        order: ProgramOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Program>, StorageError> {
        let tables = self.tables()?;
        let mut rows: Vec<&Program> = tables.programs.iter().collect();
        // Stable sort keeps insertion order among equal keys; reversing the
        // ascending result then yields reversed insertion order for ties.
        rows.sort_by(|a, b| compare(order, a, b));
        if order.direction == SortDirection::Desc {
            rows.reverse();
        }
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn count_programs(&self) -> Result<u64, StorageError> {
        Ok(self.tables()?.programs.len() as u64)
    }

    fn list_relations(&self) -> Result<Vec<ProgramRelation>, StorageError> {
        Ok(self.tables()?.relations.clone())
    }

    fn delete_program(&self, id: ProgramId) -> Result<Vec<Program>, StorageError> {
        let mut tables = self.tables()?;
        let Some(position) = tables.programs.iter().position(|p| p.id == id) else {
            return Ok(Vec::new());
        };
        let removed = tables.programs.remove(position);
        tables
            .relations
            .retain(|r| r.parent_program_id != id && r.related_program_id != id);
        Ok(vec![removed])
    }

    fn delete_all_programs(&self) -> Result<u64, StorageError> {
        let mut tables = self.tables()?;
        let removed = tables.programs.len() as u64;
        tables.programs.clear();
        tables.relations.clear();
        Ok(removed)
    }
}
