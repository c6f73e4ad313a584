//! SQLite implementation of [`ProgramStore`].
//!
//! [`SqliteStore`] keeps only the database path and opens a connection per
//! operation, so concurrent callers never share a `Connection` and never wait
//! on an in-process lock. Every mutation is a single statement (or a single
//! immediate transaction for batch inserts) and returns the affected rows via
//! `RETURNING`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::ProgramStore;
use crate::types::{
    AssetType, Eligibility, NewProgram, NewProgramRelation, Program, ProgramId, ProgramOrder,
    ProgramRelation, RelationId,
};

const PROGRAM_COLUMNS: &str = "id, name, start_date, website, twitter, asset_type, identifier, \
     description, eligibility, created_at, updated_at";

const RELATION_COLUMNS: &str =
    "id, parent_program_id, related_program_id, created_at, updated_at";

/// SQLite-backed implementation of [`ProgramStore`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path` and applies migrations.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        crate::schema::open_database(&path)?;
        Ok(SqliteStore { path })
    }

    /// The database file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        crate::schema::connect(&self.path)
    }

    fn insert_program_with(
        conn: &Connection,
        program: &NewProgram,
    ) -> Result<Program, StorageError> {
        let now = encode_timestamp(&Utc::now());
        let sql = format!(
            "INSERT INTO programs ({PROGRAM_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
             RETURNING {PROGRAM_COLUMNS}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let raw = stmt.query_row(
            params![
                ProgramId::generate().to_string(),
                program.name,
                encode_timestamp(&program.start_date),
                program.website,
                program.twitter,
                program.asset_type.map(AssetType::as_str),
                program.identifier,
                program.description,
                program.eligibility.as_str(),
                now,
            ],
            ProgramRow::from_row,
        )?;
        raw.decode()
    }
}

impl ProgramStore for SqliteStore {
    fn insert_program(&self, program: &NewProgram) -> Result<Program, StorageError> {
        let conn = self.connect()?;
        Self::insert_program_with(&conn, program)
    }

    fn insert_programs(&self, programs: &[NewProgram]) -> Result<Vec<Program>, StorageError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut inserted = Vec::with_capacity(programs.len());
        for program in programs {
            inserted.push(Self::insert_program_with(&tx, program)?);
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn insert_relations(
        &self,
        relations: &[NewProgramRelation],
    ) -> Result<Vec<ProgramRelation>, StorageError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = encode_timestamp(&Utc::now());
        let mut inserted = Vec::with_capacity(relations.len());
        {
            let sql = format!(
                "INSERT INTO program_relations ({RELATION_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 RETURNING {RELATION_COLUMNS}"
            );
            let mut stmt = tx.prepare(&sql)?;
            for relation in relations {
                let raw = stmt.query_row(
                    params![
                        Uuid::new_v4().to_string(),
                        relation.parent_program_id.to_string(),
                        relation.related_program_id.to_string(),
                        now,
                    ],
                    RelationRow::from_row,
                )?;
                inserted.push(raw.decode()?);
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn get_program(&self, id: ProgramId) -> Result<Option<Program>, StorageError> {
        let conn = self.connect()?;
        let sql = format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = ?1 LIMIT 1");
        let raw = conn
            .prepare(&sql)?
            .query_row(params![id.to_string()], ProgramRow::from_row)
            .optional()?;
        raw.map(ProgramRow::decode).transpose()
    }

    fn list_programs(
        &self,
        order: ProgramOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Program>, StorageError> {
        let conn = self.connect()?;
        // Column and direction come from closed enums, never from user text.
        let direction = order.direction.as_sql();
        let sql = format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs
             ORDER BY {column} {direction}, rowid {direction}
             LIMIT ?1 OFFSET ?2",
            column = order.column.column_name(),
        );
        // Past i64::MAX there are no rows left to return anyway.
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit, offset], ProgramRow::from_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?.decode()?);
        }
        Ok(result)
    }

    fn count_programs(&self) -> Result<u64, StorageError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM programs", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| StorageError::InvalidData {
            reason: format!("negative row count {count}"),
        })
    }

    fn list_relations(&self) -> Result<Vec<ProgramRelation>, StorageError> {
        let conn = self.connect()?;
        let sql = format!("SELECT {RELATION_COLUMNS} FROM program_relations ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], RelationRow::from_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?.decode()?);
        }
        Ok(result)
    }

    fn delete_program(&self, id: ProgramId) -> Result<Vec<Program>, StorageError> {
        let conn = self.connect()?;
        let sql = format!("DELETE FROM programs WHERE id = ?1 RETURNING {PROGRAM_COLUMNS}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![id.to_string()], ProgramRow::from_row)?;
        let mut deleted = Vec::new();
        for row in rows {
            deleted.push(row?.decode()?);
        }
        Ok(deleted)
    }

    fn delete_all_programs(&self) -> Result<u64, StorageError> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM programs", [])?;
        Ok(removed as u64)
    }

    fn close(&self) -> Result<(), StorageError> {
        let conn = self.connect()?;
        // Fold the WAL back into the main file so the database is
        // self-contained after shutdown.
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

/// Raw text columns of a `programs` row, before domain decoding.
struct ProgramRow {
    id: String,
    name: String,
    start_date: String,
    website: Option<String>,
    twitter: Option<String>,
    asset_type: Option<String>,
    identifier: String,
    description: Option<String>,
    eligibility: String,
    created_at: String,
    updated_at: String,
}

impl ProgramRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ProgramRow {
            id: row.get(0)?,
            name: row.get(1)?,
            start_date: row.get(2)?,
            website: row.get(3)?,
            twitter: row.get(4)?,
            asset_type: row.get(5)?,
            identifier: row.get(6)?,
            description: row.get(7)?,
            eligibility: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn decode(self) -> Result<Program, StorageError> {
        let asset_type = match self.asset_type.as_deref() {
            None => None,
            Some(raw) => Some(AssetType::parse(raw).ok_or_else(|| invalid("asset_type", raw))?),
        };
        let eligibility = Eligibility::parse(&self.eligibility)
            .ok_or_else(|| invalid("eligibility", &self.eligibility))?;
        Ok(Program {
            id: decode_id(&self.id)?,
            name: self.name,
            start_date: decode_timestamp("start_date", &self.start_date)?,
            website: self.website,
            twitter: self.twitter,
            asset_type,
            identifier: self.identifier,
            description: self.description,
            eligibility,
            created_at: decode_timestamp("created_at", &self.created_at)?,
            updated_at: decode_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

/// Raw text columns of a `program_relations` row.
struct RelationRow {
    id: String,
    parent_program_id: String,
    related_program_id: String,
    created_at: String,
    updated_at: String,
}

impl RelationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RelationRow {
            id: row.get(0)?,
            parent_program_id: row.get(1)?,
            related_program_id: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn decode(self) -> Result<ProgramRelation, StorageError> {
        let id = Uuid::parse_str(&self.id).map_err(|_| invalid("relation id", &self.id))?;
        Ok(ProgramRelation {
            id: RelationId(id),
            parent_program_id: decode_id(&self.parent_program_id)?,
            related_program_id: decode_id(&self.related_program_id)?,
            created_at: decode_timestamp("created_at", &self.created_at)?,
            updated_at: decode_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

/// Fixed-width RFC 3339 so that text order equals time order.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| invalid(column, raw))
}

fn decode_id(raw: &str) -> Result<ProgramId, StorageError> {
    Uuid::parse_str(raw)
        .map(ProgramId)
        .map_err(|_| invalid("program id", raw))
}

fn invalid(column: &str, raw: &str) -> StorageError {
    StorageError::InvalidData {
        reason: format!("unexpected {column} value {raw:?}"),
    }
}
