// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded order database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: lowercase email → serialized StoredUser
//! - `orders`: order id (u64) → serialized StoredOrder
//! - `owner_order_index`: composite key (owner|!id) → order id
//! - `sequences`: sequence name → last allocated value
//!
//! Ownership-scoped reads and writes always evaluate the owner predicate
//! inside the same transaction as the id lookup. The repositories in
//! `repository/` are the only callers; nothing above them touches tables.

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Credential store: lowercase email → StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Primary table: order id → StoredOrder (JSON bytes).
pub(crate) const ORDERS: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");

/// Index: composite key `owner|!id_be` → order id.
/// The inverted id bytes make a forward range scan yield newest-first.
pub(crate) const OWNER_ORDER_INDEX: TableDefinition<&[u8], u64> =
    TableDefinition::new("owner_order_index");

/// Monotonic sequences: name → last allocated value.
pub(crate) const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Sequence name for order ids.
pub(crate) const ORDER_ID_SEQUENCE: &str = "order_id";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the owner_order_index table.
///
/// Format: `owner_bytes | '|' | inverted_id_be_bytes`
///
/// The inverted id ensures newest-first ordering when scanning forward.
/// The id suffix is fixed-width, so the key parses unambiguously even
/// though owner names are variable length.
pub(crate) fn make_owner_index_key(owner: &str, id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner.len() + 1 + 8);
    key.extend_from_slice(owner.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&(!id).to_be_bytes());
    key
}

/// Build a prefix key for range scanning all orders of an owner.
pub(crate) fn make_owner_prefix(owner: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(owner.len() + 1);
    prefix.extend_from_slice(owner.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a range scan (prefix with all 0xFF bytes appended).
pub(crate) fn make_owner_prefix_end(owner: &str) -> Vec<u8> {
    let mut end = Vec::with_capacity(owner.len() + 1 + 9);
    end.extend_from_slice(owner.as_bytes());
    end.push(b'|');
    // One byte longer than any inverted-id suffix
    end.extend_from_slice(&[0xFF; 9]);
    end
}

// =============================================================================
// OrderDatabase
// =============================================================================

/// Embedded ACID database holding users and orders.
pub struct OrderDatabase {
    db: Database,
}

impl OrderDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(ORDERS)?;
            let _ = write_txn.open_table(OWNER_ORDER_INDEX)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub(crate) fn begin_read(&self) -> Result<redb::ReadTransaction, redb::TransactionError> {
        self.db.begin_read()
    }

    pub(crate) fn begin_write(&self) -> Result<redb::WriteTransaction, redb::TransactionError> {
        self.db.begin_write()
    }
}
