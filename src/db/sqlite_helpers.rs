//! SQLite helper utilities for type conversion
//!
//! SQLite has no native UUID or boolean column types. Identifiers are stored as
//! lower-case hyphenated TEXT and flags as INTEGER 0/1.

use anyhow::{Result, bail};
use uuid::Uuid;

// ============================================================================
// Identifier Helpers
// ============================================================================

/// Generate a fresh row identifier in the canonical lower-case hyphenated form
#[inline]
pub fn new_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

// ============================================================================
// Boolean Helpers (stored as INTEGER in SQLite)
// ============================================================================

/// Convert a bool to a SQLite INTEGER
#[inline]
pub fn bool_to_int(b: bool) -> i32 {
    if b { 1 } else { 0 }
}

/// Convert a SQLite INTEGER to bool
#[inline]
pub fn int_to_bool(i: i32) -> bool {
    i != 0
}

// ============================================================================
// Query Helpers
// ============================================================================

/// Build a numbered placeholder list (`?1, ?2, ...`) for an `IN (...)` clause
pub fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fail when a write statement touched no rows.
///
/// SQLite happily deletes nothing; callers expect a missing record to be an error.
pub fn ensure_affected(rows_affected: u64, action: &str, table: &str) -> Result<()> {
    if rows_affected == 0 {
        bail!("Record to {} does not exist in {}", action, table);
    }
    Ok(())
}
