//! Database models for the SQLite backend.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use super::schema;

/// A stored key-value row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::kv_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntry {
    key: String,
    value: String,
    updated_at: NaiveDateTime,
}

/// Insertable row used for upserts.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::kv_entries)]
pub struct NewKvEntry {
    key: String,
    value: String,
    updated_at: NaiveDateTime,
}
