//! Catalog database schema.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

pub const SONG_TABLE_V_0: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!(
            "source_url",
            &SqlType::Text,
            non_null = true,
            is_unique = true
        ),
        sqlite_column!("mood", &SqlType::Text, non_null = true),
        sqlite_column!(
            "uploaded",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_song_mood", "mood"), ("idx_song_uploaded", "uploaded")],
    unique_constraints: &[&["title", "artist"]],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONG_TABLE_V_0],
    migration: None,
}];
