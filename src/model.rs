//! Domain model for the remote book store.
//!
//! Field names are camelCase on the wire (`isAvailable`), matching the
//! store's JSON contract. `BookPatch` omits absent fields entirely so the
//! server applies updates by field presence.

use serde::{Deserialize, Serialize};

/// A single catalog record. `id` is assigned by the remote store and never
/// changes after creation; no two records in the cached set share an `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i32,
    pub is_available: bool,
}

/// Fields required to create a book. The store assigns `id` and defaults
/// availability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i32,
}

/// Partial update of a book's mutable fields. `None` fields are left out of
/// the serialized body and stay unchanged server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

/// Query hints forwarded to the store on fetch. The store currently ignores
/// them and returns the full list; filtering happens client-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}
