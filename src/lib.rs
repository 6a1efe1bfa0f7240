//! Client-side synchronization engine for a remote book catalog.
//!
//! The remote store only exposes plain CRUD, so filtering, searching, and
//! pagination all happen client-side: the full record set is cached in a
//! [`store::BookStore`], a pure derivation ([`view::derive_slice`]) computes
//! the visible page, and [`catalog::Catalog`] coordinates mutations against
//! the gateway while keeping the cached set consistent with each outcome.

pub mod api;
pub mod catalog;
pub mod config;
pub mod model;
pub mod store;
pub mod view;
