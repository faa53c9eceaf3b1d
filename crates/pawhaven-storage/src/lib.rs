// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for Pawhaven.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, typed CRUD operations for the five
//! record collections and the approval compensation log, and a
//! content-addressed local media store.

pub mod adapter;
pub mod database;
pub mod media;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use media::LocalMediaStore;
