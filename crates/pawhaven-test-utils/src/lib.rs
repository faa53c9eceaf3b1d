// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Pawhaven integration tests.
//!
//! Provides mock adapters and fixtures for fast, deterministic tests
//! without a database.
//!
//! # Components
//!
//! - [`MockStorage`] - In-memory store with call recording and failure injection
//! - [`TempSqlite`] - A real SQLite store in a temporary directory
//! - [`fixtures`] - Valid form inputs and records

pub mod fixtures;
pub mod harness;
pub mod mock_storage;

pub use harness::TempSqlite;
pub use mock_storage::{Injected, MockStorage};
