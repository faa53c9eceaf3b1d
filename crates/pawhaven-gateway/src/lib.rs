// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Pawhaven.
//!
//! Exposes every lifecycle operation over a JSON API built on axum. Callers
//! identify themselves with `Authorization: Bearer <token>`; the token is
//! resolved to a [`Session`](pawhaven_core::Session) by an
//! [`AuthAdapter`](pawhaven_core::AuthAdapter) and passed into the services,
//! which enforce admin-only operations themselves.

pub mod admin;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{CurrentSession, StaticTokenAuth};
pub use error::ApiError;
pub use server::{GatewayState, build_router, start_server};
