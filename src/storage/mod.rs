// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users and orders on an embedded redb database
//! (pure Rust, ACID). Records are serialized as JSON bytes; listings go
//! through a composite-key index whose inverted id bytes give newest-first
//! scans without sorting.
//!
//! ## Isolation Model
//!
//! The repositories are the single enforcement point for per-user data
//! isolation: every read or write that touches an order evaluates the
//! ownership predicate inside the same transaction as the id lookup.
//! Concurrent mutations of distinct orders do not interfere, and an
//! order's ownership check is atomic with its mutation because both
//! happen in one write transaction.

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{DbError, DbResult, OrderDatabase};
pub use ownership::OwnedResource;
pub use repository::{
    OrderRepository, RegistrationError, StoredOrder, StoredUser, UserRepository,
};
