// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repositories over the embedded database.
//!
//! Each repository borrows the shared [`OrderDatabase`] and is the sole
//! access path for its tables.
//!
//! [`OrderDatabase`]: super::database::OrderDatabase

pub mod orders;
pub mod users;

pub use orders::{OrderRepository, StoredOrder};
pub use users::{RegistrationError, StoredUser, UserRepository};
