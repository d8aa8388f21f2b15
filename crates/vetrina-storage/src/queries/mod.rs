// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations, one module per entity.

pub mod products;
pub mod rate_limits;
pub mod sessions;
pub mod tenants;
