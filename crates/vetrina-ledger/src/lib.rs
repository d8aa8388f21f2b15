// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unit-balance settlement for successful try-ons.
//!
//! Each successful try-on costs the owning tenant one unit. The decrement
//! and its audit record are applied in a single transaction, and both are
//! guarded: the decrement is conditional on a positive balance, and the
//! audit table's UNIQUE(session_id) constraint backstops at-most-one charge
//! per session even if a caller invokes settlement twice.
//!
//! Settlement never fails the try-on: a missing tenant or an exhausted
//! balance is recorded as a warning and the shopper still gets the result,
//! since the provider's cost has already been incurred.

pub mod ledger;

pub use ledger::{UnitLedger, UnitSettlement};
