//! Child-entity generator trait.
//!
//! RULE: Every table keyed on user identity implements ChildGenerator.
//! The engine hands each generator the already-messy user table and
//! that generator's own stream, in the order documented in engine.rs.

use crate::{
    error::GenResult,
    rng::{StreamRng, StreamSlot},
    types::Table,
    user_generator::UserRecord,
};

/// The contract every child-table generator must fulfill.
pub trait ChildGenerator {
    type Row;

    /// Unique stable name, used in logs.
    fn name(&self) -> &'static str;

    /// The stream this generator draws from.
    fn slot(&self) -> StreamSlot;

    /// Produce the full table for `users`, defects included.
    ///
    /// - `users`: the user table after injection (duplicates included)
    /// - `rng`:   this generator's deterministic stream
    fn generate(&self, users: &[UserRecord], rng: &mut StreamRng) -> GenResult<Table<Self::Row>>;
}
