//! Account store port - record access abstraction

use crate::domain::result::Result;
use crate::domain::CardRecord;

/// Record access abstraction
///
/// This trait defines all record operations the session layer is allowed to
/// perform. Implementations (adapters) provide the actual backing medium.
/// No other component mutates a record behind this interface.
pub trait AccountStore: Send + Sync {
    /// Look up the record for a card id
    ///
    /// Fails `NotFound` when no record exists for the id.
    fn find(&self, card_id: &str) -> Result<CardRecord>;

    /// Replace the stored record for a card id
    ///
    /// The replacement is atomic from the caller's point of view; no partial
    /// write is observable.
    fn save(&self, card_id: &str, record: CardRecord) -> Result<()>;

    /// Per-key atomic read-modify-write
    ///
    /// Runs `op` on the stored record under mutual exclusion for that card
    /// id, so read-increment-write sequences cannot lose updates across
    /// terminals sharing the store. The record as left by `op` is written
    /// back whether `op` returns `Ok` or `Err` - a failed PIN attempt must
    /// persist its counter increment while still reporting the failure.
    /// `op`'s result is passed through to the caller.
    ///
    /// Fails `NotFound` (and never runs `op`) when no record exists.
    fn update(
        &self,
        card_id: &str,
        op: &mut dyn FnMut(&mut CardRecord) -> Result<()>,
    ) -> Result<()>;
}
