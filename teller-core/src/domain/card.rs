//! Card record domain model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The stored state for one card: credential, balance, and lockout counters.
///
/// Owned exclusively by the account store and mutated only through the
/// session layer's store updates. `locked` never transitions back to false
/// here; unlocking is an administrative action outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecord {
    /// Unique card identifier, issued at provisioning time
    pub card_id: String,
    pub pin: String,
    pub balance: Decimal,
    pub failed_attempts: u32,
    pub locked: bool,
    /// Last day the card is valid; `None` means no expiry on file
    pub expires_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardRecord {
    /// Create a new record with required fields
    pub fn new(card_id: impl Into<String>, pin: impl Into<String>, balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            card_id: card_id.into(),
            pin: pin.into(),
            balance,
            failed_attempts: 0,
            locked: false,
            expires_on: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True if the card's expiry date lies strictly before `today`
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on.map_or(false, |d| d < today)
    }

    /// Validate record data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.card_id.trim().is_empty() {
            return Err("card id cannot be empty");
        }
        if self.pin.is_empty() || !self.pin.chars().all(|c| c.is_ascii_digit()) {
            return Err("pin must be numeric and non-empty");
        }
        if self.balance < Decimal::ZERO {
            return Err("balance cannot be negative");
        }
        Ok(())
    }
}
