//! Demo card provisioning for tests and demos
//!
//! Generates a small fixed card set with deterministic ids, PINs, and
//! balances, including one locked and one expired card so rejection paths
//! can be exercised without extra setup.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::CardRecord;
use crate::ports::AccountStore;

/// Generate the demo card set
pub fn generate_demo_cards() -> Vec<CardRecord> {
    let mut locked = CardRecord::new("4000-0003", "9999", Decimal::new(25000, 2)); // $250.00
    locked.failed_attempts = 3;
    locked.locked = true;

    let mut expired = CardRecord::new("4000-0004", "2468", Decimal::new(412050, 2)); // $4,120.50
    expired.expires_on = NaiveDate::from_ymd_opt(2019, 12, 31);

    vec![
        CardRecord::new("4000-0001", "1234", Decimal::new(100000, 2)), // $1,000.00
        CardRecord::new("4000-0002", "4321", Decimal::new(1875000, 2)), // $18,750.00
        locked,
        expired,
    ]
}

/// Seed a store with the demo card set
pub fn seed_demo_cards(store: &dyn AccountStore) -> Result<()> {
    for card in generate_demo_cards() {
        let card_id = card.card_id.clone();
        store.save(&card_id, card)?;
    }
    Ok(())
}
