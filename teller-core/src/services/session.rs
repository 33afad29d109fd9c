//! Session service - terminal session state machine and transactions
//!
//! One `SessionService` serves one physical terminal: at most one card is
//! active at a time, and each operation runs to completion before the next
//! is accepted. All record mutations go through the store's atomic update
//! entry point, so attempt counters and balances cannot lose updates when
//! terminals share a store.
//!
//! PINs are compared in plaintext as stored. Amounts and PINs are never
//! logged.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::result::{Error, Result};
use crate::domain::{CardRecord, Session};
use crate::ports::AccountStore;

/// Session controller for one terminal
pub struct SessionService {
    store: Arc<dyn AccountStore>,
    max_attempts: u32,
    min_withdrawal: Decimal,
    session: Session,
}

/// Count a failed PIN check against the record, locking it when the
/// configured threshold is reached. Returns true if the card locked now.
fn register_failed_attempt(record: &mut CardRecord, max_attempts: u32) -> bool {
    record.failed_attempts += 1;
    if record.failed_attempts >= max_attempts {
        record.locked = true;
        true
    } else {
        false
    }
}

impl SessionService {
    pub fn new(store: Arc<dyn AccountStore>, config: &Config) -> Self {
        Self {
            store,
            max_attempts: config.max_attempts,
            min_withdrawal: config.min_withdrawal,
            session: Session::NoSession,
        }
    }

    /// Current session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Begin a session for a card
    ///
    /// Succeeds iff no session is active and the record exists, is not
    /// locked, and is not expired. Unknown, locked, and expired cards all
    /// fail `InvalidCard` and leave the session idle; inserting while a
    /// session is already active is the invalid-state error.
    pub fn insert_card(&mut self, card_id: &str) -> Result<()> {
        if self.session != Session::NoSession {
            return Err(Error::NoActiveSession);
        }

        let record = match self.store.find(card_id) {
            Ok(record) => record,
            Err(Error::NotFound(_)) => {
                debug!(card_id = %card_id, "unknown card rejected");
                return Err(Error::InvalidCard);
            }
            Err(e) => return Err(e),
        };

        if record.locked || record.is_expired(Utc::now().date_naive()) {
            debug!(card_id = %card_id, locked = record.locked, "card rejected");
            return Err(Error::InvalidCard);
        }

        self.session = Session::CardInserted {
            card_id: card_id.to_string(),
        };
        debug!(card_id = %card_id, "card inserted");
        Ok(())
    }

    /// Verify the PIN for the inserted card
    ///
    /// A match resets the attempt counter and authenticates the session. A
    /// mismatch increments the counter; once it reaches the configured
    /// threshold the card locks and the session ends.
    pub fn verify_pin(&mut self, pin: &str) -> Result<()> {
        let card_id = match self.session.card_id() {
            Some(card_id) => card_id.to_string(),
            None => return Err(Error::NoActiveSession),
        };

        let max_attempts = self.max_attempts;
        let mut attempts_remaining = 0;
        let outcome = self.store.update(&card_id, &mut |record| {
            // Locked by another terminal mid-session: no further attempts
            // are evaluated and the counter stays put
            if record.locked {
                return Err(Error::CardLocked);
            }
            if record.pin != pin {
                if register_failed_attempt(record, max_attempts) {
                    return Err(Error::CardLocked);
                }
                attempts_remaining = max_attempts - record.failed_attempts;
                return Err(Error::WrongPin { attempts_remaining });
            }
            record.failed_attempts = 0;
            Ok(())
        });

        match outcome {
            Ok(()) => {
                self.session = Session::Authenticated { card_id: card_id.clone() };
                info!(card_id = %card_id, "pin verified");
                Ok(())
            }
            Err(Error::CardLocked) => {
                warn!(card_id = %card_id, "card locked after failed pin attempts");
                self.session.clear();
                Err(Error::CardLocked)
            }
            Err(e @ Error::WrongPin { .. }) => {
                debug!(card_id = %card_id, attempts_remaining, "wrong pin");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Read the current balance; never mutates
    pub fn check_balance(&self) -> Result<Decimal> {
        let card_id = self.authenticated_card()?;
        let record = self.store.find(card_id)?;
        Ok(record.balance)
    }

    /// Deposit a positive amount, returning the new balance
    pub fn deposit(&mut self, amount: Decimal) -> Result<Decimal> {
        let card_id = self.authenticated_card()?.to_string();
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }

        let mut new_balance = Decimal::ZERO;
        self.store.update(&card_id, &mut |record| {
            record.balance += amount;
            new_balance = record.balance;
            Ok(())
        })?;

        info!(card_id = %card_id, "deposit accepted");
        Ok(new_balance)
    }

    /// Withdraw an amount, returning the new balance
    ///
    /// The request is validated before the account is consulted: amounts
    /// under the configured minimum fail `BelowMinimum` even when the
    /// balance could not cover them either.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Decimal> {
        let card_id = self.authenticated_card()?.to_string();
        if amount < self.min_withdrawal {
            return Err(Error::BelowMinimum {
                minimum: self.min_withdrawal,
            });
        }

        let mut new_balance = Decimal::ZERO;
        self.store.update(&card_id, &mut |record| {
            if amount > record.balance {
                return Err(Error::InsufficientFunds);
            }
            record.balance -= amount;
            new_balance = record.balance;
            Ok(())
        })?;

        info!(card_id = %card_id, "withdrawal accepted");
        Ok(new_balance)
    }

    /// Change the PIN for the authenticated card
    ///
    /// A wrong current PIN counts against the same lockout threshold as
    /// `verify_pin`: `FaultyPin` while attempts remain, `CardLocked` (and
    /// the session ends) once the threshold is reached. A matching current
    /// PIN resets the counter; the new PIN is only stored when it matches
    /// its confirmation.
    pub fn change_pin(&mut self, old_pin: &str, new_pin: &str, confirm_pin: &str) -> Result<()> {
        let card_id = self.authenticated_card()?.to_string();

        let max_attempts = self.max_attempts;
        let outcome = self.store.update(&card_id, &mut |record| {
            if record.locked {
                return Err(Error::CardLocked);
            }
            if record.pin != old_pin {
                if register_failed_attempt(record, max_attempts) {
                    return Err(Error::CardLocked);
                }
                return Err(Error::FaultyPin);
            }
            record.failed_attempts = 0;
            if new_pin != confirm_pin {
                return Err(Error::PinMismatch);
            }
            record.pin = new_pin.to_string();
            Ok(())
        });

        match outcome {
            Ok(()) => {
                info!(card_id = %card_id, "pin changed");
                Ok(())
            }
            Err(Error::CardLocked) => {
                warn!(card_id = %card_id, "card locked during pin change");
                self.session.clear();
                Err(Error::CardLocked)
            }
            Err(e) => Err(e),
        }
    }

    /// End the session, from any state. Idempotent.
    pub fn end_session(&mut self) {
        if let Some(card_id) = self.session.card_id() {
            debug!(card_id = %card_id, "session ended");
        }
        self.session.clear();
    }

    fn authenticated_card(&self) -> Result<&str> {
        match &self.session {
            Session::Authenticated { card_id } => Ok(card_id),
            _ => Err(Error::NoActiveSession),
        }
    }
}
