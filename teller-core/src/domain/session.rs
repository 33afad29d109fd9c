//! Terminal session state machine

/// Session state for one terminal
///
/// The active card id lives inside the non-idle states, so a session can
/// hold at most one card at a time by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    NoSession,
    CardInserted {
        card_id: String,
    },
    Authenticated {
        card_id: String,
    },
}

impl Session {
    /// The active card id, if a card is inserted
    pub fn card_id(&self) -> Option<&str> {
        match self {
            Session::NoSession => None,
            Session::CardInserted { card_id } | Session::Authenticated { card_id } => {
                Some(card_id)
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Return to `NoSession`, dropping the active card
    pub fn clear(&mut self) {
        *self = Session::NoSession;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_card_id() {
        let mut session = Session::default();
        assert_eq!(session.card_id(), None);
        assert!(!session.is_authenticated());

        session = Session::CardInserted {
            card_id: "4000-0001".to_string(),
        };
        assert_eq!(session.card_id(), Some("4000-0001"));
        assert!(!session.is_authenticated());

        session = Session::Authenticated {
            card_id: "4000-0001".to_string(),
        };
        assert!(session.is_authenticated());

        session.clear();
        assert_eq!(session, Session::NoSession);
    }
}
