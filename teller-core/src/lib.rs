//! Teller Core - session and transaction logic for ATM terminals
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (CardRecord, Session) and the error taxonomy
//! - **ports**: Trait definitions for external dependencies (AccountStore)
//! - **services**: Business logic orchestration (SessionService)
//! - **adapters**: Concrete implementations (in-memory store, demo provisioning)
//!
//! Presentation, persistence, and card issuance live outside this crate; the
//! boundary is the `AccountStore` port and the `SessionService` operation set.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::memory::MemoryStore;
use config::Config;
use ports::AccountStore;
use services::SessionService;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{CardRecord, Session};

/// Main context for Teller operations
///
/// Holds the terminal configuration and the account store shared by every
/// terminal in the process. Each physical terminal takes its own
/// `SessionService` from `session()`.
pub struct TellerContext {
    pub config: Config,
    pub store: Arc<MemoryStore>,
}

impl TellerContext {
    /// Create a new Teller context
    pub fn new(teller_dir: &Path) -> Result<Self> {
        let config = Config::load(teller_dir)?;
        let store = Arc::new(MemoryStore::new());

        Ok(Self { config, store })
    }

    /// Create a session controller for one terminal
    pub fn session(&self) -> SessionService {
        let store: Arc<dyn AccountStore> = self.store.clone();
        SessionService::new(store, &self.config)
    }
}
