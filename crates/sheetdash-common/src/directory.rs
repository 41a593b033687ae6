//! Client directory: maps an authenticated e-mail address to its client record
//!
//! Authentication itself happens elsewhere; the dashboard only needs to know
//! which spreadsheet belongs to the signed-in client.

use crate::error::{DashError, Result};
use crate::types::ClientProfile;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Lookup of client records by e-mail address.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Find the client registered under `email`.
    async fn client_for(&self, email: &str) -> Result<ClientProfile>;
}

/// Directory held in memory, usually built from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    clients: HashMap<String, ClientProfile>,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl StaticDirectory {
    /// Build a directory; a later entry with the same e-mail is rejected.
    pub fn new(profiles: impl IntoIterator<Item = ClientProfile>) -> Result<Self> {
        let mut clients = HashMap::new();
        for profile in profiles {
            let key = email_key(&profile.email);
            if key.is_empty() {
                return Err(DashError::validation_field("Client e-mail cannot be empty", "email"));
            }
            if clients.insert(key, profile).is_some() {
                return Err(DashError::directory("Duplicate client e-mail in directory"));
            }
        }
        Ok(Self { clients })
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl ClientDirectory for StaticDirectory {
    #[instrument(skip(self))]
    async fn client_for(&self, email: &str) -> Result<ClientProfile> {
        let profile = self
            .clients
            .get(&email_key(email))
            .cloned()
            .ok_or_else(|| DashError::client_not_found(email.trim()))?;
        debug!("Resolved client '{}'", profile.client_name);
        Ok(profile)
    }
}
