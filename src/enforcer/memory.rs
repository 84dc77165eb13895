//! In-memory stand-in for a MongoDB server
//!
//! Understands the commands the enforcer issues (`create`, `collMod`) and
//! records every connection attempt and command, so callers can assert on
//! what reached the "server". Failures can be injected.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use mongodb::bson::{doc, Document};

use super::admin::{AdminError, AdminResult, CollectionAdmin, CollectionState, Connector};

#[derive(Debug, Default)]
struct ServerState {
    databases: HashMap<String, BTreeMap<String, CollectionState>>,
    connects: usize,
    commands: Vec<(String, Document)>,
    connect_failure: Option<String>,
    command_failure: Option<AdminError>,
}

/// Shared handle on one in-memory server. Clones see the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryServer {
    state: Arc<Mutex<ServerState>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates a collection without a validator
    pub fn with_collection(self, database: &str, collection: &str) -> Self {
        self.lock()
            .databases
            .entry(database.to_string())
            .or_default()
            .insert(collection.to_string(), CollectionState::default());
        self
    }

    /// Makes every subsequent connection attempt fail
    pub fn fail_connections(self, message: impl Into<String>) -> Self {
        self.lock().connect_failure = Some(message.into());
        self
    }

    /// Makes every subsequent `create` / `collMod` fail
    pub fn fail_commands(self, error: AdminError) -> Self {
        self.lock().command_failure = Some(error);
        self
    }

    /// Number of connection attempts so far
    pub fn connect_count(&self) -> usize {
        self.lock().connects
    }

    /// Commands received so far, with the database they targeted
    pub fn commands(&self) -> Vec<(String, Document)> {
        self.lock().commands.clone()
    }

    /// Stored options of a collection
    pub fn collection(&self, database: &str, collection: &str) -> Option<CollectionState> {
        self.lock()
            .databases
            .get(database)
            .and_then(|collections| collections.get(collection))
            .cloned()
    }
}

impl Connector for MemoryServer {
    type Admin = MemoryAdmin;

    fn connect(&self, _uri: &str, database: &str) -> AdminResult<MemoryAdmin> {
        let mut state = self.lock();
        state.connects += 1;
        if let Some(message) = &state.connect_failure {
            return Err(AdminError::Connection(message.clone()));
        }

        Ok(MemoryAdmin {
            server: self.clone(),
            database: database.to_string(),
        })
    }
}

/// Admin handle on one database of a [`MemoryServer`]
#[derive(Debug, Clone)]
pub struct MemoryAdmin {
    server: MemoryServer,
    database: String,
}

impl CollectionAdmin for MemoryAdmin {
    fn list_collection_names(&self) -> AdminResult<Vec<String>> {
        let state = self.server.lock();
        Ok(state
            .databases
            .get(&self.database)
            .map(|collections| collections.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn run_command(&self, command: Document) -> AdminResult<Document> {
        let mut state = self.server.lock();
        state.commands.push((self.database.clone(), command.clone()));
        if let Some(error) = &state.command_failure {
            return Err(error.clone());
        }

        let name = command.keys().next().cloned().unwrap_or_default();
        let collection = command
            .get_str(&name)
            .map_err(|_| AdminError::Command(format!("'{}' requires a collection name", name)))?
            .to_string();
        let options = CollectionState::from_options(&command);
        let collections = state.databases.entry(self.database.clone()).or_default();

        match name.as_str() {
            "create" => {
                if collections.contains_key(&collection) {
                    return Err(AdminError::Command(format!(
                        "Collection {}.{} already exists. (NamespaceExists)",
                        self.database, collection
                    )));
                }
                collections.insert(collection, options);
            }
            "collMod" => match collections.get_mut(&collection) {
                Some(existing) => *existing = options,
                None => {
                    return Err(AdminError::Command(format!(
                        "ns does not exist: {}.{} (NamespaceNotFound)",
                        self.database, collection
                    )))
                }
            },
            other => {
                return Err(AdminError::Command(format!(
                    "no such command: '{}' (CommandNotFound)",
                    other
                )))
            }
        }

        Ok(doc! { "ok": 1.0 })
    }

    fn collection_state(&self, name: &str) -> AdminResult<Option<CollectionState>> {
        Ok(self.server.collection(&self.database, name))
    }
}
