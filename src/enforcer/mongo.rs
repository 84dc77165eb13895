//! MongoDB implementation of the admin seam
//!
//! The driver is async. Each admin owns a current-thread tokio runtime and
//! blocks on it for every call, so the enforcer itself stays synchronous.

use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as DriverError, ErrorKind as DriverErrorKind};
use mongodb::{Client, Database};
use tokio::runtime::{Builder, Runtime};

use super::admin::{AdminError, AdminResult, CollectionAdmin, CollectionState, Connector};

/// Server error code for a missing privilege
const UNAUTHORIZED: i32 = 13;

/// Connects through the official driver
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

impl Connector for MongoConnector {
    type Admin = MongoAdmin;

    fn connect(&self, uri: &str, database: &str) -> AdminResult<MongoAdmin> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AdminError::Connection(format!("failed to start runtime: {}", e)))?;

        let client = runtime
            .block_on(Client::with_uri_str(uri))
            .map_err(connection_error)?;
        let database = client.database(database);

        runtime
            .block_on(async { database.run_command(doc! { "ping": 1 }).await })
            .map_err(connection_error)?;

        Ok(MongoAdmin {
            runtime,
            database: Some(database),
        })
    }
}

/// Admin handle on one database
pub struct MongoAdmin {
    runtime: Runtime,
    // Dropped inside the runtime context, see Drop
    database: Option<Database>,
}

impl MongoAdmin {
    fn database(&self) -> AdminResult<&Database> {
        self.database
            .as_ref()
            .ok_or_else(|| AdminError::Connection("database handle already closed".into()))
    }
}

impl CollectionAdmin for MongoAdmin {
    fn list_collection_names(&self) -> AdminResult<Vec<String>> {
        let database = self.database()?;
        self.runtime
            .block_on(async { database.list_collection_names().await })
            .map_err(classify)
    }

    fn run_command(&self, command: Document) -> AdminResult<Document> {
        let database = self.database()?;
        self.runtime
            .block_on(async { database.run_command(command).await })
            .map_err(classify)
    }

    fn collection_state(&self, name: &str) -> AdminResult<Option<CollectionState>> {
        let reply = self.run_command(doc! {
            "listCollections": 1,
            "filter": { "name": name },
        })?;
        state_from_list_reply(&reply, name)
    }
}

impl Drop for MongoAdmin {
    fn drop(&mut self) {
        // Driver background tasks shut down through the runtime they were spawned on
        let _guard = self.runtime.enter();
        drop(self.database.take());
    }
}

/// Extracts one collection's options from a `listCollections` reply
pub fn state_from_list_reply(reply: &Document, name: &str) -> AdminResult<Option<CollectionState>> {
    let batch = reply
        .get_document("cursor")
        .and_then(|cursor| cursor.get_array("firstBatch"))
        .map_err(|e| AdminError::Command(format!("unexpected listCollections reply: {}", e)))?;

    let entry = batch.iter().find_map(|item| match item {
        Bson::Document(spec) if spec.get_str("name").ok() == Some(name) => Some(spec),
        _ => None,
    });

    Ok(entry.map(|spec| match spec.get_document("options") {
        Ok(options) => CollectionState::from_options(options),
        Err(_) => CollectionState::default(),
    }))
}

fn connection_error(err: DriverError) -> AdminError {
    AdminError::Connection(err.to_string())
}

/// Server-side command failures are rejections, everything else is
/// connectivity
fn classify(err: DriverError) -> AdminError {
    match err.kind.as_ref() {
        DriverErrorKind::Command(command) => command_failure(
            command.code,
            format!("{} ({})", command.message, command.code_name),
        ),
        _ => AdminError::Connection(err.to_string()),
    }
}

/// Maps a server error code to the admin error it represents
pub fn command_failure(code: i32, message: String) -> AdminError {
    match code {
        UNAUTHORIZED => AdminError::Unauthorized(message),
        _ => AdminError::Command(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_list_reply() {
        let reply = doc! {
            "cursor": {
                "id": 0_i64,
                "ns": "Test.$cmd.listCollections",
                "firstBatch": [{
                    "name": "FILT_RECORDS",
                    "type": "collection",
                    "options": {
                        "validator": { "$jsonSchema": { "bsonType": "object" } },
                        "validationLevel": "strict",
                        "validationAction": "error",
                    },
                }],
            },
            "ok": 1.0,
        };

        let state = state_from_list_reply(&reply, "FILT_RECORDS").unwrap().unwrap();
        assert_eq!(state.validation_level.as_deref(), Some("strict"));
        assert_eq!(state.validation_action.as_deref(), Some("error"));
        assert_eq!(
            state.validator,
            Some(doc! { "$jsonSchema": { "bsonType": "object" } })
        );
    }

    #[test]
    fn test_state_missing_collection() {
        let reply = doc! { "cursor": { "id": 0_i64, "firstBatch": [] }, "ok": 1.0 };
        assert_eq!(state_from_list_reply(&reply, "FILT_RECORDS").unwrap(), None);
    }

    #[test]
    fn test_unauthorized_code() {
        let err = command_failure(13, "not authorized on Test (Unauthorized)".into());
        assert_eq!(err, AdminError::Unauthorized("not authorized on Test (Unauthorized)".into()));
    }

    #[test]
    fn test_other_codes_are_rejections() {
        for code in [2, 9, 26, 48, 121] {
            let err = command_failure(code, "refused".into());
            assert_eq!(err, AdminError::Command("refused".into()), "code {}", code);
        }
    }

    #[test]
    fn test_malformed_reply() {
        let err = state_from_list_reply(&doc! { "ok": 1.0 }, "FILT_RECORDS").unwrap_err();
        assert!(matches!(err, AdminError::Command(_)));
    }
}
