//! The create-or-modify procedure
//!
//! resolve config → connect → list collections → `create` or `collMod` →
//! report. Strictly linear, one branch, no retries.

use std::fmt;

use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event};

use super::admin::{
    command_document, AdminError, CollectionAdmin, CollectionState, CommandKind, Connector,
};
use super::config::{EnforcerConfig, Target};
use super::errors::{EnforceError, EnforceResult};
use super::mode::AppMode;

/// Which branch the run took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::Updated => "updated",
        }
    }
}

/// Result of a successful enforcement run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcementReport {
    pub mode: AppMode,
    pub database: String,
    pub collection: String,
    pub outcome: Outcome,
}

impl fmt::Display for EnforcementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Created => write!(f, "Created collection {}.{}", self.database, self.collection),
            Outcome::Updated => write!(f, "Updated schema for {}.{}", self.database, self.collection),
        }
    }
}

/// Current validation state of the target collection
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionReport {
    pub database: String,
    pub collection: String,
    pub state: Option<CollectionState>,
    /// Stored validator and policy match what `enforce` would write
    pub enforced: bool,
}

impl InspectionReport {
    pub fn exists(&self) -> bool {
        self.state.is_some()
    }

    /// Relaxed extended JSON view of the report
    pub fn to_json(&self) -> Value {
        let state = self.state.clone().unwrap_or_default();
        json!({
            "database": self.database,
            "collection": self.collection,
            "exists": self.exists(),
            "enforced": self.enforced,
            "validationLevel": state.validation_level,
            "validationAction": state.validation_action,
            "validator": state
                .validator
                .map(|validator| mongodb::bson::Bson::Document(validator).into_relaxed_extjson()),
        })
    }
}

/// Resolves `config` against `uri` and enforces the schema.
///
/// Configuration errors are returned before `connector` is used.
pub fn enforce<C: Connector>(
    config: &EnforcerConfig,
    uri: Option<&str>,
    connector: &C,
) -> EnforceResult<EnforcementReport> {
    let target = config.resolve(uri)?;
    enforce_target(&target, connector)
}

/// Enforces the schema on an already resolved target.
pub fn enforce_target<C: Connector>(target: &Target, connector: &C) -> EnforceResult<EnforcementReport> {
    let namespace = target.namespace();
    let endpoint = target.redacted_uri();

    log_event_with_fields(
        Event::EnforceBegin,
        &[
            ("mode", target.mode.as_str()),
            ("namespace", namespace.as_str()),
            ("uri", endpoint.as_str()),
        ],
    );

    let result = run(target, connector, &namespace, &endpoint);
    if let Err(err) = &result {
        let reason = err.to_string();
        log_event_with_fields(
            Event::EnforceFailed,
            &[
                ("code", err.code()),
                ("namespace", namespace.as_str()),
                ("reason", reason.as_str()),
            ],
        );
    }
    result
}

fn run<C: Connector>(
    target: &Target,
    connector: &C,
    namespace: &str,
    endpoint: &str,
) -> EnforceResult<EnforcementReport> {
    let admin = open(target, connector, endpoint)?;

    let names = admin
        .list_collection_names()
        .map_err(|e| command_error(e, "listCollections", namespace, endpoint))?;
    let exists = names.iter().any(|name| name == &target.collection);
    let count = names.len().to_string();
    log_event_with_fields(
        Event::CollectionsListed,
        &[
            ("count", count.as_str()),
            ("exists", if exists { "true" } else { "false" }),
            ("namespace", namespace),
        ],
    );

    let kind = if exists {
        CommandKind::Modify
    } else {
        CommandKind::Create
    };
    let command = command_document(
        kind,
        &target.collection,
        target.validator.clone(),
        target.policy,
    );
    admin
        .run_command(command)
        .map_err(|e| command_error(e, kind.command_name(), namespace, endpoint))?;

    let (outcome, event) = match kind {
        CommandKind::Create => (Outcome::Created, Event::CollectionCreated),
        CommandKind::Modify => (Outcome::Updated, Event::ValidatorUpdated),
    };
    log_event_with_fields(
        event,
        &[
            ("validation_action", target.policy.action.as_str()),
            ("validation_level", target.policy.level.as_str()),
            ("namespace", namespace),
        ],
    );

    Ok(EnforcementReport {
        mode: target.mode,
        database: target.database.clone(),
        collection: target.collection.clone(),
        outcome,
    })
}

/// Reads the target collection's validation options back from the server.
pub fn inspect<C: Connector>(
    config: &EnforcerConfig,
    uri: Option<&str>,
    connector: &C,
) -> EnforceResult<InspectionReport> {
    let target = config.resolve(uri)?;
    let namespace = target.namespace();
    let endpoint = target.redacted_uri();

    let admin = open(&target, connector, &endpoint)?;
    let state = admin
        .collection_state(&target.collection)
        .map_err(|e| command_error(e, "listCollections", &namespace, &endpoint))?;

    let enforced = state.as_ref().map_or(false, |state| {
        state.validator.as_ref() == Some(&target.validator) && state.policy() == Some(target.policy)
    });
    log_event_with_fields(
        Event::InspectComplete,
        &[
            ("enforced", if enforced { "true" } else { "false" }),
            ("exists", if state.is_some() { "true" } else { "false" }),
            ("namespace", namespace.as_str()),
        ],
    );

    Ok(InspectionReport {
        database: target.database,
        collection: target.collection,
        state,
        enforced,
    })
}

fn open<C: Connector>(target: &Target, connector: &C, endpoint: &str) -> EnforceResult<C::Admin> {
    log_event_with_fields(Event::ConnectBegin, &[("uri", endpoint)]);
    let admin = connector
        .connect(&target.uri, &target.database)
        .map_err(|e| EnforceError::Connection {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
    log_event_with_fields(Event::Connected, &[("database", target.database.as_str())]);
    Ok(admin)
}

fn command_error(err: AdminError, command: &str, namespace: &str, endpoint: &str) -> EnforceError {
    match err {
        AdminError::Connection(message) => EnforceError::Connection {
            endpoint: endpoint.to_string(),
            message,
        },
        AdminError::Unauthorized(message) => EnforceError::Unauthorized {
            command: command.to_string(),
            namespace: namespace.to_string(),
            message,
        },
        AdminError::Command(message) => EnforceError::Rejected {
            command: command.to_string(),
            namespace: namespace.to_string(),
            message,
        },
    }
}
