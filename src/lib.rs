//! collguard - enforce a strict $jsonSchema validator on a MongoDB collection
//!
//! The `FILT_RECORDS` schema is declared in [`schema`], attached to the
//! collection by [`enforcer`], and reachable from the command line via
//! [`cli`].

pub mod cli;
pub mod enforcer;
pub mod observability;
pub mod schema;
