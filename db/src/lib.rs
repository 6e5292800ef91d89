//! Tally data layer: credential bootstrap, connection pooling, and the
//! idempotent schema-migration runner.
//!
//! Connection parameters come from AWS Secrets Manager at startup; the pool
//! is created lazily and passed explicitly to callers. Deployments invoke
//! the `check-and-run-migrations` binary unconditionally, which uses the
//! gate check to skip runs against an already-migrated database.

pub mod credentials;
pub mod error;
pub mod migrate;
pub mod pool;

pub use credentials::Credentials;
pub use error::{Error, Result};
pub use pool::{Database, Pool};
