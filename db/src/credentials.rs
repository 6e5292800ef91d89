//! Database credential resolution from AWS Secrets Manager.
//!
//! Credentials are stored as a JSON secret with the fields `host`, `port`,
//! `dbname` (or `database`), `username`, and `password`. The secret name and
//! region are configurable through `DB_SECRET_NAME` and `AWS_REGION`.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::error::ProvideErrorMetadata;
use serde::Deserialize;
use std::env;

use crate::error::{Error, Result};

/// Secret name used when `DB_SECRET_NAME` is not set.
const DEFAULT_SECRET_NAME: &str = "rds-db-credentials";

/// Region used when `AWS_REGION` is not set.
const DEFAULT_REGION: &str = "us-east-1";

/// Default PostgreSQL port.
const DEFAULT_PORT: u16 = 5432;

/// Resolved database connection parameters.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

/// Raw secret payload as stored in Secrets Manager.
#[derive(Debug, Deserialize)]
struct SecretPayload {
    host: Option<String>,
    port: Option<u16>,
    dbname: Option<String>,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Parse and validate a secret payload.
    ///
    /// Host, username, password, and a database name (under either `dbname`
    /// or `database`) are required and must be non-empty. Port defaults to
    /// 5432 when absent.
    pub fn from_secret_json(payload: &str) -> Result<Self> {
        let secret: SecretPayload =
            serde_json::from_str(payload).map_err(|e| Error::MalformedSecret(e.to_string()))?;

        let host = require(secret.host, "host")?;
        let username = require(secret.username, "username")?;
        let password = require(secret.password, "password")?;
        let database = require(secret.dbname.or(secret.database), "dbname")?;

        Ok(Credentials {
            host,
            port: secret.port.unwrap_or(DEFAULT_PORT),
            database,
            username,
            password,
        })
    }
}

fn require(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::IncompleteCredentials { field }),
    }
}

/// Fetch and parse database credentials from Secrets Manager.
///
/// Nothing is cached here: a failed resolution can always be retried. The
/// password is never logged.
pub async fn resolve() -> Result<Credentials> {
    let secret_name = env::var("DB_SECRET_NAME").unwrap_or_else(|_| DEFAULT_SECRET_NAME.into());
    let region = env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.into());

    tracing::info!(secret = %secret_name, %region, "retrieving database credentials");

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region))
        .load()
        .await;
    let client = aws_sdk_secretsmanager::Client::new(&config);

    let output = client
        .get_secret_value()
        .secret_id(&secret_name)
        .send()
        .await
        .map_err(|e| match e.code() {
            Some("ResourceNotFoundException") => Error::SecretNotFound {
                name: secret_name.clone(),
            },
            Some("AccessDeniedException") => Error::AccessDenied {
                name: secret_name.clone(),
            },
            _ => Error::SecretStore(e.to_string()),
        })?;

    let payload = output
        .secret_string()
        .ok_or_else(|| Error::MalformedSecret("secret string is empty or binary".into()))?;

    let credentials = Credentials::from_secret_json(payload)?;

    tracing::info!(
        host = %credentials.host,
        port = credentials.port,
        database = %credentials.database,
        "resolved database credentials"
    );

    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_payload() {
        let creds = Credentials::from_secret_json(
            r#"{"host":"db.example.com","port":5433,"dbname":"tally","username":"app","password":"hunter2"}"#,
        )
        .unwrap();

        assert_eq!(creds.host, "db.example.com");
        assert_eq!(creds.port, 5433);
        assert_eq!(creds.database, "tally");
        assert_eq!(creds.username, "app");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn accepts_database_key_alias() {
        let creds = Credentials::from_secret_json(
            r#"{"host":"h","database":"tally","username":"u","password":"p"}"#,
        )
        .unwrap();

        assert_eq!(creds.database, "tally");
    }

    #[test]
    fn port_defaults_to_5432() {
        let creds = Credentials::from_secret_json(
            r#"{"host":"h","dbname":"d","username":"u","password":"p"}"#,
        )
        .unwrap();

        assert_eq!(creds.port, 5432);
    }

    #[test]
    fn missing_password_is_incomplete() {
        let err =
            Credentials::from_secret_json(r#"{"host":"h","dbname":"d","username":"u"}"#)
                .unwrap_err();

        match err {
            Error::IncompleteCredentials { field } => assert_eq!(field, "password"),
            other => panic!("expected IncompleteCredentials, got {other:?}"),
        }
    }

    #[test]
    fn empty_host_is_incomplete() {
        let err = Credentials::from_secret_json(
            r#"{"host":"","dbname":"d","username":"u","password":"p"}"#,
        )
        .unwrap_err();

        match err {
            Error::IncompleteCredentials { field } => assert_eq!(field, "host"),
            other => panic!("expected IncompleteCredentials, got {other:?}"),
        }
    }

    #[test]
    fn missing_database_name_is_incomplete() {
        let err =
            Credentials::from_secret_json(r#"{"host":"h","username":"u","password":"p"}"#)
                .unwrap_err();

        match err {
            Error::IncompleteCredentials { field } => assert_eq!(field, "dbname"),
            other => panic!("expected IncompleteCredentials, got {other:?}"),
        }
    }

    #[test]
    fn non_json_payload_is_malformed() {
        let err = Credentials::from_secret_json("host=h password=p").unwrap_err();
        assert!(matches!(err, Error::MalformedSecret(_)));
    }
}
