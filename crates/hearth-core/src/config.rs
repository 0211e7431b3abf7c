//! Configuration module
//!
//! Environment-driven configuration for the media repository: database,
//! datastore, and upload admission settings.

use std::env;

// Common defaults
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_SIZE_BYTES: i64 = 100 * 1024 * 1024;

/// Allowed-type override for users matching a glob pattern.
///
/// An entry whose `user_pattern` matches an uploader replaces the general
/// allow list for that upload: the upload is admitted only if one of this
/// entry's `allowed_types` globs matches the sniffed content type. An entry
/// with an empty `allowed_types` list therefore denies every upload from
/// matching users.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerUserAllowance {
    /// Glob pattern matched against the uploader's user id.
    pub user_pattern: String,
    /// Glob patterns matched against the sniffed content type.
    pub allowed_types: Vec<String>,
}

/// Upload admission settings.
#[derive(Clone, Debug, Default)]
pub struct UploadsConfig {
    /// Maximum upload size in bytes. Zero or negative disables size
    /// enforcement.
    pub max_size_bytes: i64,
    /// Glob patterns over the sniffed content type. Empty means allow all.
    pub allowed_types: Vec<String>,
    /// Ordered per-user overrides, evaluated before `allowed_types`.
    pub per_user_allowed_types: Vec<PerUserAllowance>,
}

impl UploadsConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let max_size_bytes = env::var("UPLOADS_MAX_SIZE_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_SIZE_BYTES.to_string())
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("UPLOADS_MAX_SIZE_BYTES must be a valid integer"))?;

        let allowed_types: Vec<String> = env::var("UPLOADS_ALLOWED_TYPES")
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let per_user_allowed_types = env::var("UPLOADS_PER_USER_TYPES")
            .map(|s| parse_per_user_types(&s))
            .unwrap_or_else(|_| Ok(Vec::new()))?;

        Ok(UploadsConfig {
            max_size_bytes,
            allowed_types,
            per_user_allowed_types,
        })
    }
}

/// Parse the `UPLOADS_PER_USER_TYPES` format:
/// `user-glob=mime-glob|mime-glob;user-glob=...`.
///
/// An entry with an empty right-hand side (`@bot:*=`) is valid and denies
/// all uploads for matching users.
fn parse_per_user_types(raw: &str) -> Result<Vec<PerUserAllowance>, anyhow::Error> {
    let mut entries = Vec::new();
    for part in raw.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (user_pattern, types) = part.split_once('=').ok_or_else(|| {
            anyhow::anyhow!("UPLOADS_PER_USER_TYPES entry '{}' is missing '='", part)
        })?;
        let user_pattern = user_pattern.trim();
        if user_pattern.is_empty() {
            return Err(anyhow::anyhow!(
                "UPLOADS_PER_USER_TYPES entry '{}' has an empty user pattern",
                part
            ));
        }
        let allowed_types: Vec<String> = types
            .split('|')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        entries.push(PerUserAllowance {
            user_pattern: user_pattern.to_string(),
            allowed_types,
        });
    }
    Ok(entries)
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct HearthConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Identifier of the datastore new uploads are persisted to.
    pub datastore_id: String,
    /// Base directory of the local datastore.
    pub datastore_path: String,
    pub uploads: UploadsConfig,
}

impl HearthConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config = HearthConfig {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            datastore_id: env::var("DATASTORE_ID").unwrap_or_else(|_| "default".to_string()),
            datastore_path: env::var("DATASTORE_PATH")
                .map_err(|_| anyhow::anyhow!("DATASTORE_PATH must be set"))?,
            uploads: UploadsConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }
        if self.datastore_id.trim().is_empty() {
            return Err(anyhow::anyhow!("DATASTORE_ID must not be empty"));
        }
        if self.datastore_path.trim().is_empty() {
            return Err(anyhow::anyhow!("DATASTORE_PATH must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_per_user_types() {
        let entries =
            parse_per_user_types("@alice:*=video/mp4|video/webm;@bot-*:example.org=").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_pattern, "@alice:*");
        assert_eq!(entries[0].allowed_types, vec!["video/mp4", "video/webm"]);
        assert_eq!(entries[1].user_pattern, "@bot-*:example.org");
        assert!(entries[1].allowed_types.is_empty());
    }

    #[test]
    fn test_parse_per_user_types_preserves_order() {
        let entries = parse_per_user_types("@z:*=a/b;@a:*=c/d").unwrap();
        assert_eq!(entries[0].user_pattern, "@z:*");
        assert_eq!(entries[1].user_pattern, "@a:*");
    }

    #[test]
    fn test_parse_per_user_types_rejects_missing_separator() {
        assert!(parse_per_user_types("@alice:*").is_err());
    }

    #[test]
    fn test_parse_per_user_types_rejects_empty_pattern() {
        assert!(parse_per_user_types("=image/*").is_err());
    }

    #[test]
    fn test_parse_per_user_types_skips_blank_entries() {
        let entries = parse_per_user_types(" ; @alice:*=image/* ; ").unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_validate_rejects_non_postgres_url() {
        let config = HearthConfig {
            database_url: "mysql://localhost".to_string(),
            db_max_connections: 1,
            db_timeout_seconds: 1,
            datastore_id: "default".to_string(),
            datastore_path: "/tmp/media".to_string(),
            uploads: UploadsConfig::default(),
        };
        assert!(config.validate().is_err());
    }
}
