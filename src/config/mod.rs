//! Configuration module for protected-keys
//!
//! A project declares which packages need their own SSH key in a JSON
//! document (`protected.json` at the project root by default):
//!
//! ```json
//! {
//!   "keys_dir": "keys",
//!   "packages": {
//!     "web": { "host": "web.example.com", "key_file": "web_key" }
//!   }
//! }
//! ```
//!
//! [`Config`] is the raw, leniently parsed document. [`Config::validate`]
//! checks required fields and produces a [`ValidatedConfig`], which is what
//! the rest of the crate consumes.

mod file;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use file::{
    CONFIG_FILE_NAME, load_config, load_project_config, project_config_path, resolve_config,
};

/// Raw configuration document
///
/// Every field is optional at parse time so that validation can report
/// which one is missing instead of a generic deserialization error.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the project's private keys, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys_dir: Option<String>,

    /// Package name to key settings, in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<IndexMap<String, PackageConfig>>,
}

/// Key settings for a single package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Host pattern written to the `Host` line of the stanza
    #[serde(default)]
    pub host: String,

    /// File name of the key, both in the project keys dir and in the SSH dir
    #[serde(default)]
    pub key_file: String,
}

impl PackageConfig {
    pub fn new(host: impl Into<String>, key_file: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            key_file: key_file.into(),
        }
    }
}

impl Config {
    /// Create a configuration with the given keys directory and no packages
    pub fn new(keys_dir: impl Into<String>) -> Self {
        Self {
            keys_dir: Some(keys_dir.into()),
            packages: Some(IndexMap::new()),
        }
    }

    /// Add (or replace) a package entry, keeping its original position on replace
    pub fn with_package(
        mut self,
        name: impl Into<String>,
        host: impl Into<String>,
        key_file: impl Into<String>,
    ) -> Self {
        self.packages
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), PackageConfig::new(host, key_file));
        self
    }

    /// Parse a configuration from JSON text
    ///
    /// Any parse failure is reported as [`Error::ConfigValidation`].
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::ConfigValidation(describe_parse_error(text, e)))
    }

    /// Check required fields and produce a validated configuration
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let keys_dir = match self.keys_dir.as_deref() {
            Some(dir) if !dir.is_empty() => dir.to_string(),
            _ => {
                return Err(Error::ConfigValidation(
                    "\"keys_dir\" is required parameter".to_string(),
                ));
            }
        };

        let packages = self.packages.as_ref().ok_or_else(|| {
            Error::ConfigValidation("\"packages\" is required parameter".to_string())
        })?;

        for (name, package) in packages {
            validate_package(name, package)?;
        }

        Ok(ValidatedConfig {
            keys_dir,
            packages: packages.clone(),
        })
    }
}

/// Name the shape problem when the document parses as JSON but not as a config
fn describe_parse_error(text: &str, err: serde_json::Error) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return format!("Config is not valid JSON: {}", err);
    };

    match value.as_object() {
        None => "Config must be a valid object".to_string(),
        Some(object) => match object.get("packages") {
            Some(packages) if !packages.is_object() && !packages.is_null() => {
                "\"packages\" parameter must be a valid object".to_string()
            }
            _ => format!("Invalid config: {}", err),
        },
    }
}

fn validate_package(name: &str, package: &PackageConfig) -> Result<()> {
    if package.host.is_empty() {
        return Err(Error::ConfigValidation(format!(
            "\"host\" is required parameter of {} config",
            name
        )));
    }
    if package.key_file.is_empty() {
        return Err(Error::ConfigValidation(format!(
            "\"key_file\" is required parameter of {} config",
            name
        )));
    }
    Ok(())
}

/// Configuration whose required fields are known to be present
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedConfig {
    /// Keys directory, relative to the project root
    pub keys_dir: String,

    /// Packages in declaration order, each with non-empty host and key file
    pub packages: IndexMap<String, PackageConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(config: &Config) -> String {
        match config.validate() {
            Err(Error::ConfigValidation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_json() {
        let json = r#"{
            "keys_dir": "keys",
            "packages": {
                "web": { "host": "web.example.com", "key_file": "web_key" },
                "api": { "host": "api.example.com", "key_file": "api_key" }
            }
        }"#;

        let config = Config::from_json(json).unwrap();
        assert_eq!(config.keys_dir.as_deref(), Some("keys"));

        let validated = config.validate().unwrap();
        assert_eq!(validated.keys_dir, "keys");
        assert_eq!(validated.packages.len(), 2);
        assert_eq!(
            validated.packages.get("web"),
            Some(&PackageConfig::new("web.example.com", "web_key"))
        );
    }

    #[test]
    fn test_package_order_preserved() {
        let json = r#"{
            "keys_dir": "keys",
            "packages": {
                "zeta": { "host": "z", "key_file": "z_key" },
                "alpha": { "host": "a", "key_file": "a_key" },
                "mid": { "host": "m", "key_file": "m_key" }
            }
        }"#;

        let validated = Config::from_json(json).unwrap().validate().unwrap();
        let names: Vec<&str> = validated.packages.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{
            "keys_dir": "keys",
            "packages": {},
            "description": "deploy keys"
        }"#;
        let validated = Config::from_json(json).unwrap().validate().unwrap();
        assert!(validated.packages.is_empty());
    }

    #[test]
    fn test_missing_keys_dir() {
        let config = Config::from_json(r#"{ "packages": {} }"#).unwrap();
        assert_eq!(
            validation_message(&config),
            "\"keys_dir\" is required parameter"
        );

        let config = Config::from_json(r#"{ "keys_dir": "", "packages": {} }"#).unwrap();
        assert_eq!(
            validation_message(&config),
            "\"keys_dir\" is required parameter"
        );
    }

    #[test]
    fn test_missing_packages() {
        let config = Config::from_json(r#"{ "keys_dir": "keys" }"#).unwrap();
        assert_eq!(
            validation_message(&config),
            "\"packages\" is required parameter"
        );
    }

    #[test]
    fn test_missing_host_names_package() {
        let config = Config::new("keys").with_package("web", "", "web_key");
        assert_eq!(
            validation_message(&config),
            "\"host\" is required parameter of web config"
        );
    }

    #[test]
    fn test_missing_key_file_names_package() {
        let json = r#"{
            "keys_dir": "keys",
            "packages": { "api": { "host": "api.example.com" } }
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(
            validation_message(&config),
            "\"key_file\" is required parameter of api config"
        );
    }

    fn parse_message(text: &str) -> String {
        match Config::from_json(text) {
            Err(Error::ConfigValidation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_packages_not_an_object() {
        assert_eq!(
            parse_message(r#"{ "keys_dir": "keys", "packages": 5 }"#),
            "\"packages\" parameter must be a valid object"
        );
        assert_eq!(
            parse_message(r#"{ "keys_dir": "keys", "packages": ["web"] }"#),
            "\"packages\" parameter must be a valid object"
        );
    }

    #[test]
    fn test_document_not_an_object() {
        assert_eq!(parse_message("[1, 2]"), "Config must be a valid object");
        assert_eq!(parse_message("\"keys\""), "Config must be a valid object");
    }

    #[test]
    fn test_malformed_json_and_fields() {
        assert!(parse_message("{ not json").starts_with("Config is not valid JSON"));

        let msg = parse_message(r#"{ "keys_dir": 7, "packages": {} }"#);
        assert!(msg.starts_with("Invalid config"), "{}", msg);

        let msg = parse_message(r#"{ "keys_dir": "k", "packages": { "web": 1 } }"#);
        assert!(msg.starts_with("Invalid config"), "{}", msg);
    }

    #[test]
    fn test_with_package_replaces_in_place() {
        let config = Config::new("keys")
            .with_package("a", "a.example.com", "a_key")
            .with_package("b", "b.example.com", "b_key")
            .with_package("a", "a2.example.com", "a2_key");

        let packages = config.packages.unwrap();
        let names: Vec<&str> = packages.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(packages["a"].host, "a2.example.com");
    }
}
