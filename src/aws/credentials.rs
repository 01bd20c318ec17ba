//! AWS Credentials loading from multiple sources
//!
//! Supports:
//! - Explicit access key pairs passed on the command line
//! - Environment variables (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN)
//! - AWS profiles (~/.aws/credentials and ~/.aws/config, or a config file given with --aws-config)

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{Error, Result};

const DEFAULT_PROFILE: &str = "default";

/// AWS credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

/// Locations of the shared AWS files.
#[derive(Debug, Clone)]
pub struct AwsFiles {
    pub config: PathBuf,
    pub credentials: PathBuf,
}

impl AwsFiles {
    /// Resolve file locations, preferring an explicit config file path.
    pub fn resolve(config_file: Option<&Path>) -> Result<Self> {
        let aws_dir = || {
            dirs::home_dir()
                .map(|h| h.join(".aws"))
                .ok_or_else(|| Error::Credentials("Could not find home directory".to_string()))
        };

        let config = match config_file {
            Some(path) => path.to_path_buf(),
            None => match env::var("AWS_CONFIG_FILE") {
                Ok(path) if !path.is_empty() => PathBuf::from(path),
                _ => aws_dir()?.join("config"),
            },
        };

        let credentials = match env::var("AWS_SHARED_CREDENTIALS_FILE") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => aws_dir()?.join("credentials"),
        };

        Ok(Self {
            config,
            credentials,
        })
    }
}

impl Credentials {
    /// Load credentials for a given profile. An empty profile means `default`.
    pub fn load(profile: &str, region: &str, config_file: Option<&Path>) -> Result<Self> {
        let files = AwsFiles::resolve(config_file)?;
        let profile = if profile.is_empty() {
            DEFAULT_PROFILE
        } else {
            profile
        };

        // 1. Try environment variables first (if default profile)
        if profile == DEFAULT_PROFILE {
            if let Some(creds) = load_from_env(region) {
                debug!("Loaded credentials from environment variables");
                return Ok(creds);
            }
        }

        Self::load_from_files(profile, region, &files)
    }

    /// Load credentials for a profile from the shared credentials and config files.
    pub fn load_from_files(profile: &str, region: &str, files: &AwsFiles) -> Result<Self> {
        // 2. Try AWS credentials file
        if let Some(creds) = load_from_ini(&files.credentials, profile, region) {
            debug!("Loaded credentials from credentials file for profile '{}'", profile);
            return Ok(creds);
        }

        // 3. Try config file with direct credentials
        if let Some(creds) = load_from_ini(&files.config, profile, region) {
            debug!("Loaded credentials from config file for profile '{}'", profile);
            return Ok(creds);
        }

        Err(Error::Credentials(format!(
            "No credentials found for profile '{}'. Run 'aws configure' or set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY",
            profile
        )))
    }
}

/// Load credentials from environment variables
fn load_from_env(region: &str) -> Option<Credentials> {
    let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok().filter(|v| !v.is_empty())?;
    let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok().filter(|v| !v.is_empty())?;
    let session_token = env::var("AWS_SESSION_TOKEN").ok().filter(|v| !v.is_empty());

    Some(Credentials {
        access_key_id,
        secret_access_key,
        session_token,
        region: region.to_string(),
    })
}

/// Parse an INI-style file into sections
pub(crate) fn parse_ini_file(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current_section = String::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        // Section header
        if line.starts_with('[') && line.ends_with(']') {
            current_section = line[1..line.len() - 1].trim().to_string();
            // Handle "profile name" format in config file
            if let Some(name) = current_section.strip_prefix("profile ") {
                current_section = name.trim().to_string();
            }
            sections.entry(current_section.clone()).or_default();
            continue;
        }

        // Key-value pair
        if let Some((key, value)) = line.split_once('=') {
            if !current_section.is_empty() {
                sections
                    .entry(current_section.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    sections
}

/// Load a key pair for `profile` from an INI file, if the file has one.
fn load_from_ini(path: &Path, profile: &str, region: &str) -> Option<Credentials> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Could not read {:?}: {}", path, e);
            return None;
        }
    };

    let sections = parse_ini_file(&content);
    let section = sections.get(profile)?;

    let access_key_id = section.get("aws_access_key_id")?.clone();
    let secret_access_key = section.get("aws_secret_access_key")?.clone();

    Some(Credentials {
        access_key_id,
        secret_access_key,
        session_token: section.get("aws_session_token").cloned(),
        region: region.to_string(),
    })
}
