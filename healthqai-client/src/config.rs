use reqwest::Url;
use std::path::PathBuf;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const API_URL_VAR: &str = "HEALTHQAI_API_URL";
const SESSION_FILE_VAR: &str = "HEALTHQAI_SESSION_FILE";

/// Where the service lives and where the session token is kept.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: &str, session_file: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            session_file: session_file.into(),
        })
    }

    /// Build the configuration from `HEALTHQAI_API_URL` and
    /// `HEALTHQAI_SESSION_FILE`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(None, None)
    }

    /// Like [`ClientConfig::from_env`], but explicit values win and the
    /// matching variable is never read.
    pub fn from_env_with(api_url: Option<&str>, session_file: Option<PathBuf>) -> Result<Self> {
        resolve(api_url, session_file, |name| std::env::var(name).ok())
    }
}

fn resolve(
    api_url: Option<&str>,
    session_file: Option<PathBuf>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig> {
    let base_url = match api_url {
        Some(url) => url.to_string(),
        None => var(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
    };
    let session_file = session_file
        .or_else(|| var(SESSION_FILE_VAR).map(PathBuf::from))
        .unwrap_or_else(|| default_session_file(var("HOME")));

    ClientConfig::new(&base_url, session_file)
}

fn default_session_file(home: Option<String>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".healthqai").join("session.json"),
        _ => PathBuf::from(".healthqai-session.json"),
    }
}

/// Parse and normalise the service origin so that relative endpoint paths
/// join underneath it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ClientError::Config(format!("invalid service URL '{}': {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "service URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalised() {
        let url = parse_base_url("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");

        let nested = parse_base_url("https://example.org/api").unwrap();
        assert_eq!(nested.join("predict").unwrap().as_str(), "https://example.org/api/predict");
    }

    #[test]
    fn test_explicit_values_win_over_environment() {
        let env = |name: &str| match name {
            API_URL_VAR => Some("not a url".to_string()),
            SESSION_FILE_VAR => Some("/from/env.json".to_string()),
            "HOME" => Some("/home/doctor".to_string()),
            _ => None,
        };

        let config =
            resolve(Some("http://10.0.0.5:8000"), Some(PathBuf::from("flag.json")), env).unwrap();
        assert_eq!(config.base_url.as_str(), "http://10.0.0.5:8000/");
        assert_eq!(config.session_file, PathBuf::from("flag.json"));

        // without an override the bad variable is reported
        assert!(matches!(resolve(None, None, env), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = resolve(None, None, |_| None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.session_file, PathBuf::from(".healthqai-session.json"));

        let home = |name: &str| (name == "HOME").then(|| "/home/doctor".to_string());
        let config = resolve(None, None, home).unwrap();
        assert_eq!(
            config.session_file,
            PathBuf::from("/home/doctor/.healthqai/session.json")
        );
    }

    #[test]
    fn test_base_url_rejected() {
        assert!(matches!(parse_base_url("not a url"), Err(ClientError::Config(_))));
        assert!(matches!(
            parse_base_url("ftp://localhost:8000"),
            Err(ClientError::Config(_))
        ));
    }
}
