//! Service configuration
//!
//! Everything is read from environment variables at startup. `from_lookup`
//! takes the variable source as a function so tests can supply values
//! without touching the process environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sentiment_model::ARTIFACT_KEY;
use thiserror::Error;

use crate::labels::LabelPolicy;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Default name of the variable holding the bucket for the remote source
pub const DEFAULT_BUCKET_ENV: &str = "MODEL_BUCKET_NAME";

/// Default object store request timeout in seconds
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

/// Configuration errors. These abort startup regardless of load policy.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: expected {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Where the model artifact comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// File under the model root
    #[default]
    Local,
    /// Object in a bucket on the object store
    Remote,
}

impl FromStr for SourceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "s3" => Ok(Self::Remote),
            _ => Err(()),
        }
    }
}

/// Client used for the remote source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreKind {
    /// Signed requests through the AWS SDK and its credential chain
    #[default]
    S3,
    /// Unsigned path-style GET against `store_endpoint`
    Http,
}

impl FromStr for StoreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" | "aws" => Ok(Self::S3),
            "http" => Ok(Self::Http),
            _ => Err(()),
        }
    }
}

/// What happens when the model fails to load at startup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log the failure and serve without a model; predict answers 503
    #[default]
    FailSoft,
    /// Abort startup
    FailHard,
}

impl FromStr for LoadPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-soft" | "soft" => Ok(Self::FailSoft),
            "fail-hard" | "hard" => Ok(Self::FailHard),
            _ => Err(()),
        }
    }
}

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Inference service configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Artifact source strategy
    pub source: SourceKind,

    /// Name of the variable the bucket was read from (for error messages)
    pub bucket_env: String,

    /// Bucket holding the artifact; `None` when unset or blank
    pub bucket: Option<String>,

    /// Object store client
    pub store: StoreKind,

    /// Object store base URL. Optional override for S3, required for HTTP.
    pub store_endpoint: Option<String>,

    /// Region for S3; the AWS provider chain decides when unset
    pub store_region: Option<String>,

    /// Object store request timeout
    pub store_timeout: Duration,

    /// Directory the local artifact is resolved against
    pub model_root: PathBuf,

    /// Startup failure policy
    pub load_policy: LoadPolicy,

    /// Raw label to response label mapping
    pub label_policy: LabelPolicy,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            source: SourceKind::default(),
            bucket_env: DEFAULT_BUCKET_ENV.to_string(),
            bucket: None,
            store: StoreKind::default(),
            store_endpoint: None,
            store_region: None,
            store_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            model_root: default_model_root(),
            load_policy: LoadPolicy::default(),
            label_policy: LabelPolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bucket_env = lookup("MODEL_BUCKET_ENV")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.bucket_env);
        let bucket = non_blank(lookup(&bucket_env));

        let store_timeout = parse(&lookup, "MODEL_STORE_TIMEOUT_SECS", "a number of seconds")?
            .map_or(defaults.store_timeout, Duration::from_secs);

        Ok(Self {
            bind_addr: lookup("SENTIMENT_BIND_ADDR").unwrap_or(defaults.bind_addr),
            source: parse(&lookup, "MODEL_SOURCE", "`local` or `remote`")?
                .unwrap_or(defaults.source),
            bucket_env,
            bucket,
            store: parse(&lookup, "MODEL_STORE", "`s3` or `http`")?.unwrap_or(defaults.store),
            store_endpoint: non_blank(lookup("MODEL_STORE_ENDPOINT")),
            store_region: non_blank(lookup("MODEL_STORE_REGION")),
            store_timeout,
            model_root: lookup("MODEL_ROOT").map_or(defaults.model_root, PathBuf::from),
            load_policy: parse(&lookup, "MODEL_LOAD_POLICY", "`fail-soft` or `fail-hard`")?
                .unwrap_or(defaults.load_policy),
            label_policy: parse(&lookup, "SENTIMENT_LABEL_POLICY", "`binary` or `raw`")?
                .unwrap_or(defaults.label_policy),
            log_format: parse(&lookup, "LOG_FORMAT", "`text` or `json`")?
                .unwrap_or(defaults.log_format),
        })
    }

    /// Configuration that loads the artifact from `model_root`.
    pub fn local(model_root: impl Into<PathBuf>) -> Self {
        Self {
            source: SourceKind::Local,
            model_root: model_root.into(),
            ..Self::default()
        }
    }

    /// Full path of the local artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.model_root.join(ARTIFACT_KEY)
    }
}

/// The installation root: the parent of the directory holding the binary.
fn default_model_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| install_root(&exe))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `/opt/sentiment/bin/inference-service` installs under `/opt/sentiment`.
pub fn install_root(exe: &Path) -> Option<PathBuf> {
    exe.parent()?.parent().map(Path::to_path_buf)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<F, T>(
    lookup: &F,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var,
                value,
                expected,
            }),
    }
}
