use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default wall-clock budget for one export-start call.
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_list(profile: &str, key: &str) -> Vec<String> {
    profiled_env_opt(profile, key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub aws: AwsConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SNAPEX_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_opt("SNAPEX_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            aws: AwsConfig::from_env_profiled(p),
            export: ExportConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  aws:    region={}, endpoint={}", self.aws.region, self.aws.endpoint_url.as_deref().unwrap_or("(default)"));
        tracing::info!("  export: bucket={}, prefix={}, timeout={}s", self.export.bucket, self.export.base_prefix.as_deref().unwrap_or("(none)"), self.export.timeout_seconds);
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "aws": {
                "region": self.aws.region,
                "endpoint_url": self.aws.endpoint_url,
                "static_credentials": self.aws.has_static_credentials(),
            },
            "export": {
                "bucket": self.export.bucket,
                "base_prefix": self.export.base_prefix,
                "role_arn": self.export.role_arn,
                "kms_key_id": self.export.kms_key_id,
                "export_only": self.export.export_only,
                "timeout_seconds": self.export.timeout_seconds,
                "configured": self.export.validate().is_ok(),
            },
        })
    }
}

// ── AWS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            region: profiled_env_or(p, "AWS_REGION", "ap-southeast-1"),
            access_key_id: profiled_env_opt(p, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(p, "AWS_SECRET_ACCESS_KEY"),
            session_token: profiled_env_opt(p, "AWS_SESSION_TOKEN"),
            endpoint_url: profiled_env_opt(p, "AWS_ENDPOINT_URL"),
        }
    }

    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }

    /// Endpoint override with a scheme, if one is configured.
    pub fn endpoint(&self) -> Option<String> {
        let endpoint = self.endpoint_url.as_deref().filter(|e| !e.is_empty())?;
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            Some(endpoint.to_string())
        } else {
            Some(format!("https://{endpoint}"))
        }
    }
}

// ── Export ────────────────────────────────────────────────────

/// Deployment-time inputs of every export request.
///
/// Read-only once loaded; shared by all invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Destination bucket name.
    pub bucket: String,
    /// Optional key prefix placed before the `YYYY/MM/DD` partition.
    pub base_prefix: Option<String>,
    /// Role the export service assumes to write into the bucket.
    pub role_arn: String,
    /// KMS key used to encrypt the exported data.
    pub kms_key_id: String,
    /// Restrict the export to these databases/schemas/tables (empty = everything).
    pub export_only: Vec<String>,
    pub timeout_seconds: u64,
}

impl ExportConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            bucket: profiled_env_or(p, "EXPORT_BUCKET", ""),
            base_prefix: profiled_env_opt(p, "EXPORT_PREFIX"),
            role_arn: profiled_env_or(p, "EXPORT_ROLE_ARN", ""),
            kms_key_id: profiled_env_or(p, "EXPORT_KMS_KEY_ID", ""),
            export_only: profiled_env_list(p, "EXPORT_ONLY"),
            timeout_seconds: profiled_env_u64(p, "EXPORT_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS),
        }
    }

    /// Check that every required value is present, reporting all gaps at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<String> = [
            ("EXPORT_BUCKET", &self.bucket),
            ("EXPORT_ROLE_ARN", &self.role_arn),
            ("EXPORT_KMS_KEY_ID", &self.kms_key_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k.to_string())
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "EXPORT_TIMEOUT_SECONDS".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
