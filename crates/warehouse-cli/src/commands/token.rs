//! Token commands.
//!
//! `warehouse token issue` - Issue a file access token.
//! `warehouse token decode` - Decode and validate a token with the private key.
//! `warehouse token inspect` - Show a token's plaintext envelope.

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use warehouse_client::WarehouseService;
use warehouse_core::{PaddingScheme, SignOptions, WarehouseConfig};
use warehouse_token::keys::{load_private_key_pem, load_public_key_file};
use warehouse_token::{
    DecodedToken, FileAccess, RsaPrivateKey, TokenIssuer, TokenValidator, inspect_token_unverified,
};

/// Where `issue` gets its warehouse identity from.
pub enum IssueSource {
    /// Bootstrap over HTTP using a configuration file.
    Config(PathBuf),
    /// Use a local public key without contacting the authority.
    Offline {
        public_key: PathBuf,
        warehouse_name: String,
        host: String,
        padding: PaddingScheme,
    },
}

/// Resolve a private key from either a file path or a PEM string.
///
/// The key string can be:
/// - A path to a file containing a PEM private key
/// - A PEM private key directly (e.g., from WAREHOUSE_PRIVATE_KEY env var)
fn resolve_private_key(key: Option<String>) -> anyhow::Result<RsaPrivateKey> {
    let key_str = key.context(
        "Private key not provided. Either pass --key <path> or set WAREHOUSE_PRIVATE_KEY env var",
    )?;

    // If it looks like a file path and the file exists, load from file
    let path = Path::new(&key_str);
    if !key_str.contains("-----BEGIN") && path.exists() {
        let pem = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read private key file: {}", path.display()))?;
        return load_private_key_pem(&pem)
            .with_context(|| format!("Failed to load private key from file: {}", path.display()));
    }

    load_private_key_pem(&key_str)
        .context("Failed to parse private key. Expected a PEM RSA private key")
}

/// Parse a duration string like "30m", "2h", "1d" into chrono::Duration.
pub fn parse_duration(s: &str) -> anyhow::Result<chrono::Duration> {
    let s = s.trim().to_lowercase();

    let duration = if let Some(days) = s.strip_suffix('d') {
        chrono::Duration::try_days(days.parse()?)
    } else if let Some(hours) = s.strip_suffix('h') {
        chrono::Duration::try_hours(hours.parse()?)
    } else if let Some(minutes) = s.strip_suffix('m') {
        chrono::Duration::try_minutes(minutes.parse()?)
    } else if let Some(seconds) = s.strip_suffix('s') {
        chrono::Duration::try_seconds(seconds.parse()?)
    } else {
        // Try parsing as minutes if no suffix
        chrono::Duration::try_minutes(s.parse()?)
    };

    duration.context("duration out of range")
}

/// Build sign options from the CLI's expiry flags.
pub fn sign_options(
    file_id: &str,
    expires_in: Option<&str>,
    expires_at: Option<&str>,
) -> anyhow::Result<SignOptions> {
    let mut options = SignOptions::new(file_id);

    if let Some(expires_in) = expires_in {
        let duration = parse_duration(expires_in)
            .with_context(|| format!("Invalid --expires-in '{}'", expires_in))?;
        options = options
            .expires_in(duration)
            .with_context(|| format!("Invalid --expires-in '{}'", expires_in))?;
    }
    if let Some(expires_at) = expires_at {
        let at = DateTime::parse_from_rfc3339(expires_at)
            .with_context(|| format!("Invalid --expires-at '{}', expected RFC 3339", expires_at))?;
        options = options.expires_at(at.with_timezone(&Utc));
    }

    Ok(options)
}

/// Issue a token without contacting the authority.
pub fn issue_offline(
    public_key: &Path,
    warehouse_name: &str,
    host: &str,
    padding: PaddingScheme,
    options: &SignOptions,
) -> anyhow::Result<FileAccess> {
    let public_key = load_public_key_file(public_key)
        .with_context(|| format!("Failed to load public key from file: {}", public_key.display()))?;

    let issuer = TokenIssuer::new(warehouse_name, host, public_key).with_padding(padding);
    Ok(issuer.issue(options)?)
}

/// Issue a file access token and print it as JSON.
pub async fn issue(source: IssueSource, options: SignOptions) -> anyhow::Result<()> {
    let access = match source {
        IssueSource::Config(path) => {
            let config = WarehouseConfig::from_file(&path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            let service = WarehouseService::from_config(&config, &super::ctrl_c_token()).await?;
            service.generate_file_access(&options)?
        }
        IssueSource::Offline {
            public_key,
            warehouse_name,
            host,
            padding,
        } => issue_offline(&public_key, &warehouse_name, &host, padding, &options)?,
    };

    println!("{}", serde_json::to_string_pretty(&access)?);
    Ok(())
}

/// Decode and validate a token.
pub fn decode_token(
    private_key: Option<String>,
    padding: PaddingScheme,
    token: &str,
) -> anyhow::Result<DecodedToken> {
    let private_key = resolve_private_key(private_key)?;
    let validator = TokenValidator::new(private_key).with_padding(padding);
    Ok(validator.decode(token)?)
}

/// Decode a token and print it as JSON.
pub fn decode(
    private_key: Option<String>,
    padding: PaddingScheme,
    token: &str,
) -> anyhow::Result<()> {
    let decoded = decode_token(private_key, padding, token)?;

    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(())
}

/// Show a token's envelope without decrypting it.
pub fn inspect(token: &str) -> anyhow::Result<()> {
    let info = inspect_token_unverified(token)?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    println!();
    println!("⚠️  The payload was not decrypted; expiry and file are unverified.");
    Ok(())
}
