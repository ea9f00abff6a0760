//! Setup commands.
//!
//! `warehouse setup fetch` - Run the bootstrap handshake and print the result.

use std::time::Duration;
use warehouse_client::{HttpSetupSource, RetryPolicy, SetupBootstrapper};

/// Fetch setup information from the authority, retrying per the options.
pub async fn fetch(
    host: &str,
    api_key: &str,
    retry_delay_ms: u64,
    max_attempts: Option<u32>,
) -> anyhow::Result<()> {
    let source = HttpSetupSource::new(host, api_key)?;

    let mut policy = RetryPolicy::fixed(Duration::from_millis(retry_delay_ms));
    if let Some(max) = max_attempts {
        policy = policy.with_max_attempts(max);
    }

    let cancel = super::ctrl_c_token();
    let setup = SetupBootstrapper::new(source, policy).fetch(&cancel).await?;

    println!("{}", serde_json::to_string_pretty(&setup)?);
    Ok(())
}
