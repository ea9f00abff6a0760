//! CLI command implementations for the warehouse tools.

pub mod keys;
pub mod setup;
pub mod token;

use warehouse_client::CancellationToken;

/// A cancellation token that fires on Ctrl-C.
pub fn ctrl_c_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            token.cancel();
        }
    });
    cancel
}
