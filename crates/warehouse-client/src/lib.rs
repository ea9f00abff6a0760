//! # warehouse-client
//!
//! Startup handshake with the warehouse authority and the service that
//! issues file access tokens once it completes.
//!
//! ```no_run
//! use warehouse_client::WarehouseService;
//! use warehouse_core::{RegisterOptions, SignOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RegisterOptions::new("https://warehouse.example.com", "api-key");
//! let service = WarehouseService::connect(options).await?;
//!
//! let access = service.generate_file_access(&SignOptions::new("reports/q3.pdf"))?;
//! println!("{}", access.url);
//! # Ok(())
//! # }
//! ```
//!
//! `connect` blocks until the authority answers, retrying every
//! `retry_delay` forever. Use [`SetupBootstrapper::spawn`] for a background
//! task that can be cancelled, or a [`RetryPolicy`] with a deadline.

pub mod bootstrap;
pub mod error;
pub mod service;
pub mod source;

pub use bootstrap::{BootstrapHandle, RetryPolicy, SetupBootstrapper};
pub use error::{BootstrapError, FetchError, ServiceError};
pub use service::WarehouseService;
pub use source::{HttpSetupSource, SetupSource};
pub use tokio_util::sync::CancellationToken;
