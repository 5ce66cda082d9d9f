//! # Scheduler Client
//!
//! REST client for the task scheduler service: configuration discovery, the
//! HTTP transport for the `tasks` resource, and the request/response models
//! the command-line tool builds on.
//!
//! ```no_run
//! use scheduler_client::{ClientConfig, SchedulerApiClient};
//!
//! # async fn example() -> scheduler_client::ClientResult<()> {
//! let config = ClientConfig::load();
//! let client = SchedulerApiClient::new(config.api)?;
//! let tasks = client.list_tasks().await?;
//! println!("{tasks}");
//! # Ok(())
//! # }
//! ```

pub mod api_client;
pub mod config;
pub mod error;
pub mod models;

pub use api_client::SchedulerApiClient;
pub use config::{ApiConfig, ClientConfig};
pub use error::{ClientError, ClientResult};
