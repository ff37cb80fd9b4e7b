pub mod client;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;

mod task;

pub use client::Phosphomatics;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use models::{DataGroup, TaskHandle, TaskResult};
