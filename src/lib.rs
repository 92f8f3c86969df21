//! # storyboard-client
//!
//! Client library for the screenplay-to-storyboard service: upload a
//! screenplay, start generation, and follow the job until its frames are
//! ready.
//!
//! ```rust,ignore
//! use storyboard_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> storyboard_client::Result<()> {
//!     let client = StoryboardClient::new("http://localhost:5000".to_string())?;
//!     let poller = ProgressPoller::new(client, "/status/<project>", PollConfig::default());
//!     let outcome = poller.run(|status| println!("{}%", status.progress)).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`api`]: HTTP client and wire models
//! - [`core`]: status poller, estimates, workflow navigation and services
//! - [`storage`]: TOML configuration and session storage
//! - [`display`]: toasts, progress bars and frame tables
//! - [`utils`]: formatting, validation, retry policy, logging setup
//! - [`cli`]: `sbc` command definitions and dispatch

pub use error::AppError;

/// Common imports for library users
pub mod prelude {
    pub use crate::Result;
    pub use crate::api::client::{RequestOptions, StoryboardClient};
    pub use crate::api::models::{Frame, JobState, ProgressStatus, UploadResponse};
    pub use crate::core::poller::{PollConfig, PollOutcome, ProgressPoller, StatusSource, StopHandle};
    pub use crate::error::{ApiError, AppError, ValidationError};
    pub use crate::storage::session::SessionStore;
    pub use crate::utils::format::{format_file_size, format_time};
    pub use crate::utils::validation::{FileCandidate, validate_file};
}

pub mod api;
pub mod cli;
pub mod core;
pub mod display;
pub mod error;
pub mod storage;
pub mod utils;

pub type Result<T> = std::result::Result<T, AppError>;
