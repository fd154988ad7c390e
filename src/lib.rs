pub mod animator;
pub mod app;
pub mod client;
pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod output;

pub use client::AssessmentClient;
pub use config::Config;
pub use error::ApiError;
pub use model::{Assessment, AssessmentData};
pub use normalize::{normalize, DisplayFields};
