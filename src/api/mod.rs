pub mod client;
pub mod models;

pub use client::{FetchError, HttpClient, Result};
pub use models::ClientConfig;
