pub mod auth;
pub mod client;
pub mod comments;
pub mod error;
pub mod models;
pub mod posts;

pub use auth::AuthApi;
pub use client::ApiClient;
pub use error::ClientError;
