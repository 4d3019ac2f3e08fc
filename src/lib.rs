// Library exports for snapfeed
// This allows integration tests and the binary to share the client modules

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
