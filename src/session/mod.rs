pub mod controller;
pub mod oauth;
pub mod store;

pub use controller::{AuthPhase, AuthSnapshot, LoginOutcome, LogoutOutcome, SessionController};
pub use store::SessionStore;
