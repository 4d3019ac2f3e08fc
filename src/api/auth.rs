use async_trait::async_trait;

use crate::api::models::{
    LoginCredentials, LoginRequest, LoginResponse, LogoutResponse, RegisterRequest,
    RegisteredUser, Registration,
};
use crate::api::{ApiClient, ClientError};

/// Remote authentication calls the session controller depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ClientError>;

    async fn logout(&self, access_token: Option<&str>) -> Result<LogoutResponse, ClientError>;

    async fn register(&self, registration: &Registration) -> Result<RegisteredUser, ClientError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: &credentials.email,
            password_hash: &credentials.password,
        };
        self.send(self.post("/auth/login", None).json(&body), "login")
            .await
    }

    async fn logout(&self, access_token: Option<&str>) -> Result<LogoutResponse, ClientError> {
        self.send(self.post("/auth/logout", access_token), "logout")
            .await
    }

    async fn register(&self, registration: &Registration) -> Result<RegisteredUser, ClientError> {
        let body = RegisterRequest {
            username: &registration.username,
            email: &registration.email,
            password_hash: &registration.password,
        };
        self.send(self.post("/users", None).json(&body), "register")
            .await
    }
}
