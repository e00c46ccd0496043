//! Login relay against the upstream authentication endpoint.

use std::sync::Arc;

use crate::application::error::AppError;
use crate::application::gateways::AuthGateway;
use crate::domain::entities::{Credentials, LoginGrant};
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AppError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(DomainError::validation("username and password are required").into());
        }
        Ok(self.gateway.login(credentials).await?)
    }
}
