//! Account operations: registration, login, verification, password reset
//!
//! Register, login and reset all follow the same two-step pattern: fetch
//! the encryption public key, encrypt the password, then act. A key fetch
//! failure surfaces as `KeyUnavailable` regardless of the underlying cause.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use goban_core::error::{HarnessError, Result};
use goban_core::types::{Credentials, Session};

use crate::crypto;
use crate::http::{ApiClient, Auth};

/// Fixed verification code accepted by the test environment
pub const DEFAULT_VERIFICATION_CODE: &str = "123456";

/// Client for the identity service
#[derive(Clone, Debug)]
pub struct AccountClient {
    api: Arc<ApiClient>,
}

impl AccountClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Fetch the RSA public key used to encrypt password fields
    pub async fn fetch_public_key(&self) -> Result<String> {
        let response = self.api.get("/api/user/public-key", None).await;
        if !response.success {
            debug!(error = %response.to_error(), "public key fetch failed");
            return Err(HarnessError::KeyUnavailable);
        }

        response
            .data
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(HarnessError::KeyUnavailable)
    }

    /// Register a new account
    ///
    /// Remote rejections surface verbatim as `Rejected` with the service's
    /// error code and message.
    pub async fn register(
        &self,
        credentials: &Credentials,
        verification_code: &str,
    ) -> Result<()> {
        let public_key = self.fetch_public_key().await?;
        let encrypted_password = crypto::encrypt_password(&credentials.password, &public_key)?;

        let payload = json!({
            "email": credentials.email,
            "nickname": credentials.nickname,
            "encryptedPassword": encrypted_password,
            "verificationCode": verification_code,
        });

        self.api
            .post("/api/user/register", &payload, None)
            .await
            .into_result()
            .map(|_| ())
    }

    /// Log in, with the failure cause preserved
    ///
    /// Distinguishes key fetch, encryption and remote rejection failures.
    pub async fn try_login(&self, identifier: &str, password: &str) -> Result<Session> {
        let public_key = self.fetch_public_key().await?;
        let encrypted_password = crypto::encrypt_password(password, &public_key)?;

        let payload = json!({
            "username": identifier,
            "encryptedPassword": encrypted_password,
        });

        let data = self
            .api
            .post("/api/user/login", &payload, None)
            .await
            .into_result()?
            .ok_or_else(|| {
                HarnessError::MalformedResponse("login response missing data".to_string())
            })?;

        let user_id = data
            .get("userId")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                HarnessError::MalformedResponse("login response missing userId".to_string())
            })?;
        let token = data
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                HarnessError::MalformedResponse("login response missing token".to_string())
            })?
            .to_string();

        let field_or = |key: &str| {
            data.get(key)
                .and_then(Value::as_str)
                .unwrap_or(identifier)
                .to_string()
        };

        Ok(Session {
            user_id,
            nickname: field_or("nickname"),
            email: field_or("email"),
            token,
        })
    }

    /// Log in, collapsing every failure to `None`
    ///
    /// Existing flows gate only on success; the discarded cause is logged
    /// at debug level. Use [`try_login`](Self::try_login) when the cause
    /// matters.
    pub async fn login(&self, identifier: &str, password: &str) -> Option<Session> {
        match self.try_login(identifier, password).await {
            Ok(session) => Some(session),
            Err(err) => {
                debug!(identifier, error = %err, "login failed");
                None
            }
        }
    }

    /// Check whether a token is still accepted
    pub async fn verify_token(&self, token: &str) -> bool {
        self.api
            .get("/api/user/verify", Some(Auth::token_only(token)))
            .await
            .success
    }

    /// Reset an account password
    ///
    /// The service revokes the account's current token as a side effect;
    /// any held Session is stale afterwards and the caller must re-login.
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        verification_code: &str,
    ) -> Result<()> {
        let public_key = self.fetch_public_key().await?;
        let encrypted_password = crypto::encrypt_password(new_password, &public_key)?;

        let payload = json!({
            "email": email,
            "encryptedNewPassword": encrypted_password,
            "verificationCode": verification_code,
        });

        self.api
            .post("/api/user/reset-password", &payload, None)
            .await
            .into_result()
            .map(|_| ())
    }
}
