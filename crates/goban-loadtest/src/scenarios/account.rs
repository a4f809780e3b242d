//! Account lifecycle flow: register, login, verify, reset, re-login

use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tracing::debug;

use goban_client::account::DEFAULT_VERIFICATION_CODE;
use goban_core::credentials::next_credentials;
use goban_core::error::{HarnessError, Result};

use crate::pool::StoredAccount;
use crate::scenario::{Scenario, ScenarioContext};

/// Password applied by the reset step
pub const RESET_PASSWORD: &str = "NewPass123456!";

/// Drives one account through its full lifecycle and stores the result
pub struct AccountFlowScenario;

#[async_trait]
impl Scenario for AccountFlowScenario {
    fn name(&self) -> &str {
        "account_flow"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let credentials = next_credentials();

        ctx.accounts
            .register(&credentials, DEFAULT_VERIFICATION_CODE)
            .await?;

        let session = ctx
            .accounts
            .try_login(&credentials.email, &credentials.password)
            .await?;
        ctx.stats.accounts_registered.fetch_add(1, Ordering::Relaxed);
        debug!(user_id = session.user_id, nickname = %session.nickname, "account created");

        if !ctx.accounts.verify_token(&session.token).await {
            return Err(HarnessError::Rejected {
                code: None,
                message: "token verification failed".to_string(),
            });
        }

        ctx.accounts
            .reset_password(&credentials.email, RESET_PASSWORD, DEFAULT_VERIFICATION_CODE)
            .await?;
        ctx.stats.resets_completed.fetch_add(1, Ordering::Relaxed);

        // the reset revoked the session's token; only a login with the new
        // password proves the account is usable
        let session = ctx
            .accounts
            .login(&credentials.email, RESET_PASSWORD)
            .await
            .ok_or_else(|| HarnessError::Rejected {
                code: None,
                message: "login with new password failed".to_string(),
            })?;

        ctx.pool
            .append(StoredAccount::from_session(&session, RESET_PASSWORD));
        Ok(())
    }
}
