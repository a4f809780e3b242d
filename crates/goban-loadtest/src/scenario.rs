//! Scenario trait and shared context

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use goban_client::account::DEFAULT_VERIFICATION_CODE;
use goban_client::{
    AccountClient, ApiClient, GameClient, LeaderboardClient, MatchClient, RoomClient,
};
use goban_core::credentials::next_credentials;
use goban_core::error::{HarnessError, Result};
use goban_core::types::Session;
use goban_orchestrator::OrchestratorConfig;

use crate::config::LoadTestConfig;
use crate::pool::SessionPool;
use crate::stats::HarnessStats;

/// Everything a flow needs: the service clients, pacing configuration and
/// the shared aggregates injected by the runner
pub struct ScenarioContext {
    pub config: LoadTestConfig,
    pub accounts: AccountClient,
    pub matching: MatchClient,
    pub rooms: RoomClient,
    pub games: GameClient,
    pub leaderboard: LeaderboardClient,
    pub orchestration: OrchestratorConfig,
    pub stats: Arc<HarnessStats>,
    pub pool: Arc<SessionPool>,
}

impl ScenarioContext {
    pub fn new(
        config: &LoadTestConfig,
        stats: Arc<HarnessStats>,
        pool: Arc<SessionPool>,
    ) -> Result<Self> {
        let api = Arc::new(ApiClient::new(
            &config.target_url,
            Duration::from_secs(config.request_timeout_secs),
        )?);

        Ok(Self {
            config: config.clone(),
            accounts: AccountClient::new(api.clone()),
            matching: MatchClient::new(api.clone()),
            rooms: RoomClient::new(api.clone()),
            games: GameClient::new(api.clone()),
            leaderboard: LeaderboardClient::new(api),
            orchestration: OrchestratorConfig::default(),
            stats,
            pool,
        })
    }

    /// Register a fresh account and log it in
    ///
    /// Every flow owns the accounts it plays with; nothing is checked out
    /// of a shared pool mid-run, which keeps concurrent flows free of
    /// cross-actor contention on game state.
    pub async fn fresh_session(&self) -> Result<Session> {
        let credentials = next_credentials();
        self.accounts
            .register(&credentials, DEFAULT_VERIFICATION_CODE)
            .await?;

        self.accounts
            .login(&credentials.email, &credentials.password)
            .await
            .ok_or_else(|| {
                HarnessError::Internal("login after registration failed".to_string())
            })
    }
}

/// One end-to-end flow against the service
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Scenario name
    fn name(&self) -> &str;

    /// Execute a single flow
    async fn run(&self, ctx: &ScenarioContext) -> Result<()>;
}
