//! Session-scoped entry point bundling a transport, a client and configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::config::SdkConfig;
use crate::entities::{Client, Factor, StatusMessage, Variable};
use crate::error::SdkResult;
use crate::query_detail::{FactorQueryResult, QueryDetail, VariableQueryResult};
use crate::services::{self, FactorFilter, VariableFilter, WaitOptions};
use crate::transport::{HttpsTransport, Transport, WebSocketTransport};

/// Async handle on one user/robot/session
#[derive(Clone)]
pub struct NavAbility {
    transport: Arc<dyn Transport>,
    client: Client,
    config: SdkConfig,
}

impl NavAbility {
    /// Use `transport` with the default configuration
    pub fn new(transport: Arc<dyn Transport>, client: Client) -> Self {
        Self {
            transport,
            client,
            config: SdkConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SdkConfig) -> Self {
        self.config = config;
        self
    }

    /// Talk to the configured HTTPS endpoint
    pub fn https(config: SdkConfig, client: Client) -> SdkResult<Self> {
        config.validate()?;
        let transport = HttpsTransport::from_config(&config)?;
        Ok(Self::new(Arc::new(transport), client).with_config(config))
    }

    /// Talk to the configured WebSocket endpoint
    pub fn websocket(config: SdkConfig, client: Client) -> SdkResult<Self> {
        config.validate()?;
        let transport = WebSocketTransport::from_config(&config);
        Ok(Self::new(Arc::new(transport), client).with_config(config))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub async fn add_variable(&self, variable: &Variable) -> SdkResult<Value> {
        services::add_variable(self.transport.as_ref(), &self.client, variable).await
    }

    /// Variables at `detail`, using the configured envelope policy
    pub async fn get_variables(
        &self,
        detail: QueryDetail,
        filter: &VariableFilter,
    ) -> SdkResult<VariableQueryResult> {
        services::get_variables(
            self.transport.as_ref(),
            &self.client,
            detail,
            filter,
            self.config.envelope_policy,
        )
        .await
    }

    pub async fn get_variable(&self, label: &str) -> SdkResult<Option<Variable>> {
        services::get_variable(self.transport.as_ref(), &self.client, label).await
    }

    pub async fn list_variables(&self, filter: &VariableFilter) -> SdkResult<Vec<String>> {
        services::list_variables(
            self.transport.as_ref(),
            &self.client,
            filter,
            self.config.envelope_policy,
        )
        .await
    }

    /// Labels of all variables under the default filter
    pub async fn ls(&self) -> SdkResult<Vec<String>> {
        self.list_variables(&VariableFilter::default()).await
    }

    pub async fn add_factor(&self, factor: &Factor) -> SdkResult<Value> {
        services::add_factor(self.transport.as_ref(), &self.client, factor).await
    }

    pub async fn get_factors(
        &self,
        detail: QueryDetail,
        filter: &FactorFilter,
    ) -> SdkResult<FactorQueryResult> {
        services::get_factors(
            self.transport.as_ref(),
            &self.client,
            detail,
            filter,
            self.config.envelope_policy,
        )
        .await
    }

    pub async fn get_factor(&self, label: &str) -> SdkResult<Option<Factor>> {
        services::get_factor(self.transport.as_ref(), &self.client, label).await
    }

    pub async fn list_factors(&self, filter: &FactorFilter) -> SdkResult<Vec<String>> {
        services::list_factors(
            self.transport.as_ref(),
            &self.client,
            filter,
            self.config.envelope_policy,
        )
        .await
    }

    /// Labels of all factors under the default filter
    pub async fn lsf(&self) -> SdkResult<Vec<String>> {
        self.list_factors(&FactorFilter::default()).await
    }

    pub async fn get_status_messages(&self, request_id: &str) -> SdkResult<Vec<StatusMessage>> {
        services::get_status_messages(self.transport.as_ref(), request_id).await
    }

    pub async fn get_status_latest(&self, request_id: &str) -> SdkResult<Option<StatusMessage>> {
        services::get_status_latest(self.transport.as_ref(), request_id).await
    }

    pub async fn get_statuses_latest<S: AsRef<str> + Sync>(
        &self,
        request_ids: &[S],
    ) -> SdkResult<BTreeMap<String, StatusMessage>> {
        services::get_statuses_latest(self.transport.as_ref(), request_ids).await
    }

    /// Wait on `request_ids` with the configured poll interval and timeout
    pub async fn wait_for_completion<S: AsRef<str> + Sync>(
        &self,
        request_ids: &[S],
    ) -> SdkResult<()> {
        let options = WaitOptions::from_config(&self.config);
        services::wait_for_completion(self.transport.as_ref(), request_ids, &options).await
    }

    pub async fn solve_session(&self) -> SdkResult<Value> {
        services::solve_session(self.transport.as_ref(), &self.client).await
    }
}

impl std::fmt::Debug for NavAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavAbility")
            .field("client", &self.client)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
