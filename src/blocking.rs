//! Blocking wrapper around [`NavAbility`] for callers without an async runtime.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

use crate::config::SdkConfig;
use crate::entities::{Client, Factor, StatusMessage, Variable};
use crate::error::{SdkError, SdkResult};
use crate::navability::NavAbility;
use crate::query_detail::{FactorQueryResult, QueryDetail, VariableQueryResult};
use crate::services::{FactorFilter, VariableFilter};
use crate::transport::Transport;

/// Drives [`NavAbility`] futures on a private current-thread runtime.
///
/// Must not be used from inside another tokio runtime.
pub struct BlockingNavAbility {
    inner: NavAbility,
    runtime: Runtime,
}

impl BlockingNavAbility {
    pub fn new(inner: NavAbility) -> SdkResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SdkError::Runtime(e.to_string()))?;
        Ok(Self { inner, runtime })
    }

    pub fn with_transport(transport: Arc<dyn Transport>, client: Client) -> SdkResult<Self> {
        Self::new(NavAbility::new(transport, client))
    }

    pub fn https(config: SdkConfig, client: Client) -> SdkResult<Self> {
        Self::new(NavAbility::https(config, client)?)
    }

    pub fn websocket(config: SdkConfig, client: Client) -> SdkResult<Self> {
        Self::new(NavAbility::websocket(config, client)?)
    }

    /// The async handle this facade drives
    pub fn inner(&self) -> &NavAbility {
        &self.inner
    }

    pub fn add_variable(&self, variable: &Variable) -> SdkResult<Value> {
        self.runtime.block_on(self.inner.add_variable(variable))
    }

    pub fn get_variables(
        &self,
        detail: QueryDetail,
        filter: &VariableFilter,
    ) -> SdkResult<VariableQueryResult> {
        self.runtime.block_on(self.inner.get_variables(detail, filter))
    }

    pub fn get_variable(&self, label: &str) -> SdkResult<Option<Variable>> {
        self.runtime.block_on(self.inner.get_variable(label))
    }

    pub fn list_variables(&self, filter: &VariableFilter) -> SdkResult<Vec<String>> {
        self.runtime.block_on(self.inner.list_variables(filter))
    }

    pub fn ls(&self) -> SdkResult<Vec<String>> {
        self.runtime.block_on(self.inner.ls())
    }

    pub fn add_factor(&self, factor: &Factor) -> SdkResult<Value> {
        self.runtime.block_on(self.inner.add_factor(factor))
    }

    pub fn get_factors(
        &self,
        detail: QueryDetail,
        filter: &FactorFilter,
    ) -> SdkResult<FactorQueryResult> {
        self.runtime.block_on(self.inner.get_factors(detail, filter))
    }

    pub fn get_factor(&self, label: &str) -> SdkResult<Option<Factor>> {
        self.runtime.block_on(self.inner.get_factor(label))
    }

    pub fn list_factors(&self, filter: &FactorFilter) -> SdkResult<Vec<String>> {
        self.runtime.block_on(self.inner.list_factors(filter))
    }

    pub fn lsf(&self) -> SdkResult<Vec<String>> {
        self.runtime.block_on(self.inner.lsf())
    }

    pub fn get_status_messages(&self, request_id: &str) -> SdkResult<Vec<StatusMessage>> {
        self.runtime.block_on(self.inner.get_status_messages(request_id))
    }

    pub fn get_status_latest(&self, request_id: &str) -> SdkResult<Option<StatusMessage>> {
        self.runtime.block_on(self.inner.get_status_latest(request_id))
    }

    pub fn get_statuses_latest<S: AsRef<str> + Sync>(
        &self,
        request_ids: &[S],
    ) -> SdkResult<BTreeMap<String, StatusMessage>> {
        self.runtime
            .block_on(self.inner.get_statuses_latest(request_ids))
    }

    pub fn wait_for_completion<S: AsRef<str> + Sync>(&self, request_ids: &[S]) -> SdkResult<()> {
        self.runtime
            .block_on(self.inner.wait_for_completion(request_ids))
    }

    pub fn solve_session(&self) -> SdkResult<Value> {
        self.runtime.block_on(self.inner.solve_session())
    }
}
