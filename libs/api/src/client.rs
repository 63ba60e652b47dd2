//! Scheduler API client.
//!
//! [`SchedulerApi`] is the seam between the reconciliation layers and the
//! remote scheduler; tests substitute an in-memory implementation. The
//! HTTP implementation speaks the scheduler's v1 REST surface:
//!
//! - `GET  /fleet/v1/units`        (paged)
//! - `GET  /fleet/v1/state`        (paged)
//! - `GET  /fleet/v1/machines`     (paged)
//! - `PUT  /fleet/v1/units/{name}`
//! - `DELETE /fleet/v1/units/{name}`

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::types::{DesiredState, Machine, Unit, UnitOption, UnitStateRecord};

/// The minimum scheduler surface this system consumes.
///
/// Every call maps to exactly one remote operation; no retries and no
/// caching happen at this layer.
#[async_trait]
pub trait SchedulerApi: Send + Sync {
    /// Fetch the full unit inventory.
    async fn list_units(&self) -> Result<Vec<Unit>, ApiError>;

    /// Fetch process-manager state per unit per machine.
    async fn list_unit_states(&self) -> Result<Vec<UnitStateRecord>, ApiError>;

    /// Fetch the cluster node inventory.
    async fn list_machines(&self) -> Result<Vec<Machine>, ApiError>;

    /// Submit a unit definition.
    async fn create_unit(
        &self,
        name: &str,
        desired_state: DesiredState,
        options: &[UnitOption],
    ) -> Result<(), ApiError>;

    /// Remove a unit definition.
    async fn destroy_unit(&self, name: &str) -> Result<(), ApiError>;
}

/// HTTP client for the scheduler's v1 REST API.
pub struct HttpSchedulerClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitsPage {
    #[serde(default)]
    units: Vec<Unit>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatesPage {
    #[serde(default)]
    states: Vec<UnitStateRecord>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachinesPage {
    #[serde(default)]
    machines: Vec<Machine>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUnitRequest<'a> {
    desired_state: DesiredState,
    options: &'a [UnitOption],
}

impl HttpSchedulerClient {
    /// Create a client for the scheduler at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/fleet/v1/{}", self.base_url, path)
    }

    async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        page_token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = page_token {
            request = request.query(&[("nextPageToken", token)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::status(operation, status, body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SchedulerApi for HttpSchedulerClient {
    async fn list_units(&self) -> Result<Vec<Unit>, ApiError> {
        let mut units = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page: UnitsPage = self
                .get_page("list units", "units", token.as_deref())
                .await?;
            units.extend(page.units);
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        debug!(count = units.len(), "Listed units");
        Ok(units)
    }

    async fn list_unit_states(&self) -> Result<Vec<UnitStateRecord>, ApiError> {
        let mut states = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page: StatesPage = self
                .get_page("list unit states", "state", token.as_deref())
                .await?;
            states.extend(page.states);
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        debug!(count = states.len(), "Listed unit states");
        Ok(states)
    }

    async fn list_machines(&self) -> Result<Vec<Machine>, ApiError> {
        let mut machines = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page: MachinesPage = self
                .get_page("list machines", "machines", token.as_deref())
                .await?;
            machines.extend(page.machines);
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        debug!(count = machines.len(), "Listed machines");
        Ok(machines)
    }

    async fn create_unit(
        &self,
        name: &str,
        desired_state: DesiredState,
        options: &[UnitOption],
    ) -> Result<(), ApiError> {
        debug!(unit = %name, desired_state = %desired_state, "Submitting unit");

        let request = CreateUnitRequest {
            desired_state,
            options,
        };
        let response = self
            .client
            .put(self.url(&format!("units/{}", name)))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::status("create unit", status, body));
        }

        Ok(())
    }

    async fn destroy_unit(&self, name: &str) -> Result<(), ApiError> {
        debug!(unit = %name, "Destroying unit");

        let response = self
            .client
            .delete(self.url(&format!("units/{}", name)))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::status("destroy unit", status, body));
        }

        Ok(())
    }
}
