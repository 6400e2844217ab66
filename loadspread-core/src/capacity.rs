//! Client for the balancer's capacity management endpoints

use crate::error::{ProbeError, ProbeResult};
use loadspread_config::ScalingConfig;
use loadspread_http::{HttpClient, HttpMethod, HttpResponse};
use loadspread_logging::preview;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const ACKNOWLEDGED: &str = "successful";

/// Request to add or remove units of capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityCommand {
    #[serde(rename = "n")]
    pub unit_count: u32,
    pub hostnames: Vec<String>,
}

impl CapacityCommand {
    pub fn new(unit_count: u32, hostnames: Vec<String>) -> Self {
        Self {
            unit_count,
            hostnames,
        }
    }

    /// One unit with a chosen hostname
    pub fn single(hostname: impl Into<String>) -> Self {
        Self::new(1, vec![hostname.into()])
    }

    /// Reject commands the balancer would refuse anyway
    pub fn validate(&self) -> ProbeResult<()> {
        if self.unit_count == 0 {
            return Err(ProbeError::control_failed(
                &self.hostnames,
                "unit count must be at least 1",
            ));
        }
        if self.hostnames.len() > self.unit_count as usize {
            return Err(ProbeError::control_failed(
                &self.hostnames,
                format!(
                    "{} hostnames given for {} units",
                    self.hostnames.len(),
                    self.unit_count
                ),
            ));
        }
        Ok(())
    }
}

/// Replica set reported by the balancer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaStatus {
    #[serde(rename = "N")]
    pub count: u32,
    pub replicas: Vec<String>,
}

pub struct CapacityController<C: HttpClient + ?Sized> {
    client: Arc<C>,
    control_url: String,
    add_path: String,
    remove_path: String,
    replicas_path: String,
}

impl<C: HttpClient + ?Sized> CapacityController<C> {
    pub fn new(client: Arc<C>, config: &ScalingConfig) -> Self {
        Self {
            client,
            control_url: config.control_url.trim_end_matches('/').to_string(),
            add_path: config.add_path.clone(),
            remove_path: config.remove_path.clone(),
            replicas_path: config.replicas_path.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.control_url, path)
    }

    /// Provision servers and wait for the balancer to acknowledge them
    ///
    /// The replica set is returned when the acknowledgement carries one.
    pub async fn add_servers(&self, command: &CapacityCommand) -> ProbeResult<Option<ReplicaStatus>> {
        let status = self.submit(HttpMethod::Post, &self.add_path, command).await?;
        info!(hostnames = ?command.hostnames, units = command.unit_count, "Capacity added");
        Ok(status)
    }

    pub async fn remove_servers(&self, command: &CapacityCommand) -> ProbeResult<Option<ReplicaStatus>> {
        let status = self.submit(HttpMethod::Delete, &self.remove_path, command).await?;
        info!(hostnames = ?command.hostnames, units = command.unit_count, "Capacity removed");
        Ok(status)
    }

    pub async fn replicas(&self) -> ProbeResult<ReplicaStatus> {
        let url = self.endpoint(&self.replicas_path);
        let response = self
            .client
            .send_json(HttpMethod::Get, &url, None)
            .await
            .map_err(|e| ProbeError::control_failed(&[], e.to_string()))?;

        Self::acknowledge(&response, &[])?
            .ok_or_else(|| ProbeError::control_failed(&[], "reply carried no replica set"))
    }

    async fn submit(
        &self,
        method: HttpMethod,
        path: &str,
        command: &CapacityCommand,
    ) -> ProbeResult<Option<ReplicaStatus>> {
        command.validate()?;

        let url = self.endpoint(path);
        let payload = serde_json::to_value(command)
            .map_err(|e| ProbeError::control_failed(&command.hostnames, e.to_string()))?;

        debug!(%method, url = %url, payload = %payload, "Sending control request");
        let response = self
            .client
            .send_json(method, &url, Some(&payload))
            .await
            .map_err(|e| ProbeError::control_failed(&command.hostnames, e.to_string()))?;

        Self::acknowledge(&response, &command.hostnames)
    }

    /// A reply acknowledges when it is 2xx and its body is either not JSON
    /// or carries `"status": "successful"`
    fn acknowledge(response: &HttpResponse, hostnames: &[String]) -> ProbeResult<Option<ReplicaStatus>> {
        if !response.is_success() {
            return Err(ProbeError::control_failed(
                hostnames,
                format!("HTTP {}: {}", response.status, preview(&response.body)),
            ));
        }

        let Ok(reply) = response.json::<Value>() else {
            return Ok(None);
        };

        let message = reply.get("message").cloned().unwrap_or(Value::Null);
        match reply.get("status").and_then(Value::as_str) {
            Some(ACKNOWLEDGED) => Ok(serde_json::from_value(message).ok()),
            status => {
                let reason = match message {
                    Value::String(text) => text,
                    Value::Null => preview(&response.body),
                    other => other.to_string(),
                };
                Err(ProbeError::control_failed(
                    hostnames,
                    format!("balancer answered '{}': {}", status.unwrap_or("no status"), reason),
                ))
            }
        }
    }
}
