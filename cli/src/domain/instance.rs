//! Instance domain types and pure parsers for provider responses.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use anyhow::Result;
use serde::Deserialize;

use crate::domain::error::{PreconditionError, ProviderError};

/// The recorded remote machine: provider id plus, once resolved, its public name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    /// Provider-assigned identifier, e.g. `i-0abc123`.
    pub id: String,
    /// Public DNS name, `None` until `outpost host` has run.
    pub hostname: Option<String>,
}

impl InstanceRef {
    /// The hostname, or an error telling the user how to get one.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::NoHostname` when none is recorded.
    pub fn require_hostname(&self) -> Result<&str, PreconditionError> {
        self.hostname
            .as_deref()
            .ok_or_else(|| PreconditionError::NoHostname(self.id.clone()))
    }
}

/// Launch parameters for `run-instances`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec<'a> {
    /// Base image id.
    pub image: &'a str,
    /// Size class, e.g. `t3.micro`.
    pub instance_type: &'a str,
    /// Key pair registered with the provider.
    pub keypair: &'a str,
    /// Subnet to place the instance in.
    pub subnet: &'a str,
}

// ── Provider response shapes ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RunInstancesResponse {
    #[serde(default)]
    instances: Vec<InstanceRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstancesResponse {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<InstanceRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstanceRecord {
    #[serde(default)]
    instance_id: Option<String>,
    #[serde(default)]
    public_dns_name: Option<String>,
}

/// Extract the new instance id from `aws ec2 run-instances --output json`.
///
/// # Errors
///
/// Returns an error if the output is not JSON or carries no instance id.
pub fn parse_launched_id(stdout: &[u8]) -> Result<String> {
    let resp: RunInstancesResponse = serde_json::from_slice(stdout)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
    resp.instances
        .into_iter()
        .next()
        .and_then(|i| i.instance_id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProviderError::MissingField("Instances[0].InstanceId").into())
}

/// Extract the public DNS name from `aws ec2 describe-instances --output json`.
///
/// Returns `Ok(None)` when the instance has no public name (yet).
///
/// # Errors
///
/// Returns an error if the output is not JSON.
pub fn parse_public_dns(stdout: &[u8]) -> Result<Option<String>> {
    let resp: DescribeInstancesResponse = serde_json::from_slice(stdout)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
    Ok(resp
        .reservations
        .into_iter()
        .flat_map(|r| r.instances)
        .next()
        .and_then(|i| i.public_dns_name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty()))
}
