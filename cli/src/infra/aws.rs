//! Infrastructure implementation of the `CloudProvider` port.
//!
//! `AwsCli<R>` routes every control-plane call through `aws ec2 ...` via a
//! `CommandRunner`, so tests can inject a scripted runner.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CloudProvider, CommandRunner};
use crate::domain::instance::InstanceSpec;

/// Adapter over the AWS CLI.
pub struct AwsCli<'a, R: CommandRunner> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> AwsCli<'a, R> {
    /// Create an adapter that runs `aws` through `runner`.
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    async fn ec2(&self, args: &[&str]) -> Result<Output> {
        let mut full = vec!["ec2".to_string()];
        full.extend(args.iter().map(|a| (*a).to_string()));
        self.runner.run("aws", &full).await
    }
}

impl<R: CommandRunner> CloudProvider for AwsCli<'_, R> {
    async fn launch(&self, spec: &InstanceSpec<'_>) -> Result<Output> {
        self.ec2(&[
            "run-instances",
            "--image-id",
            spec.image,
            "--instance-type",
            spec.instance_type,
            "--key-name",
            spec.keypair,
            "--subnet-id",
            spec.subnet,
            "--associate-public-ip-address",
            "--count",
            "1",
            "--output",
            "json",
        ])
        .await
        .context("aws ec2 run-instances")
    }

    async fn tag_name(&self, id: &str, name: &str) -> Result<Output> {
        let tag = format!("Key=Name,Value={name}");
        self.ec2(&["create-tags", "--resources", id, "--tags", &tag])
            .await
            .context("aws ec2 create-tags")
    }

    async fn wait_until_ready(&self, id: &str) -> Result<Output> {
        self.ec2(&["wait", "instance-status-ok", "--instance-ids", id])
            .await
            .context("aws ec2 wait instance-status-ok")
    }

    async fn terminate(&self, id: &str) -> Result<Output> {
        self.ec2(&[
            "terminate-instances",
            "--instance-ids",
            id,
            "--output",
            "json",
        ])
        .await
        .context("aws ec2 terminate-instances")
    }

    async fn describe(&self, id: &str) -> Result<Output> {
        self.ec2(&["describe-instances", "--instance-ids", id, "--output", "json"])
            .await
            .context("aws ec2 describe-instances")
    }
}
