//! Instance lifecycle service tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use outpost_cli::application::services::instance::{
    HostOutcome, TerminateOutcome, provision, resolve_host, terminate,
};
use outpost_cli::domain::keys;
use outpost_cli::infra::aws::AwsCli;
use outpost_cli::infra::known_hosts::{KeyscanRegistry, KnownHostsManager};

use crate::helpers::{
    HOST_KEY, HOSTNAME, Project, RecordingReporter, ScriptedRunner, contains_line, describe_json,
    err_output, launch_json, ok_output, ready_project,
};

#[tokio::test]
async fn test_provision_records_id_and_clears_stale_hostname() {
    let project = Project::new(&[
        "KEYPAIR=dev",
        "SUBNET=subnet-123",
        "INSTANCE_HOSTNAME=stale.example.com",
    ]);
    let mut settings = project.settings();
    let runner = ScriptedRunner::new([ok_output(&launch_json("i-0new")), ok_output(b"")]);
    let reporter = RecordingReporter::default();

    let id = provision(&mut settings, &AwsCli::new(&runner), &project.store(), &reporter)
        .await
        .unwrap();

    assert_eq!(id, "i-0new");
    assert_eq!(settings.get(keys::INSTANCE_ID), "i-0new");
    assert_eq!(settings.get(keys::INSTANCE_HOSTNAME), "");
    assert!(contains_line(&project.env_path(), "INSTANCE_ID=i-0new"));
    assert!(contains_line(&project.env_path(), "INSTANCE_HOSTNAME="));

    // no INSTANCE_NAME → no create-tags call
    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].1,
        [
            "ec2",
            "run-instances",
            "--image-id",
            "ami-0c7217cdde317cfec",
            "--instance-type",
            "t3.micro",
            "--key-name",
            "dev",
            "--subnet-id",
            "subnet-123",
            "--associate-public-ip-address",
            "--count",
            "1",
            "--output",
            "json",
        ]
    );
    assert_eq!(
        calls[1].1,
        ["ec2", "wait", "instance-status-ok", "--instance-ids", "i-0new"]
    );
}

#[tokio::test]
async fn test_provision_tag_failure_only_warns() {
    let project = Project::new(&["KEYPAIR=dev", "SUBNET=subnet-123", "INSTANCE_NAME=box"]);
    let mut settings = project.settings();
    let runner = ScriptedRunner::new([
        ok_output(&launch_json("i-0new")),
        err_output(254, b"AccessDenied"),
        ok_output(b""),
    ]);
    let reporter = RecordingReporter::default();

    provision(&mut settings, &AwsCli::new(&runner), &project.store(), &reporter)
        .await
        .unwrap();

    assert!(reporter.has("warn"));
    assert_eq!(settings.get(keys::INSTANCE_ID), "i-0new");
}

#[tokio::test]
async fn test_provision_keeps_id_when_wait_fails() {
    let project = Project::new(&["KEYPAIR=dev", "SUBNET=subnet-123"]);
    let mut settings = project.settings();
    let runner = ScriptedRunner::new([
        ok_output(&launch_json("i-0new")),
        err_output(255, b"Waiter InstanceStatusOk failed"),
    ]);

    let err = provision(
        &mut settings,
        &AwsCli::new(&runner),
        &project.store(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("Waiter"));
    assert!(contains_line(&project.env_path(), "INSTANCE_ID=i-0new"));
}

#[tokio::test]
async fn test_provision_rejects_malformed_answer() {
    let project = Project::new(&["KEYPAIR=dev", "SUBNET=subnet-123"]);
    let mut settings = project.settings();
    let runner = ScriptedRunner::new([ok_output(b"{\"Instances\":[]}")]);

    let result = provision(
        &mut settings,
        &AwsCli::new(&runner),
        &project.store(),
        &RecordingReporter::default(),
    )
    .await;

    assert!(result.is_err());
    assert!(settings.instance().is_none());
}

#[tokio::test]
async fn test_terminate_reports_request_failure() {
    let project = ready_project();
    let mut settings = project.settings();
    let runner = ScriptedRunner::new([err_output(254, b"InvalidInstanceID.NotFound")]);

    let outcome = terminate(&mut settings, &AwsCli::new(&runner), &project.store())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        TerminateOutcome::RequestFailed("InvalidInstanceID.NotFound".to_string())
    );
    assert!(settings.instance().is_none());
}

#[tokio::test]
async fn test_resolve_host_registers_keys() {
    let project = Project::new(&["KEYPAIR=dev", "INSTANCE_ID=i-0abc"]);
    let mut settings = project.settings();
    let runner = ScriptedRunner::new([
        ok_output(&describe_json(HOSTNAME)),
        ok_output(HOST_KEY.as_bytes()),
    ]);
    let known_hosts = KnownHostsManager::with_path(project.known_hosts_path());
    let reporter = RecordingReporter::default();

    let outcome = resolve_host(
        &mut settings,
        &AwsCli::new(&runner),
        &project.store(),
        &KeyscanRegistry::new(&runner, &known_hosts),
        &reporter,
    )
    .await
    .unwrap();

    assert_eq!(outcome, HostOutcome::Resolved(HOSTNAME.to_string()));
    assert!(known_hosts.contains(HOSTNAME).unwrap());
    assert!(!reporter.has("warn"));
}

#[tokio::test]
async fn test_resolve_host_describe_failure_is_an_error() {
    let project = ready_project();
    let mut settings = project.settings();
    let runner = ScriptedRunner::new([err_output(255, b"ExpiredToken")]);
    let known_hosts = KnownHostsManager::with_path(project.known_hosts_path());

    let err = resolve_host(
        &mut settings,
        &AwsCli::new(&runner),
        &project.store(),
        &KeyscanRegistry::new(&runner, &known_hosts),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("ExpiredToken"));
    assert_eq!(settings.get(keys::INSTANCE_HOSTNAME), HOSTNAME);
}
