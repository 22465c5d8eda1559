//! Environment propagation and script service tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use outpost_cli::application::services::remote::{deploy, install, propagate_env};
use outpost_cli::domain::SshTarget;
use outpost_cli::infra::remote::SshRemote;

use crate::helpers::{
    Project, RecordingReporter, ScriptedRunner, err_output, ok_output, ready_project,
};

fn target(project: &Project) -> SshTarget {
    SshTarget::from_settings(&project.settings(), &project.dir.path().join("ssh")).unwrap()
}

#[tokio::test]
async fn test_propagate_env_copies_file_and_skips_enable_when_configured() {
    let project = ready_project();
    let runner = ScriptedRunner::new([ok_output(b""), ok_output(b"")]);
    let remote = SshRemote::new(&runner, target(&project));
    let reporter = RecordingReporter::default();

    assert!(propagate_env(&project.store(), &remote, &reporter).await.unwrap());

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "scp");
    assert!(calls[0].1.last().unwrap().ends_with(":.ssh/environment"));
    assert!(calls[1].1.last().unwrap().starts_with("grep -qx 'PermitUserEnvironment yes'"));
}

#[tokio::test]
async fn test_propagate_env_enables_user_environment() {
    let project = ready_project();
    let runner = ScriptedRunner::new([ok_output(b""), err_output(1, b""), ok_output(b"")]);
    let remote = SshRemote::new(&runner, target(&project));

    let ok = propagate_env(&project.store(), &remote, &RecordingReporter::default())
        .await
        .unwrap();

    assert!(ok);
    let calls = runner.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[2].1.last().unwrap().contains("sudo systemctl restart ssh"));
}

#[tokio::test]
async fn test_propagate_env_reports_failed_enable() {
    let project = ready_project();
    let runner = ScriptedRunner::new([
        ok_output(b""),
        err_output(1, b""),
        err_output(1, b"sudo: a password is required"),
    ]);
    let remote = SshRemote::new(&runner, target(&project));
    let reporter = RecordingReporter::default();

    assert!(!propagate_env(&project.store(), &remote, &reporter).await.unwrap());
    assert!(reporter.has("error"));
}

#[tokio::test]
async fn test_propagate_env_stops_when_copy_fails() {
    let project = ready_project();
    let runner = ScriptedRunner::new([err_output(1, b"Permission denied (publickey)")]);
    let remote = SshRemote::new(&runner, target(&project));

    let ok = propagate_env(&project.store(), &remote, &RecordingReporter::default())
        .await
        .unwrap();

    assert!(!ok);
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_scripts_run_inside_app_dir() {
    let project = Project::new(&[
        "KEYPAIR=dev",
        "INSTANCE_ID=i-0abc",
        "INSTANCE_HOSTNAME=host.example.com",
        "APP_DIR=/srv/site",
        "DEPLOY_SCRIPT=bin/release.sh",
    ]);
    let runner = ScriptedRunner::new([ok_output(b""), err_output(2, b"")]);
    let remote = SshRemote::new(&runner, target(&project));
    let settings = project.settings();

    assert!(deploy(&settings, &remote).await.unwrap().success());
    assert!(!install(&settings, &remote).await.unwrap().success());

    let calls = runner.calls();
    assert_eq!(calls[0].1.last().unwrap(), "cd /srv/site && bash bin/release.sh");
    assert_eq!(calls[1].1.last().unwrap(), "cd /srv/site && bash install.sh");
    assert!(!calls[0].1.contains(&"-t".to_string()));
}

#[tokio::test]
async fn test_scripts_quote_app_dir_and_script_path() {
    let project = Project::new(&[
        "KEYPAIR=dev",
        "INSTANCE_ID=i-0abc",
        "INSTANCE_HOSTNAME=host.example.com",
        "APP_DIR='my app'",
        "DEPLOY_SCRIPT='ci/deploy $(whoami).sh'",
    ]);
    let runner = ScriptedRunner::new([ok_output(b"")]);
    let remote = SshRemote::new(&runner, target(&project));

    assert!(deploy(&project.settings(), &remote).await.unwrap().success());

    let calls = runner.calls();
    assert_eq!(
        calls[0].1.last().unwrap(),
        "cd 'my app' && bash 'ci/deploy $(whoami).sh'"
    );
}

#[tokio::test]
async fn test_propagate_env_uploads_literal_values() {
    let project = Project::new(&[
        "KEYPAIR=dev",
        "INSTANCE_ID=i-0abc",
        "INSTANCE_HOSTNAME=host.example.com",
        "export GREETING='hello world'",
        r#"MOTTO="it's fine""#,
        r#"CERT="line1\nline2""#,
    ]);
    let runner = ScriptedRunner::new([ok_output(b""), ok_output(b"")]);
    let remote = SshRemote::new(&runner, target(&project));
    let reporter = RecordingReporter::default();

    assert!(propagate_env(&project.store(), &remote, &reporter).await.unwrap());

    let uploads = runner.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(
        uploads[0],
        "KEYPAIR=dev\nINSTANCE_ID=i-0abc\nINSTANCE_HOSTNAME=host.example.com\n\
         GREETING=hello world\nMOTTO=it's fine\n"
    );
    assert!(reporter.has("warn"));
}
