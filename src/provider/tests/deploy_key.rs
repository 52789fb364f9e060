//! Deploy key workflows.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use mockall::predicate::{always, eq, function};
use rstest::rstest;

use super::{expect_account, github_provider, gitlab_provider, not_found, sample_info};
use crate::provider::error::ProviderError;
use crate::provider::gateway::MockProviderGateway;
use crate::provider::models::{DeployKey, DeployKeyInfo};

fn present_key() -> DeployKey {
    DeployKey {
        name: "wego-deploy-key".to_owned(),
        read_only: Some(false),
    }
}

fn gateway_with_key_lookup(lookup: Result<DeployKey, ProviderError>) -> MockProviderGateway {
    let mut gateway = MockProviderGateway::new();
    expect_account(&mut gateway, "acme", true);
    gateway
        .expect_repository()
        .times(1)
        .returning(|_| Ok(sample_info(Some("main"))));
    gateway
        .expect_deploy_key()
        .with(always(), eq("wego-deploy-key"))
        .times(1)
        .returning(move |_, _| lookup.clone());
    gateway
}

#[rstest]
#[case::present(Ok(present_key()), true)]
#[case::absent(Err(not_found()), false)]
#[case::key_in_use(
    Err(ProviderError::Api { message: "Validation Failed (key is already in use)".to_owned() }),
    true
)]
#[tokio::test]
async fn deploy_key_exists_classifies_lookup(
    #[case] lookup: Result<DeployKey, ProviderError>,
    #[case] expected: bool,
) {
    let gateway = gateway_with_key_lookup(lookup);

    let exists = github_provider(&gateway)
        .deploy_key_exists("acme", "widgets")
        .await
        .expect("check should succeed");

    assert_eq!(exists, expected);
}

#[tokio::test]
async fn deploy_key_exists_propagates_other_failures() {
    let gateway = gateway_with_key_lookup(Err(ProviderError::Authentication {
        message: "Bad credentials".to_owned(),
    }));

    let error = gitlab_provider(&gateway)
        .deploy_key_exists("acme", "widgets")
        .await
        .expect_err("auth failure should propagate");

    assert!(
        error
            .to_string()
            .starts_with("error getting deploy key wego-deploy-key for repository acme/widgets"),
        "unexpected message: {error}"
    );
}

#[tokio::test]
async fn deploy_key_exists_fails_when_repository_is_missing() {
    let mut gateway = MockProviderGateway::new();
    expect_account(&mut gateway, "acme", false);
    gateway
        .expect_repository()
        .times(1)
        .returning(|_| Err(not_found()));
    gateway.expect_deploy_key().never();

    let error = github_provider(&gateway)
        .deploy_key_exists("acme", "widgets")
        .await
        .expect_err("missing repository should fail");

    assert!(error.root_cause().is_not_found());
}

#[tokio::test(start_paused = true)]
async fn upload_deploy_key_creates_writable_key_then_confirms() {
    let mut gateway = MockProviderGateway::new();
    expect_account(&mut gateway, "acme", true);
    gateway
        .expect_repository()
        .times(1)
        .returning(|_| Ok(sample_info(Some("main"))));
    gateway
        .expect_create_deploy_key()
        .with(
            always(),
            function(|key: &DeployKeyInfo| {
                key.name == "wego-deploy-key"
                    && !key.read_only
                    && key.key == b"ssh-ed25519 AAAA".to_vec()
            }),
        )
        .times(1)
        .returning(|_, _| Ok(present_key()));

    let probes = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&probes);
    gateway
        .expect_deploy_key()
        .times(3)
        .returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(not_found())
            } else {
                Ok(present_key())
            }
        });

    github_provider(&gateway)
        .upload_deploy_key("acme", "widgets", b"ssh-ed25519 AAAA")
        .await
        .expect("upload should be confirmed");

    assert_eq!(probes.load(Ordering::SeqCst), 3, "probe count");
}

#[tokio::test(start_paused = true)]
async fn upload_deploy_key_times_out_when_key_never_appears() {
    let mut gateway = MockProviderGateway::new();
    expect_account(&mut gateway, "acme", true);
    gateway
        .expect_repository()
        .times(1)
        .returning(|_| Ok(sample_info(Some("main"))));
    gateway
        .expect_create_deploy_key()
        .times(1)
        .returning(|_, _| Ok(present_key()));
    gateway
        .expect_deploy_key()
        .times(3)
        .returning(|_, _| Err(not_found()));

    let error = github_provider(&gateway)
        .upload_deploy_key("acme", "widgets", b"ssh-ed25519 AAAA")
        .await
        .expect_err("confirmation should time out");

    assert!(
        error
            .to_string()
            .starts_with("error verifying deploy key wego-deploy-key exists"),
        "unexpected message: {error}"
    );
}
