//! Tests for the Octocrab GitHub gateway.

use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::OctocrabGitHubGateway;
use crate::provider::error::ProviderError;
use crate::provider::gateway::ProviderGateway;
use crate::provider::models::{
    CommitFile, CreateRepositoryRequest, DeployKeyInfo, LicenseTemplate, PullRequestRequest,
    RepositoryRef, Visibility,
};
use crate::provider::token::PersonalAccessToken;
use crate::provider::url::GitProviderName;

struct GitHubGatewayFixture {
    runtime: Runtime,
    server: MockServer,
    gateway: OctocrabGitHubGateway,
}

impl GitHubGatewayFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.server));
    }
}

#[fixture]
fn token() -> PersonalAccessToken {
    PersonalAccessToken::new(GitProviderName::GitHub, "valid-token")
        .expect("token should be valid")
}

#[fixture]
fn github(token: PersonalAccessToken) -> GitHubGatewayFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let gateway = {
        let _guard = runtime.enter();
        OctocrabGitHubGateway::for_token(&token, &server.uri()).expect("should create gateway")
    };
    GitHubGatewayFixture {
        runtime,
        server,
        gateway,
    }
}

fn user_repo() -> RepositoryRef {
    RepositoryRef::user("github.com", "octocat", "fleet")
}

fn org_repo() -> RepositoryRef {
    RepositoryRef::organization("github.com", "acme", "fleet")
}

fn repository_body(visibility: &str) -> serde_json::Value {
    json!({
        "name": "fleet",
        "default_branch": "main",
        "private": visibility != "public",
        "visibility": visibility,
        "description": "GitOps repository",
        "html_url": "https://github.com/acme/fleet"
    })
}

#[rstest]
fn organization_lookup_maps_404_to_not_found(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("GET"))
            .and(path("/orgs/octocat"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            }))),
    );

    let error = github
        .block_on(github.gateway.organization("octocat"))
        .expect_err("missing organization should fail");

    assert!(error.is_not_found(), "expected not found, got {error:?}");
}

#[rstest]
fn organization_lookup_succeeds_for_existing_org(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("GET"))
            .and(path("/orgs/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "acme",
                "id": 1
            }))),
    );

    github
        .block_on(github.gateway.organization("acme"))
        .expect("organization should resolve");
}

#[rstest]
#[case::public("public", Visibility::Public)]
#[case::private("private", Visibility::Private)]
#[case::internal("internal", Visibility::Private)]
fn repository_reports_metadata(
    github: GitHubGatewayFixture,
    #[case] reported: &str,
    #[case] expected: Visibility,
) {
    github.mount(
        Mock::given(method("GET"))
            .and(path("/repos/acme/fleet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repository_body(reported))),
    );

    let info = github
        .block_on(github.gateway.repository(&org_repo()))
        .expect("repository should load");

    assert_eq!(info.name, "fleet");
    assert_eq!(info.default_branch.as_deref(), Some("main"));
    assert_eq!(info.visibility, Some(expected));
}

#[rstest]
fn repository_rejects_bad_credentials(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("GET"))
            .and(path("/repos/acme/fleet"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials"
            }))),
    );

    let error = github
        .block_on(github.gateway.repository(&org_repo()))
        .expect_err("bad token should fail");

    assert!(
        matches!(error, ProviderError::Authentication { .. }),
        "expected Authentication, got {error:?}"
    );
}

#[rstest]
#[case::organization(org_repo(), "/orgs/acme/repos")]
#[case::user(user_repo(), "/user/repos")]
fn create_repository_posts_to_owner_route(
    github: GitHubGatewayFixture,
    #[case] repository: RepositoryRef,
    #[case] route: &str,
) {
    github.mount(
        Mock::given(method("POST"))
            .and(path(route))
            .and(body_partial_json(json!({
                "name": "fleet",
                "description": "GitOps repository",
                "private": true,
                "auto_init": true,
                "license_template": "apache-2.0"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(repository_body("private")))
            .expect(1),
    );

    let request = CreateRepositoryRequest {
        description: "GitOps repository".to_owned(),
        visibility: Visibility::Private,
        auto_init: true,
        license_template: Some(LicenseTemplate::Apache2),
    };
    let info = github
        .block_on(github.gateway.create_repository(&repository, &request))
        .expect("repository should be created");

    assert_eq!(info.visibility, Some(Visibility::Private));
}

#[rstest]
fn deploy_key_is_found_by_title(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octocat/fleet/keys"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "title": "laptop", "key": "ssh-ed25519 AAAA", "read_only": true },
                { "id": 2, "title": "wego-deploy-key", "key": "ssh-ed25519 BBBB", "read_only": false }
            ]))),
    );

    let key = github
        .block_on(github.gateway.deploy_key(&user_repo(), "wego-deploy-key"))
        .expect("key should be found");

    assert_eq!(key.name, "wego-deploy-key");
    assert_eq!(key.read_only, Some(false));
}

#[rstest]
fn missing_deploy_key_is_not_found(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octocat/fleet/keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([]))),
    );

    let error = github
        .block_on(github.gateway.deploy_key(&user_repo(), "wego-deploy-key"))
        .expect_err("absent key should fail");

    assert!(error.is_not_found(), "expected not found, got {error:?}");
}

#[rstest]
fn deploy_key_lookup_follows_next_page(github: GitHubGatewayFixture) {
    let keys_path = "/repos/octocat/fleet/keys";
    let next_url = format!("{}{keys_path}?per_page=100&page=2", github.server.uri());
    let first_page: Vec<serde_json::Value> = (1..=100)
        .map(|id| json!({ "id": id, "title": format!("key-{id}"), "read_only": true }))
        .collect();

    github.mount(
        Mock::given(method("GET"))
            .and(path(keys_path))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 101, "title": "wego-deploy-key", "read_only": false }
            ])))
            .with_priority(1),
    );
    github.mount(
        Mock::given(method("GET"))
            .and(path(keys_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(first_page)
                    .insert_header("Link", format!("<{next_url}>; rel=\"next\"")),
            ),
    );

    let key = github
        .block_on(github.gateway.deploy_key(&user_repo(), "wego-deploy-key"))
        .expect("key on the second page should be found");

    assert_eq!(key.name, "wego-deploy-key");
    assert_eq!(key.read_only, Some(false));
}

#[rstest]
fn duplicate_deploy_key_surfaces_key_in_use(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("POST"))
            .and(path("/repos/octocat/fleet/keys"))
            .and(body_partial_json(json!({
                "title": "wego-deploy-key",
                "key": "ssh-ed25519 AAAA",
                "read_only": false
            })))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed",
                "errors": [{
                    "resource": "PublicKey",
                    "code": "custom",
                    "field": "key",
                    "message": "key is already in use"
                }]
            }))),
    );

    let key = DeployKeyInfo {
        name: "wego-deploy-key".to_owned(),
        key: b"ssh-ed25519 AAAA\n".to_vec(),
        read_only: false,
    };
    let error = github
        .block_on(github.gateway.create_deploy_key(&user_repo(), &key))
        .expect_err("duplicate key should fail");

    assert!(error.is_key_in_use(), "expected key-in-use, got {error:?}");
}

#[rstest]
fn list_commits_passes_branch_and_page(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("GET"))
            .and(path("/repos/acme/fleet/commits"))
            .and(query_param("sha", "main"))
            .and(query_param("per_page", "1"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "sha": "abc123",
                "html_url": "https://github.com/acme/fleet/commit/abc123",
                "commit": {
                    "message": "Initial commit",
                    "author": { "name": "Octo Cat" },
                    "tree": { "sha": "tree1" }
                }
            }]))),
    );

    let commits = github
        .block_on(github.gateway.list_commits(&org_repo(), "main", 1, 1))
        .expect("commits should load");

    let first = commits.first().expect("one commit");
    assert_eq!(first.sha, "abc123");
    assert_eq!(first.author.as_deref(), Some("Octo Cat"));
}

#[rstest]
fn create_branch_posts_ref(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("POST"))
            .and(path("/repos/acme/fleet/git/refs"))
            .and(body_partial_json(json!({
                "ref": "refs/heads/gitops-update",
                "sha": "abc123"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "ref": "refs/heads/gitops-update",
                "object": { "sha": "abc123", "type": "commit" }
            })))
            .expect(1),
    );

    github
        .block_on(
            github
                .gateway
                .create_branch(&org_repo(), "gitops-update", "abc123"),
        )
        .expect("branch should be created");
}

#[rstest]
fn create_commit_builds_tree_commit_and_moves_ref(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("GET"))
            .and(path("/repos/acme/fleet/git/commits/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "abc123",
                "message": "Initial commit",
                "tree": { "sha": "tree1" }
            }))),
    );
    github.mount(
        Mock::given(method("POST"))
            .and(path("/repos/acme/fleet/git/trees"))
            .and(body_partial_json(json!({
                "base_tree": "tree1",
                "tree": [
                    { "path": "clusters/dev/app.yaml", "content": "kind: App\n" },
                    { "path": "clusters/dev/old.yaml", "sha": null }
                ]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "tree2" })))
            .expect(1),
    );
    github.mount(
        Mock::given(method("POST"))
            .and(path("/repos/acme/fleet/git/commits"))
            .and(body_partial_json(json!({
                "message": "Add app",
                "tree": "tree2",
                "parents": ["abc123"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sha": "def456",
                "message": "Add app",
                "html_url": "https://github.com/acme/fleet/commit/def456"
            })))
            .expect(1),
    );
    github.mount(
        Mock::given(method("PATCH"))
            .and(path("/repos/acme/fleet/git/refs/heads/gitops-update"))
            .and(body_partial_json(json!({ "sha": "def456" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/gitops-update",
                "object": { "sha": "def456", "type": "commit" }
            })))
            .expect(1),
    );

    let files = [
        CommitFile::write("clusters/dev/app.yaml", "kind: App\n"),
        CommitFile::delete("clusters/dev/old.yaml"),
    ];
    let commit = github
        .block_on(
            github
                .gateway
                .create_commit(&org_repo(), "gitops-update", "abc123", "Add app", &files),
        )
        .expect("commit should be created");

    assert_eq!(commit.sha, "def456");
    assert_eq!(commit.message.as_deref(), Some("Add app"));
    let branch_reads = github
        .block_on(github.server.received_requests())
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == "/repos/acme/fleet/commits/gitops-update")
        .count();
    assert_eq!(branch_reads, 0, "the new branch should not be read back");
}

#[rstest]
fn create_pull_request_returns_url(github: GitHubGatewayFixture) {
    github.mount(
        Mock::given(method("POST"))
            .and(path("/repos/acme/fleet/pulls"))
            .and(body_partial_json(json!({
                "title": "Add app",
                "head": "gitops-update",
                "base": "main",
                "body": "Adds the app manifest"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 7,
                "html_url": "https://github.com/acme/fleet/pull/7"
            }))),
    );

    let request = PullRequestRequest {
        title: "Add app".to_owned(),
        head: "gitops-update".to_owned(),
        base: "main".to_owned(),
        description: "Adds the app manifest".to_owned(),
    };
    let pull_request = github
        .block_on(github.gateway.create_pull_request(&org_repo(), &request))
        .expect("pull request should open");

    assert_eq!(pull_request.number, 7);
    assert_eq!(pull_request.url, "https://github.com/acme/fleet/pull/7");
}
