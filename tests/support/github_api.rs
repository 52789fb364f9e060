//! Canned GitHub API responses for the behavioural tests.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// Mock answering the organization lookup for `owner`.
#[must_use]
pub fn organization_lookup(owner: &str, is_organization: bool) -> Mock {
    let response = if is_organization {
        ResponseTemplate::new(200).set_body_json(json!({ "login": owner, "id": 1 }))
    } else {
        not_found()
    };
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{owner}")))
        .respond_with(response)
}

/// Repository metadata as GitHub reports it.
#[must_use]
pub fn repository_body(owner: &str, name: &str, default_branch: &str, private: bool) -> Value {
    json!({
        "name": name,
        "default_branch": default_branch,
        "private": private,
        "visibility": if private { "private" } else { "public" },
        "description": "Weave Gitops repo",
        "html_url": format!("https://github.com/{owner}/{name}")
    })
}

/// GitHub's 404 response.
#[must_use]
pub fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "message": "Not Found",
        "documentation_url": "https://docs.github.com/rest"
    }))
}
