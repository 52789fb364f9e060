//! Tokio runtime and Wiremock server shared by a scenario's steps.

use std::future::Future;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use gitops_providers::{
    GitProviderName, PersonalAccessToken, ProviderError, ProviderGateway, ProviderSettings,
    WaitPolicy, build_gateway,
};
use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// Probe cadence used by scenarios so confirmation waits stay short.
const SCENARIO_WAIT_INTERVAL: Duration = Duration::from_millis(10);

/// Bound used by scenarios before a confirmation wait gives up.
const SCENARIO_WAIT_TIMEOUT: Duration = Duration::from_millis(200);

/// Runtime plus a mock GitHub API server.
pub struct GitHubHarness {
    runtime: Runtime,
    server: MockServer,
}

impl GitHubHarness {
    /// Starts a runtime and a mock server on it.
    ///
    /// # Errors
    ///
    /// Returns an error when the Tokio runtime cannot be created.
    pub fn start() -> io::Result<Self> {
        let runtime = Runtime::new()?;
        let server = runtime.block_on(MockServer::start());
        Ok(Self { runtime, server })
    }

    /// Drives `future` to completion on the harness runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Mounts `mock` on the server.
    pub fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.server));
    }

    /// Builds a GitHub gateway pointed at the mock server.
    ///
    /// # Errors
    ///
    /// Propagates gateway construction failures.
    pub fn gateway(&self) -> Result<Box<dyn ProviderGateway>, ProviderError> {
        let token = PersonalAccessToken::new(GitProviderName::GitHub, "scenario-token")?;
        let _guard = self.runtime.enter();
        build_gateway(GitProviderName::GitHub, &token, Some(&self.server.uri()))
    }

    /// Requests the server received for `verb` on `route`.
    pub fn requests_to(&self, verb: &str, route: &str) -> Vec<Request> {
        self.block_on(self.server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.method.as_str() == verb && request.url.path() == route)
            .collect()
    }
}

/// Settings with a wait policy short enough for scenarios.
#[must_use]
pub fn scenario_settings() -> ProviderSettings {
    ProviderSettings {
        wait: WaitPolicy::new(SCENARIO_WAIT_INTERVAL, SCENARIO_WAIT_TIMEOUT),
        ..ProviderSettings::default()
    }
}

/// Returns the harness stored in `slot`, starting one on first use.
///
/// # Panics
///
/// Panics if the Tokio runtime cannot be created.
pub fn ensure_harness(slot: &Slot<Rc<GitHubHarness>>) -> Rc<GitHubHarness> {
    if let Some(harness) = slot.get() {
        return harness;
    }
    let harness = Rc::new(
        GitHubHarness::start()
            .unwrap_or_else(|error| panic!("failed to start scenario harness: {error}")),
    );
    slot.set(Rc::clone(&harness));
    harness
}
