use console::{ConsoleConfig, ConsoleHandle};
use std::path::Path;
use test_utils::TestHarness;

pub fn fixture_config() -> ConsoleConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/integration_tests/console.toml");
    ConsoleConfig::from_file(path).expect("fixture config should parse")
}

/// A console running on the test runtime, with its collaborators kept around
/// to inspect and steer them.
pub struct Session {
    pub harness: TestHarness,
    pub console: ConsoleHandle,
}

impl Session {
    pub fn start(harness: TestHarness) -> Self {
        test_utils::init_tracing();
        let console = console::start_test(
            fixture_config(),
            harness.service.clone(),
            harness.provider.clone(),
        );
        Self { harness, console }
    }

    pub async fn logged_in() -> Self {
        let session = Self::start(TestHarness::new());
        session
            .console
            .login()
            .await
            .expect("scripted login should succeed");
        session
    }
}
