use crate::setup::fixture_config;
use controller::IdentityProviderConfig;
use std::time::Duration;

#[test]
fn fixture_points_at_local_replica() {
    let config = fixture_config();

    assert_eq!(config.request_capacity, 8);
    assert_eq!(
        config.controller.identity_provider,
        IdentityProviderConfig::local_replica(test_utils::TEST_IDENTITY_PROVIDER)
    );
    assert_eq!(
        config.controller.notification_ttl_duration(),
        Duration::from_secs(5)
    );
}
