/*!
 * Tests for the connector registry
 */

use std::sync::Arc;
use tmconnector::connector::reference::{ALIAS, KEY, KEY_SETTING};
use tmconnector::connector::{ConnectorRegistry, TranslationConnector};
use tmconnector::providers::MockVendor;
use crate::common;

/// Registered connectors can be found and listed
#[test]
fn test_registry_withReferenceConnector_shouldResolveAlias() {
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, _) = common::reference_connector(MockVendor::working(), temp_dir.path());

    let registry = ConnectorRegistry::new();
    assert!(registry.is_empty());
    registry.register(connector).unwrap();

    let found = registry.get(ALIAS).unwrap();
    assert_eq!(found.key(), KEY);
    assert_eq!(registry.aliases(), vec![ALIAS.to_string()]);
}

/// Active connectors follow their settings without re-registration
#[test]
fn test_active_withKeyToggled_shouldFollowSetting() {
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, settings) = common::reference_connector(MockVendor::working(), temp_dir.path());
    let registry = ConnectorRegistry::new();
    registry.register(connector as Arc<dyn TranslationConnector>).unwrap();

    assert!(registry.active().is_empty());
    settings.set(ALIAS, KEY_SETTING, "vendor-key");
    assert_eq!(registry.active().len(), 1);
    settings.set(ALIAS, KEY_SETTING, "");
    registry.reload_all();
    assert!(registry.active().is_empty());
}

/// Connectors looked up from the registry drive jobs like the concrete type
#[test]
fn test_get_thenSubmit_shouldUseRegisteredConnector() {
    let temp_dir = common::create_temp_dir().unwrap();
    let vendor = MockVendor::working();
    let (connector, _) = common::reference_connector(vendor.clone(), temp_dir.path());
    let registry = ConnectorRegistry::new();
    registry.register(connector).unwrap();

    let connector = registry.get(ALIAS).unwrap();
    let outcome = tokio_test::block_on(connector.submit(common::sample_job(1)));
    assert!(outcome.is_success());
    assert_eq!(vendor.submitted_count(), 1);
}
