// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::Duration;

use tlcore_session::Configuration;

#[test]
fn default_configuration_has_no_persistence_and_a_trusted_key() {
    let configuration = Configuration::default();

    assert!(configuration.host.is_empty());
    assert!(configuration.session_store.is_none());
    assert!(configuration.connect_timeout.is_none());
    assert_eq!(configuration.read_timeout, Duration::from_secs(300));
    assert_eq!(configuration.public_keys.len(), 1);
}

#[test]
fn configuration_can_be_pointed_at_a_custom_host_and_store() {
    let store = std::sync::Arc::new(tlcore_session::NoopStore);
    let configuration = Configuration {
        host: "149.154.167.50:443".to_string(),
        session_store: Some(store),
        ..Configuration::default()
    };

    assert_eq!(configuration.host, "149.154.167.50:443");
    assert!(configuration.session_store.is_some());
}
