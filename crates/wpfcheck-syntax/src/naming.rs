// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! WPF naming conventions relating registered names to member names.

pub const PROPERTY_SUFFIX: &str = "Property";
pub const KEY_SUFFIX: &str = "PropertyKey";
pub const EVENT_SUFFIX: &str = "Event";
pub const GETTER_PREFIX: &str = "Get";
pub const SETTER_PREFIX: &str = "Set";

/// `Bar` -> `BarProperty`.
pub fn backing_member_name(registered: &str) -> String {
    format!("{registered}{PROPERTY_SUFFIX}")
}

/// `Bar` -> `BarPropertyKey`.
pub fn key_member_name(registered: &str) -> String {
    format!("{registered}{KEY_SUFFIX}")
}

/// `Bar` -> `BarEvent`.
pub fn routed_event_member_name(registered: &str) -> String {
    format!("{registered}{EVENT_SUFFIX}")
}

/// `Bar` -> `GetBar`.
pub fn getter_method_name(registered: &str) -> String {
    format!("{GETTER_PREFIX}{registered}")
}

/// `Bar` -> `SetBar`.
pub fn setter_method_name(registered: &str) -> String {
    format!("{SETTER_PREFIX}{registered}")
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// `BarProperty` or `BarPropertyKey` -> `Bar`.
pub fn registered_name_from_backing(member: &str) -> Option<&str> {
    member
        .strip_suffix(KEY_SUFFIX)
        .or_else(|| member.strip_suffix(PROPERTY_SUFFIX))
        .and_then(non_empty)
}

/// `GetBar` or `SetBar` -> `Bar`.
pub fn registered_name_from_accessor_method(method: &str) -> Option<&str> {
    method
        .strip_prefix(GETTER_PREFIX)
        .or_else(|| method.strip_prefix(SETTER_PREFIX))
        .and_then(non_empty)
}

/// `BarEvent` -> `Bar`.
pub fn registered_name_from_event_member(member: &str) -> Option<&str> {
    member.strip_suffix(EVENT_SUFFIX).and_then(non_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_names() {
        assert_eq!(backing_member_name("Bar"), "BarProperty");
        assert_eq!(key_member_name("Bar"), "BarPropertyKey");
        assert_eq!(routed_event_member_name("Click"), "ClickEvent");
        assert_eq!(getter_method_name("Bar"), "GetBar");
        assert_eq!(setter_method_name("Bar"), "SetBar");
    }

    #[test]
    fn test_registered_name_from_backing() {
        assert_eq!(registered_name_from_backing("BarProperty"), Some("Bar"));
        assert_eq!(registered_name_from_backing("BarPropertyKey"), Some("Bar"));
        assert_eq!(registered_name_from_backing("Property"), None);
        assert_eq!(registered_name_from_backing("Bar"), None);
    }

    #[test]
    fn test_registered_name_from_accessor_method() {
        assert_eq!(registered_name_from_accessor_method("GetBar"), Some("Bar"));
        assert_eq!(registered_name_from_accessor_method("SetBar"), Some("Bar"));
        assert_eq!(registered_name_from_accessor_method("Get"), None);
        assert_eq!(registered_name_from_accessor_method("Bar"), None);
    }

    #[test]
    fn test_registered_name_from_event_member() {
        assert_eq!(registered_name_from_event_member("ClickEvent"), Some("Click"));
        assert_eq!(registered_name_from_event_member("Event"), None);
    }
}
