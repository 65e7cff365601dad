//! Core traits that decouple wstoggle from any specific host application.
//!
//! The host provides three services: a persistent key-value option store,
//! a workspace-layout manager, and a hotkey registry.  Every concrete
//! backend (the JSON-file [`LocalHost`](crate::local::host::LocalHost), a
//! test harness, a plugin bridge, …) implements these traits, and the
//! [`PreferenceStore`](crate::store::PreferenceStore),
//! [`WorkspaceToggler`](crate::toggle::WorkspaceToggler) and
//! [`SettingsForm`](crate::settings::SettingsForm) only depend on the
//! abstractions.
//!
//! All methods take `&self`; backends that mutate state use interior
//! mutability.

use crate::preferences::HotkeyBinding;
use serde_json::Value;

/// Persistent key-value storage provided by the host.
///
/// A stored value may be a structured JSON document or a JSON string holding
/// the document's textual encoding.  Callers decide how to interpret it.
pub trait OptionStore {
    /// The error type produced by this store.
    type Error: std::error::Error + Send + 'static;

    /// Fetch the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> Result<(), Self::Error>;
}

/// Abstraction over the host's named workspace layouts.
pub trait WorkspaceManager {
    /// The error type produced by this manager.
    type Error: std::error::Error + Send + 'static;

    /// Name of the presently active layout.
    ///
    /// Backends with no active layout may return an empty string; it never
    /// matches a curated entry.
    fn current(&self) -> Result<String, Self::Error>;

    /// Every layout the host knows about, in host order.
    fn list_all(&self) -> Result<Vec<String>, Self::Error>;

    /// Switch the host to the layout called `name`.
    ///
    /// Callers do not check that `name` exists; an unknown layout is the
    /// backend's own failure to report.
    fn activate(&self, name: &str) -> Result<(), Self::Error>;
}

/// A host-side command that a hotkey can be bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAction {
    /// Unique name the host registers the command under.
    pub name: String,
    /// Human-readable description shown in the host's hotkey editor.
    pub annotation: String,
    /// What the host runs when the action fires.
    pub command: String,
}

/// Abstraction over the host's hotkey registry.
pub trait HotkeyManager {
    /// The error type produced by this registry.
    type Error: std::error::Error + Send + 'static;

    /// Return the name of the action currently bound to `binding`, or `None`
    /// if the combination is free.
    fn check_conflict(&self, binding: &HotkeyBinding) -> Result<Option<String>, Self::Error>;

    /// Bind `binding` to `action`, registering the action if needed.
    fn bind(&self, binding: &HotkeyBinding, action: &NamedAction) -> Result<(), Self::Error>;
}

//  Borrowed backends
//
// One host object usually provides all three services, so the store, the
// toggler and the settings form each take it by reference.

impl<T: OptionStore + ?Sized> OptionStore for &T {
    type Error = T::Error;

    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }
}

impl<T: WorkspaceManager + ?Sized> WorkspaceManager for &T {
    type Error = T::Error;

    fn current(&self) -> Result<String, Self::Error> {
        (**self).current()
    }

    fn list_all(&self) -> Result<Vec<String>, Self::Error> {
        (**self).list_all()
    }

    fn activate(&self, name: &str) -> Result<(), Self::Error> {
        (**self).activate(name)
    }
}

impl<T: HotkeyManager + ?Sized> HotkeyManager for &T {
    type Error = T::Error;

    fn check_conflict(&self, binding: &HotkeyBinding) -> Result<Option<String>, Self::Error> {
        (**self).check_conflict(binding)
    }

    fn bind(&self, binding: &HotkeyBinding, action: &NamedAction) -> Result<(), Self::Error> {
        (**self).bind(binding, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    //  Mock OptionStore

    #[derive(Debug, Default)]
    struct MockStore {
        values: RefCell<HashMap<String, Value>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl OptionStore for MockStore {
        type Error = MockError;

        fn get(&self, key: &str) -> Result<Option<Value>, MockError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: Value) -> Result<(), MockError> {
            self.values.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }
    }

    #[test]
    fn mock_store_overwrites() {
        let store = MockStore::default();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", Value::from(1)).unwrap();
        store.set("k", Value::from("two")).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(Value::from("two")));
    }

    //  Mock WorkspaceManager

    #[derive(Debug, Default)]
    struct MockWm {
        activate_log: RefCell<Vec<String>>,
    }

    impl WorkspaceManager for MockWm {
        type Error = MockError;

        fn current(&self) -> Result<String, MockError> {
            Ok(self.activate_log.borrow().last().cloned().unwrap_or_default())
        }

        fn list_all(&self) -> Result<Vec<String>, MockError> {
            Ok(vec!["General".into(), "Modeling".into()])
        }

        fn activate(&self, name: &str) -> Result<(), MockError> {
            self.activate_log.borrow_mut().push(name.to_string());
            Ok(())
        }
    }

    #[test]
    fn mock_wm_records_activations() {
        let wm = MockWm::default();
        assert_eq!(wm.current().unwrap(), "");
        wm.activate("Modeling").unwrap();
        assert_eq!(wm.current().unwrap(), "Modeling");
        assert_eq!(wm.activate_log.borrow().len(), 1);
    }

    #[test]
    fn borrowed_backend_shares_state() {
        fn activate_via<W: WorkspaceManager>(wm: W, name: &str) {
            wm.activate(name).unwrap();
        }
        let wm = MockWm::default();
        activate_via(&wm, "General");
        assert_eq!(wm.current().unwrap(), "General");
    }
}
