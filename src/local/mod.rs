//! Local host backend.
//!
//! Provides a concrete implementation of the
//! [`OptionStore`](crate::traits::OptionStore),
//! [`WorkspaceManager`](crate::traits::WorkspaceManager) and
//! [`HotkeyManager`](crate::traits::HotkeyManager) traits that keeps the
//! host's state in a JSON file.  The `wstoggle` binary drives it; plugin
//! bridges for real host applications implement the same traits.

pub mod host;
