//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use roomline_core::Generation;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open a transport handle.
    Open {
        /// Tag for the new handle.
        generation: Generation,
        /// Relay endpoint.
        address: String,
    },

    /// Send a text frame on a handle.
    Send {
        /// Target handle.
        generation: Generation,
        /// Frame text, sent verbatim.
        text: String,
    },

    /// Close a handle.
    Close {
        /// Handle to close.
        generation: Generation,
    },
}
