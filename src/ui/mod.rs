//! Terminal presentation for interactive chat sessions.
//!
//! - [`chat_loop`]: the prompt loop that turns typed lines into
//!   [`crate::core::app::Command`]s via [`crate::commands`].
//! - [`renderer`]: plain-text rendering of transcript entries, the
//!   connectivity indicator, and the task table.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns session state and backend coordination.

pub mod chat_loop;
pub mod renderer;
