//! User interface components for terminal interaction.
//!
//! - [`display`]: decryption report, packet listing, success messages
//! - [`prompt`]: hidden passphrase input

pub mod display;
pub mod prompt;

pub use display::{show_packets, show_report, show_success};
