//! Deckpad Hardware Library
//!
//! Drives 15-key USB button panels where every key carries a small bitmap
//! display. Keys are addressed by a zero-based logical index, left-to-right
//! and top-to-bottom as the user sees them; the library translates to the
//! device's own key order, encodes key images into its paged transfer
//! format, and dispatches key presses to registered handlers.

pub mod deck;
pub mod error;
pub mod layout;
pub mod transport;

pub use deck::{list_devices, DeviceSummary, Diagnostic, KeyHandler, Keypad};
pub use error::{Error, Result};
pub use layout::{Layout, ALL_KEYS, ORIGINAL_15};
pub use transport::Transport;

/// USB vendor id shared by every supported panel.
pub const VENDOR_ID: u16 = 0x0FD9;
