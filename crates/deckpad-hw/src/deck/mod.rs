//! Keypad module.
//!
//! Session handling, key image encoding and the panel's wire protocol.

mod bitmap;
mod device;

pub mod protocol;

pub use bitmap::{blank_canvas, encode_pixels, flatten_over_black, load_png};
pub use device::{list_devices, DeviceSummary, Diagnostic, KeyHandler, Keypad};
pub use protocol::InputReport;
