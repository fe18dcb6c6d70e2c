//! Error types for the deckpad hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with a panel.
#[derive(Error, Debug)]
pub enum Error {
    /// A panel was found but its product id has no known layout.
    #[error("unknown device {vendor_id:04X}:{product_id:04X}")]
    UnknownDevice { vendor_id: u16, product_id: u16 },

    /// No panel with the supported vendor id is attached.
    #[error("no devices found")]
    NoDevices,

    /// Logical key index outside the layout.
    #[error("invalid key: {0}")]
    InvalidKey(u8),

    /// Transport read, write or feature report failure.
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: hidapi::HidError,
    },

    /// USB HID API initialisation error.
    #[error("USB HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    /// Key image could not be read or decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Key image does not match the layout's canvas.
    #[error("image size mismatch: expected {expected:?}, got {actual:?}")]
    ImageSize {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

impl Error {
    /// Wraps a transport failure with the operation that triggered it.
    pub(crate) fn io(context: &'static str) -> impl FnOnce(hidapi::HidError) -> Self {
        move |source| Error::Io { context, source }
    }
}
