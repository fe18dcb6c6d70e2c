//! Keypad session over a USB HID panel.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use hidapi::{HidApi, HidDevice};
use image::RgbImage;
use tracing::{debug, info, warn};

use super::bitmap::{encode_pixels, load_png};
use super::protocol::{build_image_pages, parse_input_report, InputReport};
use crate::layout::{Layout, ALL_KEYS};
use crate::transport::Transport;
use crate::{Error, Result, VENDOR_ID};

/// Key press handler. Receives the pressed logical key; returning `false`
/// removes the handler after this call.
pub type KeyHandler = Box<dyn FnMut(u8) -> bool>;

/// Non-fatal conditions seen while processing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// Input report with a type other than key state; discarded.
    UnexpectedReport { report_id: u8 },
    /// Pressed device key id with no logical key on this layout.
    UnmappedKey { native: u8 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnexpectedReport { report_id } => {
                write!(f, "ignoring unexpected report from device: {}", report_id)
            }
            Diagnostic::UnmappedKey { native } => {
                write!(f, "ignoring press of unmapped device key {}", native)
            }
        }
    }
}

/// Attached panel, as seen during enumeration.
#[derive(Debug, Clone)]
pub struct DeviceSummary {
    pub vendor_id: u16,
    pub product_id: u16,
    pub path: String,
    pub serial: Option<String>,
    /// Matching layout, `None` for unsupported products.
    pub layout: Option<&'static Layout>,
}

/// Lists every attached device with the supported vendor id.
pub fn list_devices() -> Result<Vec<DeviceSummary>> {
    let api = HidApi::new()?;
    Ok(api
        .device_list()
        .filter(|d| d.vendor_id() == VENDOR_ID)
        .map(|d| DeviceSummary {
            vendor_id: d.vendor_id(),
            product_id: d.product_id(),
            path: d.path().to_string_lossy().into_owned(),
            serial: d.serial_number().map(str::to_string),
            layout: Layout::for_product(d.product_id()),
        })
        .collect())
}

/// Open panel session: the device, its layout and the key handlers.
pub struct Keypad<T: Transport = HidDevice> {
    transport: T,
    layout: &'static Layout,
    handlers: HashMap<u8, KeyHandler>,
    diagnostic_hook: Option<Box<dyn FnMut(&Diagnostic)>>,
}

impl Keypad<HidDevice> {
    /// Opens the first attached panel.
    pub fn open() -> Result<Self> {
        let api = HidApi::new()?;

        let device_info = api
            .device_list()
            .find(|d| d.vendor_id() == VENDOR_ID)
            .ok_or(Error::NoDevices)?;

        let layout = Layout::for_product(device_info.product_id()).ok_or(Error::UnknownDevice {
            vendor_id: device_info.vendor_id(),
            product_id: device_info.product_id(),
        })?;

        let device = device_info
            .open_device(&api)
            .map_err(Error::io("failed to open device"))?;

        info!(
            "{} opened (VID:{:04X} PID:{:04X})",
            layout.name,
            device_info.vendor_id(),
            device_info.product_id()
        );

        Ok(Self::with_transport(device, layout))
    }

    /// Opens a specific panel by HID path.
    pub fn open_path(path: &str) -> Result<Self> {
        let api = HidApi::new()?;

        let device_info = api
            .device_list()
            .find(|d| d.path().to_bytes() == path.as_bytes())
            .ok_or(Error::NoDevices)?;

        if device_info.vendor_id() != VENDOR_ID {
            return Err(Error::UnknownDevice {
                vendor_id: device_info.vendor_id(),
                product_id: device_info.product_id(),
            });
        }
        let layout = Layout::for_product(device_info.product_id()).ok_or(Error::UnknownDevice {
            vendor_id: device_info.vendor_id(),
            product_id: device_info.product_id(),
        })?;

        let device = device_info
            .open_device(&api)
            .map_err(Error::io("failed to open device"))?;

        info!("{} opened at path: {}", layout.name, path);

        Ok(Self::with_transport(device, layout))
    }
}

impl<T: Transport> Keypad<T> {
    /// Creates a session over an already open transport.
    pub fn with_transport(transport: T, layout: &'static Layout) -> Self {
        Self {
            transport,
            layout,
            handlers: HashMap::new(),
            diagnostic_hook: None,
        }
    }

    /// Layout of the open panel.
    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    /// Restores the factory display state.
    pub fn reset(&mut self) -> Result<()> {
        self.transport
            .send_feature_report(self.layout.reset_command)
            .map_err(Error::io("failed to reset device"))?;
        debug!("Reset sent");
        Ok(())
    }

    /// Sets the handler called on every key press, before any key handler.
    ///
    /// The handler receives the pressed logical key, not [`ALL_KEYS`].
    pub fn set_global_key_handler<F>(&mut self, handler: F)
    where
        F: FnMut(u8) -> bool + 'static,
    {
        self.handlers.insert(ALL_KEYS, Box::new(handler));
    }

    /// Removes the handler for all keys.
    pub fn clear_global_key_handler(&mut self) {
        self.handlers.remove(&ALL_KEYS);
    }

    /// Sets the handler for one logical key, replacing any previous one.
    pub fn set_key_handler<F>(&mut self, key: u8, handler: F) -> Result<()>
    where
        F: FnMut(u8) -> bool + 'static,
    {
        self.layout.native_key(key)?;
        self.handlers.insert(key, Box::new(handler));
        Ok(())
    }

    /// Removes the handler for one logical key.
    pub fn clear_key_handler(&mut self, key: u8) -> Result<()> {
        self.layout.native_key(key)?;
        self.handlers.remove(&key);
        Ok(())
    }

    /// Returns true if a handler is registered for `key` (or [`ALL_KEYS`]).
    pub fn has_handler(&self, key: u8) -> bool {
        self.handlers.contains_key(&key)
    }

    /// Sets the sink for non-fatal input diagnostics. They are logged either
    /// way.
    pub fn set_diagnostic_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&Diagnostic) + 'static,
    {
        self.diagnostic_hook = Some(Box::new(hook));
    }

    /// Removes the diagnostic sink.
    pub fn clear_diagnostic_hook(&mut self) {
        self.diagnostic_hook = None;
    }

    /// Shows a PNG file on a key.
    pub fn set_key_image<P: AsRef<Path>>(&mut self, key: u8, path: P) -> Result<()> {
        self.layout.native_key(key)?;
        let image = load_png(path)?;
        self.set_key_bitmap(key, Some(&image))
    }

    /// Shows an image on a key; `None` blanks it.
    pub fn set_key_bitmap(&mut self, key: u8, image: Option<&RgbImage>) -> Result<()> {
        let key_id = self.layout.image_key_id(key)?;
        let pixels = encode_pixels(self.layout, image)?;
        let [page1, page2] = build_image_pages(self.layout, key_id, &pixels);

        self.transport
            .write(&page1)
            .map_err(Error::io("failed to write page 1"))?;
        self.transport
            .write(&page2)
            .map_err(Error::io("failed to write page 2"))?;

        debug!("Key {} image written (device id {})", key, key_id);
        Ok(())
    }

    /// Blanks the image on a key.
    pub fn clear_key_image(&mut self, key: u8) -> Result<()> {
        self.set_key_bitmap(key, None)
    }

    /// Blanks every key, stopping at the first failure.
    pub fn clear_all_images(&mut self) -> Result<()> {
        for key in 0..self.layout.key_count() {
            self.clear_key_image(key)?;
        }
        Ok(())
    }

    /// Reads at most one input report and dispatches its key presses.
    ///
    /// Waits up to `timeout_ms` milliseconds: zero never blocks, a negative
    /// value blocks until a report arrives.
    pub fn process_events(&mut self, timeout_ms: i32) -> Result<()> {
        let mut report = vec![0u8; self.layout.input_report_len];
        let len = self
            .transport
            .read_timeout(&mut report, timeout_ms)
            .map_err(Error::io("error reading key press"))?;

        match parse_input_report(&report[..len]) {
            InputReport::Empty => {}
            InputReport::Unexpected(report_id) => {
                self.diagnose(Diagnostic::UnexpectedReport { report_id });
            }
            InputReport::KeyState(pressed) => {
                for native in pressed {
                    match self.layout.translate(native) {
                        Some(key) => {
                            self.dispatch(ALL_KEYS, key);
                            self.dispatch(key, key);
                        }
                        None => self.diagnose(Diagnostic::UnmappedKey { native }),
                    }
                }
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, slot: u8, key: u8) {
        let Some(handler) = self.handlers.get_mut(&slot) else {
            return;
        };
        if !handler(key) {
            debug!("Handler for slot {} removed after key {}", slot, key);
            self.handlers.remove(&slot);
        }
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        if let Some(hook) = self.diagnostic_hook.as_mut() {
            hook(&diagnostic);
        }
    }
}
