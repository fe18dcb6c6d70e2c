//! Raw device I/O used by the keypad session.

use hidapi::{HidDevice, HidResult};

/// Raw HID operations on an open panel.
///
/// Implemented for [`HidDevice`]; tests substitute a simulated device.
pub trait Transport {
    /// Writes one output report, returning the number of bytes sent.
    fn write(&mut self, data: &[u8]) -> HidResult<usize>;

    /// Sends a feature report.
    fn send_feature_report(&mut self, data: &[u8]) -> HidResult<()>;

    /// Reads one input report, waiting up to `timeout_ms` milliseconds.
    /// Zero returns immediately, a negative value blocks. Returns the number
    /// of bytes read, zero if nothing arrived in time.
    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: i32) -> HidResult<usize>;
}

impl Transport for HidDevice {
    fn write(&mut self, data: &[u8]) -> HidResult<usize> {
        HidDevice::write(self, data)
    }

    fn send_feature_report(&mut self, data: &[u8]) -> HidResult<()> {
        HidDevice::send_feature_report(self, data)
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: i32) -> HidResult<usize> {
        HidDevice::read_timeout(self, buf, timeout_ms)
    }
}
