//! Panel layouts and key index translation.
//!
//! Each supported panel is described by a static [`Layout`]: its grid shape,
//! display canvas, reset command and image page headers. The session picks
//! one at discovery time by product id.
//!
//! Logical keys run left-to-right, top-to-bottom. The device scans each row
//! right-to-left, so the mapping mirrors the column within its row and is
//! its own inverse.

use crate::{Error, Result};

/// Registry sentinel for the handler that fires on every key.
pub const ALL_KEYS: u8 = 0xFF;

/// Static description of one panel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub name: &'static str,
    pub product_id: u16,
    pub rows: u8,
    pub columns: u8,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Feature report restoring the factory display state.
    pub reset_command: &'static [u8],
    /// Pixels carried by the first image page; the rest go on the second.
    pub page1_pixels: usize,
    pub page1_header: &'static [u8],
    pub page2_header: &'static [u8],
    /// Offset of the key id inside both page headers.
    pub key_id_offset: usize,
    /// Length of an input report, including the report type byte.
    pub input_report_len: usize,
}

/// 15-key panel: 3 rows of 5 keys, 72x72 BGR displays.
pub static ORIGINAL_15: Layout = Layout {
    name: "15-key panel",
    product_id: 0x0060,
    rows: 3,
    columns: 5,
    canvas_width: 72,
    canvas_height: 72,
    reset_command: &[0x0B, 0x63],
    page1_pixels: 2583,
    page1_header: &ORIGINAL_PAGE1_HEADER,
    page2_header: &ORIGINAL_PAGE2_HEADER,
    key_id_offset: 5,
    input_report_len: 16,
};

/// Page 1: report header followed by a BMP file and info header for a
/// 72x72, 24bpp bitmap.
const ORIGINAL_PAGE1_HEADER: [u8; 74] = [
    0x02, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x42, 0x4D, 0xF6, 0x3C, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x36, 0x00, 0x00, 0x00, 0x28, 0x00, //
    0x00, 0x00, 0x48, 0x00, 0x00, 0x00, 0x48, 0x00, //
    0x00, 0x00, 0x01, 0x00, 0x18, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0xC0, 0x3C, 0x00, 0x00, 0xC4, 0x0E, //
    0x00, 0x00, 0xC4, 0x0E, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

const ORIGINAL_PAGE2_HEADER: [u8; 16] = [
    0x02, 0x01, 0x02, 0x00, 0x01, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

/// Every layout the library can drive.
static LAYOUTS: &[&Layout] = &[&ORIGINAL_15];

impl Layout {
    /// Finds the layout for a USB product id.
    pub fn for_product(product_id: u16) -> Option<&'static Layout> {
        LAYOUTS.iter().copied().find(|l| l.product_id == product_id)
    }

    /// Number of keys on the panel.
    pub fn key_count(&self) -> u8 {
        self.rows * self.columns
    }

    /// Size in bytes of one BGR key image.
    pub fn image_len(&self) -> usize {
        self.canvas_width as usize * self.canvas_height as usize * 3
    }

    /// Maps a logical key index to the device's key id, or back.
    ///
    /// Returns `None` for values with no key on this layout.
    pub fn translate(&self, value: u8) -> Option<u8> {
        if value >= self.key_count() {
            return None;
        }
        let column = value % self.columns;
        Some((value - column) + (self.columns - 1 - column))
    }

    /// Checks a logical key index and returns its device key id.
    pub fn native_key(&self, key: u8) -> Result<u8> {
        self.translate(key).ok_or(Error::InvalidKey(key))
    }

    /// Key id used in image page headers; the device counts image slots
    /// from one.
    pub fn image_key_id(&self, key: u8) -> Result<u8> {
        Ok(self.native_key(key)? + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_is_involution() {
        for value in 0..ORIGINAL_15.key_count() {
            let native = ORIGINAL_15.translate(value).unwrap();
            assert_eq!(ORIGINAL_15.translate(native), Some(value));
        }
    }

    #[test]
    fn test_translate_mirrors_rows() {
        assert_eq!(ORIGINAL_15.translate(0), Some(4));
        assert_eq!(ORIGINAL_15.translate(2), Some(2));
        assert_eq!(ORIGINAL_15.translate(4), Some(0));
        assert_eq!(ORIGINAL_15.translate(5), Some(9));
        assert_eq!(ORIGINAL_15.translate(12), Some(12));
        assert_eq!(ORIGINAL_15.translate(14), Some(10));
    }

    #[test]
    fn test_translate_out_of_range() {
        assert_eq!(ORIGINAL_15.translate(15), None);
        assert_eq!(ORIGINAL_15.translate(ALL_KEYS), None);
    }

    #[test]
    fn test_native_key_rejects_invalid() {
        assert!(matches!(ORIGINAL_15.native_key(15), Err(Error::InvalidKey(15))));
        assert!(matches!(ORIGINAL_15.native_key(255), Err(Error::InvalidKey(255))));
    }

    #[test]
    fn test_image_key_id_is_one_based() {
        assert_eq!(ORIGINAL_15.image_key_id(0).unwrap(), 5);
        assert_eq!(ORIGINAL_15.image_key_id(4).unwrap(), 1);
        assert_eq!(ORIGINAL_15.image_key_id(10).unwrap(), 15);
    }

    #[test]
    fn test_original_dimensions() {
        assert_eq!(ORIGINAL_15.key_count(), 15);
        assert_eq!(ORIGINAL_15.image_len(), 15552);
        assert_eq!(ORIGINAL_15.page1_header.len(), 74);
        assert_eq!(ORIGINAL_15.page2_header.len(), 16);
    }

    #[test]
    fn test_for_product() {
        assert_eq!(Layout::for_product(0x0060), Some(&ORIGINAL_15));
        assert_eq!(Layout::for_product(0x0063), None);
    }
}
