//! Panel protocol definitions and encoding.
//!
//! Protocol structure:
//! - Key images go out as two output reports ("pages"): a fixed header with
//!   the key id substituted at a fixed offset, followed by a slice of the
//!   BGR pixel data. Page 1 also carries a BMP header for the firmware.
//! - Header byte 2 is the page number, byte 4 flags the last page.
//! - Input reports: byte 0 is the report type, then one state byte per
//!   device key id.

use crate::layout::Layout;

/// Report type of a key state input report.
pub const KEY_STATE_REPORT: u8 = 0x01;

/// Key state byte for a pressed key.
pub const KEY_PRESSED: u8 = 0x01;

/// Offset of the page number in an image page header.
pub const PAGE_NUMBER_OFFSET: usize = 2;

/// Offset of the last-page flag in an image page header.
pub const LAST_PAGE_OFFSET: usize = 4;

/// Parsed input report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputReport {
    /// Nothing was read.
    Empty,
    /// Device key ids currently pressed, ascending.
    KeyState(Vec<u8>),
    /// Any other report type.
    Unexpected(u8),
}

/// Builds one image page: header template with the key id substituted,
/// followed by the payload.
pub fn build_page(header: &[u8], key_id_offset: usize, key_id: u8, payload: &[u8]) -> Vec<u8> {
    let mut page = Vec::with_capacity(header.len() + payload.len());
    page.extend_from_slice(header);
    page[key_id_offset] = key_id;
    page.extend_from_slice(payload);
    page
}

/// Splits BGR pixel data into the two image pages for `key_id`.
///
/// # Panics
///
/// Panics if `pixels` is shorter than the page 1 payload
/// (`layout.page1_pixels * 3` bytes).
pub fn build_image_pages(layout: &Layout, key_id: u8, pixels: &[u8]) -> [Vec<u8>; 2] {
    let (first, rest) = pixels.split_at(layout.page1_pixels * 3);
    [
        build_page(layout.page1_header, layout.key_id_offset, key_id, first),
        build_page(layout.page2_header, layout.key_id_offset, key_id, rest),
    ]
}

/// Parses the bytes read from the device.
pub fn parse_input_report(report: &[u8]) -> InputReport {
    match report.split_first() {
        None => InputReport::Empty,
        Some((&KEY_STATE_REPORT, states)) => InputReport::KeyState(
            states
                .iter()
                .enumerate()
                .filter(|(_, state)| **state == KEY_PRESSED)
                .map(|(id, _)| id as u8)
                .collect(),
        ),
        Some((&report_id, _)) => InputReport::Unexpected(report_id),
    }
}
