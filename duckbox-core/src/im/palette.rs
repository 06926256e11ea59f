// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::constant::{DETECTION_CLASSES, SEGMENT_CLASS_COLORS};
use crate::error::DuckboxError;

static PALETTE: OnceLock<HashMap<&'static str, [u8; 3]>> = OnceLock::new();

// Decoded once per process; the hex table is a compile-time constant so the
// unwrap cannot fire.
fn palette() -> &'static HashMap<&'static str, [u8; 3]> {
    PALETTE.get_or_init(|| {
        SEGMENT_CLASS_COLORS
            .iter()
            .map(|(name, hex)| (*name, decode_hex_rgb(hex).unwrap()))
            .collect()
    })
}

/// Decode a 6-digit hex triplet into an RGB color
///
/// # Arguments
///
/// * `hex` - A 6-digit hex string (e.g. `cfa923`), upper or lower case
///
/// # Examples
///
/// ```
/// use duckbox_core::im::decode_hex_rgb;
///
/// assert_eq!(decode_hex_rgb("3deb34"), Some([61, 235, 52]));
/// assert_eq!(decode_hex_rgb("zzzzzz"), None);
/// ```
pub fn decode_hex_rgb(hex: &str) -> Option<[u8; 3]> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r, g, b])
}

/// Look up the render color for a segmentation class
///
/// # Arguments
///
/// * `class` - A segmentation class name (e.g. `duckie`)
///
/// # Examples
///
/// ```
/// use duckbox_core::im::class_color;
///
/// assert_eq!(class_color("cone").unwrap(), [255, 166, 0]);
/// assert!(class_color("pedestrian").is_err());
/// ```
pub fn class_color(class: &str) -> Result<[u8; 3], DuckboxError> {
    palette()
        .get(class)
        .copied()
        .ok_or_else(|| DuckboxError::UnknownClassError(class.to_string()))
}

/// Return the label index of a detection target class
///
/// Classes that are segmented but not detection targets (e.g. `house`,
/// `floor`) return `None`.
///
/// # Examples
///
/// ```
/// use duckbox_core::im::detection_index;
///
/// assert_eq!(detection_index("duckie"), Some(0));
/// assert_eq!(detection_index("house"), None);
/// ```
pub fn detection_index(class: &str) -> Option<u32> {
    DETECTION_CLASSES
        .iter()
        .position(|c| *c == class)
        .map(|i| i as u32)
}
