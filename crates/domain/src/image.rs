use std::path::Path;

use serde::{Deserialize, Serialize};

pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "jpe", "png", "gif", "svg", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Extension check used by the file scan; case-insensitive. Only the text
/// after the last `.` of the file name counts, so a bare `.jpg` is an image.
pub fn is_supported_image(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };

    let ext = ext.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}
