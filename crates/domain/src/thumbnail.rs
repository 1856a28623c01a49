use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Dimensions, DomainError, OpaqueId};

pub const THUMBNAIL_EXTENSION: &str = "webp";

pub fn thumbnail_file_name(file_id: &OpaqueId) -> String {
    format!("{file_id}.{THUMBNAIL_EXTENSION}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThumbnailSettings {
    pub base_size: u32,
    pub max_size: u32,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            base_size: 200,
            max_size: 360,
        }
    }
}

impl ThumbnailSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.base_size == 0 || self.max_size < self.base_size {
            return Err(DomainError::InvalidThumbnailSettings {
                base: self.base_size,
                max: self.max_size,
            });
        }
        Ok(())
    }

    /// Aspect-preserving target size: the shorter side becomes `base_size`
    /// unless that pushes the longer side past `max_size`. Never upscales.
    pub fn compute_thumbnail_size(&self, source: Dimensions) -> Dimensions {
        let width = f64::from(source.width);
        let height = f64::from(source.height);
        let shorter = width.min(height);
        let longer = width.max(height);

        let scale = (f64::from(self.base_size) / shorter)
            .min(f64::from(self.max_size) / longer)
            .min(1.0);

        Dimensions::new(scaled(width, scale), scaled(height, scale))
    }
}

fn scaled(value: f64, scale: f64) -> u32 {
    (value * scale).round().max(1.0) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingThumbnail {
    pub file_path: PathBuf,
    pub thumb_width: u32,
    pub thumb_height: u32,
}

impl PendingThumbnail {
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.thumb_width, self.thumb_height)
    }
}

/// State of one file's thumbnail. No record means no thumbnail and none pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRecord", into = "StoredRecord")]
pub enum ThumbnailRecord {
    Created,
    Pending(PendingThumbnail),
}

#[derive(Clone, Serialize, Deserialize)]
enum CreatedMarker {
    #[serde(rename = "created")]
    Created,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Created(CreatedMarker),
    Pending(PendingThumbnail),
}

impl From<StoredRecord> for ThumbnailRecord {
    fn from(value: StoredRecord) -> Self {
        match value {
            StoredRecord::Created(_) => Self::Created,
            StoredRecord::Pending(pending) => Self::Pending(pending),
        }
    }
}

impl From<ThumbnailRecord> for StoredRecord {
    fn from(value: ThumbnailRecord) -> Self {
        match value {
            ThumbnailRecord::Created => Self::Created(CreatedMarker::Created),
            ThumbnailRecord::Pending(pending) => Self::Pending(pending),
        }
    }
}

pub type ThumbnailIndex = BTreeMap<OpaqueId, ThumbnailRecord>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailInstruction {
    Create {
        file_id: OpaqueId,
        source_path: PathBuf,
        size: Dimensions,
    },
    Delete {
        file_id: OpaqueId,
    },
}
