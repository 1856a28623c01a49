use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use imgrater_application::{ApplicationError, MediaInspector};
use imgrater_domain::Dimensions;
use tempfile::NamedTempFile;
use tracing::debug;
use webp::Encoder;

/// Lossy WebP quality for every thumbnail, on the encoder's 0-100 scale.
pub const THUMBNAIL_QUALITY: f32 = 80.0;

/// A source image on disk. Pixel dimensions are read once per instance.
#[derive(Debug)]
pub struct MediaFile {
    path: PathBuf,
    dimensions: OnceLock<Dimensions>,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dimensions: OnceLock::new(),
        }
    }

    pub fn dimensions(&self) -> Result<Dimensions, ApplicationError> {
        if let Some(dimensions) = self.dimensions.get() {
            return Ok(*dimensions);
        }

        let (width, height) = self
            .reader()?
            .into_dimensions()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?;
        Ok(*self
            .dimensions
            .get_or_init(|| Dimensions::new(width, height)))
    }

    /// Resizes to exactly `size` and writes a lossy WebP file to `dest`. The output
    /// is staged next to `dest` and renamed over it, so concurrent renders of
    /// the same file leave one complete image behind.
    pub fn render_resized(&self, dest: &Path, size: Dimensions) -> Result<(), ApplicationError> {
        let resized = self
            .decode()?
            .resize_exact(size.width, size.height, FilterType::Lanczos3)
            .to_rgba8();

        let staging_dir = dest
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(staging_dir)
            .map_err(|error| ApplicationError::Io(error.to_string()))?;
        let encoded = Encoder::from_rgba(resized.as_raw(), resized.width(), resized.height())
            .encode_simple(false, THUMBNAIL_QUALITY)
            .map_err(|error| ApplicationError::Decode(format!("webp encoding failed: {error:?}")))?;
        staged
            .write_all(&encoded)
            .map_err(|error| ApplicationError::Io(error.to_string()))?;
        staged
            .persist(dest)
            .map_err(|error| ApplicationError::Io(error.error.to_string()))?;

        debug!(
            source = %self.path.display(),
            dest = %dest.display(),
            width = size.width,
            height = size.height,
            "thumbnail written"
        );
        Ok(())
    }

    fn reader(&self) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, ApplicationError> {
        ImageReader::open(&self.path)
            .map_err(|error| ApplicationError::Io(error.to_string()))?
            .with_guessed_format()
            .map_err(|error| ApplicationError::Decode(error.to_string()))
    }

    fn decode(&self) -> Result<DynamicImage, ApplicationError> {
        self.reader()?
            .decode()
            .map_err(|error| ApplicationError::Decode(error.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct ImageMediaInspector;

impl MediaInspector for ImageMediaInspector {
    fn read_dimensions(&self, path: &Path) -> Result<Dimensions, ApplicationError> {
        MediaFile::new(path).dimensions()
    }

    fn render_resized(
        &self,
        source: &Path,
        dest: &Path,
        size: Dimensions,
    ) -> Result<(), ApplicationError> {
        MediaFile::new(source).render_resized(dest, size)
    }
}
