//! Screenshot loading and anchoring for the results sheet.

use super::diagnostics::Diagnostics;
use super::layout::ImageAnchor;
use crate::utils::config::LayoutConfig;
use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("failed to read screenshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode screenshot: {0}")]
    Decode(#[from] image::ImageError),
}

/// Outcome of a single screenshot load
#[derive(Debug)]
pub enum ScreenshotLoad {
    /// PNG-encoded image data
    Loaded(Vec<u8>),
    Missing,
    Failed(ScreenshotError),
}

/// Where screenshot bytes come from
pub trait ImageSource {
    fn load(&self, path: &Path) -> ScreenshotLoad;
}

/// Reads screenshots from the local filesystem and normalizes them to PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn load(&self, path: &Path) -> ScreenshotLoad {
        if !path.exists() {
            return ScreenshotLoad::Missing;
        }
        match read_as_png(path) {
            Ok(png) => ScreenshotLoad::Loaded(png),
            Err(e) => ScreenshotLoad::Failed(e),
        }
    }
}

fn read_as_png(path: &Path) -> Result<Vec<u8>, ScreenshotError> {
    let bytes = std::fs::read(path)?;
    let decoded = image::load_from_memory(&bytes)?;

    if image::guess_format(&bytes)? == ImageFormat::Png {
        return Ok(bytes);
    }

    let mut png = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)?;
    Ok(png)
}

/// Sources outside this module may hand back anything; only decodable PNG is anchored.
fn verified_png(png: Vec<u8>) -> Result<Vec<u8>, ScreenshotError> {
    image::load_from_memory_with_format(&png, ImageFormat::Png)?;
    Ok(png)
}

/// Result of attaching a screenshot to one row
#[derive(Debug)]
pub struct EmbeddedRow {
    pub image: Option<ImageAnchor>,
    pub row_height: f64,
}

pub struct ScreenshotEmbedder<'a> {
    source: &'a dyn ImageSource,
    layout: &'a LayoutConfig,
}

impl<'a> ScreenshotEmbedder<'a> {
    pub fn new(source: &'a dyn ImageSource, layout: &'a LayoutConfig) -> Self {
        Self { source, layout }
    }

    /// Try to anchor the screenshot at `path` to (`row`, `col`).
    ///
    /// A missing file is a warning. A load failure, or bytes that are not a valid
    /// PNG, is an error. Either way the row keeps the short height and the sheet
    /// is still built.
    pub fn embed(
        &self,
        path: &str,
        row: u32,
        col: u16,
        diagnostics: &mut Diagnostics,
    ) -> EmbeddedRow {
        let loaded = match self.source.load(Path::new(path)) {
            ScreenshotLoad::Loaded(png) => verified_png(png),
            ScreenshotLoad::Missing => {
                diagnostics.warn(format!("Screenshot file not found: {}", path));
                return self.short_row();
            }
            ScreenshotLoad::Failed(e) => Err(e),
        };

        match loaded {
            Ok(png) => EmbeddedRow {
                image: Some(ImageAnchor {
                    row,
                    col,
                    png,
                    width: self.layout.image_width,
                    height: self.layout.image_height,
                }),
                row_height: self.layout.tall_row_height,
            },
            Err(e) => {
                diagnostics.error(format!(
                    "Error adding screenshot image {} to Test Results tab: {}",
                    path, e
                ));
                self.short_row()
            }
        }
    }

    pub fn short_row(&self) -> EmbeddedRow {
        EmbeddedRow {
            image: None,
            row_height: self.layout.short_row_height,
        }
    }
}

/// A small valid PNG for fake image sources
#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2))
        .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .unwrap();
    png
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::diagnostics::Severity;

    /// Hands back whatever bytes it was built with
    struct FixedBytes(Vec<u8>);

    impl ImageSource for FixedBytes {
        fn load(&self, _path: &Path) -> ScreenshotLoad {
            ScreenshotLoad::Loaded(self.0.clone())
        }
    }

    #[test]
    fn test_png_is_kept_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        image::RgbImage::new(4, 3).save(&path).unwrap();

        match FsImageSource.load(&path) {
            ScreenshotLoad::Loaded(png) => assert_eq!(png, std::fs::read(&path).unwrap()),
            other => panic!("unexpected load result: {:?}", other),
        }
    }

    #[test]
    fn test_other_formats_are_converted_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.bmp");
        image::RgbImage::new(2, 2).save(&path).unwrap();

        match FsImageSource.load(&path) {
            ScreenshotLoad::Loaded(png) => {
                assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png)
            }
            other => panic!("unexpected load result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FsImageSource.load(&dir.path().join("absent.png")),
            ScreenshotLoad::Missing
        ));

        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"definitely not an image").unwrap();
        assert!(matches!(
            FsImageSource.load(&corrupt),
            ScreenshotLoad::Failed(ScreenshotError::Decode(_))
        ));
    }

    #[test]
    fn test_embed_reports_problems_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"xx").unwrap();
        let layout = LayoutConfig::default();
        let embedder = ScreenshotEmbedder::new(&FsImageSource, &layout);
        let mut diagnostics = Diagnostics::new();

        let missing = embedder.embed("/no/such/shot.png", 1, 4, &mut diagnostics);
        assert!(missing.image.is_none());
        assert_eq!(missing.row_height, layout.short_row_height);

        let failed = embedder.embed(corrupt.to_str().unwrap(), 2, 4, &mut diagnostics);
        assert!(failed.image.is_none());
        assert_eq!(failed.row_height, layout.short_row_height);

        let severities: Vec<_> = diagnostics.entries().iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Error]);
    }

    #[test]
    fn test_loaded_bytes_must_be_png() {
        let layout = LayoutConfig::default();
        let mut diagnostics = Diagnostics::new();

        let garbage = FixedBytes(vec![1, 2, 3]);
        let rejected =
            ScreenshotEmbedder::new(&garbage, &layout).embed("shot", 1, 4, &mut diagnostics);
        assert!(rejected.image.is_none());
        assert_eq!(rejected.row_height, layout.short_row_height);
        assert_eq!(diagnostics.errors().count(), 1);

        let valid = FixedBytes(sample_png());
        let accepted =
            ScreenshotEmbedder::new(&valid, &layout).embed("shot", 2, 4, &mut diagnostics);
        assert_eq!(accepted.image.map(|a| a.png), Some(sample_png()));
        assert_eq!(accepted.row_height, layout.tall_row_height);
        assert_eq!(diagnostics.len(), 1);
    }
}
