//! Pictures inserted into picture placeholders.

use deck_core::{Error, Extent, Result};
use image::ImageFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// An image file loaded for insertion into a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    bytes: Vec<u8>,
    format: PictureFormat,
    width: u32,
    height: u32,
    file_name: String,
}

/// Raster formats PowerPoint accepts in a picture placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl PictureFormat {
    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Tiff => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Extension used for the media part.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// Fractions of the source image cut from each edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Crop {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Crop {
    pub fn is_none(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }
}

impl Picture {
    /// Load and identify an image file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Self::from_bytes(bytes, file_name).map_err(|reason| Error::ImageError {
            path: PathBuf::from(path),
            reason,
        })
    }

    /// Identify an in-memory image by its content, not its name.
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> std::result::Result<Self, String> {
        let reader = image::io::Reader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| e.to_string())?;
        let detected = reader
            .format()
            .ok_or_else(|| "unrecognized image format".to_string())?;
        let format = PictureFormat::from_image_format(detected)
            .ok_or_else(|| format!("{:?} images are not supported", detected))?;
        let (width, height) = reader.into_dimensions().map_err(|e| e.to_string())?;

        Ok(Self {
            bytes,
            format,
            width,
            height,
            file_name: file_name.into(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> PictureFormat {
        self.format
    }

    /// Pixel size as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Original file name, used as the picture description.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Crop that makes the image fill a frame of the given size without
    /// distortion, trimming equally from both sides of the long axis.
    pub fn crop_to_fill(&self, frame: Option<Extent>) -> Crop {
        let Some(view) = frame.and_then(|f| f.aspect_ratio()) else {
            return Crop::default();
        };
        if self.width == 0 || self.height == 0 {
            return Crop::default();
        }
        let image = self.width as f64 / self.height as f64;

        if (view - image).abs() < 1e-6 {
            Crop::default()
        } else if view < image {
            let crop = (1.0 - view / image) / 2.0;
            Crop {
                left: crop,
                right: crop,
                ..Crop::default()
            }
        } else {
            let crop = (1.0 - image / view) / 2.0;
            Crop {
                top: crop,
                bottom: crop,
                ..Crop::default()
            }
        }
    }
}
