// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source image: the encoded bytes the user picked, plus the pixel size and
// format read from the header. The bytes are uploaded untouched; only the
// header is decoded here.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};
use papyrus_core::error::{PapyrusError, Result};
use tracing::{debug, info, instrument};

/// An uploaded image, ready to be displayed and submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    bytes: Vec<u8>,
    file_name: String,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Read the header of encoded bytes (JPEG, PNG, ...) for format and dimensions.
    #[instrument(skip(bytes, file_name), fields(data_len = bytes.len()))]
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| PapyrusError::ImageError(format!("failed to read {file_name}: {e}")))?;
        let format = reader.format().ok_or_else(|| {
            PapyrusError::ImageError(format!("{file_name} is not a recognised image format"))
        })?;
        let (width, height) = reader.into_dimensions().map_err(|e| {
            PapyrusError::ImageError(format!("failed to decode {file_name}: {e}"))
        })?;
        if width == 0 || height == 0 {
            return Err(PapyrusError::ImageError(format!(
                "{file_name} has no pixels ({width}x{height})"
            )));
        }
        debug!(?format, width, height, "image header decoded");
        Ok(Self {
            bytes,
            file_name,
            format,
            width,
            height,
        })
    }

    /// Read an image file and inspect its header.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let image = Self::from_bytes(bytes, file_name)?;
        info!(
            width = image.width,
            height = image.height,
            bytes = image.bytes.len(),
            "image loaded"
        );
        Ok(image)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// MIME type sent with the multipart upload.
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}
