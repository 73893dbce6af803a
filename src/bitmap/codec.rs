//! Persisting pixel buffers as lossless image files and loading them back.

use std::path::Path;

use crate::{
    foundation::error::{FrameError, FrameResult},
    pixel::{PixelBuffer, PixelFormat, format::premultiply},
};

/// Lossless container used when persisting a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ImageEncoding {
    #[default]
    Png,
    Bmp,
}

impl ImageEncoding {
    /// Pick an encoding from the file extension, if it names one we write.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else if ext.eq_ignore_ascii_case("bmp") {
            Some(Self::Bmp)
        } else {
            None
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Write the buffer's current logical pixels to `path` as straight-alpha RGBA8.
///
/// Parent directories are created as needed. Row padding never reaches the file.
pub fn encode(buffer: &PixelBuffer, encoding: ImageEncoding, path: &Path) -> FrameResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FrameError::Encoding {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?;
    }

    let rgba = buffer.to_rgba8_straight();
    image::save_buffer_with_format(
        path,
        &rgba,
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        encoding.image_format(),
    )
    .map_err(|source| FrameError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        format = %buffer.format(),
        "encoded pixel buffer"
    );
    Ok(())
}

/// Load an image file as straight-alpha RGBA8.
pub fn decode_rgba8(path: &Path) -> FrameResult<image::RgbaImage> {
    let img = image::open(path).map_err(|source| FrameError::Decoding {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Load an image file into a freshly allocated, tightly packed buffer of `format`.
pub fn decode(path: &Path, format: PixelFormat) -> FrameResult<PixelBuffer> {
    let rgba = decode_rgba8(path)?;
    let (width, height) = rgba.dimensions();

    let mut premul = rgba.into_raw();
    for px in premul.chunks_exact_mut(4) {
        let p = premultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&p);
    }

    let mut buffer = PixelBuffer::allocate(format, width, height)?;
    buffer.lock().copy_from_rgba8_premul(&premul)?;
    Ok(buffer)
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/codec.rs"]
mod tests;
