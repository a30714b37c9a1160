//! PNG export of a rendered board.

use crate::renderer::RendererError;
use thiserror::Error;

/// File name offered for downloads and save dialogs.
pub const EXPORT_FILE_NAME: &str = "whiteboard.png";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: surface is {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("GPU readback failed: {0}")]
    Readback(String),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Result of PNG rendering - contains the raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl PngRenderResult {
    /// Encode the pixels as a PNG file.
    pub fn encode(&self) -> Result<Vec<u8>, ExportError> {
        encode_png(&self.rgba_data, self.width, self.height)
    }
}

/// Drop the per-row alignment padding of a GPU readback buffer.
pub fn strip_row_padding(data: &[u8], width: u32, height: u32, bytes_per_row: u32) -> Result<Vec<u8>, ExportError> {
    let row_len = width as usize * 4;
    let stride = bytes_per_row as usize;
    let needed = if height == 0 {
        0
    } else {
        stride * (height as usize - 1) + row_len
    };
    if stride < row_len || data.len() < needed {
        return Err(ExportError::BufferSize {
            expected: needed.max(row_len * height as usize),
            actual: data.len(),
        });
    }

    let mut rgba_data = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        rgba_data.extend_from_slice(&data[row_start..row_start + row_len]);
    }
    Ok(rgba_data)
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptySurface { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if rgba_data.len() != expected {
        return Err(ExportError::BufferSize {
            expected,
            actual: rgba_data.len(),
        });
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }

    log::debug!("Encoded {}x{} PNG: {} bytes", width, height, png_data.len());
    Ok(png_data)
}
