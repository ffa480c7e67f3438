//! Image resolution
//!
//! Turns an `img` element's `src` into an embeddable [`ImageAsset`], or a
//! reason why it could not. Resolution is an explicit fallible operation;
//! the inline decomposer decides what to do with a failure.
//!
//! # Supported sources
//!
//! - `http://` and `https://` URLs (blocking fetch with a bounded timeout;
//!   the body is streamed and abandoned once it passes the size limit)
//! - `data:image/...;base64,` URIs
//! - `file://` URLs and local paths, relative ones resolved against a base
//!   directory
//!
//! # Unit Conversions
//!
//! OOXML uses EMUs (English Metric Units) for dimensions:
//! - 914400 EMUs = 1 inch
//! - 9525 EMUs = 1 pixel (at 96 DPI)

use std::io::Read;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mdocx_ast::{ImageAsset, ImageFormat};
use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::ImageSettings;

/// EMUs per inch (914400)
pub const EMU_PER_INCH: i64 = 914400;

/// EMUs per pixel at 96 DPI (9525)
pub const EMU_PER_PIXEL: i64 = 9525;

/// Reasons an image source could not be resolved
#[derive(Error, Debug)]
pub enum ImageError {
    /// The `src` attribute was missing or blank
    #[error("image has no source")]
    EmptySource,

    /// Remote fetching is turned off in the settings
    #[error("remote images are disabled: {0}")]
    RemoteDisabled(String),

    /// HTTP request error (includes timeouts)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned status {status}")]
    Status { status: u16 },

    /// Response body could not be read to the end
    #[error("failed to read response body: {0}")]
    Body(#[source] std::io::Error),

    /// Local file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed `data:` URI
    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    /// Image exceeds the configured size limit
    #[error("image is larger than the {limit} byte limit")]
    TooLarge { limit: u64 },

    /// Bytes are not a PNG, JPEG, GIF or BMP image
    #[error("unsupported image format")]
    UnsupportedFormat,
}

/// Result type for image resolution
pub type Result<T> = std::result::Result<T, ImageError>;

/// Resolves image sources to embeddable assets
pub trait ImageResolver {
    /// Resolve `src` to sized, embeddable bytes
    fn resolve(&self, src: &str) -> Result<ImageAsset>;
}

impl<F> ImageResolver for F
where
    F: Fn(&str) -> Result<ImageAsset>,
{
    fn resolve(&self, src: &str) -> Result<ImageAsset> {
        self(src)
    }
}

/// Default resolver for remote, inline and local image sources
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    /// HTTP client, absent when remote fetching is disabled
    client: Option<Client>,
    /// Directory relative paths are resolved against
    base_dir: Option<PathBuf>,
    /// Size limit in bytes
    max_bytes: u64,
    /// Maximum display width in EMUs
    max_width_emu: i64,
}

impl ResourceResolver {
    /// Create a resolver from image settings
    pub fn new(settings: &ImageSettings) -> Result<Self> {
        let client = if settings.allow_remote {
            Some(Client::builder().timeout(settings.timeout()).build()?)
        } else {
            None
        };

        Ok(Self {
            client,
            base_dir: settings.base_dir.clone(),
            max_bytes: settings.max_bytes,
            max_width_emu: settings.max_width_emu(),
        })
    }

    /// Override the base directory for relative paths
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Fetch remote images with this client, enabling remote sources
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ImageError::RemoteDisabled(url.to_string()))?;

        tracing::debug!(url, "fetching remote image");
        let response = client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status {
                status: status.as_u16(),
            });
        }

        if let Some(size) = response.content_length() {
            self.check_size(size)?;
        }

        read_limited(response, self.max_bytes)
    }

    fn read_local(&self, path: &str) -> Result<Vec<u8>> {
        let path = Path::new(path);
        let path = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        };

        let io_err = |source| ImageError::Io {
            path: path.clone(),
            source,
        };
        let metadata = std::fs::metadata(&path).map_err(io_err)?;
        self.check_size(metadata.len())?;
        std::fs::read(&path).map_err(io_err)
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_bytes {
            return Err(ImageError::TooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

impl ImageResolver for ResourceResolver {
    fn resolve(&self, src: &str) -> Result<ImageAsset> {
        let src_trimmed = src.trim();
        if src_trimmed.is_empty() {
            return Err(ImageError::EmptySource);
        }

        let bytes = if src_trimmed.starts_with("data:") {
            decode_data_uri(src_trimmed)?
        } else if src_trimmed.starts_with("http://") || src_trimmed.starts_with("https://") {
            self.fetch_remote(src_trimmed)?
        } else if let Some(path) = src_trimmed.strip_prefix("file://") {
            self.read_local(path)?
        } else {
            self.read_local(src_trimmed)?
        };

        self.check_size(bytes.len() as u64)?;
        build_asset(src, bytes, self.max_width_emu)
    }
}

/// Detect the format, read dimensions and size an image for display
pub fn build_asset(source: &str, bytes: Vec<u8>, max_width_emu: i64) -> Result<ImageAsset> {
    let format = detect_format(&bytes).ok_or(ImageError::UnsupportedFormat)?;
    let (width_emu, height_emu) = display_size(pixel_dimensions(format, &bytes), max_width_emu);

    Ok(ImageAsset {
        source: source.to_string(),
        format,
        bytes,
        width_emu,
        height_emu,
    })
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(ImageFormat::Png);
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }
    if data.len() >= 26 && data.starts_with(b"BM") {
        return Some(ImageFormat::Bmp);
    }
    None
}

/// Read pixel dimensions from the image header
pub fn pixel_dimensions(format: ImageFormat, data: &[u8]) -> Option<(u32, u32)> {
    let dims = match format {
        // IHDR is always the first chunk
        ImageFormat::Png => Some((be_u32(data, 16)?, be_u32(data, 20)?)),
        ImageFormat::Gif => Some((le_u16(data, 6)? as u32, le_u16(data, 8)? as u32)),
        ImageFormat::Bmp => Some((
            le_i32(data, 18)?.unsigned_abs(),
            le_i32(data, 22)?.unsigned_abs(),
        )),
        ImageFormat::Jpeg => jpeg_dimensions(data),
    };
    dims.filter(|(w, h)| *w > 0 && *h > 0)
}

/// Scan JPEG segments for the first start-of-frame marker
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // Fill bytes
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let length = be_u16(data, pos + 2)? as usize;
        let is_sof = (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let height = be_u16(data, pos + 5)? as u32;
            let width = be_u16(data, pos + 7)? as u32;
            return Some((width, height));
        }
        pos += 2 + length;
    }
    None
}

/// Compute display extent in EMUs
///
/// Natural width is capped at `max_width_emu` with the aspect ratio kept.
/// Unknown dimensions use the maximum width at 4:3.
pub fn display_size(pixels: Option<(u32, u32)>, max_width_emu: i64) -> (i64, i64) {
    match pixels {
        Some((w, h)) => {
            let natural_w = pixels_to_emu(w as i64);
            let natural_h = pixels_to_emu(h as i64);
            if natural_w <= max_width_emu {
                (natural_w, natural_h)
            } else {
                let scaled_h = (natural_h as f64 * max_width_emu as f64 / natural_w as f64).round();
                (max_width_emu, scaled_h as i64)
            }
        }
        None => (max_width_emu, max_width_emu * 3 / 4),
    }
}

/// Convert pixels to EMUs at 96 DPI
pub fn pixels_to_emu(pixels: i64) -> i64 {
    pixels * EMU_PER_PIXEL
}

/// Read at most `limit` bytes, failing as soon as the source has more
fn read_limited(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(ImageError::Body)?;

    if bytes.len() as u64 > limit {
        return Err(ImageError::TooLarge { limit });
    }
    Ok(bytes)
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::InvalidDataUri("missing data: prefix".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InvalidDataUri("missing payload separator".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(ImageError::InvalidDataUri(
            "only base64 payloads are supported".to_string(),
        ));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::InvalidDataUri(e.to_string()))
}

fn be_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn be_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn le_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn le_i32(data: &[u8], at: usize) -> Option<i32> {
    let bytes = data.get(at..at + 4)?;
    Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
