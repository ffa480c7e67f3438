//! Formatting runs
//!
//! A [`Run`] is a contiguous span of text sharing one formatting treatment.
//! Runs are flat: there are no child runs and at most one set of style flags.

use serde::{Deserialize, Serialize};

/// Font size used for body text runs
pub const BODY_FONT_SIZE_PT: u32 = 11;

/// A single formatting run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    /// Run text (empty for image runs)
    pub text: String,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
    /// Explicit font size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<u32>,
    /// Explicit font family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// Hyperlink target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink_href: Option<String>,
    /// Resolved image, present only on image runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAsset>,
}

impl Run {
    /// Plain body text at the body font size
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size_pt: Some(BODY_FONT_SIZE_PT),
            ..Default::default()
        }
    }

    /// Bold text with no explicit size
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }

    /// Italic text with no explicit size
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Default::default()
        }
    }

    /// Hyperlink run
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hyperlink_href: Some(href.into()),
            ..Default::default()
        }
    }

    /// Image run carrying a resolved asset
    pub fn image(asset: ImageAsset) -> Self {
        Self {
            image: Some(asset),
            ..Default::default()
        }
    }

    /// Set the font size (builder style)
    pub fn with_size(mut self, points: u32) -> Self {
        self.font_size_pt = Some(points);
        self
    }

    /// Set the font family (builder style)
    pub fn with_font(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Whether this run embeds an image
    pub fn is_image(&self) -> bool {
        self.image.is_some()
    }

    /// Source reference of the embedded image
    pub fn image_source(&self) -> Option<&str> {
        self.image.as_ref().map(|i| i.source.as_str())
    }
}

/// Supported embeddable image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// File extension used inside the package
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// MIME content type
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// An image resolved to embeddable bytes, already sized for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// The `src` reference the image was resolved from
    pub source: String,
    /// Detected format
    pub format: ImageFormat,
    /// Raw image bytes
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Display width in EMUs
    pub width_emu: i64,
    /// Display height in EMUs
    pub height_emu: i64,
}
