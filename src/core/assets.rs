//! Asset caches for character and background art.
//!
//! Image decoding is an external collaborator behind [`ImageLoader`]. A
//! failed load never aborts the story: it degrades to generated
//! placeholder art and a warning, both at load time and on render-time
//! cache misses.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

use crate::core::render::Color;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// A decoded RGBA image.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Fill a rectangle, clipped to the bitmap bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for py in y.min(self.height)..y_end {
            for px in x.min(self.width)..x_end {
                let i = ((py * self.width + px) * 4) as usize;
                self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
            }
        }
    }

    /// Draw a border of the given thickness just inside the edges.
    pub fn outline(&mut self, thickness: u32, color: Color) {
        self.fill_rect(0, 0, self.width, thickness, color);
        self.fill_rect(0, self.height.saturating_sub(thickness), self.width, thickness, color);
        self.fill_rect(0, 0, thickness, self.height, color);
        self.fill_rect(self.width.saturating_sub(thickness), 0, thickness, self.height, color);
    }
}

/// External image-decoding collaborator.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<Bitmap, AssetError>;
}

/// Loader used when the host configures none; every path load fails over
/// to placeholder art.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoader;

impl ImageLoader for NoopLoader {
    fn load(&self, path: &Path) -> Result<Bitmap, AssetError> {
        Err(AssetError::Decode(format!(
            "no image loader configured for {}",
            path.display()
        )))
    }
}

/// How to obtain a piece of art: decode a file, or synthesize a
/// placeholder of the given size outright.
#[derive(Debug, Clone)]
pub enum ImageSpec {
    Path(PathBuf),
    Placeholder { width: u32, height: u32 },
}

impl ImageSpec {
    pub fn path(p: impl Into<PathBuf>) -> Self {
        Self::Path(p.into())
    }

    pub fn placeholder(width: u32, height: u32) -> Self {
        Self::Placeholder { width, height }
    }
}

const PLACEHOLDER_GREY: Color = Color::rgb(200, 200, 200);
const PLACEHOLDER_GRID: Color = Color::rgb(180, 180, 180);
const GRID_STEP: u32 = 50;
const CHARACTER_FALLBACK_SIZE: (u32, u32) = (200, 400);

/// Grey grid stand-in for a missing background.
pub fn placeholder_background(width: u32, height: u32) -> Bitmap {
    let mut bitmap = Bitmap::filled(width, height, PLACEHOLDER_GREY);
    let mut x = 0;
    while x < width {
        bitmap.fill_rect(x, 0, 1, height, PLACEHOLDER_GRID);
        x += GRID_STEP;
    }
    let mut y = 0;
    while y < height {
        bitmap.fill_rect(0, y, width, 1, PLACEHOLDER_GRID);
        y += GRID_STEP;
    }
    bitmap
}

/// Blocky silhouette stand-in for a missing character sprite.
pub fn placeholder_character(width: u32, height: u32) -> Bitmap {
    let outline = Color::rgb(50, 50, 150);
    let mut bitmap = Bitmap::filled(width, height, Color::rgb(255, 255, 255));
    bitmap.outline(2, outline);
    // head and torso
    bitmap.fill_rect(width / 4, height / 8, width / 2, height / 4, outline);
    bitmap.fill_rect(width * 3 / 8, height * 3 / 8, width / 4, height / 2, outline);
    bitmap
}

/// Character and background caches keyed by story-facing names.
#[derive(Debug)]
pub struct AssetStore {
    characters: FxHashMap<String, Bitmap>,
    backgrounds: FxHashMap<String, Bitmap>,
    /// Shared stand-in for render-time background misses.
    fallback: Bitmap,
}

impl AssetStore {
    /// `logical_w`/`logical_h` size the background placeholders.
    pub fn new(logical_w: u32, logical_h: u32) -> Self {
        Self {
            characters: FxHashMap::default(),
            backgrounds: FxHashMap::default(),
            fallback: placeholder_background(logical_w, logical_h),
        }
    }

    pub fn insert_character(&mut self, key: impl Into<String>, spec: ImageSpec, loader: &dyn ImageLoader) {
        let key = key.into();
        let bitmap = match spec {
            ImageSpec::Placeholder { width, height } => placeholder_character(width, height),
            ImageSpec::Path(path) => loader.load(&path).unwrap_or_else(|err| {
                warn!(key = %key, path = %path.display(), error = %err, "character art unavailable, using placeholder");
                placeholder_character(CHARACTER_FALLBACK_SIZE.0, CHARACTER_FALLBACK_SIZE.1)
            }),
        };
        self.characters.insert(key, bitmap);
    }

    pub fn insert_background(&mut self, key: impl Into<String>, spec: ImageSpec, loader: &dyn ImageLoader) {
        let key = key.into();
        let bitmap = match spec {
            ImageSpec::Placeholder { width, height } => placeholder_background(width, height),
            ImageSpec::Path(path) => loader.load(&path).unwrap_or_else(|err| {
                warn!(key = %key, path = %path.display(), error = %err, "background art unavailable, using placeholder");
                self.fallback.clone()
            }),
        };
        self.backgrounds.insert(key, bitmap);
    }

    pub fn character(&self, key: &str) -> Option<&Bitmap> {
        self.characters.get(key)
    }

    pub fn background(&self, key: &str) -> Option<&Bitmap> {
        self.backgrounds.get(key)
    }

    /// Stand-in drawn when a scene names a background that was never
    /// registered.
    pub fn fallback_background(&self) -> &Bitmap {
        &self.fallback
    }
}
