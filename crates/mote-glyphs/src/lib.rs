//! Glyph textures for the mote particle clock.
//!
//! A [`Texture`] is a 1-bit bitmap that particle meshes sample to decide
//! which of their points are lit. The ten digits and the separator either
//! come from the built-in font or from text files in a glyph directory.

mod font;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// File name of the separator bitmap inside a glyph directory.
pub const SEPARATOR_FILE: &str = "colon.txt";

/// Errors raised while loading a glyph bitmap.
#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("glyph bitmap has no lit texels")]
    Empty,
}

/// A 1-bit bitmap, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<bool>,
}

impl Texture {
    /// A texture with no lit texels. Meshes bound to it render nothing.
    pub fn blank() -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![false],
        }
    }

    /// Parse a bitmap where `#` is lit and any other character is empty.
    ///
    /// Short rows are padded; leading and trailing blank lines are dropped.
    pub fn parse(text: &str) -> Result<Self, GlyphError> {
        let rows: Vec<&str> = text.lines().map(str::trim_end).collect();
        let first = rows.iter().position(|r| r.contains('#'));
        let last = rows.iter().rposition(|r| r.contains('#'));
        let (Some(first), Some(last)) = (first, last) else {
            return Err(GlyphError::Empty);
        };
        Ok(Self::from_rows(&rows[first..=last]))
    }

    fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        let height = rows.len().max(1);
        let mut texels = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                texels[y * width + x] = ch == '#';
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_blank(&self) -> bool {
        !self.texels.iter().any(|t| *t)
    }

    /// Nearest-texel lookup; `u` runs left to right and `v` top to bottom,
    /// both in 0.0-1.0. Out-of-range coordinates are unlit.
    pub fn sample(&self, u: f32, v: f32) -> bool {
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return false;
        }
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.texels[y * self.width + x]
    }
}

/// Read and parse a single bitmap file.
pub fn load_texture(path: &Path) -> Result<Texture, GlyphError> {
    let text = std::fs::read_to_string(path).map_err(|source| GlyphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Texture::parse(&text)
}

/// The ten digit textures plus the separator, shared between meshes.
#[derive(Debug, Clone)]
pub struct TextureSet {
    digits: [Arc<Texture>; 10],
    separator: Arc<Texture>,
}

impl TextureSet {
    /// Textures from the built-in font.
    pub fn builtin() -> Self {
        Self {
            digits: std::array::from_fn(|d| Arc::new(Texture::from_rows(&font::DIGITS[d]))),
            separator: Arc::new(Texture::from_rows(&font::COLON)),
        }
    }

    /// Load textures from `dir` (`0.txt`..`9.txt` and `colon.txt`), or the
    /// built-in font when no directory is given.
    ///
    /// A file that fails to load degrades to a blank texture.
    pub fn load(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::builtin();
        };
        tracing::info!(dir = %dir.display(), "loading glyph textures");
        Self {
            digits: std::array::from_fn(|d| load_or_blank(&dir.join(format!("{d}.txt")))),
            separator: load_or_blank(&dir.join(SEPARATOR_FILE)),
        }
    }

    /// Texture for `digit`; digits above 9 get the blank texture.
    pub fn digit(&self, digit: u8) -> Arc<Texture> {
        match self.digits.get(digit as usize) {
            Some(texture) => Arc::clone(texture),
            None => Arc::new(Texture::blank()),
        }
    }

    pub fn separator(&self) -> Arc<Texture> {
        Arc::clone(&self.separator)
    }
}

fn load_or_blank(path: &Path) -> Arc<Texture> {
    match load_texture(path) {
        Ok(texture) => Arc::new(texture),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "glyph unavailable, using blank texture");
            Arc::new(Texture::blank())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_pads() {
        let t = Texture::parse("\n\n#..\n.#\n..#\n\n").unwrap();
        assert_eq!((t.width(), t.height()), (3, 3));
        assert!(t.sample(0.0, 0.0));
        assert!(t.sample(0.5, 0.5));
        assert!(!t.sample(0.9, 0.5));
        assert!(t.sample(1.0, 1.0));
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(Texture::parse("...\n   "), Err(GlyphError::Empty)));
        assert!(matches!(Texture::parse(""), Err(GlyphError::Empty)));
    }

    #[test]
    fn test_sample_outside_is_unlit() {
        let t = Texture::parse("###").unwrap();
        assert!(!t.sample(-0.1, 0.5));
        assert!(!t.sample(0.5, 1.1));
    }

    #[test]
    fn test_builtin_digits_are_distinct() {
        let set = TextureSet::builtin();
        for a in 0..10u8 {
            assert!(!set.digit(a).is_blank());
            assert_eq!(set.digit(a).width(), 7);
            assert_eq!(set.digit(a).height(), 9);
            for b in (a + 1)..10 {
                assert_ne!(set.digit(a), set.digit(b), "{a} and {b} share a bitmap");
            }
        }
        assert_eq!(set.separator().width(), 3);
    }

    #[test]
    fn test_out_of_range_digit_is_blank() {
        assert!(TextureSet::builtin().digit(12).is_blank());
    }

    #[test]
    fn test_load_dir_falls_back_to_blank() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1.txt"), ".#.\n##.\n.#.\n###\n").unwrap();
        std::fs::write(dir.path().join("2.txt"), "....\n").unwrap();

        let set = TextureSet::load(Some(dir.path()));
        assert_eq!(set.digit(1).height(), 4);
        assert!(set.digit(2).is_blank());
        assert!(set.digit(0).is_blank());
        assert!(set.separator().is_blank());
    }

    #[test]
    fn test_load_without_dir_is_builtin() {
        let set = TextureSet::load(None);
        assert_eq!(set.digit(8), TextureSet::builtin().digit(8));
    }
}
