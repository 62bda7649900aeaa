//! Asset descriptors and cache lookup interfaces
//!
//! Loading and caching assets is owned by the host; the runtime only describes
//! which asset an entity references and resolves it through the cache traits
//! below. [`MemoryAssets`] is an in-memory implementation of every cache.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::EcsError;
use crate::foundation::math::Rect;

/// Reference to an asset, independent of how it is loaded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetDescriptor {
    /// Region of a texture atlas, e.g. `gfx/player`
    Texture {
        /// Region path
        region: String,
    },
    /// Bitmap font file
    BmpFont {
        /// Font file path
        path: String,
    },
    /// TrueType font file rendered at a pixel size
    TtfFont {
        /// Font file path
        path: String,
        /// Pixel size
        size: u32,
    },
    /// Shader program made of a vertex and a fragment stage
    Shader {
        /// Vertex stage path
        vertex: String,
        /// Fragment stage path
        fragment: String,
    },
    /// Plain file reference: sounds, music and particle effects
    Path(String),
}

impl AssetDescriptor {
    /// Texture region descriptor
    pub fn texture(region: impl Into<String>) -> Self {
        Self::Texture { region: region.into() }
    }

    /// Plain path descriptor
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// File path or region name of the asset
    pub fn location(&self) -> &str {
        match self {
            Self::Texture { region } => region,
            Self::BmpFont { path } | Self::TtfFont { path, .. } | Self::Path(path) => path,
            Self::Shader { fragment, .. } => fragment,
        }
    }

    /// Check whether this is a bitmap or TrueType font
    pub fn is_font(&self) -> bool {
        matches!(self, Self::BmpFont { .. } | Self::TtfFont { .. })
    }
}

impl fmt::Display for AssetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Texture { region } => write!(f, "texture '{region}'"),
            Self::BmpFont { path } => write!(f, "bitmap font '{path}'"),
            Self::TtfFont { path, size } => write!(f, "ttf font '{path}' ({size}px)"),
            Self::Shader { vertex, fragment } => write!(f, "shader '{vertex}' + '{fragment}'"),
            Self::Path(path) => write!(f, "'{path}'"),
        }
    }
}

/// Errors raised by asset lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The cache does not know the asset
    #[error("Asset not found: {0}")]
    NotFound(AssetDescriptor),

    /// The descriptor kind cannot be resolved by this cache
    #[error("{asset} cannot be used as {expected}")]
    WrongKind {
        /// Descriptor that was passed
        asset: AssetDescriptor,
        /// Kind the cache resolves
        expected: &'static str,
    },

    /// The entity has no asset reference to resolve
    #[error("Entity has no asset to resolve")]
    MissingAsset,

    /// The entity being resolved is gone
    #[error(transparent)]
    Entity(#[from] EcsError),
}

/// Resolved texture atlas region
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRegion {
    /// Region path
    pub path: String,
    /// Region width in pixels
    pub width: f32,
    /// Region height in pixels
    pub height: f32,
    /// Incremented every time the texture is reloaded
    pub generation: u32,
}

/// Resolved font
#[derive(Debug, Clone, PartialEq)]
pub struct FontHandle {
    /// Font the handle was resolved from
    pub asset: AssetDescriptor,
    /// Advance of one glyph in world units
    pub glyph_width: f32,
    /// Line height in world units
    pub line_height: f32,
    /// Incremented every time the font is reloaded
    pub generation: u32,
}

impl FontHandle {
    /// Size of a text block in world units
    pub fn measure(&self, text: &str) -> (f32, f32) {
        let lines: Vec<&str> = text.split('\n').collect();
        let columns = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        (columns as f32 * self.glyph_width, lines.len() as f32 * self.line_height)
    }
}

/// Resolved shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderHandle {
    /// Program name, used for logging
    pub name: String,
    /// Incremented every time the program is recompiled
    pub generation: u32,
}

/// Resolved particle effect
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEffectHandle {
    /// Effect file path
    pub path: String,
    /// Bounds of the effect relative to its origin, in world units
    pub bounds: Rect,
    /// Incremented every time the effect is reloaded
    pub generation: u32,
}

/// Texture lookup
pub trait TextureCache {
    /// Resolve a texture region
    fn region(&self, asset: &AssetDescriptor) -> Result<TextureRegion, AssetError>;
}

/// Font lookup
pub trait FontCache {
    /// Resolve a font scaled to world units
    fn font(&self, asset: &AssetDescriptor, pixels_per_unit: f32) -> Result<FontHandle, AssetError>;
}

/// Particle effect lookup
pub trait ParticleCache {
    /// Resolve a particle effect scaled to world units
    fn effect(&self, asset: &AssetDescriptor, scale: f32) -> Result<ParticleEffectHandle, AssetError>;
}

/// Shader lookup
pub trait ShaderCache {
    /// Resolve a shader program
    fn shader(&self, asset: &AssetDescriptor) -> Result<ShaderHandle, AssetError>;
}

/// In-memory asset registry implementing every cache trait
///
/// Reloading an asset bumps its generation so callers can observe which
/// references were re-resolved.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    textures: HashMap<AssetDescriptor, (f32, f32)>,
    fonts: HashMap<AssetDescriptor, f32>,
    particles: HashMap<AssetDescriptor, Rect>,
    shaders: HashSet<AssetDescriptor>,
    generations: HashMap<AssetDescriptor, u32>,
}

impl MemoryAssets {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture region of the given pixel size
    pub fn add_texture(&mut self, region: &str, width: f32, height: f32) -> AssetDescriptor {
        let asset = AssetDescriptor::texture(region);
        self.textures.insert(asset.clone(), (width, height));
        asset
    }

    /// Register a font with the given glyph size in pixels
    pub fn add_font(&mut self, asset: AssetDescriptor, glyph_pixels: f32) -> AssetDescriptor {
        self.fonts.insert(asset.clone(), glyph_pixels);
        asset
    }

    /// Register a particle effect with bounds in pixels
    pub fn add_particle(&mut self, path: &str, bounds: Rect) -> AssetDescriptor {
        let asset = AssetDescriptor::path(path);
        self.particles.insert(asset.clone(), bounds);
        asset
    }

    /// Register a shader program
    pub fn add_shader(&mut self, vertex: &str, fragment: &str) -> AssetDescriptor {
        let asset = AssetDescriptor::Shader { vertex: vertex.to_owned(), fragment: fragment.to_owned() };
        self.shaders.insert(asset.clone());
        asset
    }

    /// Mark an asset as reloaded
    pub fn reload(&mut self, asset: &AssetDescriptor) {
        *self.generations.entry(asset.clone()).or_insert(0) += 1;
    }

    fn generation(&self, asset: &AssetDescriptor) -> u32 {
        self.generations.get(asset).copied().unwrap_or(0)
    }
}

impl TextureCache for MemoryAssets {
    fn region(&self, asset: &AssetDescriptor) -> Result<TextureRegion, AssetError> {
        let AssetDescriptor::Texture { region } = asset else {
            return Err(AssetError::WrongKind { asset: asset.clone(), expected: "texture" });
        };
        let (width, height) = self.textures.get(asset).ok_or_else(|| AssetError::NotFound(asset.clone()))?;
        Ok(TextureRegion { path: region.clone(), width: *width, height: *height, generation: self.generation(asset) })
    }
}

impl FontCache for MemoryAssets {
    fn font(&self, asset: &AssetDescriptor, pixels_per_unit: f32) -> Result<FontHandle, AssetError> {
        if !asset.is_font() {
            return Err(AssetError::WrongKind { asset: asset.clone(), expected: "font" });
        }
        let glyph = self.fonts.get(asset).ok_or_else(|| AssetError::NotFound(asset.clone()))?;
        Ok(FontHandle {
            asset: asset.clone(),
            glyph_width: glyph / pixels_per_unit,
            line_height: glyph / pixels_per_unit,
            generation: self.generation(asset),
        })
    }
}

impl ParticleCache for MemoryAssets {
    fn effect(&self, asset: &AssetDescriptor, scale: f32) -> Result<ParticleEffectHandle, AssetError> {
        let bounds = self.particles.get(asset).ok_or_else(|| AssetError::NotFound(asset.clone()))?;
        Ok(ParticleEffectHandle {
            path: asset.location().to_owned(),
            bounds: Rect::new(bounds.x * scale, bounds.y * scale, bounds.width * scale, bounds.height * scale),
            generation: self.generation(asset),
        })
    }
}

impl ShaderCache for MemoryAssets {
    fn shader(&self, asset: &AssetDescriptor) -> Result<ShaderHandle, AssetError> {
        if !self.shaders.contains(asset) {
            return Err(AssetError::NotFound(asset.clone()));
        }
        Ok(ShaderHandle { name: asset.location().to_owned(), generation: self.generation(asset) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_texture_lookup() {
        let mut assets = MemoryAssets::new();
        let asset = assets.add_texture("gfx/player", 64.0, 32.0);

        let region = assets.region(&asset).unwrap();
        assert_eq!(region.path, "gfx/player");
        assert_eq!(region.generation, 0);

        assets.reload(&asset);
        assert_eq!(assets.region(&asset).unwrap().generation, 1);

        let missing = AssetDescriptor::texture("gfx/enemy");
        assert_eq!(assets.region(&missing), Err(AssetError::NotFound(missing.clone())));
    }

    #[test]
    fn test_wrong_kind() {
        let assets = MemoryAssets::new();
        let sound = AssetDescriptor::path("sound/jump.wav");
        assert!(matches!(assets.region(&sound), Err(AssetError::WrongKind { expected: "texture", .. })));
        assert!(matches!(assets.font(&sound, 100.0), Err(AssetError::WrongKind { expected: "font", .. })));
    }

    #[test]
    fn test_font_measure() {
        let mut assets = MemoryAssets::new();
        let asset = assets.add_font(AssetDescriptor::BmpFont { path: "font/arial.fnt".into() }, 10.0);
        let font = assets.font(&asset, 100.0).unwrap();

        let (width, height) = font.measure("abc\nde");
        assert_relative_eq!(width, 0.3, epsilon = 1e-6);
        assert_relative_eq!(height, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_descriptor_display() {
        let asset = AssetDescriptor::TtfFont { path: "font/a.ttf".into(), size: 20 };
        assert_eq!(asset.to_string(), "ttf font 'font/a.ttf' (20px)");
        assert_eq!(asset.location(), "font/a.ttf");
    }
}
