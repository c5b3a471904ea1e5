//! Texture handles and sprites.
//!
//! A [`TextureHandle`] is a lightweight index into the GPU texture store that
//! also remembers the texture's pixel size. A [`Sprite`] pairs a handle with
//! the sub-rectangle of the texture it shows. Sprites are immutable values;
//! sprites that share a texture can be drawn in the same batch item.

use crate::math::{Rect, RectInt};

/// Handle to a texture in the [`TextureStore`](super::texture::TextureStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub(crate) index: usize,
    width: u32,
    height: u32,
}

impl TextureHandle {
    /// Handles are normally issued by the texture store. Building one by hand
    /// is useful with a headless backend.
    pub fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether two handles refer to the same texture.
    pub fn same_texture(&self, other: &TextureHandle) -> bool {
        self.index == other.index
    }
}

/// A region of a texture to draw on a quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    texture: TextureHandle,
    region: RectInt,
    uv: Rect,
}

impl Sprite {
    /// A sprite covering the whole texture.
    pub fn new(texture: TextureHandle) -> Self {
        Self::from_region(
            texture,
            RectInt::from_bounds(0, 0, texture.width as i32, texture.height as i32),
        )
    }

    /// A sprite covering a pixel region of the texture.
    pub fn from_region(texture: TextureHandle, region: RectInt) -> Self {
        Self {
            texture,
            region,
            uv: region.normalized(texture.width, texture.height),
        }
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn region(&self) -> RectInt {
        self.region
    }

    /// Normalized texture coordinates of the region.
    pub fn uv(&self) -> Rect {
        self.uv
    }

    /// UVs for the quad corners in bottom-left, bottom-right, top-right,
    /// top-left order.
    pub fn uv_corners(&self) -> [[f32; 2]; 4] {
        let (min, max) = (self.uv.min(), self.uv.max());
        [
            [min.x, min.y],
            [max.x, min.y],
            [max.x, max.y],
            [min.x, max.y],
        ]
    }

    /// A sprite is drawable only if its texture has pixels.
    pub fn is_valid(&self) -> bool {
        self.texture.width > 0 && self.texture.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_texture_maps_to_unit_uvs() {
        let sprite = Sprite::new(TextureHandle::new(1, 64, 32));
        assert_eq!(
            sprite.uv_corners(),
            [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
        );
        assert!(sprite.is_valid());
    }

    #[test]
    fn region_uvs_are_normalized_by_texture_size() {
        let sheet = TextureHandle::new(3, 128, 64);
        let frame = Sprite::from_region(sheet, RectInt::from_origin_size(32, 32, 32, 32));
        let [bl, _, tr, _] = frame.uv_corners();
        assert_eq!(bl, [0.25, 0.5]);
        assert_eq!(tr, [0.5, 1.0]);
    }

    #[test]
    fn empty_texture_is_invalid() {
        assert!(!Sprite::new(TextureHandle::new(2, 0, 16)).is_valid());
    }
}
