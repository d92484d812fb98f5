use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};

use crate::surface::Sprite;

/// Decodes an image file into an RGBA sprite
pub fn load_sprite(path: impl AsRef<Path>) -> Result<Sprite> {
    let path = path.as_ref();
    let image = image::open(path)
        .wrap_err_with(|| format!("failed to load sprite {}", path.display()))?
        .into_rgba8();
    sprite_from_rgba(image)
}

pub fn sprite_from_rgba(image: image::RgbaImage) -> Result<Sprite> {
    let (width, height) = image.dimensions();
    let pixels = image.pixels().map(|p| p.0).collect();
    Sprite::new(width, height, pixels).ok_or_else(|| eyre!("sprite has no pixels"))
}
