//! Cover art as coloured text
//!
//! Each pixel becomes a glyph whose ink density follows the pixel's
//! brightness, coloured with the pixel's RGB value. Images are sampled at
//! twice the width to make up for tall terminal cells.

use anyhow::Context;
use image::{imageops::FilterType, DynamicImage};

/// Glyphs and the brightness they stand for.
const DENSITY: [(char, u8); 28] = [
    ('Ñ', 255),
    ('@', 245),
    ('#', 235),
    ('W', 225),
    ('$', 215),
    ('9', 205),
    ('8', 195),
    ('7', 185),
    ('6', 175),
    ('5', 165),
    ('4', 155),
    ('3', 145),
    ('2', 135),
    ('1', 125),
    ('0', 115),
    ('?', 105),
    ('!', 95),
    ('a', 85),
    ('b', 75),
    ('c', 65),
    (';', 55),
    (':', 50),
    ('+', 45),
    ('=', 40),
    ('-', 35),
    ('*', 20),
    (',', 10),
    ('.', 5),
];

/// Below this channel maximum the accent is lightened for readability.
const DARK_ACCENT: u8 = 96;

#[derive(Debug, Clone)]
pub struct CoverArt {
    pub rows: Vec<Vec<(char, [u8; 3])>>,
    /// Colour for the title and labels next to the cover.
    pub accent: [u8; 3],
}

pub fn render(bytes: &[u8], height: u16) -> anyhow::Result<CoverArt> {
    let img = image::load_from_memory(bytes).context("decode cover art")?;
    Ok(render_image(&img, height))
}

pub fn render_image(img: &DynamicImage, height: u16) -> CoverArt {
    let height = u32::from(height.max(1));
    let resized = img.resize_exact(height * 2, height, FilterType::Lanczos3);
    let rgb = resized.to_rgb8();
    let luma = resized.to_luma8();

    let rows = (0..height)
        .map(|y| {
            (0..height * 2)
                .map(|x| (glyph(luma.get_pixel(x, y)[0]), rgb.get_pixel(x, y).0))
                .collect()
        })
        .collect();

    CoverArt {
        rows,
        accent: accent_color(img),
    }
}

/// Glyph whose density is closest to `luma`.
pub fn glyph(luma: u8) -> char {
    DENSITY
        .iter()
        .min_by_key(|(_, level)| level.abs_diff(luma))
        .map(|(c, _)| *c)
        .unwrap_or(' ')
}

fn accent_color(img: &DynamicImage) -> [u8; 3] {
    let small = img.resize(50, 50, FilterType::Nearest).to_rgb8();
    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for pixel in small.pixels() {
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += u64::from(channel);
        }
        count += 1;
    }
    let avg = sums.map(|s| (s / count.max(1)) as u8);

    if avg.iter().all(|c| *c < DARK_ACCENT) {
        avg.map(|c| c + (255 - c) / 2)
    } else {
        avg
    }
}
