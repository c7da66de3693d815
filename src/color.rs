use rand::Rng;

use crate::errors::*;

//////////////////////////////////////////////////////////////////////
// normalized RGBA color, channels nominally in [0, 1]
//
// converted to 8-bit texels only when written into a PixelBuffer

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64
}

pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

// round and clamp a normalized channel to a byte
pub fn channel_to_byte(c: f64) -> u8 {
    (c * 255.0).round().max(0.0).min(255.0) as u8
}

impl Color {

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Color { r: r, g: g, b: b, a: a }
    }

    // alpha defaults to opaque
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    // "#rrggbb" or "rrggbb", case-insensitive, always opaque
    pub fn from_hex(hex: &str) -> Result<Self> {

        let digits = hex.strip_prefix('#').unwrap_or(hex);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!(ErrorKind::InvalidColor(hex.to_string()));
        }

        let mut rgb = [0.0; 3];

        for (i, c) in rgb.iter_mut().enumerate() {
            let byte = u8::from_str_radix(&digits[2*i..2*i+2], 16)?;
            *c = (byte as f64) / 255.0;
        }

        Ok(Self::rgb(rgb[0], rgb[1], rgb[2]))

    }

    // opaque color with each channel a random byte, like "#xxxxxx"
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {

        let bytes: [u8; 3] = rng.gen();

        Self::rgb((bytes[0] as f64) / 255.0,
                  (bytes[1] as f64) / 255.0,
                  (bytes[2] as f64) / 255.0)

    }

    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [channel_to_byte(self.r),
         channel_to_byte(self.g),
         channel_to_byte(self.b),
         channel_to_byte(self.a)]
    }

    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }

}

//////////////////////////////////////////////////////////////////////
