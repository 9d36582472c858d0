//! Perceptual fingerprints for tool photos.
//!
//! A fingerprint is a 64-bit average hash: the image is reduced to an
//! 8x8 grayscale thumbnail and each sample contributes one bit, set when
//! the sample is at or above the thumbnail mean. Photos of the same tool
//! taken under similar conditions land within a small Hamming distance
//! of each other.
//!
//! # Determinism
//!
//! Identical image bytes always produce an identical fingerprint. The
//! pipeline is fixed: BT.601 luminance conversion, triangle-filtered
//! resize to exactly 8x8 (aspect ratio discarded), integer mean
//! threshold. No float arithmetic is involved.
//!
//! # Usage
//!
//! ```no_run
//! use toolscout_core::{distance, Fingerprint};
//!
//! let reference = std::fs::read("drill.jpg").unwrap();
//! let field_photo = std::fs::read("found-on-27f.jpg").unwrap();
//!
//! let a = Fingerprint::from_image_bytes(&reference).unwrap();
//! let b = Fingerprint::from_image_bytes(&field_photo).unwrap();
//! let similar = distance(a, b) <= 10;
//! ```

use std::fmt;

use image::imageops::FilterType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, Result};

/// Fingerprint width in bits.
pub const FINGERPRINT_BITS: u32 = 64;

/// Thumbnail edge length. 8x8 = 64 samples, one bit each.
const GRID: u32 = 8;

/// A 64-bit perceptual fingerprint of one image.
///
/// Immutable once computed. Stored and exchanged as a 16-character
/// lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Wrap a raw 64-bit value.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// The raw 64-bit value.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Compute the fingerprint of an encoded image (JPEG/PNG/WEBP/GIF).
    ///
    /// Fails with [`CoreError::ImageDecode`] when the bytes are not a
    /// decodable image; callers should validate upload content types
    /// before handing bytes here.
    pub fn from_image_bytes(data: &[u8]) -> Result<Self> {
        let img =
            image::load_from_memory(data).map_err(|e| CoreError::ImageDecode(e.to_string()))?;
        Ok(Self::from_image(&img))
    }

    /// Compute the fingerprint of an already-decoded image.
    pub fn from_image(img: &image::DynamicImage) -> Self {
        let luma = img.to_luma8();
        let thumb = image::imageops::resize(&luma, GRID, GRID, FilterType::Triangle);
        let samples = thumb.as_raw();

        let sum: u32 = samples.iter().map(|&p| u32::from(p)).sum();

        // Bit set when p >= mean. Kept in integer form (p * 64 >= sum)
        // so the comparison is exact. First sample in row-major order
        // ends up in the most significant bit.
        let mut bits = 0u64;
        for &p in samples {
            bits = (bits << 1) | u64::from(u32::from(p) * u32::from(FINGERPRINT_BITS) >= sum);
        }
        Self(bits)
    }

    /// 16-character lowercase hex encoding.
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }

    /// Parse the 16-character hex encoding produced by [`to_hex`].
    ///
    /// [`to_hex`]: Fingerprint::to_hex
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != 16 {
            return Err(CoreError::InvalidFingerprint(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| CoreError::InvalidFingerprint(s.to_string()))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hamming distance between two fingerprints.
///
/// Population count of the bitwise XOR. Range `[0, 64]`, symmetric,
/// `distance(a, a) == 0`.
pub fn distance(a: Fingerprint, b: Fingerprint) -> u32 {
    (a.0 ^ b.0).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(img: image::GrayImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_extractor_deterministic() {
        let img = image::GrayImage::from_fn(40, 30, |x, y| image::Luma([((x * 7 + y * 13) % 256) as u8]));
        let bytes = encode_png(img);

        let a = Fingerprint::from_image_bytes(&bytes).unwrap();
        let b = Fingerprint::from_image_bytes(&bytes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extractor_bit_layout() {
        // 8x8 input, so the resize step is the identity. Top half black,
        // bottom half white: mean is 127.5, so exactly the bottom 32
        // samples clear the threshold. Row-major MSB-first packing puts
        // them in the low 32 bits.
        let img = image::GrayImage::from_fn(8, 8, |_, y| image::Luma([if y < 4 { 0 } else { 255 }]));
        let fp = Fingerprint::from_image_bytes(&encode_png(img)).unwrap();
        assert_eq!(fp.bits(), 0x0000_0000_FFFF_FFFF);
    }

    #[test]
    fn test_extractor_uniform_image_all_ones() {
        // Every sample equals the mean, and the threshold is >=.
        let img = image::GrayImage::from_pixel(8, 8, image::Luma([128]));
        let fp = Fingerprint::from_image_bytes(&encode_png(img)).unwrap();
        assert_eq!(fp.bits(), u64::MAX);
    }

    #[test]
    fn test_decode_error() {
        let err = Fingerprint::from_image_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CoreError::ImageDecode(_)));
    }

    #[test]
    fn test_distance_bounds_and_symmetry() {
        let a = Fingerprint::from_bits(0xAAAA_AAAA_AAAA_AAAA);
        let b = Fingerprint::from_bits(0x5555_5555_5555_5555);

        assert_eq!(distance(a, a), 0);
        assert_eq!(distance(a, b), 64);
        assert_eq!(distance(a, b), distance(b, a));

        let c = Fingerprint::from_bits(0x00FF_00FF_00FF_00FF);
        assert!(distance(a, c) <= FINGERPRINT_BITS);
    }

    #[test]
    fn test_distance_single_bit() {
        let a = Fingerprint::from_bits(0);
        let b = Fingerprint::from_bits(1);
        assert_eq!(distance(a, b), 1);
    }

    #[test]
    fn test_hex_roundtrip() {
        let fp = Fingerprint::from_bits(0xDEAD_BEEF_CAFE_BABE);
        assert_eq!(fp.to_hex(), "deadbeefcafebabe");
        assert_eq!(Fingerprint::from_hex("deadbeefcafebabe").unwrap(), fp);

        // Leading zeros must survive the round trip.
        let small = Fingerprint::from_bits(0x1);
        assert_eq!(small.to_hex(), "0000000000000001");
        assert_eq!(Fingerprint::from_hex(&small.to_hex()).unwrap(), small);
    }

    #[test]
    fn test_hex_rejects_bad_input() {
        assert!(Fingerprint::from_hex("").is_err());
        assert!(Fingerprint::from_hex("abc").is_err());
        assert!(Fingerprint::from_hex("zzzzzzzzzzzzzzzz").is_err());
        assert!(Fingerprint::from_hex("deadbeefcafebabe00").is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let fp = Fingerprint::from_bits(0x00FF_00FF_00FF_00FF);
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, "\"00ff00ff00ff00ff\"");

        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fp);
    }
}
