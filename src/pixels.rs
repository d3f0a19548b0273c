//! Module for pixel formats.
//!
//! Both decoders in this crate output the same thing: 8-bits per channel
//! RGBA, one byte per channel, no packing. That's the [`RGBA8`] type. Having
//! our own type (rather than re-exporting one) lets the crate give it the
//! exact trait impls the decoders need, but conversions to and from the
//! [`pixel_formats`](https://docs.rs/pixel_formats) ecosystem types are
//! provided for callers that traffic in those.
//!
//! **Colorspace note:** neither decoder touches channel *values*. A QOI
//! header declares whether its channels are sRGB or linear, and TGA says
//! nothing at all; either way the bytes pass through unchanged, so `RGBA8`
//! is deliberately colorspace-agnostic.

use bytemuck::{Pod, Zeroable};
use pixel_formats::{r8g8b8a8_Srgb, r8g8b8a8_Unorm};

/// An 8-bits per channel RGBA pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

unsafe impl Zeroable for RGBA8 {}
unsafe impl Pod for RGBA8 {}

impl RGBA8 {
  /// Fully opaque black, `{0, 0, 0, 255}`.
  pub const OPAQUE_BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
}

impl From<r8g8b8a8_Srgb> for RGBA8 {
  #[inline]
  fn from(p: r8g8b8a8_Srgb) -> Self {
    Self { r: p.r, g: p.g, b: p.b, a: p.a }
  }
}
impl From<RGBA8> for r8g8b8a8_Srgb {
  #[inline]
  fn from(p: RGBA8) -> Self {
    Self { r: p.r, g: p.g, b: p.b, a: p.a }
  }
}
impl From<r8g8b8a8_Unorm> for RGBA8 {
  #[inline]
  fn from(p: r8g8b8a8_Unorm) -> Self {
    Self { r: p.r, g: p.g, b: p.b, a: p.a }
  }
}
impl From<RGBA8> for r8g8b8a8_Unorm {
  #[inline]
  fn from(p: RGBA8) -> Self {
    Self { r: p.r, g: p.g, b: p.b, a: p.a }
  }
}
