#![forbid(unsafe_code)]

//! Module for working with Truevision TGA ("Targa") data.
//!
//! TGA is a late-80s raster format: an 18 byte little-endian header, an
//! optional identification string, an optional color map, pixel data that
//! may or may not be run-length encoded, and (in the "new" 1989 revision) an
//! optional 26 byte footer at the very end of the file pointing at an
//! extension area and a developer directory.
//!
//! * [`tga_get_header`] parses and validates the fixed header.
//! * [`tga_get_footer`] checks the tail of the file for the footer. Old
//!   files just don't have one, so that's an `Option`, not an error.
//! * [`tga_try_bitmap_rgba`] decodes the pixels (requires the `alloc`
//!   feature).
//!
//! ## Limitations
//!
//! Color-mapped files are not resolved against their palette: the index
//! bytes are consumed with the same per-depth rules as direct color data and
//! come out as if they *were* color data. Footer offsets are reported as raw
//! numbers and never chased. 15/16-bit channel values are emitted in their
//! native `0..=31` range without rescaling to `0..=255`.

use bitfrob::u8_get_bit;

use crate::{parser_helpers::*, ImagoError};

#[cfg(feature = "alloc")]
use crate::{bitmap::Bitmap, pixels::RGBA8};
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use bitfrob::{u16_get_value, u8_get_value};

/// Size of the fixed TGA header.
pub const TGA_HEADER_SIZE: usize = 18;

/// Size of the optional TGA file footer.
pub const TGA_FOOTER_SIZE: usize = 26;

/// The signature bytes within a TGA footer (followed by `b"."` and a NUL).
pub const TGA_FOOTER_SIGNATURE: [u8; 16] = *b"TRUEVISION-XFILE";

/// What kind of image data a TGA file holds, and how it's stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TgaDataType {
  /// The file carries no pixel data at all.
  NoImage,
  /// Palette indexes, uncompressed.
  ColorMapped,
  /// Direct color, uncompressed.
  Rgb,
  /// Grayscale, uncompressed.
  BlackAndWhite,
  /// Palette indexes, run-length encoded.
  ColorMappedRle,
  /// Direct color, run-length encoded.
  RgbRle,
  /// Grayscale, run-length encoded.
  BlackAndWhiteRle,
}
impl TgaDataType {
  /// The data type for a raw `data_type_code` header byte, if it's one we
  /// know.
  #[inline]
  #[must_use]
  pub const fn from_u8(u: u8) -> Option<Self> {
    match u {
      0 => Some(Self::NoImage),
      1 => Some(Self::ColorMapped),
      2 => Some(Self::Rgb),
      3 => Some(Self::BlackAndWhite),
      9 => Some(Self::ColorMappedRle),
      10 => Some(Self::RgbRle),
      11 => Some(Self::BlackAndWhiteRle),
      _ => None,
    }
  }

  /// If the pixel data of this type is run-length encoded.
  ///
  /// Grayscale "compressed" files (type 11) are *not* packeted like types 9
  /// and 10, so they don't count here.
  #[inline]
  #[must_use]
  pub const fn is_rle(self) -> bool {
    matches!(self, Self::ColorMappedRle | Self::RgbRle)
  }
}

/// Header data from a TGA file.
///
/// All multi-byte fields are little-endian in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TgaHeader {
  /// Length of the identification string that follows the fixed header.
  pub id_length: u8,
  /// 0 when there's no color map; other small values declare one.
  pub color_map_type: u8,
  /// How the pixel data is stored.
  pub data_type: TgaDataType,
  /// First color map entry.
  pub color_map_origin: u16,
  /// Number of color map entries.
  pub color_map_length: u16,
  /// Bits per color map entry.
  pub color_map_depth: u8,
  /// Lower-left x of the image on its intended screen.
  pub x_origin: u16,
  /// Lower-left y of the image on its intended screen.
  pub y_origin: u16,
  /// Image width in pixels.
  pub width: u16,
  /// Image height in pixels.
  pub height: u16,
  /// Bits per pixel: 15, 16, 24, or 32.
  pub bits_per_pixel: u8,
  /// Attribute bits, interlacing, and the row order flag.
  pub image_descriptor: u8,
}
impl TgaHeader {
  /// Total header size in bytes, identification string included.
  #[inline]
  #[must_use]
  pub const fn header_size(&self) -> usize {
    TGA_HEADER_SIZE + self.id_length as usize
  }

  /// If the file stores its pixel rows top first (otherwise bottom first).
  ///
  /// Either way [`tga_try_bitmap_rgba`] hands back rows with the visual top
  /// row first; this flag only changes which file row lands where.
  #[inline]
  #[must_use]
  pub fn stored_top_to_bottom(&self) -> bool {
    u8_get_bit(3, self.image_descriptor)
  }
}

/// Pulls the header off the front of a TGA data stream.
///
/// On success you get the header and the rest of the bytes, positioned just
/// past the identification string.
///
/// TGA has no magic number, so "is this even TGA?" is answered by field
/// plausibility: an unknown data type code, a color map type outside
/// `{0,1,2,3,9,10,11}`, or a bit depth outside `{15,16,24,32}` all give
/// [`ImagoError::NotThisFormat`], as does a buffer too short to hold the
/// fixed header.
#[inline]
pub fn tga_get_header(bytes: &[u8]) -> Result<(TgaHeader, &[u8]), ImagoError> {
  let (a, rest) =
    try_pull_byte_array::<TGA_HEADER_SIZE>(bytes).map_err(|_| ImagoError::NotThisFormat)?;
  let data_type = TgaDataType::from_u8(a[2]).ok_or(ImagoError::NotThisFormat)?;
  let header = TgaHeader {
    id_length: a[0],
    color_map_type: a[1],
    data_type,
    color_map_origin: u16_le(&a[3..5]),
    color_map_length: u16_le(&a[5..7]),
    color_map_depth: a[7],
    x_origin: u16_le(&a[8..10]),
    y_origin: u16_le(&a[10..12]),
    width: u16_le(&a[12..14]),
    height: u16_le(&a[14..16]),
    bits_per_pixel: a[16],
    image_descriptor: a[17],
  };
  if !matches!(header.color_map_type, 0..=3 | 9..=11)
    || !matches!(header.bits_per_pixel, 15 | 16 | 24 | 32)
  {
    return Err(ImagoError::NotThisFormat);
  }
  let rest = if header.id_length > 0 {
    rest.get(usize::from(header.id_length)..).ok_or(ImagoError::Truncated)?
  } else {
    rest
  };
  Ok((header, rest))
}

/// The identification string following the fixed header, as text.
///
/// `None` if the bytes don't reach or the field isn't UTF-8. A zero-length
/// field gives `Some("")`.
#[inline]
#[must_use]
pub fn tga_get_id<'b>(bytes: &'b [u8], header: &TgaHeader) -> Option<&'b str> {
  let span = bytes.get(TGA_HEADER_SIZE..TGA_HEADER_SIZE + usize::from(header.id_length))?;
  core::str::from_utf8(span).ok()
}

/// Offsets held in a TGA file footer.
///
/// These are raw byte offsets from the start of the file. This crate reports
/// them but never reads what they point at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TgaFooter {
  /// Offset of the extension area, 0 when there isn't one.
  pub extension_area_offset: u32,
  /// Offset of the developer directory, 0 when there isn't one.
  pub developer_directory_offset: u32,
}

/// Checks the tail of the buffer for the "new TGA" footer.
///
/// The footer is the last 26 bytes of the file when bytes 8..24 of that
/// window spell `TRUEVISION-XFILE`, followed by a `.` and a NUL. Files from
/// before the 1989 revision simply don't have it, so absence is `None`
/// rather than an error, and it's entirely independent of whether the rest
/// of the file parses.
#[inline]
#[must_use]
pub fn tga_get_footer(bytes: &[u8]) -> Option<TgaFooter> {
  let tail = bytes.get(bytes.len().checked_sub(TGA_FOOTER_SIZE)?..)?;
  if tail[8..24] == TGA_FOOTER_SIGNATURE && tail[24] == b'.' && tail[25] == 0 {
    Some(TgaFooter {
      extension_area_offset: u32_le(&tail[0..4]),
      developer_directory_offset: u32_le(&tail[4..8]),
    })
  } else {
    None
  }
}

/// Decodes one pixel of the given bit depth off the front of the bytes.
///
/// 32bpp takes the four bytes as r,g,b,a in file order; 24bpp takes three as
/// r,g,b with full alpha; 15/16bpp reads one little-endian word and splits
/// out three 5-bit fields, which stay in the `0..=31` range.
#[cfg(feature = "alloc")]
fn tga_pull_pixel(bytes: &[u8], bits_per_pixel: u8) -> Result<(RGBA8, &[u8]), ImagoError> {
  Ok(match bits_per_pixel {
    32 => {
      let ([r, g, b, a], rest) = try_pull_byte_array::<4>(bytes)?;
      (RGBA8 { r, g, b, a }, rest)
    }
    24 => {
      let ([r, g, b], rest) = try_pull_byte_array::<3>(bytes)?;
      (RGBA8 { r, g, b, a: 255 }, rest)
    }
    _ => {
      let (a, rest) = try_pull_byte_array::<2>(bytes)?;
      let word = u16_le(&a);
      let pixel = RGBA8 {
        r: u16_get_value(10, 14, word) as u8,
        g: u16_get_value(5, 9, word) as u8,
        b: u16_get_value(0, 4, word) as u8,
        a: 255,
      };
      (pixel, rest)
    }
  })
}

/// Run-length packet state, private to one decode call.
///
/// A packet's control byte has the repeat flag in the high bit and the
/// remaining count (minus one) in the low 7 bits. A repeated packet decodes
/// one pixel up front and replays it; a raw packet decodes a fresh pixel per
/// slot.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Copy, Default)]
struct TgaRleState {
  count: u8,
  repeat: bool,
  pixel: RGBA8,
}
#[cfg(feature = "alloc")]
impl TgaRleState {
  fn next_pixel<'b>(
    &mut self, bytes: &'b [u8], bits_per_pixel: u8,
  ) -> Result<(RGBA8, &'b [u8]), ImagoError> {
    let mut rest = bytes;
    if self.count == 0 {
      let ([control], tail) = try_pull_byte_array::<1>(rest)?;
      rest = tail;
      self.repeat = u8_get_bit(7, control);
      self.count = u8_get_value(0, 6, control) + 1;
      if self.repeat {
        let (pixel, tail) = tga_pull_pixel(rest, bits_per_pixel)?;
        self.pixel = pixel;
        rest = tail;
      }
    }
    self.count -= 1;
    if self.repeat {
      Ok((self.pixel, rest))
    } else {
      tga_pull_pixel(rest, bits_per_pixel)
    }
  }
}

/// Decodes TGA bytes into an RGBA bitmap.
///
/// The output is always 4 channels with the visual top row first, whichever
/// row order the file stored.
///
/// Color-mapped data types decode, but their palette indexes are taken as if
/// they were color values (see the module docs).
///
/// ## Failure
/// * [`ImagoError::NotThisFormat`] when the header doesn't validate.
/// * [`ImagoError::Unsupported`] for the "no image data" type.
/// * [`ImagoError::Truncated`] when the pixel data runs out early.
/// * [`ImagoError::DimensionsTooLarge`] when either dimension exceeds
///   17,000.
#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub fn tga_try_bitmap_rgba(bytes: &[u8]) -> Result<Bitmap<RGBA8>, ImagoError> {
  let (header, mut rest) = tga_get_header(bytes)?;
  if header.data_type == TgaDataType::NoImage {
    return Err(ImagoError::Unsupported);
  }
  let width = u32::from(header.width);
  let height = u32::from(header.height);
  if width > MAX_DIMENSION || height > MAX_DIMENSION {
    return Err(ImagoError::DimensionsTooLarge);
  }
  let pixel_count = (width as usize) * (height as usize);
  let mut pixels: Vec<RGBA8> = Vec::new();
  pixels.try_reserve_exact(pixel_count)?;
  //
  let rle_active = header.data_type.is_rle();
  let mut rle = TgaRleState::default();
  for _ in 0..pixel_count {
    let (pixel, tail) = if rle_active {
      rle.next_pixel(rest, header.bits_per_pixel)?
    } else {
      tga_pull_pixel(rest, header.bits_per_pixel)?
    };
    rest = tail;
    pixels.push(pixel);
  }
  let mut bitmap = Bitmap { width, height, pixels };
  if header.stored_top_to_bottom() {
    bitmap.vertical_flip();
  }
  Ok(bitmap)
}
