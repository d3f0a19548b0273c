use imago::{
  qoi::{qoi_get_header, qoi_signature_is_correct, qoi_try_bitmap_rgba, QOI_END_MARKER, QOI_MAGIC},
  ImagoError, RGBA8,
};

fn px(r: u8, g: u8, b: u8, a: u8) -> RGBA8 {
  RGBA8 { r, g, b, a }
}

/// Builds a QOI byte stream around the given opcode bytes.
fn qoi_bytes(width: u32, height: u32, ops: &[u8], end_marker: bool) -> Vec<u8> {
  let mut v = Vec::new();
  v.extend_from_slice(&QOI_MAGIC);
  v.extend_from_slice(&width.to_be_bytes());
  v.extend_from_slice(&height.to_be_bytes());
  v.push(4);
  v.push(0);
  v.extend_from_slice(ops);
  if end_marker {
    v.extend_from_slice(&QOI_END_MARKER);
  }
  v
}

#[test]
fn test_qoi_header_parse() {
  let v = qoi_bytes(300, 7, &[], true);
  assert!(qoi_signature_is_correct(&v));
  let (header, rest) = qoi_get_header(&v).unwrap();
  assert_eq!(header.width, 300);
  assert_eq!(header.height, 7);
  assert_eq!(header.channels, 4);
  assert_eq!(header.colorspace, 0);
  assert_eq!(rest.len(), v.len() - 14);
  //
  assert_eq!(qoi_get_header(b"qoib\0\0\0\x01\0\0\0\x01\x04\0"), Err(ImagoError::NotThisFormat));
  assert!(!qoi_signature_is_correct(b"qo"));
}

#[test]
fn test_qoi_two_rgba_pixels() {
  // 2x1, two full RGBA opcodes, then the end marker.
  let v = qoi_bytes(
    2,
    1,
    &[0xFF, 0x10, 0x20, 0x30, 0x40, 0xFF, 0x50, 0x60, 0x70, 0x80],
    true,
  );
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(bitmap.width, 2);
  assert_eq!(bitmap.height, 1);
  assert_eq!(bitmap.pixels, vec![px(16, 32, 48, 64), px(80, 96, 112, 128)]);
}

#[test]
fn test_qoi_rgb_carries_alpha_forward() {
  // The first RGB op inherits the seed pixel's 255 alpha, later ones inherit
  // whatever an RGBA op set.
  let v = qoi_bytes(
    3,
    1,
    &[0xFE, 1, 2, 3, 0xFF, 9, 9, 9, 77, 0xFE, 4, 5, 6],
    true,
  );
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(bitmap.pixels, vec![px(1, 2, 3, 255), px(9, 9, 9, 77), px(4, 5, 6, 77)]);
}

#[test]
fn test_qoi_index_cache_sees_runs_and_cache_hits() {
  // Manual trace. The previous pixel is cached before *every* opcode:
  // * seed {0,0,0,255} hashes to slot 53, cached before the first op.
  // * {10,20,30,255} hashes to slot 9, cached before the RUN and again
  //   before the first INDEX.
  // So INDEX 53 recalls the seed pixel, and INDEX 9 recalls the RGB pixel,
  // even though neither was "stored" by any explicit opcode.
  let run_2: u8 = 0b11_000001;
  let index_53: u8 = 0b00_000000 | 53;
  let index_9: u8 = 0b00_000000 | 9;
  let v = qoi_bytes(5, 1, &[0xFE, 10, 20, 30, run_2, index_53, index_9], true);
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(
    bitmap.pixels,
    vec![
      px(10, 20, 30, 255),
      px(10, 20, 30, 255),
      px(10, 20, 30, 255),
      px(0, 0, 0, 255),
      px(10, 20, 30, 255),
    ]
  );
}

#[test]
fn test_qoi_diff_wraps_modulo_256() {
  // All three 2-bit fields zero means a delta of -2 on every channel, which
  // wraps the seed pixel's 0 channels down to 254. The all-ones fields mean
  // +1 each.
  let diff_minus2: u8 = 0b01_000000;
  let diff_plus1: u8 = 0b01_111111;
  let v = qoi_bytes(2, 1, &[diff_minus2, diff_plus1], true);
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(bitmap.pixels, vec![px(254, 254, 254, 255), px(255, 255, 255, 255)]);
}

#[test]
fn test_qoi_luma_wraps_modulo_256() {
  // op 1: green delta +1, dr-dg and db-dg both -8: {-7, 1, -7} from the
  // seed, wrapping r and b up to 249.
  // op 2: green delta -32, dr-dg and db-dg both +7.
  let v = qoi_bytes(2, 1, &[0b10_100001, 0x00, 0b10_000000, 0xFF], true);
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(bitmap.pixels, vec![px(249, 1, 249, 255), px(224, 225, 224, 255)]);
}

#[test]
fn test_qoi_zero_tag_is_a_run_unless_it_opens_the_end_marker() {
  // Here the 0x00 tag is followed by an RGB opcode, not seven zeros and a
  // one, so it must decode as a run of length 1.
  let v = qoi_bytes(3, 1, &[0xFF, 1, 2, 3, 4, 0x00, 0xFE, 9, 8, 7], true);
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(bitmap.pixels, vec![px(1, 2, 3, 4), px(1, 2, 3, 4), px(9, 8, 7, 4)]);
}

#[test]
fn test_qoi_end_marker_does_not_emit_a_run_pixel() {
  // The stream covers only 1 of the 2 declared pixels before the end
  // marker. The marker's leading 0x00 must terminate decoding, not emit
  // another copy of the previous pixel, so the second slot stays zeroed.
  let v = qoi_bytes(2, 1, &[0xFF, 1, 2, 3, 4], true);
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(bitmap.pixels, vec![px(1, 2, 3, 4), px(0, 0, 0, 0)]);
}

#[test]
fn test_qoi_decodes_fully_without_end_marker() {
  // Opcodes alone cover the declared pixel count; the loop bound has to
  // finish the image without ever needing the marker.
  let v = qoi_bytes(
    2,
    1,
    &[0xFF, 0x10, 0x20, 0x30, 0x40, 0xFF, 0x50, 0x60, 0x70, 0x80],
    false,
  );
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(bitmap.pixels, vec![px(16, 32, 48, 64), px(80, 96, 112, 128)]);
}

#[test]
fn test_qoi_truncated_opcode_is_an_error() {
  // RGBA opcode with only 2 of its 4 payload bytes.
  let v = qoi_bytes(1, 1, &[0xFF, 1, 2], false);
  assert_eq!(qoi_try_bitmap_rgba(&v), Err(ImagoError::Truncated));
  // LUMA opcode missing its payload byte.
  let v = qoi_bytes(1, 1, &[0b10_100001], false);
  assert_eq!(qoi_try_bitmap_rgba(&v), Err(ImagoError::Truncated));
}

#[test]
fn test_qoi_run_clamps_to_declared_pixel_count() {
  // A run of 62 against a 2 pixel image must stop at the image size.
  let run_62: u8 = 0b11_111101;
  let v = qoi_bytes(2, 1, &[0xFE, 5, 5, 5, run_62], true);
  let bitmap = qoi_try_bitmap_rgba(&v).unwrap();
  assert_eq!(bitmap.pixels, vec![px(5, 5, 5, 255), px(5, 5, 5, 255)]);
}

#[test]
fn test_qoi_dimension_cap() {
  let v = qoi_bytes(20_000, 1, &[], true);
  assert_eq!(qoi_try_bitmap_rgba(&v), Err(ImagoError::DimensionsTooLarge));
}
