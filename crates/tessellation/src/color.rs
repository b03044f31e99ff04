//! Packed vertex colors.
//!
//! Colors are stored in a `u32` holding the bytes `[r, g, b, a]` in little endian order, which
//! is what `Unorm8x4` vertex attributes expect. Stroke and fill colors are expected to be
//! premultiplied by alpha: anti-aliasing fringes fade to [`TRANSPARENT`] (every channel
//! zeroed) and rely on the blending of premultiplied colors.

/// A packed RGBA color, see the [module documentation](index.html).
pub type PackedColor = u32;

/// Fully transparent, in premultiplied alpha.
pub const TRANSPARENT: PackedColor = 0;

/// Opaque white.
pub const WHITE: PackedColor = 0xFFFF_FFFF;

/// Packs four 8 bits channels.
#[inline]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> PackedColor {
    u32::from_le_bytes([r, g, b, a])
}

/// Returns the `[r, g, b, a]` channels of a packed color.
#[inline]
pub const fn unpack_rgba(color: PackedColor) -> [u8; 4] {
    color.to_le_bytes()
}

/// Packs a straight alpha color after multiplying its color channels by alpha.
pub fn pack_premultiplied(r: u8, g: u8, b: u8, a: u8) -> PackedColor {
    let mul = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
    pack_rgba(mul(r), mul(g), mul(b), a)
}

#[test]
fn test_pack_rgba() {
    let c = pack_rgba(1, 2, 3, 4);
    assert_eq!(c, 0x0403_0201);
    assert_eq!(unpack_rgba(c), [1, 2, 3, 4]);
    assert_eq!(bytemuck::bytes_of(&c), &[1, 2, 3, 4]);
    assert_eq!(pack_rgba(255, 255, 255, 255), WHITE);
    assert_eq!(pack_rgba(0, 0, 0, 0), TRANSPARENT);
}

#[test]
fn test_premultiply() {
    assert_eq!(pack_premultiplied(255, 128, 0, 255), pack_rgba(255, 128, 0, 255));
    assert_eq!(pack_premultiplied(255, 255, 255, 0), TRANSPARENT);
    assert_eq!(unpack_rgba(pack_premultiplied(200, 100, 50, 128)), [100, 50, 25, 128]);
}
