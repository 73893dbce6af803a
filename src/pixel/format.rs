use std::fmt;

/// Memory layout of a single pixel.
///
/// The 32-bit formats hold premultiplied alpha. `Rgb565` has no alpha channel; colors written
/// into it are the premultiplied color composited over black.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Bytes `r, g, b, a` in memory order.
    Rgba8888,
    /// Bytes `b, g, r, a` in memory order.
    Bgra8888,
    /// Little-endian `u16` packed as `r5 << 11 | g6 << 5 | b5`.
    Rgb565,
}

impl PixelFormat {
    /// Every supported format, in a stable order.
    pub const ALL: [PixelFormat; 3] = [
        PixelFormat::Rgba8888,
        PixelFormat::Bgra8888,
        PixelFormat::Rgb565,
    ];

    /// Size of one pixel in bytes. All stride and offset math goes through here.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8888 | Self::Bgra8888 => 4,
            Self::Rgb565 => 2,
        }
    }

    #[inline]
    pub const fn has_alpha(self) -> bool {
        !matches!(self, Self::Rgb565)
    }

    /// Stable name used in scenario file names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rgba8888 => "Rgba8888",
            Self::Bgra8888 => "Bgra8888",
            Self::Rgb565 => "Rgb565",
        }
    }

    /// Parse a format name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Decode one pixel (`bytes.len() == bytes_per_pixel()`) into premultiplied RGBA8.
    #[inline]
    pub fn unpack(self, bytes: &[u8]) -> [u8; 4] {
        match self {
            Self::Rgba8888 => [bytes[0], bytes[1], bytes[2], bytes[3]],
            Self::Bgra8888 => [bytes[2], bytes[1], bytes[0], bytes[3]],
            Self::Rgb565 => {
                let v = u16::from_le_bytes([bytes[0], bytes[1]]);
                let r5 = ((v >> 11) & 0x1f) as u8;
                let g6 = ((v >> 5) & 0x3f) as u8;
                let b5 = (v & 0x1f) as u8;
                [
                    (r5 << 3) | (r5 >> 2),
                    (g6 << 2) | (g6 >> 4),
                    (b5 << 3) | (b5 >> 2),
                    255,
                ]
            }
        }
    }

    /// Encode premultiplied RGBA8 into one pixel of this format.
    #[inline]
    pub fn pack(self, premul: [u8; 4], out: &mut [u8]) {
        let [r, g, b, a] = premul;
        match self {
            Self::Rgba8888 => out[..4].copy_from_slice(&[r, g, b, a]),
            Self::Bgra8888 => out[..4].copy_from_slice(&[b, g, r, a]),
            Self::Rgb565 => {
                let v = (u16::from(quantize(r, 31)) << 11)
                    | (u16::from(quantize(g, 63)) << 5)
                    | u16::from(quantize(b, 31));
                out[..2].copy_from_slice(&v.to_le_bytes());
            }
        }
    }

    /// Raw pixel value as stored in memory, zero-extended to `u32` (little-endian).
    #[inline]
    pub fn read_raw(self, bytes: &[u8]) -> u32 {
        match self.bytes_per_pixel() {
            4 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            _ => u32::from(u16::from_le_bytes([bytes[0], bytes[1]])),
        }
    }

    /// Store a raw pixel value; bits above the pixel width are discarded.
    #[inline]
    pub fn write_raw(self, value: u32, out: &mut [u8]) {
        let bpp = self.bytes_per_pixel();
        out[..bpp].copy_from_slice(&value.to_le_bytes()[..bpp]);
    }

    /// Largest per-channel error a store/load through this format can introduce.
    pub const fn quantization_error(self) -> u8 {
        match self {
            Self::Rgba8888 | Self::Bgra8888 => 0,
            // 5-bit rounding plus bit replication on expansion.
            Self::Rgb565 => 8,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn quantize(c: u8, max: u16) -> u8 {
    ((u16::from(c) * max + 127) / 255) as u8
}

/// Convert premultiplied RGBA8 to straight alpha.
#[inline]
pub fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = px[3];
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => {
            let a16 = u16::from(a);
            let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8 };
            [un(px[0]), un(px[1]), un(px[2]), a]
        }
    }
}

/// Convert straight RGBA8 to premultiplied alpha.
#[inline]
pub fn premultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    if a == 255 {
        return px;
    }
    let pm = |c: u8| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
    [pm(px[0]), pm(px[1]), pm(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/format.rs"]
mod tests;
