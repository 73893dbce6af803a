use crate::foundation::error::{FrameError, FrameResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8: `src + dst * (1 - src.a)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255 - u16::from(sa);
            let mut out = [0u8; 4];
            for (o, (&s, &d)) in out.iter_mut().zip(src.iter().zip(dst.iter())) {
                *o = s.saturating_add(mul_div255(d, inv));
            }
            out
        }
    }
}

/// Blend a rendered premultiplied RGBA8 layer onto `dst`, pixel by pixel.
pub fn over_in_place(dst: &mut [u8], layer: &[u8]) -> FrameResult<()> {
    if dst.len() != layer.len() || !dst.len().is_multiple_of(4) {
        return Err(FrameError::drawing(format!(
            "layer of {} bytes cannot be blended onto {} bytes of rgba8",
            layer.len(),
            dst.len()
        )));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn mul_div255(c: u8, f: u16) -> u8 {
    ((u32::from(c) * u32::from(f) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
