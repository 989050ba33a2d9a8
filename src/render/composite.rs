use crate::foundation::error::{PosterError, PosterResult};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type StraightRgba8 = [u8; 4];

/// Straight-alpha source-over.
pub fn over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // Output alpha scaled by 255.
    let out_a = sa * 255 + da * inv;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((num + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = ((out_a + 127) / 255).min(255) as u8;
    out
}

/// Opacity as an alpha cap in 0..=255.
pub fn opacity_cap(opacity: f32) -> u8 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

/// Composite `src` onto `dst` with every source alpha capped at `opacity`.
///
/// Unlike a multiplied layer opacity, a pixel already more transparent than the cap keeps its
/// own alpha.
pub fn composite_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> PosterResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PosterError::render(
            "composite_in_place expects equal-length rgba8 buffers",
        ));
    }
    let cap = opacity_cap(opacity);
    if cap == 0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3].min(cap);
        if a == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], a]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Convert `vello_cpu`'s premultiplied output to straight alpha, in place.
pub fn unpremultiply_in_place(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        match a {
            0 => px.copy_from_slice(&[0, 0, 0, 0]),
            255 => {}
            _ => {
                for c in &mut px[..3] {
                    *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
