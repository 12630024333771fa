//! Clipping stages that keep the summed mix inside full scale.

/// Soft clipping with `tanh`.
///
/// Nearly linear for small inputs and saturates smoothly towards ±1, so a
/// hot mix is squashed rather than folded or wrapped. Output is always
/// strictly inside (-1, 1) for finite input.
#[inline]
pub fn soft_clip(x: f64) -> f64 {
    x.tanh()
}

/// Hard clamp to [-1, 1]; NaN passes through unchanged.
#[inline]
pub fn hard_clip(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}
