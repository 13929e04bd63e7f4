//! Sub-sample interpolation.
//!
//! 4-point, 3rd-order Hermite (Catmull-Rom) between `x0` and `x1`, using one
//! neighbour on each side for the slopes:
//!
//! ```text
//!   xm1      x0  ·  x1      x2
//!    •───────•──···──•───────•
//!            0  frac 1
//! ```
//!
//! At `frac = 0` it returns `x0` exactly, at `frac = 1` it returns `x1`.

#[inline]
pub fn hermite4(frac: f32, xm1: f32, x0: f32, x1: f32, x2: f32) -> f32 {
    let c0 = x0;
    let c1 = 0.5 * (x1 - xm1);
    let c2 = xm1 - 2.5 * x0 + 2.0 * x1 - 0.5 * x2;
    let c3 = 0.5 * (x2 - xm1) + 1.5 * (x0 - x1);

    ((c3 * frac + c2) * frac + c1) * frac + c0
}

/// Plain two-point linear interpolation.
#[inline]
pub fn linear(frac: f32, x0: f32, x1: f32) -> f32 {
    x0 + (x1 - x0) * frac
}
