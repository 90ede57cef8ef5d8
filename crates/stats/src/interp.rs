//! Piecewise-linear interpolation over a sorted table.

/// Behaviour for queries outside the table's x-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// Out-of-range queries return `NaN`.
    Fill,
    /// Out-of-range queries continue the first or last segment.
    Extrapolate,
}

/// Linearly interpolates `x` over the table `(xs, ys)`.
///
/// `xs` must be sorted ascending and have the same length as `ys`. Ties in
/// `xs` are allowed: a query equal to a tied value lands on the segment
/// ending at its first occurrence (left insertion point), and a zero-width
/// segment returns its lower `y`.
///
/// Returns `NaN` for an empty table or a `NaN` query. A single-point table
/// returns its `y` for an exact hit, otherwise `NaN` under
/// [`Bounds::Fill`] and the constant `y` under [`Bounds::Extrapolate`].
pub fn interp_linear(xs: &[f64], ys: &[f64], x: f64, bounds: Bounds) -> f64 {
    debug_assert_eq!(xs.len(), ys.len(), "interp_linear: xs and ys differ in length");
    let n = xs.len().min(ys.len());
    if n == 0 || x.is_nan() {
        return f64::NAN;
    }

    if n == 1 {
        return match bounds {
            Bounds::Extrapolate => ys[0],
            Bounds::Fill if x == xs[0] => ys[0],
            Bounds::Fill => f64::NAN,
        };
    }

    if bounds == Bounds::Fill && (x < xs[0] || x > xs[n - 1]) {
        return f64::NAN;
    }

    let hi = xs[..n].partition_point(|&v| v < x).clamp(1, n - 1);
    let lo = hi - 1;

    let dx = xs[hi] - xs[lo];
    if dx == 0.0 {
        return ys[lo];
    }
    ys[lo] + (x - xs[lo]) * (ys[hi] - ys[lo]) / dx
}
