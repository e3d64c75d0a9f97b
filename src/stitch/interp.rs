/// Piecewise-linear interpolation of `(xs, ys)` at `x`.
///
/// `xs` must be sorted ascending and non-empty. Queries outside the domain
/// clamp to the first/last y. With repeated x values the first match wins.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }

    // xs[0] < x < xs[last], so 1 <= hi <= last
    let hi = xs.partition_point(|&v| v < x);
    if xs[hi] == x {
        return ys[hi];
    }
    let lo = hi - 1;
    let frac = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + (ys[hi] - ys[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    const XS: [f64; 3] = [1.0, 2.0, 4.0];
    const YS: [f64; 3] = [10.0, 20.0, 0.0];

    #[test]
    fn clamps_outside_domain() {
        assert_eq!(interp(0.0, &XS, &YS), 10.0);
        assert_eq!(interp(9.0, &XS, &YS), 0.0);
    }

    #[test]
    fn hits_knots_exactly() {
        assert_eq!(interp(2.0, &XS, &YS), 20.0);
        assert_eq!(interp(4.0, &XS, &YS), 0.0);
    }

    #[test]
    fn blends_between_knots() {
        assert!((interp(1.5, &XS, &YS) - 15.0).abs() < 1e-12);
        assert!((interp(3.0, &XS, &YS) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn single_knot_is_constant() {
        assert_eq!(interp(-5.0, &[3.0], &[7.0]), 7.0);
        assert_eq!(interp(5.0, &[3.0], &[7.0]), 7.0);
    }
}
