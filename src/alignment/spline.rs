//! Natural cubic spline with linear extrapolation.

/// Interpolating natural cubic spline (zero curvature at both ends).
#[derive(Clone, Debug)]
pub struct NaturalSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots.
    ms: Vec<f64>,
}

impl NaturalSpline {
    /// Builds the spline through `knots`, which must have strictly increasing
    /// abscissae. Returns `None` with fewer than two knots.
    pub fn new(knots: &[(f64, f64)]) -> Option<Self> {
        if knots.len() < 2 || knots.windows(2).any(|w| w[1].0 <= w[0].0) {
            return None;
        }
        let xs: Vec<f64> = knots.iter().map(|k| k.0).collect();
        let ys: Vec<f64> = knots.iter().map(|k| k.1).collect();
        let ms = second_derivatives(&xs, &ys);
        Some(Self { xs, ys, ms })
    }

    pub fn value_at(&self, x: f64) -> f64 {
        let n = self.xs.len() - 1;
        if x < self.xs[0] {
            return self.ys[0] + self.derivative_inside(0, self.xs[0]) * (x - self.xs[0]);
        }
        if x > self.xs[n] {
            return self.ys[n] + self.derivative_inside(n - 1, self.xs[n]) * (x - self.xs[n]);
        }
        let i = self.interval(x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let h = x1 - x0;
        let a = x1 - x;
        let b = x - x0;
        self.ms[i] * a * a * a / (6.0 * h)
            + self.ms[i + 1] * b * b * b / (6.0 * h)
            + (self.ys[i] / h - self.ms[i] * h / 6.0) * a
            + (self.ys[i + 1] / h - self.ms[i + 1] * h / 6.0) * b
    }

    pub fn derivative_at(&self, x: f64) -> f64 {
        let n = self.xs.len() - 1;
        if x <= self.xs[0] {
            return self.derivative_inside(0, self.xs[0]);
        }
        if x >= self.xs[n] {
            return self.derivative_inside(n - 1, self.xs[n]);
        }
        self.derivative_inside(self.interval(x), x)
    }

    fn interval(&self, x: f64) -> usize {
        let idx = self.xs.partition_point(|&k| k <= x);
        idx.saturating_sub(1).min(self.xs.len() - 2)
    }

    fn derivative_inside(&self, i: usize, x: f64) -> f64 {
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let h = x1 - x0;
        let a = x1 - x;
        let b = x - x0;
        -self.ms[i] * a * a / (2.0 * h) + self.ms[i + 1] * b * b / (2.0 * h)
            + (self.ys[i + 1] - self.ys[i]) / h
            - (self.ms[i + 1] - self.ms[i]) * h / 6.0
    }
}

/// Solves the tridiagonal system of a natural spline (Thomas algorithm).
fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut ms = vec![0.0; n];
    if n < 3 {
        return ms;
    }
    let inner = n - 2;
    let mut diag = vec![0.0; inner];
    let mut upper = vec![0.0; inner];
    let mut rhs = vec![0.0; inner];
    for k in 0..inner {
        let i = k + 1;
        let h0 = xs[i] - xs[i - 1];
        let h1 = xs[i + 1] - xs[i];
        diag[k] = 2.0 * (h0 + h1);
        upper[k] = h1;
        rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
    }
    // Forward sweep; the sub-diagonal entry of row k is h0 = xs[k+1] - xs[k].
    for k in 1..inner {
        let lower = xs[k + 1] - xs[k];
        let w = lower / diag[k - 1];
        diag[k] -= w * upper[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }
    let mut sol = vec![0.0; inner];
    sol[inner - 1] = rhs[inner - 1] / diag[inner - 1];
    for k in (0..inner - 1).rev() {
        sol[k] = (rhs[k] - upper[k] * sol[k + 1]) / diag[k];
    }
    ms[1..n - 1].copy_from_slice(&sol);
    ms
}
