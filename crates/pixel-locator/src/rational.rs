//! Rational function models `g(x, y) = P(x, y) / Q(x, y)`.
//!
//! `P` and `Q` are bivariate polynomials of total degree 0 to 4. The
//! constant term of `Q` is fixed to 1, which makes the least-squares fit
//! linear in the remaining coefficients.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Highest polynomial degree tried by [`RationalFunctionModel::find_best`].
pub const MAX_DEGREE: usize = 4;

/// Number of monomials of total degree `<= degree` in two variables.
pub fn term_count_p(degree: usize) -> usize {
    (degree + 1) * (degree + 2) / 2
}

/// Number of free denominator coefficients (constant term excluded).
pub fn term_count_q(degree: usize) -> usize {
    term_count_p(degree) - 1
}

/// A fitted rational function of two variables.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalFunctionModel {
    degree_p: usize,
    degree_q: usize,
    numerator: Vec<f64>,
    denominator: Vec<f64>,
    x_offset: f64,
    x_scale: f64,
    y_offset: f64,
    y_scale: f64,
    rmse: f64,
}

impl RationalFunctionModel {
    /// Least-squares fit of `g ≈ P(x, y) / Q(x, y)`.
    ///
    /// Returns `None` if there are fewer samples than coefficients or the
    /// fitted model does not reproduce the samples with a finite error.
    pub fn fit(degree_p: usize, degree_q: usize, x: &[f64], y: &[f64], g: &[f64]) -> Option<Self> {
        let n = g.len();
        let tp = term_count_p(degree_p);
        let tq = term_count_q(degree_q);
        if x.len() != n || y.len() != n || n < tp + tq || degree_p > MAX_DEGREE || degree_q > degree_p {
            return None;
        }

        let (x_offset, x_scale) = normalisation(x);
        let (y_offset, y_scale) = normalisation(y);

        let mut terms = Vec::with_capacity(tp);
        let mut rows = Vec::with_capacity(n * (tp + tq));
        for i in 0..n {
            monomials((x[i] - x_offset) / x_scale, (y[i] - y_offset) / y_scale, degree_p, &mut terms);
            rows.extend_from_slice(&terms);
            rows.extend(terms[1..=tq].iter().map(|t| -g[i] * t));
        }
        let a = DMatrix::from_row_slice(n, tp + tq, &rows);
        let b = DVector::from_column_slice(g);

        let svd = a.svd(true, true);
        let eps = svd.singular_values.max() * 1e-12;
        let solution = svd.solve(&b, eps).ok()?;

        let mut model = Self {
            degree_p,
            degree_q,
            numerator: solution.rows(0, tp).iter().copied().collect(),
            denominator: solution.rows(tp, tq).iter().copied().collect(),
            x_offset,
            x_scale,
            y_offset,
            y_scale,
            rmse: f64::NAN,
        };

        let squared: f64 = (0..n).map(|i| (model.value(x[i], y[i]) - g[i]).powi(2)).sum();
        model.rmse = (squared / n as f64).sqrt();
        model.rmse.is_finite().then_some(model)
    }

    /// Model with the smallest error over all degree pairs `Q <= P <= 4`.
    ///
    /// Stops at the first model whose RMSE is below `accuracy`.
    pub fn find_best(x: &[f64], y: &[f64], g: &[f64], accuracy: f64) -> Option<Self> {
        let mut best: Option<Self> = None;
        for degree_p in 0..=MAX_DEGREE {
            for degree_q in 0..=degree_p {
                if g.len() < term_count_p(degree_p) + term_count_q(degree_q) {
                    continue;
                }
                let Some(model) = Self::fit(degree_p, degree_q, x, y, g) else {
                    continue;
                };
                if best.as_ref().map_or(true, |b| model.rmse < b.rmse) {
                    best = Some(model);
                }
                if let Some(b) = &best {
                    if b.rmse < accuracy {
                        trace!(degree_p, degree_q, rmse = b.rmse, "Model reached accuracy");
                        return best;
                    }
                }
            }
        }
        best
    }

    /// Evaluate the model.
    pub fn value(&self, x: f64, y: f64) -> f64 {
        let u = (x - self.x_offset) / self.x_scale;
        let v = (y - self.y_offset) / self.y_scale;

        let mut p = 0.0;
        let mut q = 1.0;
        let mut index = 0;
        for k in 0..=self.degree_p {
            for j in 0..=k {
                let term = u.powi((k - j) as i32) * v.powi(j as i32);
                p += self.numerator[index] * term;
                if index > 0 && index <= self.denominator.len() {
                    q += self.denominator[index - 1] * term;
                }
                index += 1;
            }
        }
        p / q
    }

    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    pub fn degree_p(&self) -> usize {
        self.degree_p
    }

    pub fn degree_q(&self) -> usize {
        self.degree_q
    }
}

/// Monomials `1, x, y, x², xy, y², ...` up to total degree `degree`.
fn monomials(x: f64, y: f64, degree: usize, out: &mut Vec<f64>) {
    out.clear();
    for k in 0..=degree {
        for j in 0..=k {
            out.push(x.powi((k - j) as i32) * y.powi(j as i32));
        }
    }
}

/// Mean and half range of the values, used to map inputs to about [-1, 1].
fn normalisation(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 1.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let spread = values.iter().fold(0.0_f64, |acc, v| acc.max((v - mean).abs()));
    (mean, if spread > 0.0 { spread } else { 1.0 })
}
