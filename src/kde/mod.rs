//! Gaussian KDE with automatic bandwidth selection via the Improved
//! Sheather–Jones fixed point (spec.md §4.4).

use crate::algebra::{Expr, gaussian_pdf};
use crate::error::{MathError, MathResult};

/// The number of `γ_j` recursion stages (spec.md §4.4: "`l = 5` stages is
/// the recommended default").
const STAGES: usize = 5;

/// `ξ = ((6√2 − 3)/7)^{0.4}`, the fixed-point iteration's scale constant.
fn xi() -> f64 {
    ((6.0 * 2.0_f64.sqrt() - 3.0) / 7.0).powf(0.4)
}

/// Builds a Gaussian KDE over `samples` with `weights`, with bandwidth
/// chosen by the Improved Sheather–Jones fixed point, and returns it as a
/// boxed density function.
///
/// `samples` and `weights` must be the same length and `upper` must
/// exceed `lower`. The data is linearly remapped to `[0, 1]` for
/// bandwidth selection; the returned density is rescaled so it still
/// integrates to 1 over the original support.
///
/// # Errors
/// `MathError::InvalidInput` if `samples.len() != weights.len()`, the
/// sample set is empty, or `lower >= upper`.
pub fn gaussian_kde(
    samples: &[f64],
    weights: &[f64],
    lower: f64,
    upper: f64,
) -> MathResult<Box<dyn Fn(f64) -> f64 + Send + Sync>> {
    if samples.len() != weights.len() {
        return Err(MathError::InvalidInput("samples and weights must have equal length".to_owned()));
    }
    if samples.is_empty() {
        return Err(MathError::InvalidInput("samples must not be empty".to_owned()));
    }
    if !(upper > lower) {
        return Err(MathError::InvalidInput("upper must exceed lower".to_owned()));
    }

    let range = upper - lower;
    let remapped: Vec<f64> = samples.iter().map(|&s| (s - lower) / range).collect();
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Err(MathError::InvalidInput("weights must sum to a positive value".to_owned()));
    }

    let z = improved_sheather_jones(&remapped, weights, total_weight)?;
    let bandwidth = z.sqrt();

    let remapped = remapped;
    let weights = weights.to_vec();
    Ok(Box::new(move |x: f64| {
        let u = (x - lower) / range;
        let density: f64 = remapped
            .iter()
            .zip(weights.iter())
            .map(|(&xi_sample, &w)| w * gaussian_density(u, xi_sample, bandwidth))
            .sum::<f64>()
            / total_weight;
        density / range
    }))
}

/// Stub for the diffusion-PDE bandwidth selection path (spec.md §4.4 last
/// paragraph), explicitly incomplete and out of scope: "declared
/// experimental and its numerical correctness is an open question."
///
/// # Errors
/// Always returns `MathError::NotImplemented`.
pub fn diffusion_kde(
    _samples: &[f64],
    _weights: &[f64],
    _lower: f64,
    _upper: f64,
) -> MathResult<Box<dyn Fn(f64) -> f64 + Send + Sync>> {
    Err(MathError::NotImplemented("diffusion KDE bandwidth selection is unvalidated; see spec".to_owned()))
}

fn gaussian_density(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * std::f64::consts::TAU.sqrt())
}

/// Iterates `z ← ξ·γ_1(z)` until successive iterates differ by less than
/// a machine-precision tolerance, with at least 10 iterations.
fn improved_sheather_jones(samples: &[f64], weights: &[f64], total_weight: f64) -> MathResult<f64> {
    let n = samples.len();
    #[allow(clippy::cast_precision_loss, reason = "sample counts stay well within f64's exact integer range")]
    let n_f64 = n as f64;
    let mut z = (n_f64 * total_weight).recip().max(1e-6);
    let xi_const = xi();
    let mut iterations = 0;
    loop {
        let next = xi_const * gamma(1, z, samples, weights, total_weight)?;
        iterations += 1;
        let converged = (next - z).abs() < f64::EPSILON.sqrt() * next.abs().max(1.0);
        z = next;
        if converged && iterations >= 10 {
            break;
        }
        if iterations > 200 {
            break;
        }
    }
    Ok(z.max(f64::MIN_POSITIVE))
}

/// `γ_j(z)` recursively estimates the bandwidth at stage `j` from stage
/// `j + 1`, bottoming out at `STAGES` with a direct normal-reference
/// estimate (spec.md §4.4, Botev et al.).
fn gamma(j: usize, z: f64, samples: &[f64], weights: &[f64], total_weight: f64) -> MathResult<f64> {
    if j > STAGES {
        return Ok(z);
    }
    let next_z = gamma(j + 1, z, samples, weights, total_weight)?;
    let functional = squared_derivative_functional(j + 1, next_z, samples, weights, total_weight)?;
    if functional <= 0.0 {
        return Ok(z);
    }
    #[allow(clippy::cast_precision_loss, reason = "j is a tiny recursion depth, not a data-sized count")]
    let j_f64 = j as f64;
    let double_factorial = odd_double_factorial(j);
    let numerator = (1.0 + 2.0_f64.powf(-(j_f64 + 0.5))) / 3.0 * double_factorial;
    let denominator = total_weight * (std::f64::consts::PI / 2.0).sqrt() * functional;
    Ok((numerator / denominator).powf(2.0 / (3.0 + 2.0 * j_f64)))
}

/// `1 · 3 · … · (2j − 1)`, the double factorial of the largest odd number
/// below `2j`.
fn odd_double_factorial(j: usize) -> f64 {
    (1..j).fold(1.0, |acc, k| {
        #[allow(clippy::cast_precision_loss, reason = "j is a tiny recursion depth")]
        let term = (2 * k + 1) as f64;
        acc * term
    })
}

/// `‖f^{(j+1)}‖²(z)`: the pairwise sum of a `2(j+1)`-th derivative of a
/// Gaussian kernel with variance `z`, evaluated over every sample pair —
/// obtained from the Expression Algebra rather than by finite
/// differencing (spec.md §2's data-flow table: "K calls E").
fn squared_derivative_functional(
    order_stage: usize,
    z: f64,
    samples: &[f64],
    weights: &[f64],
    total_weight: f64,
) -> MathResult<f64> {
    let sigma = z.max(f64::MIN_POSITIVE).sqrt();
    let kernel = gaussian_pdf(sigma, 0.0)?;
    let derivative_order = 2 * (order_stage + 1);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "derivative_order is a tiny recursion-bounded count, never near u32::MAX"
    )]
    let kernel_derivative: Expr = kernel.differentiate_n(derivative_order as u32)?;

    let mut sum = 0.0;
    for (i, &xi_sample) in samples.iter().enumerate() {
        for (j, &xj_sample) in samples.iter().enumerate() {
            let value = kernel_derivative.evaluate(xi_sample - xj_sample)?;
            sum += weights[i] * weights[j] * value;
        }
    }
    let sign = if derivative_order % 4 == 0 { 1.0 } else { -1.0 };
    Ok(sign * sum / (total_weight * total_weight))
}
