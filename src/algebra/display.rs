//! Human-readable rendering (spec.md §4.1, §6): `toString(sigFigs)`,
//! e.g. `"3x^2"`, `"6e^(2x)"`, `"a + b"`, `"3(a + b)"`.

use std::fmt;

use super::{Expr, ExprKind};

const DEFAULT_SIG_FIGS: usize = 6;

impl Expr {
    /// Renders this expression with `sig_figs` significant figures on
    /// every numeric literal.
    #[must_use]
    pub fn to_string_sig_figs(&self, sig_figs: usize) -> String {
        fmt_expr(self, sig_figs.max(1))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_sig_figs(DEFAULT_SIG_FIGS))
    }
}

fn fmt_expr(e: &Expr, sig_figs: usize) -> String {
    match e.kind() {
        ExprKind::Constant => format_sig_figs(e.coefficient(), sig_figs),
        ExprKind::Monomial { power, inner } => fmt_monomial(e.coefficient(), *power, inner, sig_figs),
        ExprKind::NaturalExponent { inner } => fmt_natural_exponent(e.coefficient(), inner, sig_figs),
        ExprKind::Sum(terms) => fmt_sum(e.coefficient(), terms, sig_figs),
        ExprKind::Product(factors) => fmt_product(e.coefficient(), factors, sig_figs),
    }
}

fn needs_parens(e: &Expr) -> bool {
    matches!(e.kind(), ExprKind::Sum(_) | ExprKind::Product(_))
}

fn fmt_inner(e: &Expr, sig_figs: usize) -> String {
    let s = fmt_expr(e, sig_figs);
    if needs_parens(e) { format!("({s})") } else { s }
}

fn coeff_prefix(a: f64, sig_figs: usize) -> String {
    if a == 1.0 {
        String::new()
    } else if a == -1.0 {
        "-".to_owned()
    } else {
        format_sig_figs(a, sig_figs)
    }
}

fn fmt_monomial(a: f64, power: f64, inner: &Option<std::sync::Arc<Expr>>, sig_figs: usize) -> String {
    let base = inner.as_ref().map_or_else(|| "x".to_owned(), |g| fmt_inner(g, sig_figs));
    let prefix = coeff_prefix(a, sig_figs);
    if power == 1.0 {
        format!("{prefix}{base}")
    } else {
        format!("{prefix}{base}^{}", format_sig_figs(power, sig_figs))
    }
}

fn fmt_natural_exponent(a: f64, inner: &Option<std::sync::Arc<Expr>>, sig_figs: usize) -> String {
    let inner_str = inner.as_ref().map_or_else(|| "x".to_owned(), |g| fmt_expr(g, sig_figs));
    let prefix = coeff_prefix(a, sig_figs);
    format!("{prefix}e^({inner_str})")
}

fn fmt_sum(a: f64, terms: &[std::sync::Arc<Expr>], sig_figs: usize) -> String {
    let joined = terms
        .iter()
        .map(|t| fmt_expr(t, sig_figs))
        .collect::<Vec<_>>()
        .join(" + ")
        .replace("+ -", "- ");
    if a == 1.0 {
        joined
    } else if a == -1.0 {
        format!("-({joined})")
    } else {
        format!("{}({joined})", format_sig_figs(a, sig_figs))
    }
}

fn fmt_product(a: f64, factors: &[std::sync::Arc<Expr>], sig_figs: usize) -> String {
    let prefix = coeff_prefix(a, sig_figs);
    let joined = factors.iter().map(|f| fmt_inner(f, sig_figs)).collect::<Vec<_>>().join("*");
    format!("{prefix}{joined}")
}

/// Formats `value` with `sig_figs` significant figures, trimming trailing
/// zeros (e.g. `2.0` at 3 significant figures renders as `"2"`, not
/// `"2.00"`).
fn format_sig_figs(value: f64, sig_figs: usize) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "log10 of a finite f64 magnitude fits comfortably in i32"
    )]
    let magnitude = value.abs().log10().floor() as i32;
    let sig_figs_i32 = i32::try_from(sig_figs).unwrap_or(i32::MAX);
    let decimals = (sig_figs_i32 - 1 - magnitude).clamp(0, 17);
    #[allow(clippy::cast_sign_loss, reason = "decimals is clamped non-negative above")]
    let decimals = decimals as usize;
    let rounded = format!("{value:.decimals$}");
    trim_trailing_zeros(&rounded)
}

fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_owned();
    }
    let trimmed = s.trim_end_matches('0');
    trimmed.trim_end_matches('.').to_owned()
}
