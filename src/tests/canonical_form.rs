//! Property tests for the canonical-form invariants of the expression
//! algebra: commutativity/associativity of `Sum` and `Product`
//! aggregation, and the zero/one identities (spec.md §3, §8 property 1).
//!
//! Shallow random trees over small integer coefficients, in the style of
//! the teacher's `src/tests/fuzz.rs`: small integers keep floating-point
//! rounding from masking real canonicalisation bugs.

use quickcheck::{Arbitrary, Gen};

use crate::algebra::Expr;

#[derive(Clone, Debug)]
struct SmallExpr(Expr);

fn leaf_expr(g: &mut Gen) -> Expr {
    if bool::arbitrary(g) {
        let n = i8::arbitrary(g) % 5;
        Expr::constant(f64::from(n)).expect("small integer coefficients are always finite")
    } else {
        Expr::variable()
    }
}

fn arbitrary_expr(g: &mut Gen, depth: u32) -> Expr {
    if depth == 0 {
        return leaf_expr(g);
    }
    match u8::arbitrary(g) % 3 {
        0 => leaf_expr(g),
        1 => {
            let a = arbitrary_expr(g, depth - 1);
            let b = arbitrary_expr(g, depth - 1);
            a.add(&b).unwrap_or_else(|_| leaf_expr(g))
        }
        _ => {
            let a = arbitrary_expr(g, depth - 1);
            let b = arbitrary_expr(g, depth - 1);
            a.multiply(&b).unwrap_or_else(|_| leaf_expr(g))
        }
    }
}

impl Arbitrary for SmallExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(arbitrary_expr(g, 3))
    }
}

quickcheck::quickcheck! {
    fn sum_is_commutative(a: SmallExpr, b: SmallExpr) -> bool {
        a.0.add(&b.0) == b.0.add(&a.0)
    }

    fn product_is_commutative(a: SmallExpr, b: SmallExpr) -> bool {
        a.0.multiply(&b.0) == b.0.multiply(&a.0)
    }

    fn sum_is_associative(a: SmallExpr, b: SmallExpr, c: SmallExpr) -> bool {
        let left = a.0.add(&b.0).and_then(|ab| ab.add(&c.0));
        let right = b.0.add(&c.0).and_then(|bc| a.0.add(&bc));
        left == right
    }

    fn adding_zero_is_identity(a: SmallExpr) -> bool {
        let zero = Expr::constant(0.0).expect("zero is finite");
        a.0.add(&zero) == Ok(a.0.clone())
    }

    fn multiplying_by_one_is_identity(a: SmallExpr) -> bool {
        let one = Expr::constant(1.0).expect("one is finite");
        a.0.multiply(&one) == Ok(a.0.clone())
    }
}
