use super::variable::{Literal, Term};
use strum_macros::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    #[strum(to_string = "<=")]
    Le,
    #[strum(to_string = ">=")]
    Ge,
    #[strum(to_string = "==")]
    Eq,
}

impl Comparison {
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Le => lhs <= rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Eq => lhs == rhs,
        }
    }
}

/// `Σ terms <cmp> rhs`, required only while every literal in `enforced_if` holds.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    name: String,
    terms: Vec<Term>,
    cmp: Comparison,
    rhs: i64,
    enforced_if: Vec<Literal>,
}

impl LinearConstraint {
    pub fn new(name: &str, terms: Vec<Term>, cmp: Comparison, rhs: i64) -> Self {
        Self {
            name: name.to_string(),
            terms,
            cmp,
            rhs,
            enforced_if: Vec::new(),
        }
    }

    /// Makes the constraint conditional on all of `literals` holding.
    pub fn only_enforce_if(&mut self, literals: &[Literal]) -> &mut Self {
        self.enforced_if.extend_from_slice(literals);
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn terms(&self) -> &[Term] { &self.terms }
    pub fn cmp(&self) -> Comparison { self.cmp }
    pub fn rhs(&self) -> i64 { self.rhs }
    pub fn enforced_if(&self) -> &[Literal] { &self.enforced_if }
}
