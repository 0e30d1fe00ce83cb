use super::{
    constraint::{Comparison, LinearConstraint},
    variable::{BoolVar, IntDomain, IntVar, Literal, Term},
};
use bitvec::{bitbox, boxed::BitBox, order::Lsb0};
use strum_macros::Display;

/// A solver-agnostic constraint optimization problem.
///
/// Boolean and bounded integer variables, conditional linear constraints and a linear
/// objective over booleans that is maximized.
#[derive(Debug, Clone, Default)]
pub struct ProblemInstance {
    bool_names: Vec<String>,
    int_vars: Vec<(String, IntDomain)>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<(i64, BoolVar)>,
}

/// A full variable assignment of a [`ProblemInstance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    bools: BitBox<usize, Lsb0>,
    ints: Box<[i64]>,
}

/// The first requirement an [`Assignment`] fails to meet.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    ShapeMismatch,
    OutOfDomain(String),
    Unsatisfied(String),
}

impl std::error::Error for ConstraintViolation {}

/// Structural problems that keep a solver from accepting an instance.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A constraint shape the solver has no reasoning for, by constraint name.
    UnsupportedConstraint(String),
    /// A variable handle that does not belong to the instance.
    UnknownVariable,
}

impl std::error::Error for ModelError {}

impl Assignment {
    pub fn new(bools: BitBox<usize, Lsb0>, ints: Box<[i64]>) -> Self { Self { bools, ints } }

    /// An assignment with every boolean false and every integer zero.
    pub fn zeroed(n_bools: usize, n_ints: usize) -> Self {
        Self {
            bools: bitbox![usize, Lsb0; 0; n_bools],
            ints: vec![0; n_ints].into_boxed_slice(),
        }
    }

    pub fn value(&self, var: BoolVar) -> bool { self.bools[var.index()] }
    pub fn int(&self, var: IntVar) -> i64 { self.ints[var.index()] }
    pub fn lit(&self, lit: Literal) -> bool { lit.holds_for(self.value(lit.var())) }
    pub fn set(&mut self, var: BoolVar, value: bool) { self.bools.set(var.index(), value); }
    pub fn set_int(&mut self, var: IntVar, value: i64) { self.ints[var.index()] = value; }
    pub fn n_bools(&self) -> usize { self.bools.len() }
    pub fn n_ints(&self) -> usize { self.ints.len() }
}

impl ProblemInstance {
    pub fn new() -> Self { Self::default() }

    pub fn new_bool_var(&mut self, name: &str) -> BoolVar {
        self.bool_names.push(name.to_string());
        BoolVar::from_index(self.bool_names.len() - 1)
    }

    pub fn new_int_var(&mut self, name: &str, lb: i64, ub: i64) -> IntVar {
        self.int_vars.push((name.to_string(), IntDomain { lb, ub }));
        IntVar::from_index(self.int_vars.len() - 1)
    }

    /// Adds `Σ terms <cmp> rhs` and returns it for attaching enforcement literals.
    pub fn add(&mut self, name: &str, terms: Vec<Term>, cmp: Comparison, rhs: i64) -> &mut LinearConstraint {
        self.constraints.push(LinearConstraint::new(name, terms, cmp, rhs));
        let last = self.constraints.len() - 1;
        &mut self.constraints[last]
    }

    /// Sets the objective to maximize `Σ coeff * var`.
    pub fn maximize(&mut self, terms: Vec<(i64, BoolVar)>) { self.objective = terms; }

    pub fn n_bools(&self) -> usize { self.bool_names.len() }
    pub fn n_ints(&self) -> usize { self.int_vars.len() }
    pub fn bool_name(&self, var: BoolVar) -> &str { &self.bool_names[var.index()] }
    pub fn int_name(&self, var: IntVar) -> &str { &self.int_vars[var.index()].0 }
    pub fn domain(&self, var: IntVar) -> IntDomain { self.int_vars[var.index()].1 }
    pub fn domains(&self) -> impl Iterator<Item = (IntVar, IntDomain)> + '_ {
        self.int_vars.iter().enumerate().map(|(i, (_, d))| (IntVar::from_index(i), *d))
    }
    pub fn constraints(&self) -> &[LinearConstraint] { &self.constraints }
    pub fn objective(&self) -> &[(i64, BoolVar)] { &self.objective }

    /// Ensures every variable referenced by a constraint or the objective exists.
    pub fn validate(&self) -> Result<(), ModelError> {
        let bool_ok = |v: BoolVar| v.index() < self.n_bools();
        let terms_ok = self.constraints.iter().all(|c| {
            c.enforced_if().iter().all(|l| bool_ok(l.var()))
                && c.terms().iter().all(|t| match *t {
                    Term::Int(_, v) => v.index() < self.n_ints(),
                    Term::Bool(_, v) => bool_ok(v),
                })
        });
        if terms_ok && self.objective.iter().all(|(_, v)| bool_ok(*v)) {
            Ok(())
        } else {
            Err(ModelError::UnknownVariable)
        }
    }

    /// Objective value of `assignment`.
    pub fn objective_value(&self, assignment: &Assignment) -> i64 {
        self.objective.iter().filter(|(_, v)| assignment.value(*v)).map(|(c, _)| c).sum()
    }

    /// Checks domains and every enforced constraint against `assignment`.
    pub fn check(&self, assignment: &Assignment) -> Result<(), ConstraintViolation> {
        if assignment.n_bools() != self.n_bools() || assignment.n_ints() != self.n_ints() {
            return Err(ConstraintViolation::ShapeMismatch);
        }
        for (var, dom) in self.domains() {
            if !dom.contains(assignment.int(var)) {
                return Err(ConstraintViolation::OutOfDomain(self.int_name(var).to_string()));
            }
        }
        for c in &self.constraints {
            if !c.enforced_if().iter().all(|l| assignment.lit(*l)) {
                continue;
            }
            let lhs: i64 = c
                .terms()
                .iter()
                .map(|t| match *t {
                    Term::Int(coeff, v) => coeff * assignment.int(v),
                    Term::Bool(coeff, v) => {
                        if assignment.value(v) { coeff } else { 0 }
                    }
                })
                .sum();
            if !c.cmp().holds(lhs, c.rhs()) {
                return Err(ConstraintViolation::Unsatisfied(c.name().to_string()));
            }
        }
        Ok(())
    }
}
