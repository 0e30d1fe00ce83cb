use std::ops::Not;

/// Handle of a boolean decision variable inside a [`super::ProblemInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoolVar(usize);

/// Handle of a bounded integer variable inside a [`super::ProblemInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVar(usize);

impl BoolVar {
    pub(crate) fn from_index(index: usize) -> Self { Self(index) }
    pub fn index(self) -> usize { self.0 }
    /// The literal that holds when this variable is true.
    pub fn lit(self) -> Literal { Literal { var: self, positive: true } }
}

impl IntVar {
    pub(crate) fn from_index(index: usize) -> Self { Self(index) }
    pub fn index(self) -> usize { self.0 }
}

impl Not for BoolVar {
    type Output = Literal;

    fn not(self) -> Self::Output { Literal { var: self, positive: false } }
}

/// A boolean variable or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    var: BoolVar,
    positive: bool,
}

impl Literal {
    pub fn var(self) -> BoolVar { self.var }
    pub fn is_positive(self) -> bool { self.positive }

    /// Truth value of the literal under a value of its variable.
    pub fn holds_for(self, value: bool) -> bool { value == self.positive }
}

impl From<BoolVar> for Literal {
    fn from(value: BoolVar) -> Self { value.lit() }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            var: self.var,
            positive: !self.positive,
        }
    }
}

/// Closed integer domain `[lb, ub]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntDomain {
    pub lb: i64,
    pub ub: i64,
}

impl IntDomain {
    pub fn contains(self, value: i64) -> bool { self.lb <= value && value <= self.ub }
}

/// One weighted variable of a linear expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Int(i64, IntVar),
    /// Booleans contribute their coefficient when true, zero when false.
    Bool(i64, BoolVar),
}
