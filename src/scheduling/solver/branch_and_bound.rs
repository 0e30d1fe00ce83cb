use super::{
    difference_graph::DifferenceGraph,
    optimizer::{Optimizer, SearchBudget, SearchStats, SolveStatus, SolverResult},
};
use crate::scheduling::model::{
    Assignment, BoolVar, Comparison, LinearConstraint, Literal, ModelError, ProblemInstance, Term,
};
use crate::{event, info, log, warn};
use bitvec::{bitbox, boxed::BitBox, order::Lsb0};
use itertools::Itertools;
use std::{collections::BTreeMap, time::Instant};

/// Exact depth-first branch-and-bound over the boolean variables.
///
/// Integer variables are never branched on. Every constraint over integers must be a
/// difference constraint (`±x <= c` or `x - y <= c`), which keeps the integer part of each
/// node decidable by a shortest-path computation. Constraints over booleans are treated as
/// pseudo-boolean inequalities and propagated. Mixed constraints are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBound;

impl Optimizer for BranchAndBound {
    fn name(&self) -> &'static str { "branch-and-bound" }

    fn solve(&self, instance: &ProblemInstance, budget: &SearchBudget) -> Result<SolverResult, ModelError> {
        let started = Instant::now();
        let model = CompiledModel::compile(instance)?;
        log!(
            "Starting {} on {} bool vars, {} difference edges, {} boolean constraints.",
            self.name(),
            model.n_bools,
            model.graph.edges().len(),
            model.pb.len()
        );
        let mut search = Search::new(&model, budget, budget.deadline(started));
        search.dfs();

        let mut stats = search.stats;
        stats.elapsed = started.elapsed();
        stats.budget_exhausted = search.stopped;
        let status = match (&search.best, search.stopped) {
            (Some(_), false) => SolveStatus::Optimal,
            (None, false) => SolveStatus::Infeasible,
            (Some(_), true) => SolveStatus::Feasible,
            (None, true) => SolveStatus::Unknown,
        };
        if search.stopped {
            warn!("Search budget exhausted after {} nodes.", stats.nodes);
        }
        let (objective, assignment) = search.best.map(|(o, a)| (Some(o), Some(a))).unwrap_or_default();
        info!(
            "Search finished: {status}, objective {objective:?}, {} nodes, {} incumbents in {:?}.",
            stats.nodes,
            stats.incumbents,
            stats.elapsed
        );
        Ok(SolverResult { status, assignment, objective, stats })
    }
}

/// `Σ coeff * var <= rhs` over booleans, required once `guard` holds.
#[derive(Debug, Clone)]
struct BoolConstraint {
    terms: Vec<(i64, BoolVar)>,
    rhs: i64,
    guard: Vec<Literal>,
}

/// Where a boolean variable shows up.
#[derive(Debug, Clone, Copy)]
enum Occurrence {
    Edge(usize),
    Bool(usize),
}

/// A [`ProblemInstance`] rewritten into the two constraint classes the search reasons about.
struct CompiledModel {
    n_bools: usize,
    graph: DifferenceGraph,
    pb: Vec<BoolConstraint>,
    occurs: Vec<Vec<Occurrence>>,
    objective: Vec<i64>,
    /// Objective variables, largest coefficient magnitude first.
    branch_order: Vec<BoolVar>,
}

impl CompiledModel {
    fn compile(instance: &ProblemInstance) -> Result<Self, ModelError> {
        instance.validate()?;
        let mut graph = DifferenceGraph::new(instance.n_ints());
        for (var, dom) in instance.domains() {
            let node = DifferenceGraph::node(var.index());
            graph.push(DifferenceGraph::ORIGIN, node, dom.ub, Vec::new());
            graph.push(node, DifferenceGraph::ORIGIN, -dom.lb, Vec::new());
        }
        let mut pb = Vec::new();
        for c in instance.constraints() {
            for (terms, rhs) in Self::as_upper_bounds(c) {
                Self::classify(c, &terms, rhs, &mut graph, &mut pb)?;
            }
        }

        let mut occurs = vec![Vec::new(); instance.n_bools()];
        for (i, edge) in graph.edges().iter().enumerate() {
            for lit in &edge.guard {
                occurs[lit.var().index()].push(Occurrence::Edge(i));
            }
        }
        for (i, con) in pb.iter().enumerate() {
            let vars = con.guard.iter().map(|l| l.var()).chain(con.terms.iter().map(|(_, v)| *v));
            for var in vars.unique() {
                occurs[var.index()].push(Occurrence::Bool(i));
            }
        }

        let mut objective = vec![0; instance.n_bools()];
        for (coeff, var) in instance.objective() {
            objective[var.index()] += coeff;
        }
        let branch_order = (0..instance.n_bools())
            .filter(|i| objective[*i] != 0)
            .sorted_by_key(|i| (std::cmp::Reverse(objective[*i].abs()), *i))
            .map(BoolVar::from_index)
            .collect();

        Ok(Self { n_bools: instance.n_bools(), graph, pb, occurs, objective, branch_order })
    }

    /// Rewrites a constraint into one or two `Σ terms <= rhs` forms.
    fn as_upper_bounds(c: &LinearConstraint) -> Vec<(Vec<Term>, i64)> {
        let negated = || {
            let terms: Vec<Term> = c
                .terms()
                .iter()
                .map(|t| match *t {
                    Term::Int(a, v) => Term::Int(-a, v),
                    Term::Bool(a, v) => Term::Bool(-a, v),
                })
                .collect();
            (terms, -c.rhs())
        };
        match c.cmp() {
            Comparison::Le => vec![(c.terms().to_vec(), c.rhs())],
            Comparison::Ge => vec![negated()],
            Comparison::Eq => vec![(c.terms().to_vec(), c.rhs()), negated()],
        }
    }

    fn classify(
        c: &LinearConstraint,
        terms: &[Term],
        rhs: i64,
        graph: &mut DifferenceGraph,
        pb: &mut Vec<BoolConstraint>,
    ) -> Result<(), ModelError> {
        let mut ints = BTreeMap::new();
        let mut bools = BTreeMap::new();
        for t in terms {
            match *t {
                Term::Int(a, v) => *ints.entry(v.index()).or_insert(0) += a,
                Term::Bool(a, v) => *bools.entry(v).or_insert(0) += a,
            }
        }
        ints.retain(|_, a| *a != 0);
        bools.retain(|_, a| *a != 0);
        let guard = c.enforced_if().to_vec();
        let unsupported = || ModelError::UnsupportedConstraint(c.name().to_string());

        if ints.is_empty() {
            let bool_terms = bools.into_iter().map(|(v, a)| (a, v)).collect();
            pb.push(BoolConstraint { terms: bool_terms, rhs, guard });
            return Ok(());
        }
        if !bools.is_empty() {
            return Err(unsupported());
        }
        let coeffs: Vec<(usize, i64)> = ints.into_iter().collect();
        match coeffs.as_slice() {
            [(x, a)] if *a > 0 => {
                graph.push(DifferenceGraph::ORIGIN, DifferenceGraph::node(*x), rhs.div_euclid(*a), guard);
            }
            [(x, a)] => {
                let lb = -rhs.div_euclid(-*a);
                graph.push(DifferenceGraph::node(*x), DifferenceGraph::ORIGIN, -lb, guard);
            }
            [(x, 1), (y, -1)] => {
                graph.push(DifferenceGraph::node(*y), DifferenceGraph::node(*x), rhs, guard);
            }
            [(x, -1), (y, 1)] => {
                graph.push(DifferenceGraph::node(*x), DifferenceGraph::node(*y), rhs, guard);
            }
            _ => return Err(unsupported()),
        }
        Ok(())
    }
}

/// State of a constraint's enforcement literals under a partial assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Holds,
    Broken,
    /// Exactly one literal is still unassigned, all others hold.
    Unit(Literal),
    Open,
}

struct Search<'a> {
    model: &'a CompiledModel,
    budget: &'a SearchBudget,
    deadline: Instant,
    assigned: BitBox<usize, Lsb0>,
    value: BitBox<usize, Lsb0>,
    trail: Vec<usize>,
    best: Option<(i64, Assignment)>,
    stats: SearchStats,
    stopped: bool,
}

impl<'a> Search<'a> {
    fn new(model: &'a CompiledModel, budget: &'a SearchBudget, deadline: Instant) -> Self {
        Self {
            model,
            budget,
            deadline,
            assigned: bitbox![usize, Lsb0; 0; model.n_bools],
            value: bitbox![usize, Lsb0; 0; model.n_bools],
            trail: Vec::new(),
            best: None,
            stats: SearchStats::default(),
            stopped: false,
        }
    }

    fn out_of_budget(&self) -> bool {
        self.budget.max_nodes().is_some_and(|max| self.stats.nodes >= max)
            || self.budget.cancel_token().is_cancelled()
            || Instant::now() >= self.deadline
    }

    fn dfs(&mut self) {
        if self.out_of_budget() {
            self.stopped = true;
            return;
        }
        self.stats.nodes += 1;
        let mark = self.trail.len();
        if self.propagate() {
            self.expand();
        }
        self.undo_to(mark);
    }

    fn expand(&mut self) {
        let model = self.model;
        let Some(ints) = model.graph.earliest(|e| self.guard(&e.guard) == Guard::Holds) else {
            return;
        };
        let ub = self.upper_bound();
        if self.best.as_ref().is_some_and(|(best, _)| ub <= *best) {
            return;
        }
        let Some(var) = self.choose_branch() else {
            self.record_leaf(ints);
            return;
        };
        let first = model.objective[var.index()] >= 0;
        for val in [first, !first] {
            let mark = self.trail.len();
            self.assign(var, val);
            self.dfs();
            self.undo_to(mark);
            if self.stopped {
                return;
            }
        }
    }

    fn assign(&mut self, var: BoolVar, val: bool) {
        self.assigned.set(var.index(), true);
        self.value.set(var.index(), val);
        self.trail.push(var.index());
    }

    fn undo_to(&mut self, mark: usize) {
        for i in self.trail.drain(mark..) {
            self.assigned.set(i, false);
        }
    }

    fn lit_state(&self, lit: Literal) -> Option<bool> {
        let i = lit.var().index();
        self.assigned[i].then(|| lit.holds_for(self.value[i]))
    }

    fn guard(&self, guard: &[Literal]) -> Guard {
        let mut open = 0;
        let mut last = None;
        for &lit in guard {
            match self.lit_state(lit) {
                Some(false) => return Guard::Broken,
                Some(true) => {}
                None => {
                    open += 1;
                    last = Some(lit);
                }
            }
        }
        match last {
            None => Guard::Holds,
            Some(lit) if open == 1 => Guard::Unit(lit),
            Some(_) => Guard::Open,
        }
    }

    /// Unit propagation on the boolean constraints. Returns `false` on conflict.
    fn propagate(&mut self) -> bool {
        let model = self.model;
        loop {
            let mut changed = false;
            for con in &model.pb {
                let guard = self.guard(&con.guard);
                if guard == Guard::Broken || guard == Guard::Open {
                    continue;
                }
                let mut min_lhs = 0;
                let mut fixed = true;
                for &(a, v) in &con.terms {
                    match self.lit_state(v.lit()) {
                        Some(true) => min_lhs += a,
                        Some(false) => {}
                        None => {
                            min_lhs += a.min(0);
                            fixed = false;
                        }
                    }
                }
                match guard {
                    Guard::Holds if min_lhs > con.rhs => return false,
                    Guard::Holds => {
                        for &(a, v) in &con.terms {
                            if self.assigned[v.index()] || min_lhs + a.abs() <= con.rhs {
                                continue;
                            }
                            // setting the variable against its sign would exceed rhs
                            self.assign(v, a < 0);
                            changed = true;
                        }
                    }
                    Guard::Unit(lit) if fixed && min_lhs > con.rhs => {
                        self.assign(lit.var(), !lit.is_positive());
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                return true;
            }
        }
    }

    fn upper_bound(&self) -> i64 {
        self.model
            .objective
            .iter()
            .enumerate()
            .map(|(i, &c)| match (self.assigned[i], self.value[i]) {
                (true, true) => c,
                (true, false) => 0,
                (false, _) => c.max(0),
            })
            .sum()
    }

    /// Picks the next variable to branch on, or `None` once the remaining ones are irrelevant.
    ///
    /// Order indicators whose precedence constraints just became decisive come first so
    /// the difference check prunes early, then objective variables, then anything still
    /// mentioned by a constraint that may become active.
    fn choose_branch(&self) -> Option<BoolVar> {
        let model = self.model;
        let pending = model.graph.edges().iter().find_map(|e| match self.guard(&e.guard) {
            Guard::Unit(lit) => Some(lit.var()),
            _ => None,
        });
        pending
            .or_else(|| model.branch_order.iter().copied().find(|v| !self.assigned[v.index()]))
            .or_else(|| {
                (0..model.n_bools)
                    .filter(|i| !self.assigned[*i])
                    .find(|i| model.occurs[*i].iter().any(|o| self.is_live(*o)))
                    .map(BoolVar::from_index)
            })
    }

    fn is_live(&self, occurrence: Occurrence) -> bool {
        let guard = match occurrence {
            Occurrence::Edge(i) => &self.model.graph.edges()[i].guard,
            Occurrence::Bool(i) => &self.model.pb[i].guard,
        };
        self.guard(guard) != Guard::Broken
    }

    /// Stores the current node as incumbent. Unassigned variables are free and set to false.
    fn record_leaf(&mut self, ints: Vec<i64>) {
        let mut bools = bitbox![usize, Lsb0; 0; self.model.n_bools];
        for i in self.assigned.iter_ones() {
            bools.set(i, self.value[i]);
        }
        let assignment = Assignment::new(bools, ints.into_boxed_slice());
        let objective: i64 = self
            .model
            .objective
            .iter()
            .enumerate()
            .filter(|(i, _)| assignment.value(BoolVar::from_index(*i)))
            .map(|(_, c)| c)
            .sum();
        if self.best.as_ref().is_none_or(|(best, _)| objective > *best) {
            self.stats.incumbents += 1;
            event!("New incumbent with objective {objective} after {} nodes.", self.stats.nodes);
            self.best = Some((objective, assignment));
        }
    }
}
