use crate::scheduling::model::Literal;

/// `x[to] - x[from] <= weight`, active once every literal in `guard` holds.
///
/// Node `0` is the fixed origin with value zero, node `k + 1` is integer variable `k`.
#[derive(Debug, Clone)]
pub(super) struct DiffEdge {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
    pub guard: Vec<Literal>,
}

/// System of difference constraints over integer variables.
#[derive(Debug, Clone)]
pub(super) struct DifferenceGraph {
    n_nodes: usize,
    edges: Vec<DiffEdge>,
}

const UNREACHED: i64 = i64::MAX / 4;

impl DifferenceGraph {
    pub const ORIGIN: usize = 0;

    pub fn new(n_vars: usize) -> Self { Self { n_nodes: n_vars + 1, edges: Vec::new() } }

    pub fn node(var_index: usize) -> usize { var_index + 1 }

    /// Adds `x[to] - x[from] <= weight` under `guard`.
    pub fn push(&mut self, from: usize, to: usize, weight: i64, guard: Vec<Literal>) {
        self.edges.push(DiffEdge { from, to, weight, guard });
    }

    pub fn edges(&self) -> &[DiffEdge] { &self.edges }

    /// Earliest solution of the active constraints, or `None` if they are contradictory.
    ///
    /// Runs Bellman-Ford from the origin on the reversed graph: with `y = -x` every
    /// constraint becomes `y[from] - y[to] <= weight`, and shortest distances yield the
    /// greatest `y`, i.e. the smallest feasible `x` for every variable at once.
    ///
    /// # Arguments
    /// - `active`: Predicate selecting the edges whose guards currently hold.
    ///
    /// # Returns
    /// - Values for the integer variables (origin excluded), each at its lowest feasible value.
    pub fn earliest<F>(&self, active: F) -> Option<Vec<i64>>
    where F: Fn(&DiffEdge) -> bool {
        let live: Vec<&DiffEdge> = self.edges.iter().filter(|e| active(e)).collect();
        let mut dist = vec![UNREACHED; self.n_nodes];
        dist[Self::ORIGIN] = 0;
        for round in 0..=self.n_nodes {
            let mut changed = false;
            for e in &live {
                if dist[e.to] >= UNREACHED {
                    continue;
                }
                let cand = dist[e.to].saturating_add(e.weight);
                if cand < dist[e.from] {
                    dist[e.from] = cand;
                    changed = true;
                }
            }
            if !changed {
                return Some(dist[1..].iter().map(|d| if *d >= UNREACHED { 0 } else { -d }).collect());
            }
            if round == self.n_nodes {
                break;
            }
        }
        // still relaxing after |V| rounds: negative cycle
        None
    }
}
