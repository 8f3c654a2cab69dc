//! Problem encoders.
//!
//! Two dialects of the LADR input language are produced from a path:
//!
//! - **Existence**: the path's connections (optionally with synthetic
//!   `r_direct` shortcuts) as facts, reachability facts for its stops, and
//!   the reachability rule. Given to the model finder.
//! - **Verification**: a step-indexed chain (`step/2`, `succ/2`, `uses/2`)
//!   with one transition rule, and the final step at the goal as the proof
//!   goal. Given to the theorem prover.
//!
//! Stops become integer constants and every integer in the body is then
//! compacted with [`remap_nodes`]. Solver options are written before the
//! body and are never remapped.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

use crate::domain::{Path, RouteId, StopId};

use super::error::OracleError;
use super::remap::{NodeMapping, remap_nodes};
use super::verdict::SolverKind;

/// The reachability rule of the existence dialect.
const REACHABILITY_RULE: &str =
    "all X all Y all R (reachable(X) & connected(X,Y,R) -> reachable(Y)).";

/// The transition rule of the verification dialect.
const TRANSITION_RULE: &str = "all N all M all X all Y all R \
     (step(N,X) & succ(N,M) & uses(M,R) & connected(X,Y,R) -> step(M,Y)).";

/// Route constant of the synthetic shortcut edges.
const DIRECT_ROUTE: &str = "r_direct";

/// Which question a problem asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Is the path's goal consistently reachable? (model finder)
    Existence,
    /// Does the step chain derive the goal? (theorem prover)
    Verification,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Existence => "existence",
            Dialect::Verification => "verification",
        }
    }

    /// The solver that answers this dialect.
    pub fn solver(&self) -> SolverKind {
        match self {
            Dialect::Existence => SolverKind::ModelFinder,
            Dialect::Verification => SolverKind::Prover,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer constants for the stops of one problem.
///
/// Ids that are canonical non-negative integers keep their value. Other ids
/// are numbered above the largest numeric id in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct NodeNumbering {
    numbers: BTreeMap<StopId, u64>,
}

impl NodeNumbering {
    pub fn new<'a>(stops: impl IntoIterator<Item = &'a StopId>) -> Self {
        let mut ordered: Vec<&StopId> = Vec::new();
        let mut seen: BTreeSet<&StopId> = BTreeSet::new();
        for stop in stops {
            if seen.insert(stop) {
                ordered.push(stop);
            }
        }

        let mut numbers = BTreeMap::new();
        for stop in &ordered {
            if let Some(n) = canonical_integer(stop.as_str()) {
                numbers.insert((*stop).clone(), n);
            }
        }

        let mut next = numbers.values().max().map_or(0, |m| m + 1);
        for stop in ordered {
            if !numbers.contains_key(stop) {
                numbers.insert(stop.clone(), next);
                next += 1;
            }
        }

        Self { numbers }
    }

    pub fn number(&self, stop: &StopId) -> Option<u64> {
        self.numbers.get(stop).copied()
    }

    pub fn numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.numbers.values().copied()
    }

    fn require(&self, stop: &StopId) -> Result<u64, OracleError> {
        self.number(stop).ok_or_else(|| OracleError::Failed {
            message: format!("stop {stop} has no node number"),
        })
    }
}

fn canonical_integer(s: &str) -> Option<u64> {
    let n: u64 = s.parse().ok()?;
    (n.to_string() == s).then_some(n)
}

/// Route constant for the solver: `r` followed by the id with anything
/// outside `[A-Za-z0-9_]` replaced by `_`.
pub fn route_constant(route: &RouteId) -> String {
    let mut out = String::with_capacity(route.as_str().len() + 1);
    out.push('r');
    out.extend(
        route
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }),
    );
    out
}

/// An encoded problem ready for a solver.
#[derive(Debug, Clone)]
pub struct Problem {
    pub dialect: Dialect,
    /// Options followed by the remapped body.
    pub text: String,
    pub mapping: NodeMapping,
    pub numbering: NodeNumbering,
}

impl Problem {
    /// Compact constant used for `stop` in the problem text.
    pub fn node_of(&self, stop: &StopId) -> Option<u64> {
        self.mapping.compact(self.numbering.number(stop)?)
    }
}

/// Encode the existence question for a path.
pub fn encode_existence(
    path: &Path,
    include_direct: bool,
    max_seconds: u64,
) -> Result<Problem, OracleError> {
    let (edges, numbering) = numbered_edges(path)?;

    let mut body = String::from("formulas(assumptions).\n");
    for (from, to, route) in &edges {
        let _ = writeln!(body, "connected({from},{to},{route}).");
    }

    if include_direct {
        for pair in edges.windows(2) {
            let (a, _, _) = &pair[0];
            let (b, c, _) = &pair[1];
            let _ = writeln!(body, "connected({a},{b},{DIRECT_ROUTE}).");
            let _ = writeln!(body, "connected({a},{c},{DIRECT_ROUTE}).");
        }
    }

    let mut listed = BTreeSet::new();
    let nodes = edges
        .iter()
        .flat_map(|(from, to, _)| [*from, *to])
        .filter(|n| listed.insert(*n));
    for node in nodes {
        let _ = writeln!(body, "reachable({node}).");
    }
    body.push_str(REACHABILITY_RULE);
    body.push_str("\nend_of_list.\n");

    let ids: BTreeSet<u64> = numbering.numbers().collect();
    let (body, mapping) = remap_nodes(&body, &ids);

    let text = format!("assign(max_seconds, {max_seconds}).\n\n{body}");
    Ok(Problem {
        dialect: Dialect::Existence,
        text,
        mapping,
        numbering,
    })
}

/// Encode the verification question for a path.
pub fn encode_verification(path: &Path, max_seconds: u64) -> Result<Problem, OracleError> {
    let (edges, numbering) = numbered_edges(path)?;
    let steps = edges.len() as u64;

    let mut body = String::from("formulas(assumptions).\n");
    for (from, to, route) in &edges {
        let _ = writeln!(body, "connected({from},{to},{route}).");
    }
    for i in 0..steps {
        let _ = writeln!(body, "succ({i},{}).", i + 1);
    }
    let (start, _, _) = &edges[0];
    let _ = writeln!(body, "step(0,{start}).");
    for (i, (_, _, route)) in edges.iter().enumerate() {
        let _ = writeln!(body, "uses({},{route}).", i + 1);
    }
    body.push_str(TRANSITION_RULE);
    body.push_str("\nend_of_list.\n\n");

    let (_, goal, _) = &edges[edges.len() - 1];
    body.push_str("formulas(goals).\n");
    let _ = writeln!(body, "step({steps},{goal}).");
    body.push_str("end_of_list.\n");

    let ids: BTreeSet<u64> = numbering.numbers().chain(0..=steps).collect();
    let (body, mapping) = remap_nodes(&body, &ids);

    let text = format!(
        "set(production).\n\
         assign(max_weight, 30).\n\
         assign(max_proofs, 1).\n\
         assign(max_seconds, {max_seconds}).\n\
         assign(sos_limit, 500).\n\n{body}"
    );
    Ok(Problem {
        dialect: Dialect::Verification,
        text,
        mapping,
        numbering,
    })
}

/// The path's edges as (from, to, route constant) triples.
fn numbered_edges(path: &Path) -> Result<(Vec<(u64, u64, String)>, NodeNumbering), OracleError> {
    if path.is_empty() {
        return Err(OracleError::EmptyPath);
    }
    let numbering = NodeNumbering::new(path.stops());
    let edges = path
        .edges()
        .iter()
        .map(|e| {
            Ok((
                numbering.require(&e.from)?,
                numbering.require(&e.to)?,
                route_constant(&e.route),
            ))
        })
        .collect::<Result<Vec<_>, OracleError>>()?;
    Ok((edges, numbering))
}
