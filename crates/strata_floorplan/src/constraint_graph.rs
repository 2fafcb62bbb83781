//! Vertical constraint graph.
//!
//! Two modules whose horizontal extents overlap (open intervals, so abutting
//! modules are independent) must be stacked: one of them lies entirely below
//! the other. The order is taken from the original layout. A sweep over the
//! modules sorted by left edge finds every overlapping pair without testing
//! all pairs against each other.

use crate::ids::ModuleId;
use crate::problem::FpModule;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use strata_common::{InternalError, StrataResult};
use strata_config::EdgePolicy;

/// "`below` lies entirely below `above`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintEdge {
    /// The lower module.
    pub below: ModuleId,
    /// The upper module.
    pub above: ModuleId,
}

impl ConstraintEdge {
    /// Creates an edge.
    pub fn new(below: ModuleId, above: ModuleId) -> Self {
        Self { below, above }
    }
}

/// Builds the vertical ordering edges for `modules`.
///
/// Edges are sorted by `(below, above)`. With
/// [`EdgePolicy::TransitiveReduction`], edges implied by a longer chain are
/// dropped. Fails with an [`InternalError`] if the edges form a cycle.
pub fn vertical_sweep_line(
    modules: &[FpModule],
    policy: EdgePolicy,
) -> StrataResult<Vec<ConstraintEdge>> {
    let mut order: Vec<usize> = (0..modules.len()).collect();
    order.sort_by_key(|&i| (modules[i].bbox.x_lo, modules[i].bbox.x_hi, modules[i].id));

    let mut edges = Vec::new();
    let mut active: Vec<usize> = Vec::new();
    for &incoming in &order {
        let bbox = modules[incoming].bbox;
        active.retain(|&a| modules[a].bbox.x_hi > bbox.x_lo);
        for &a in &active {
            if modules[a].bbox.x_overlaps(&bbox) {
                edges.push(orient(&modules[a], &modules[incoming]));
            }
        }
        active.push(incoming);
    }
    edges.sort_unstable();

    let graph = build_graph(modules.len(), &edges);
    let topo = toposort(&graph, None).map_err(|cycle| {
        InternalError::new(format!(
            "vertical constraint graph has a cycle through module {}",
            cycle.node_id().index()
        ))
        .in_stage("vertical sweep line")
    })?;

    if policy == EdgePolicy::TransitiveReduction {
        edges = transitive_reduction(&graph, &topo, &edges);
    }

    tracing::debug!(modules = modules.len(), edges = edges.len(), ?policy, "vertical constraint graph");
    Ok(edges)
}

fn orient(a: &FpModule, b: &FpModule) -> ConstraintEdge {
    let key = |m: &FpModule| (m.bbox.y_lo, m.bbox.y_hi, m.id);
    if key(a) <= key(b) {
        ConstraintEdge::new(a.id, b.id)
    } else {
        ConstraintEdge::new(b.id, a.id)
    }
}

fn build_graph(nodes: usize, edges: &[ConstraintEdge]) -> DiGraph<(), ()> {
    let mut graph = DiGraph::with_capacity(nodes, edges.len());
    for _ in 0..nodes {
        graph.add_node(());
    }
    for e in edges {
        graph.add_edge(
            NodeIndex::new(e.below.index()),
            NodeIndex::new(e.above.index()),
            (),
        );
    }
    graph
}

/// Keeps `(a, b)` only if no other successor of `a` reaches `b`.
fn transitive_reduction(
    graph: &DiGraph<(), ()>,
    topo: &[NodeIndex],
    edges: &[ConstraintEdge],
) -> Vec<ConstraintEdge> {
    let n = graph.node_count();
    // reach[u] holds every node reachable from u by a path of length >= 1
    let mut reach = vec![vec![false; n]; n];
    for &u in topo.iter().rev() {
        let mut set = vec![false; n];
        for v in graph.neighbors(u) {
            set[v.index()] = true;
            for (dst, &src) in set.iter_mut().zip(&reach[v.index()]) {
                *dst |= src;
            }
        }
        reach[u.index()] = set;
    }

    edges
        .iter()
        .copied()
        .filter(|e| {
            let a = NodeIndex::new(e.below.index());
            !graph
                .neighbors(a)
                .any(|c| c.index() != e.above.index() && reach[c.index()][e.above.index()])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use strata_common::Interner;

    fn modules(boxes: &[Rect]) -> Vec<FpModule> {
        let interner = Interner::new();
        boxes
            .iter()
            .enumerate()
            .map(|(i, &bbox)| FpModule {
                id: ModuleId::from_raw(i as u32),
                name: interner.get_or_intern(&format!("m{i}")),
                bbox,
            })
            .collect()
    }

    fn edge(below: u32, above: u32) -> ConstraintEdge {
        ConstraintEdge::new(ModuleId::from_raw(below), ModuleId::from_raw(above))
    }

    #[test]
    fn disjoint_modules_have_no_edges() {
        let m = modules(&[Rect::new(0, 0, 4, 4), Rect::new(10, 0, 14, 4)]);
        let edges = vertical_sweep_line(&m, EdgePolicy::AllOverlaps).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn abutting_modules_do_not_overlap() {
        let m = modules(&[Rect::new(0, 0, 4, 4), Rect::new(4, 0, 8, 4)]);
        let edges = vertical_sweep_line(&m, EdgePolicy::AllOverlaps).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn orientation_follows_original_y() {
        // Module 0 sits above module 1 in the original layout.
        let m = modules(&[Rect::new(0, 10, 6, 14), Rect::new(2, 0, 8, 4)]);
        let edges = vertical_sweep_line(&m, EdgePolicy::AllOverlaps).unwrap();
        assert_eq!(edges, vec![edge(1, 0)]);
    }

    #[test]
    fn equal_y_breaks_ties_by_id() {
        let m = modules(&[Rect::new(3, 0, 8, 4), Rect::new(0, 0, 5, 4)]);
        let edges = vertical_sweep_line(&m, EdgePolicy::AllOverlaps).unwrap();
        assert_eq!(edges, vec![edge(0, 1)]);
    }

    #[test]
    fn expired_modules_leave_the_active_set() {
        // 0 overlaps 1, 1 overlaps 2, 0 does not reach 2.
        let m = modules(&[
            Rect::new(0, 0, 5, 2),
            Rect::new(4, 3, 9, 5),
            Rect::new(8, 6, 12, 8),
        ]);
        let edges = vertical_sweep_line(&m, EdgePolicy::AllOverlaps).unwrap();
        assert_eq!(edges, vec![edge(0, 1), edge(1, 2)]);
    }

    #[test]
    fn stacked_column_all_overlaps() {
        let m = modules(&[
            Rect::new(0, 0, 10, 2),
            Rect::new(0, 2, 10, 4),
            Rect::new(0, 4, 10, 6),
        ]);
        let edges = vertical_sweep_line(&m, EdgePolicy::AllOverlaps).unwrap();
        assert_eq!(edges, vec![edge(0, 1), edge(0, 2), edge(1, 2)]);
    }

    #[test]
    fn stacked_column_transitive_reduction() {
        let m = modules(&[
            Rect::new(0, 0, 10, 2),
            Rect::new(0, 2, 10, 4),
            Rect::new(0, 4, 10, 6),
        ]);
        let edges = vertical_sweep_line(&m, EdgePolicy::TransitiveReduction).unwrap();
        assert_eq!(edges, vec![edge(0, 1), edge(1, 2)]);
    }

    #[test]
    fn reduction_keeps_edges_without_detour() {
        // 0 below both 1 and 2; 1 and 2 are side by side.
        let m = modules(&[
            Rect::new(0, 0, 10, 2),
            Rect::new(0, 3, 4, 5),
            Rect::new(6, 3, 10, 5),
        ]);
        let edges = vertical_sweep_line(&m, EdgePolicy::TransitiveReduction).unwrap();
        assert_eq!(edges, vec![edge(0, 1), edge(0, 2)]);
    }

    #[test]
    fn sweep_is_deterministic() {
        let a = modules(&[
            Rect::new(0, 0, 10, 2),
            Rect::new(5, 4, 15, 6),
            Rect::new(2, 8, 6, 9),
        ]);
        let first = vertical_sweep_line(&a, EdgePolicy::AllOverlaps).unwrap();
        let second = vertical_sweep_line(&a, EdgePolicy::AllOverlaps).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![edge(0, 1), edge(0, 2), edge(1, 2)]);
    }

    #[test]
    fn empty_input() {
        let edges = vertical_sweep_line(&[], EdgePolicy::TransitiveReduction).unwrap();
        assert!(edges.is_empty());
    }
}
