//! Dependency graph between states and computes.
//!
//! An edge `from -> to` means `to` reads `from`, so a change to `from`
//! dirties everything reachable from it.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt,
};

use thiserror::Error;

#[derive(Error)]
pub enum TopologyError<Node: fmt::Debug> {
    #[error("Cycle detected: {0:?}")]
    CycleDetected(DepRoute<Node>),
    #[error("Duplicate edge detected: from {} to {}", .0.from_label(), .0.to_label())]
    DuplicateEdge(DepRoute<Node>),
}

impl<Node: fmt::Debug> fmt::Debug for TopologyError<Node> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected(route) => write!(f, "CycleDetected({route:?})"),
            Self::DuplicateEdge(route) => write!(f, "DuplicateEdge({route:?})"),
        }
    }
}

/// Walk through the graph in edge direction.
#[derive(Clone, PartialEq, Eq)]
pub struct DepRoute<Node> {
    route: Vec<Node>,
}

impl<Node> DepRoute<Node> {
    pub fn nodes(&self) -> &[Node] {
        &self.route
    }
}

impl<Node: fmt::Debug> DepRoute<Node> {
    fn from_label(&self) -> String {
        self.route.first().map(|n| format!("{n:?}")).unwrap_or_default()
    }

    fn to_label(&self) -> String {
        self.route.last().map(|n| format!("{n:?}")).unwrap_or_default()
    }
}

impl<Node: fmt::Debug> fmt::Debug for DepRoute<Node> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.route.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node:?}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Graph<Node: Ord + Copy> {
    /// Outgoing edges in insertion order; repeats are kept so sorting can report them.
    edges: BTreeMap<Node, Vec<Node>>,
    /// Transitive dependents, filled lazily and dropped on every new edge.
    reach: BTreeMap<Node, BTreeSet<Node>>,
}

impl<Node: Ord + Copy + fmt::Debug> Default for Graph<Node> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Node: Ord + Copy + fmt::Debug> Graph<Node> {
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
            reach: BTreeMap::new(),
        }
    }

    pub fn route_to(&mut self, from: Node, to: Node) {
        self.edges.entry(from).or_default().push(to);
        self.reach.clear();
    }

    fn targets(&self, node: Node) -> &[Node] {
        self.edges.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Every node in dependency order, sources first. Ties resolve to the smallest node.
    pub fn topology_sort(&self) -> Result<Vec<Node>, TopologyError<Node>> {
        let mut pending: BTreeMap<Node, usize> = BTreeMap::new();
        for (&from, targets) in &self.edges {
            pending.entry(from).or_default();
            let mut seen = BTreeSet::new();
            for &to in targets {
                if !seen.insert(to) {
                    return Err(TopologyError::DuplicateEdge(DepRoute {
                        route: vec![from, to],
                    }));
                }
                *pending.entry(to).or_default() += 1;
            }
        }

        let mut ready: BTreeSet<Node> = pending
            .iter()
            .filter(|(_, incoming)| **incoming == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut sorted = Vec::with_capacity(pending.len());
        while let Some(node) = ready.pop_first() {
            sorted.push(node);
            for to in self.targets(node) {
                if let Some(incoming) = pending.get_mut(to) {
                    *incoming -= 1;
                    if *incoming == 0 {
                        ready.insert(*to);
                    }
                }
            }
        }

        if sorted.len() < pending.len() {
            let stuck: BTreeSet<Node> = pending
                .into_iter()
                .filter(|(_, incoming)| *incoming > 0)
                .map(|(node, _)| node)
                .collect();
            return Err(TopologyError::CycleDetected(DepRoute {
                route: self.cycle_within(&stuck),
            }));
        }
        Ok(sorted)
    }

    /// Every stuck node keeps a stuck predecessor, so walking backwards
    /// must revisit a node. The revisited stretch is the cycle.
    fn cycle_within(&self, stuck: &BTreeSet<Node>) -> Vec<Node> {
        let Some(&start) = stuck.first() else {
            return Vec::new();
        };
        let predecessor = |node: Node| {
            self.edges
                .iter()
                .find(|(from, targets)| stuck.contains(*from) && targets.contains(&node))
                .map(|(from, _)| *from)
        };

        let mut walked = vec![start];
        let mut current = start;
        while let Some(prev) = predecessor(current) {
            if let Some(at) = walked.iter().position(|node| *node == prev) {
                let mut cycle = walked.split_off(at);
                cycle.push(prev);
                cycle.reverse();
                return cycle;
            }
            walked.push(prev);
            current = prev;
        }
        walked.reverse();
        walked
    }

    /// Nodes reachable from `node`, not including itself unless it sits on a cycle.
    pub fn connected(&mut self, node: Node) -> &BTreeSet<Node> {
        if !self.reach.contains_key(&node) {
            let mut found = BTreeSet::new();
            let mut frontier: VecDeque<Node> = self.targets(node).iter().copied().collect();
            while let Some(next) = frontier.pop_front() {
                if found.insert(next) {
                    frontier.extend(self.targets(next).iter().copied());
                }
            }
            self.reach.insert(node, found);
        }
        &self.reach[&node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_graph_is_empty() {
        let mut graph: Graph<u32> = Graph::default();
        assert!(graph.topology_sort().unwrap().is_empty());
        assert!(graph.connected(7).is_empty());
    }

    #[test]
    fn sources_come_first() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(2, 3);
        graph.route_to(1, 2);
        graph.route_to(1, 3);
        assert_eq!(graph.topology_sort().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn independent_chains_interleave_by_node_order() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(10, 11);
        graph.route_to(1, 20);
        assert_eq!(graph.topology_sort().unwrap(), vec![1, 10, 11, 20]);
    }

    #[test]
    fn cycle_is_reported_in_edge_direction() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(0, 1);
        graph.route_to(1, 2);
        graph.route_to(2, 3);
        graph.route_to(3, 1);

        match graph.topology_sort() {
            Err(TopologyError::CycleDetected(route)) => {
                assert_eq!(route.nodes(), &[1, 2, 3, 1]);
                let message = TopologyError::CycleDetected(route).to_string();
                assert_eq!(message, "Cycle detected: 1 -> 2 -> 3 -> 1");
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(4, 4);
        assert!(matches!(
            graph.topology_sort(),
            Err(TopologyError::CycleDetected(route)) if route.nodes() == [4, 4]
        ));
    }

    #[test]
    fn repeated_edge_is_rejected() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(1, 2);
        graph.route_to(1, 2);

        match graph.topology_sort() {
            Err(TopologyError::DuplicateEdge(route)) => {
                assert_eq!(format!("{route:?}"), "1 -> 2");
                let message = TopologyError::DuplicateEdge(route).to_string();
                assert_eq!(message, "Duplicate edge detected: from 1 to 2");
            }
            other => panic!("expected a duplicate edge, got {other:?}"),
        }
    }

    #[test]
    fn connected_is_transitive_and_invalidated_on_new_route() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(1, 2);
        assert_eq!(graph.connected(1).iter().copied().collect::<Vec<_>>(), vec![2]);

        graph.route_to(2, 3);
        assert_eq!(
            graph.connected(1).iter().copied().collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert!(graph.connected(3).is_empty());
    }
}
