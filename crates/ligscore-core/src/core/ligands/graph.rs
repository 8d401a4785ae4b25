use crate::core::models::atom::Element;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphAtom {
    pub name: String,
    pub element: Element,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("More than {limit} isomorphisms between ligand graphs")]
pub struct IsomorphismLimitExceeded {
    pub limit: usize,
}

/// Mapping from the nodes of one graph to the nodes of another: entry `i` is the node of the
/// other graph matched to node `i`.
pub type NodeMapping = Vec<usize>;

/// The covalent graph of a single ligand residue.
///
/// Nodes are the residue's atoms in their native order; edges are the bonds between them.
#[derive(Debug, Clone)]
pub struct LigandGraph {
    graph: UnGraph<GraphAtom, ()>,
    atom_ids: Vec<AtomId>,
}

impl LigandGraph {
    /// Builds the graph of `residue_id`, skipping hydrogens if requested.
    ///
    /// Bonds leaving the residue are ignored. Returns `None` if the residue is unknown.
    pub fn from_residue(
        system: &MolecularSystem,
        residue_id: ResidueId,
        ignore_hydrogens: bool,
    ) -> Option<Self> {
        let residue = system.residue(residue_id)?;
        let mut graph = UnGraph::new_undirected();
        let mut atom_ids = Vec::with_capacity(residue.atoms().len());
        let mut node_of: HashMap<AtomId, NodeIndex> = HashMap::new();

        for (atom_id, atom) in system.residue_atoms(residue_id) {
            if ignore_hydrogens && atom.is_hydrogen() {
                continue;
            }
            let node = graph.add_node(GraphAtom {
                name: atom.name.clone(),
                element: atom.element,
            });
            node_of.insert(atom_id, node);
            atom_ids.push(atom_id);
        }

        for (index, atom_id) in atom_ids.iter().enumerate() {
            let node = NodeIndex::new(index);
            for neighbor in system.get_bonded_neighbors(*atom_id).unwrap_or_default() {
                if let Some(&other) = node_of.get(neighbor) {
                    graph.update_edge(node, other, ());
                }
            }
        }

        Some(Self { graph, atom_ids })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn atom_ids(&self) -> &[AtomId] {
        &self.atom_ids
    }

    pub fn atom(&self, node: usize) -> Option<&GraphAtom> {
        self.graph.node_weight(NodeIndex::new(node))
    }

    fn degree(&self, node: usize) -> usize {
        self.graph.neighbors(NodeIndex::new(node)).count()
    }

    fn adjacent(&self, a: usize, b: usize) -> bool {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    fn sorted_neighbors(&self, node: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(node))
            .map(|n| n.index())
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    fn element_counts(&self) -> HashMap<Element, usize> {
        let mut counts = HashMap::new();
        for atom in self.graph.node_weights() {
            *counts.entry(atom.element).or_insert(0) += 1;
        }
        counts
    }

    /// Cheap necessary condition for isomorphism: equal sizes and element multisets.
    pub fn is_compatible_with(&self, other: &LigandGraph) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && self.element_counts() == other.element_counts()
    }

    /// Enumerates all element- and adjacency-preserving bijections onto `other`.
    ///
    /// Mappings are produced in a deterministic order. An empty vector means the graphs are
    /// not isomorphic.
    ///
    /// # Errors
    ///
    /// Returns [`IsomorphismLimitExceeded`] as soon as more than `limit` mappings are found.
    pub fn isomorphisms(
        &self,
        other: &LigandGraph,
        limit: usize,
    ) -> Result<Vec<NodeMapping>, IsomorphismLimitExceeded> {
        if !self.is_compatible_with(other) {
            return Ok(Vec::new());
        }
        let mut matcher = Matcher::new(self, other, limit);
        matcher.recurse(0)?;
        Ok(matcher.results)
    }
}

struct Matcher<'a> {
    query: &'a LigandGraph,
    target: &'a LigandGraph,
    limit: usize,
    order: Vec<usize>,
    query_map: Vec<Option<usize>>,
    target_map: Vec<Option<usize>>,
    results: Vec<NodeMapping>,
}

impl<'a> Matcher<'a> {
    fn new(query: &'a LigandGraph, target: &'a LigandGraph, limit: usize) -> Self {
        let n = query.node_count();
        Self {
            query,
            target,
            limit,
            order: search_order(query),
            query_map: vec![None; n],
            target_map: vec![None; n],
            results: Vec::new(),
        }
    }

    fn recurse(&mut self, depth: usize) -> Result<(), IsomorphismLimitExceeded> {
        if depth == self.order.len() {
            self.results
                .push(self.query_map.iter().map(|m| m.unwrap_or_default()).collect());
            if self.results.len() > self.limit {
                return Err(IsomorphismLimitExceeded { limit: self.limit });
            }
            return Ok(());
        }

        let query_node = self.order[depth];
        for target_node in self.candidates(query_node) {
            if !self.is_feasible(query_node, target_node) {
                continue;
            }
            self.query_map[query_node] = Some(target_node);
            self.target_map[target_node] = Some(query_node);

            self.recurse(depth + 1)?;

            self.query_map[query_node] = None;
            self.target_map[target_node] = None;
        }
        Ok(())
    }

    /// Unmapped target nodes worth trying for `query_node`. If a neighbor of `query_node` is
    /// already mapped, only neighbors of its image qualify.
    fn candidates(&self, query_node: usize) -> Vec<usize> {
        let anchor = self
            .query
            .sorted_neighbors(query_node)
            .into_iter()
            .find_map(|n| self.query_map[n]);
        let pool = match anchor {
            Some(image) => self.target.sorted_neighbors(image),
            None => (0..self.target.node_count()).collect(),
        };
        pool.into_iter()
            .filter(|&t| self.target_map[t].is_none())
            .collect()
    }

    fn is_feasible(&self, query_node: usize, target_node: usize) -> bool {
        let (Some(q), Some(t)) = (self.query.atom(query_node), self.target.atom(target_node))
        else {
            return false;
        };
        if q.element != t.element || self.query.degree(query_node) != self.target.degree(target_node)
        {
            return false;
        }

        for q_neighbor in self.query.sorted_neighbors(query_node) {
            if let Some(image) = self.query_map[q_neighbor] {
                if !self.target.adjacent(target_node, image) {
                    return false;
                }
            }
        }
        for t_neighbor in self.target.sorted_neighbors(target_node) {
            if let Some(preimage) = self.target_map[t_neighbor] {
                if !self.query.adjacent(query_node, preimage) {
                    return false;
                }
            }
        }
        true
    }
}

/// Breadth-first order over every component, each rooted at its highest-degree node, so that
/// all but the roots have a mapped neighbor when they are reached.
fn search_order(graph: &LigandGraph) -> Vec<usize> {
    let n = graph.node_count();
    let mut by_degree: Vec<usize> = (0..n).collect();
    by_degree.sort_by(|&a, &b| graph.degree(b).cmp(&graph.degree(a)).then(a.cmp(&b)));

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for root in by_degree {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for neighbor in graph.sorted_neighbors(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }
    order
}
