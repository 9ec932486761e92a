//! Graph: node and edge tables with adjacency by index.
//!
//! Re-entrancy is expressed by several edges pointing at the same
//! `NodeId`; nodes are never duplicated and no pointer cycles exist.

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::{Edge, EdgeId, Literal, Node, NodeId, NodeKind, Role};
use crate::{Error, Result};

type EdgeList = SmallVec<[EdgeId; 4]>;

/// A rooted, possibly re-entrant, directed labeled graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    outgoing: Vec<EdgeList>,
    incoming: Vec<EdgeList>,
    /// concept name → node
    variables: HashMap<String, NodeId>,
    root: Option<NodeId>,
}

/// One statement of the graph's semantic content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Triple {
    /// `(var, instance, concept)`
    Instance { variable: String, concept: String },
    /// `(var, role, var)` in surface orientation.
    Relation { source: String, role: String, target: String },
    /// `(var, role, constant)`
    Attribute { source: String, role: String, value: String },
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Add a concept node. Names must be unique among concepts.
    pub fn add_concept(&mut self, name: Option<&str>, concept: impl Into<String>) -> Result<NodeId> {
        let id = self.next_node_id();
        let mut node = Node::concept(id, concept);
        if let Some(name) = name {
            if self.variables.contains_key(name) {
                return Err(Error::MalformedRecord(format!("duplicate concept name '{name}'")));
            }
            self.variables.insert(name.to_string(), id);
            node = node.with_name(name);
        }
        self.push_node(node);
        Ok(id)
    }

    /// Add a constant leaf. It must be attached with exactly one edge.
    pub fn add_constant(&mut self, name: Option<&str>, value: Literal) -> NodeId {
        let id = self.next_node_id();
        let mut node = Node::constant(id, value);
        if let Some(name) = name {
            node = node.with_name(name);
        }
        self.push_node(node);
        id
    }

    /// Add a relation from `parent` to `child`.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId, role: Role, referent: bool) -> Result<EdgeId> {
        let parent_node = self.node(parent)
            .ok_or_else(|| Error::MalformedRecord(format!("unknown parent node {parent}")))?;
        if parent_node.is_constant() {
            return Err(Error::MalformedRecord(format!(
                "constant '{}' cannot have outgoing relations", parent_node.label()
            )));
        }
        let child_node = self.node(child)
            .ok_or_else(|| Error::MalformedRecord(format!("unknown child node {child}")))?;
        if child_node.is_constant() && !self.incoming[child.index()].is_empty() {
            return Err(Error::MalformedRecord(format!(
                "constant '{}' is attached more than once", child_node.label()
            )));
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge::new(id, parent, child, role).with_referent(referent));
        self.outgoing[parent.index()].push(id);
        self.incoming[child.index()].push(id);
        Ok(id)
    }

    /// Pin the root. Without it, the first parentless concept is the root.
    pub fn set_root(&mut self, root: NodeId) -> Result<()> {
        match self.node(root) {
            Some(n) if n.is_concept() => {
                self.root = Some(root);
                Ok(())
            }
            Some(n) => Err(Error::MalformedRecord(format!("constant '{}' cannot be a root", n.label()))),
            None => Err(Error::MalformedRecord(format!("unknown root node {root}"))),
        }
    }

    fn next_node_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }

    fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
        self.outgoing.push(EdgeList::new());
        self.incoming.push(EdgeList::new());
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Concept node bound to a Penman variable.
    pub fn by_name(&self, name: &str) -> Option<NodeId> {
        self.variables.get(name).copied()
    }

    /// Outgoing edges in insertion order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing
            .get(id.index())
            .into_iter()
            .flat_map(|list| list.iter())
            .map(move |e| &self.edges[e.index()])
    }

    /// Incoming edges in insertion order.
    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming
            .get(id.index())
            .into_iter()
            .flat_map(|list| list.iter())
            .map(move |e| &self.edges[e.index()])
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.incoming.get(id.index()).map_or(0, |l| l.len())
    }

    // ========================================================================
    // Roots and reachability
    // ========================================================================

    /// The root: the pinned one, or else the first parentless concept.
    pub fn root(&self) -> Option<NodeId> {
        self.root.or_else(|| self.parentless_concepts().next())
    }

    /// The root first, then every other parentless concept in insertion
    /// order. Each starts one printed tree.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self.root.into_iter().collect();
        roots.extend(self.parentless_concepts().filter(|id| Some(*id) != self.root));
        roots
    }

    fn parentless_concepts(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.is_concept() && self.incoming[n.id.index()].is_empty())
            .map(|n| n.id)
    }

    /// Nodes reached by following edges from every root, in discovery order.
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        for root in self.roots() {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                if std::mem::replace(&mut seen[id.index()], true) {
                    continue;
                }
                order.push(id);
                let children: Vec<NodeId> = self.outgoing(id).map(|e| e.child).collect();
                stack.extend(children.into_iter().rev().filter(|c| !seen[c.index()]));
            }
        }
        order
    }

    /// First node no root can reach.
    pub fn first_unreachable(&self) -> Option<&Node> {
        let mut seen = vec![false; self.nodes.len()];
        for id in self.reachable() {
            seen[id.index()] = true;
        }
        self.nodes.iter().find(|n| !seen[n.id.index()])
    }

    // ========================================================================
    // Semantic view
    // ========================================================================

    /// Instance, relation and attribute triples, sorted.
    ///
    /// Two graphs with the same variables and the same triples carry the
    /// same content regardless of print order or layout.
    pub fn triples(&self) -> Vec<Triple> {
        let var = |id: NodeId| -> String {
            self.nodes[id.index()].name.clone().unwrap_or_else(|| format!("#{id}"))
        };
        let mut triples = Vec::with_capacity(self.nodes.len() + self.edges.len());
        for node in &self.nodes {
            if let NodeKind::Concept(concept) = &node.kind {
                triples.push(Triple::Instance { variable: var(node.id), concept: concept.clone() });
            }
        }
        for edge in &self.edges {
            let child = &self.nodes[edge.child.index()];
            let role = edge.role.printed();
            triples.push(match &child.kind {
                NodeKind::Concept(_) => Triple::Relation {
                    source: var(edge.parent),
                    role,
                    target: var(edge.child),
                },
                NodeKind::Constant(value) => Triple::Attribute {
                    source: var(edge.parent),
                    role,
                    value: value.to_text(),
                },
            });
        }
        triples.sort();
        triples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn want_graph() -> Graph {
        // The boy wants the girl not to believe him
        let mut g = Graph::new();
        let boy = g.add_concept(Some("c0"), "boy").unwrap();
        let want = g.add_concept(Some("c1"), "want-01").unwrap();
        let girl = g.add_concept(Some("c2"), "girl").unwrap();
        let believe = g.add_concept(Some("c3"), "believe-01").unwrap();
        g.add_edge(want, boy, Role::new("ARG0"), false).unwrap();
        g.add_edge(want, believe, Role::new("ARG1"), false).unwrap();
        g.add_edge(believe, girl, Role::new("ARG0"), false).unwrap();
        g.add_edge(believe, boy, Role::new("ARG1"), true).unwrap();
        let neg = g.add_constant(None, Literal::from_text("-"));
        g.add_edge(believe, neg, Role::new("polarity"), false).unwrap();
        g
    }

    #[test]
    fn test_child_and_parent_relations() {
        let g = want_graph();
        let c0 = g.by_name("c0").unwrap();
        let c1 = g.by_name("c1").unwrap();
        let c3 = g.by_name("c3").unwrap();

        assert_eq!(g.outgoing(c0).count(), 0);
        let kids: Vec<_> = g.outgoing(c1).map(|e| e.child).collect();
        assert_eq!(kids, vec![c0, c3]);
        let parents: Vec<_> = g.incoming(c0).map(|e| e.parent).collect();
        assert_eq!(parents, vec![c1, c3]);
        assert_eq!(g.incoming(c1).count(), 0);
    }

    #[test]
    fn test_roots() {
        let g = want_graph();
        let c1 = g.by_name("c1").unwrap();
        assert_eq!(g.root(), Some(c1));
        assert_eq!(g.roots(), vec![c1]);
        assert!(g.first_unreachable().is_none());
    }

    #[test]
    fn test_roots_with_fragment() {
        let mut g = want_graph();
        let extra = g.add_concept(Some("c4"), "say-01").unwrap();
        let c1 = g.by_name("c1").unwrap();
        assert_eq!(g.roots(), vec![c1, extra]);
    }

    #[test]
    fn test_pinned_root_with_incoming_edge() {
        let mut g = Graph::new();
        let a = g.add_concept(Some("a"), "a").unwrap();
        let b = g.add_concept(Some("b"), "b").unwrap();
        g.add_edge(a, b, Role::new("ARG0"), false).unwrap();
        g.add_edge(b, a, Role::new("ARG1"), true).unwrap();
        assert_eq!(g.root(), None);
        assert!(g.first_unreachable().is_some());
        g.set_root(a).unwrap();
        assert_eq!(g.roots(), vec![a]);
        assert!(g.first_unreachable().is_none());
    }

    #[test]
    fn test_duplicate_concept_name_rejected() {
        let mut g = Graph::new();
        g.add_concept(Some("x"), "a").unwrap();
        assert!(matches!(g.add_concept(Some("x"), "b"), Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn test_constant_constraints() {
        let mut g = Graph::new();
        let a = g.add_concept(Some("a"), "a").unwrap();
        let b = g.add_concept(Some("b"), "b").unwrap();
        let k = g.add_constant(None, Literal::from(5));
        g.add_edge(a, k, Role::new("quant"), false).unwrap();
        assert!(g.add_edge(b, k, Role::new("quant"), false).is_err());
        assert!(g.add_edge(k, a, Role::new("mod"), false).is_err());
        assert!(g.set_root(k).is_err());
    }

    #[test]
    fn test_triples() {
        let g = want_graph();
        let triples = g.triples();
        assert_eq!(triples.len(), 4 + 5);
        assert!(triples.contains(&Triple::Relation {
            source: "c3".into(), role: "ARG1".into(), target: "c0".into(),
        }));
        assert!(triples.contains(&Triple::Attribute {
            source: "c3".into(), role: "polarity".into(), value: "-".into(),
        }));
    }
}
