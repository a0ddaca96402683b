//! In-memory bipartite paper/author graph.
//!
//! Backed by an undirected `petgraph` graph plus a key index. Nodes and edges
//! are only ever added, so petgraph's dense indices double as insertion order
//! for [`BipartiteGraph::nodes`] and [`BipartiteGraph::edges`].

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Which side of the bipartition a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// A paper, keyed by arXiv identifier.
    Paper,
    /// An author, keyed by canonical name.
    Author,
}

impl Partition {
    /// Tag written to the `bipartite` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Author => "author",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Paper attributes, fixed at creation.
    Paper {
        /// Title.
        title: String,
        /// Abstract.
        summary: String,
        /// Publication timestamp.
        publish_date: Option<DateTime<FixedOffset>>,
    },
    /// Authors carry no attributes beyond their key.
    Author,
}

impl NodeData {
    /// Partition this payload belongs to.
    #[must_use]
    pub const fn partition(&self) -> Partition {
        match self {
            Self::Paper { .. } => Partition::Paper,
            Self::Author => Partition::Author,
        }
    }
}

/// A keyed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique key (paper id or canonical author name).
    pub key: String,
    /// Attributes.
    pub data: NodeData,
}

/// Bipartite graph for one (category, year) run.
#[derive(Debug, Default, Clone)]
pub struct BipartiteGraph {
    inner: UnGraph<Node, ()>,
    index: HashMap<String, NodeIndex>,
}

impl BipartiteGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a paper node unless `id` is already present.
    ///
    /// Returns `true` when a node was created. Existing nodes are left untouched.
    pub fn add_paper(
        &mut self,
        id: &str,
        title: String,
        summary: String,
        publish_date: Option<DateTime<FixedOffset>>,
    ) -> bool {
        self.insert(id, NodeData::Paper { title, summary, publish_date })
    }

    /// Insert an author node unless `name` is already present.
    ///
    /// Returns `true` when a node was created. An existing key keeps its
    /// original partition, even if that is [`Partition::Paper`].
    pub fn add_author(&mut self, name: &str) -> bool {
        self.insert(name, NodeData::Author)
    }

    fn insert(&mut self, key: &str, data: NodeData) -> bool {
        if self.index.contains_key(key) {
            return false;
        }
        let idx = self.inner.add_node(Node { key: key.to_string(), data });
        self.index.insert(key.to_string(), idx);
        true
    }

    /// Link `author` and `paper`; both keys must already exist.
    ///
    /// Returns `true` when a new edge was created, `false` when the pair was
    /// already linked or either key is unknown.
    pub fn link(&mut self, author: &str, paper: &str) -> bool {
        let (Some(&a), Some(&p)) = (self.index.get(author), self.index.get(paper)) else {
            return false;
        };
        if self.inner.find_edge(a, p).is_some() {
            return false;
        }
        self.inner.add_edge(a, p, ());
        true
    }

    /// Whether `key` names a node.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Look up a node by key.
    #[must_use]
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.index.get(key).map(|&idx| &self.inner[idx])
    }

    /// Partition of the node named `key`.
    #[must_use]
    pub fn partition(&self, key: &str) -> Option<Partition> {
        self.node(key).map(|n| n.data.partition())
    }

    /// Whether `author` and `paper` are linked.
    #[must_use]
    pub fn has_edge(&self, author: &str, paper: &str) -> bool {
        match (self.index.get(author), self.index.get(paper)) {
            (Some(&a), Some(&p)) => self.inner.find_edge(a, p).is_some(),
            _ => false,
        }
    }

    /// Every node key, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.node_weights().map(|n| n.key.as_str())
    }

    /// Every node, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.node_weights()
    }

    /// Every edge as `(first, second)` keys in insertion order.
    ///
    /// `first` is the endpoint given as `author` to [`Self::link`].
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.edge_references().map(|e| {
            (self.inner[e.source()].key.as_str(), self.inner[e.target()].key.as_str())
        })
    }

    /// Total node count.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total edge count.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Number of nodes in `partition`.
    #[must_use]
    pub fn count(&self, partition: Partition) -> usize {
        self.nodes().filter(|n| n.data.partition() == partition).count()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }
}
