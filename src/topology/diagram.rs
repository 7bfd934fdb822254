//! Diagram model and builder.
//!
//! Nodes, clusters and edges are stored in declaration order and referenced by
//! index. The builder hands out ids as things are declared, and `build`
//! re-checks every reference so a `Diagram` never points at something that
//! does not exist.

use crate::Result;
use crate::topology::Category;

use anyhow::bail;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ClusterId(pub usize);

/// Layout direction (Graphviz `rankdir`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TB => "TB",
            Direction::BT => "BT",
            Direction::LR => "LR",
            Direction::RL => "RL",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub label: String,
    pub parent: Option<ClusterId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub label: String,
    pub category: Category,
    pub cluster: Option<ClusterId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Bold,
}

impl LineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
            LineStyle::Bold => "bold",
        }
    }
}

/// Optional display attributes of an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EdgeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl EdgeStyle {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn dashed(color: impl Into<String>) -> Self {
        Self {
            line: Some(LineStyle::Dashed),
            color: Some(color.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(flatten)]
    pub style: EdgeStyle,
}

/// A validated topology, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    pub title: String,
    pub direction: Direction,
    pub graph_attrs: BTreeMap<String, String>,
    pub clusters: Vec<Cluster>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    /// Clusters whose parent is `parent` (`None` = top level), in declaration order.
    pub fn child_clusters(&self, parent: Option<ClusterId>) -> Vec<ClusterId> {
        self.clusters
            .iter()
            .enumerate()
            .filter(|(_, c)| c.parent == parent)
            .map(|(i, _)| ClusterId(i))
            .collect()
    }

    /// Nodes placed directly in `cluster` (`None` = outside any cluster).
    pub fn nodes_in(&self, cluster: Option<ClusterId>) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.cluster == cluster)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Nesting depth of a cluster; top-level clusters are depth 0.
    pub fn cluster_depth(&self, id: ClusterId) -> usize {
        let mut depth = 0;
        let mut cur = self.clusters.get(id.0).and_then(|c| c.parent);
        while let Some(p) = cur {
            depth += 1;
            cur = self.clusters.get(p.0).and_then(|c| c.parent);
        }
        depth
    }
}

#[derive(Debug, Clone)]
pub struct DiagramBuilder {
    title: String,
    direction: Direction,
    graph_attrs: BTreeMap<String, String>,
    clusters: Vec<Cluster>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl DiagramBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            direction: Direction::default(),
            graph_attrs: BTreeMap::new(),
            clusters: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Extra Graphviz graph attribute; overrides the rendering defaults.
    pub fn graph_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.graph_attrs.insert(key.into(), value.into());
        self
    }

    pub fn cluster(&mut self, label: impl Into<String>, parent: Option<ClusterId>) -> ClusterId {
        self.clusters.push(Cluster {
            label: label.into(),
            parent,
        });
        ClusterId(self.clusters.len() - 1)
    }

    pub fn node(
        &mut self,
        label: impl Into<String>,
        category: Category,
        cluster: Option<ClusterId>,
    ) -> NodeId {
        self.nodes.push(Node {
            label: label.into(),
            category,
            cluster,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn edge(&mut self, from: NodeId, to: NodeId) {
        self.edge_styled(from, to, EdgeStyle::default());
    }

    pub fn edge_styled(&mut self, from: NodeId, to: NodeId, style: EdgeStyle) {
        self.edges.push(Edge { from, to, style });
    }

    /// Validate references and build the diagram:
    /// - at least one node
    /// - cluster parents are declared before their children (no cycles)
    /// - node clusters exist
    /// - edge endpoints exist
    pub fn build(self) -> Result<Diagram> {
        if self.nodes.is_empty() {
            bail!("diagram {:?} contains no nodes", self.title);
        }

        for (idx, cluster) in self.clusters.iter().enumerate() {
            if let Some(parent) = cluster.parent {
                if parent.0 >= idx {
                    bail!(
                        "cluster {} ({:?}) references parent {} which is not declared before it",
                        idx,
                        cluster.label,
                        parent.0
                    );
                }
            }
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            if let Some(c) = node.cluster {
                if c.0 >= self.clusters.len() {
                    bail!(
                        "node {} ({:?}) references missing cluster {}",
                        idx,
                        node.label,
                        c.0
                    );
                }
            }
        }

        for edge in &self.edges {
            for end in [edge.from, edge.to] {
                if end.0 >= self.nodes.len() {
                    bail!(
                        "edge {} -> {} references missing node {}",
                        edge.from.0,
                        edge.to.0,
                        end.0
                    );
                }
            }
        }

        Ok(Diagram {
            title: self.title,
            direction: self.direction,
            graph_attrs: self.graph_attrs,
            clusters: self.clusters,
            nodes: self.nodes,
            edges: self.edges,
        })
    }
}
