//! Knowledge graph shapes shared by the builder and the HTTP layer

use super::Paper;
use serde::{Deserialize, Serialize};

/// Kind of entity a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Paper,
    Author,
    Keyword,
    Institution,
}

impl NodeType {
    /// Display color, a pure function of the node type
    pub fn color(&self) -> &'static str {
        match self {
            NodeType::Paper => "#1e3a5f",
            NodeType::Author => "#722f37",
            NodeType::Keyword => "#228b22",
            NodeType::Institution => "#b8860b",
        }
    }
}

/// Node payload, tagged by the node type on the wire (`type` + `data`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeData {
    Paper(Box<Paper>),
    Author {
        name: String,
    },
    Keyword {
        keyword: String,
        #[serde(rename = "isQuery", default)]
        is_query: bool,
    },
    Institution {
        name: String,
    },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Paper(_) => NodeType::Paper,
            NodeData::Author { .. } => NodeType::Author,
            NodeData::Keyword { .. } => NodeType::Keyword,
            NodeData::Institution { .. } => NodeType::Institution,
        }
    }

    /// True for the synthetic node standing for the search term
    pub fn is_query_root(&self) -> bool {
        matches!(self, NodeData::Keyword { is_query: true, .. })
    }
}

/// A node of the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub size: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(flatten)]
    pub data: NodeData,
}

impl GraphNode {
    /// Create a node; the color follows from the payload's type
    pub fn new(id: impl Into<String>, label: impl Into<String>, size: f64, data: NodeData) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            size,
            color: data.node_type().color().to_string(),
            x: None,
            y: None,
            data,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }
}

/// Relationship carried by a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Citation,
    Coauthor,
    Keyword,
    Affiliation,
}

/// A weighted, typed edge. Stored directed, rendered undirected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub weight: u32,
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

impl GraphLink {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        weight: u32,
        link_type: LinkType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            link_type,
        }
    }
}

/// Diagnostics attached to a built graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub total_nodes: usize,
    pub total_links: usize,
    /// Build duration in milliseconds
    pub build_time: u64,
    pub query: String,
}

/// Builder output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub metadata: GraphMetadata,
}

impl GraphData {
    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The synthetic query node, if present
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.data.is_query_root())
    }
}
