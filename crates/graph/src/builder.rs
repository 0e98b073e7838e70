//! Knowledge graph construction
//!
//! Two passes over the input: the first creates nodes and links in paper
//! order with provisional sizes, the second resizes author and keyword
//! nodes once their totals are known.

use scholarnexus_common::config::GraphConfig;
use scholarnexus_common::models::{
    slug, GraphData, GraphLink, GraphMetadata, GraphNode, LinkType, NodeData, NodeType, Paper,
};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::debug;

/// Size of the query node
pub const ROOT_SIZE: f64 = 35.0;

/// Title characters kept in a paper label
pub const TITLE_DISPLAY_LEN: usize = 40;

const PAPER_BASE_SIZE: f64 = 12.0;
const PAPER_SIZE_SCALE: f64 = 5.0;
const PAPER_MAX_SIZE: f64 = 30.0;

const AUTHOR_BASE_SIZE: f64 = 12.0;
const AUTHOR_SIZE_SCALE: f64 = 3.0;
const AUTHOR_MAX_SIZE: f64 = 25.0;

const KEYWORD_BASE_SIZE: f64 = 15.0;
const KEYWORD_SIZE_SCALE: f64 = 2.0;
const KEYWORD_MAX_SIZE: f64 = 25.0;

const ROOT_LINK_WEIGHT: u32 = 2;
const AUTHOR_LINK_WEIGHT: u32 = 2;
const KEYWORD_LINK_WEIGHT: u32 = 1;
const COAUTHOR_LINK_WEIGHT: u32 = 1;
const CITATION_LINK_WEIGHT: u32 = 3;

/// Size of a paper node: grows with `log10(citations + 1)`, capped
pub fn paper_size(citations: u64) -> f64 {
    (PAPER_BASE_SIZE + ((citations as f64) + 1.0).log10() * PAPER_SIZE_SCALE).min(PAPER_MAX_SIZE)
}

/// Size of an author node from the number of papers linked to it
pub fn author_size(paper_count: usize) -> f64 {
    (AUTHOR_BASE_SIZE + paper_count as f64 * AUTHOR_SIZE_SCALE).min(AUTHOR_MAX_SIZE)
}

/// Size of a keyword node from its occurrence count
pub fn keyword_size(occurrences: usize) -> f64 {
    (KEYWORD_BASE_SIZE + occurrences as f64 * KEYWORD_SIZE_SCALE).min(KEYWORD_MAX_SIZE)
}

/// Paper label: title cut to `TITLE_DISPLAY_LEN` characters plus `...`
pub fn paper_label(title: &str) -> String {
    if title.chars().count() > TITLE_DISPLAY_LEN {
        let head: String = title.chars().take(TITLE_DISPLAY_LEN).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

/// Graph construction options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Authors linked per paper, in author order
    pub max_authors_per_paper: usize,

    /// Keywords linked per paper, in keyword order
    pub max_keywords_per_paper: usize,

    /// Link authors appearing on the same paper to each other
    pub coauthor_links: bool,

    /// Link papers to the papers they reference when both are present
    pub citation_links: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            max_authors_per_paper: 3,
            max_keywords_per_paper: 3,
            coauthor_links: true,
            citation_links: true,
        }
    }
}

impl From<&GraphConfig> for BuilderOptions {
    fn from(config: &GraphConfig) -> Self {
        Self {
            max_authors_per_paper: config.max_authors_per_paper,
            max_keywords_per_paper: config.max_keywords_per_paper,
            coauthor_links: config.coauthor_links,
            ..Self::default()
        }
    }
}

/// Nodes in first-insertion order, addressable by id
#[derive(Default)]
struct NodeSet {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
}

impl NodeSet {
    /// Insert or replace in place, keeping the original position
    fn upsert(&mut self, node: GraphNode) {
        match self.index.get(&node.id) {
            Some(&position) => self.nodes[position] = node,
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Insert only when absent
    fn ensure(&mut self, node: GraphNode) {
        if !self.contains(&node.id) {
            self.upsert(node);
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn resize(&mut self, id: &str, size: f64) {
        if let Some(&position) = self.index.get(id) {
            self.nodes[position].size = size;
        }
    }
}

/// Builds a `GraphData` from papers
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: BuilderOptions,
}

impl GraphBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        Self { options }
    }

    /// Build the graph for `papers` found under `query`.
    ///
    /// Deterministic for a given input apart from `metadata.buildTime`.
    pub fn build(&self, papers: &[Paper], query: &str) -> GraphData {
        let start = Instant::now();
        let query_slug = slug(query);
        let root_id = format!("query-{}", query_slug);

        let mut nodes = NodeSet::default();
        let mut links: Vec<GraphLink> = Vec::new();

        // author id -> distinct paper node ids
        let mut author_papers: HashMap<String, Vec<String>> = HashMap::new();
        let mut keyword_counts: HashMap<String, usize> = HashMap::new();
        let mut coauthor_pairs: HashSet<(String, String)> = HashSet::new();

        nodes.upsert(GraphNode::new(
            root_id.clone(),
            query,
            ROOT_SIZE,
            NodeData::Keyword {
                keyword: query.to_string(),
                is_query: true,
            },
        ));

        for paper in papers {
            let paper_id = format!("paper-{}", paper.id);

            nodes.upsert(GraphNode::new(
                paper_id.clone(),
                paper_label(&paper.title),
                paper_size(paper.citations),
                NodeData::Paper(Box::new(paper.clone())),
            ));
            links.push(GraphLink::new(&root_id, &paper_id, ROOT_LINK_WEIGHT, LinkType::Keyword));

            let mut paper_authors: Vec<String> = Vec::new();
            for name in paper.authors.iter().take(self.options.max_authors_per_paper) {
                let name_slug = slug(name);
                if name_slug.is_empty() {
                    continue;
                }
                let author_id = format!("author-{}", name_slug);

                nodes.ensure(GraphNode::new(
                    author_id.clone(),
                    name.as_str(),
                    AUTHOR_BASE_SIZE,
                    NodeData::Author { name: name.clone() },
                ));

                let linked = author_papers.entry(author_id.clone()).or_default();
                if !linked.contains(&paper_id) {
                    linked.push(paper_id.clone());
                }

                links.push(GraphLink::new(
                    &author_id,
                    &paper_id,
                    AUTHOR_LINK_WEIGHT,
                    LinkType::Coauthor,
                ));
                if !paper_authors.contains(&author_id) {
                    paper_authors.push(author_id);
                }
            }

            if self.options.coauthor_links {
                for (i, first) in paper_authors.iter().enumerate() {
                    for second in &paper_authors[i + 1..] {
                        let pair = if first < second {
                            (first.clone(), second.clone())
                        } else {
                            (second.clone(), first.clone())
                        };
                        if coauthor_pairs.insert(pair) {
                            links.push(GraphLink::new(
                                first,
                                second,
                                COAUTHOR_LINK_WEIGHT,
                                LinkType::Coauthor,
                            ));
                        }
                    }
                }
            }

            for keyword in paper.keywords.iter().take(self.options.max_keywords_per_paper) {
                let keyword_slug = slug(keyword);
                // the root already stands for the query term
                if keyword_slug.is_empty() || keyword_slug == query_slug {
                    continue;
                }
                let keyword_id = format!("keyword-{}", keyword_slug);

                nodes.ensure(GraphNode::new(
                    keyword_id.clone(),
                    keyword.as_str(),
                    KEYWORD_BASE_SIZE,
                    NodeData::Keyword {
                        keyword: keyword.clone(),
                        is_query: false,
                    },
                ));
                *keyword_counts.entry(keyword_id.clone()).or_insert(0) += 1;

                links.push(GraphLink::new(
                    &keyword_id,
                    &paper_id,
                    KEYWORD_LINK_WEIGHT,
                    LinkType::Keyword,
                ));
            }
        }

        for (author_id, linked) in &author_papers {
            nodes.resize(author_id, author_size(linked.len()));
        }
        for (keyword_id, count) in &keyword_counts {
            nodes.resize(keyword_id, keyword_size(*count));
        }

        if self.options.citation_links {
            links.extend(citation_links(papers, &nodes));
        }

        let nodes = nodes.nodes;
        debug!(query, nodes = nodes.len(), links = links.len(), "Built knowledge graph");

        GraphData {
            metadata: GraphMetadata {
                total_nodes: nodes.len(),
                total_links: links.len(),
                build_time: start.elapsed().as_millis() as u64,
                query: query.to_string(),
            },
            nodes,
            links,
        }
    }
}

/// Paper-to-reference links between papers that are both in the graph
fn citation_links(papers: &[Paper], nodes: &NodeSet) -> Vec<GraphLink> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut links = Vec::new();

    for paper in papers {
        let source = format!("paper-{}", paper.id);
        for reference in &paper.references {
            if *reference == paper.id {
                continue;
            }
            let target = format!("paper-{}", reference);
            if !nodes.contains(&target) {
                continue;
            }
            if seen.insert((source.clone(), target.clone())) {
                links.push(GraphLink::new(
                    &source,
                    target,
                    CITATION_LINK_WEIGHT,
                    LinkType::Citation,
                ));
            }
        }
    }

    links
}

/// Build with default options
pub fn build(papers: &[Paper], query: &str) -> GraphData {
    GraphBuilder::default().build(papers, query)
}

/// Count nodes of one type
pub fn count_nodes(graph: &GraphData, node_type: NodeType) -> usize {
    graph.nodes.iter().filter(|n| n.node_type() == node_type).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, authors: &[&str], keywords: &[&str], citations: u64) -> Paper {
        Paper {
            id: id.to_string(),
            title: format!("Paper {}", id),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            year: 2020,
            citations,
            abstract_text: String::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            venue: String::new(),
            doi: None,
            url: None,
            open_access: false,
            references: vec![],
        }
    }

    fn assert_endpoints_present(graph: &GraphData) {
        for link in &graph.links {
            assert!(graph.node(&link.source).is_some(), "missing source {}", link.source);
            assert!(graph.node(&link.target).is_some(), "missing target {}", link.target);
        }
    }

    fn assert_unique_ids(graph: &GraphData) {
        let ids: HashSet<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len());
    }

    #[test]
    fn test_empty_input_yields_root_only() {
        let graph = build(&[], "Graph Neural Network");

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.links.is_empty());

        let root = graph.root().unwrap();
        assert_eq!(root.id, "query-graph-neural-network");
        assert_eq!(root.size, ROOT_SIZE);
        assert_eq!(root.node_type(), NodeType::Keyword);
        assert_eq!(graph.metadata.total_nodes, 1);
        assert_eq!(graph.metadata.total_links, 0);
        assert_eq!(graph.metadata.query, "Graph Neural Network");
    }

    #[test]
    fn test_single_paper_shape() {
        let papers = vec![paper("1", &["A", "B"], &["X", "Y"], 0)];
        let graph = build(&papers, "q");

        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["query-q", "paper-1", "author-a", "author-b", "keyword-x", "keyword-y"]
        );

        let root_links = graph.links.iter().filter(|l| l.source == "query-q").count();
        assert_eq!(root_links, 1);

        let author_links: Vec<_> = graph
            .links
            .iter()
            .filter(|l| l.source.starts_with("author-") && l.target == "paper-1")
            .collect();
        assert_eq!(author_links.len(), 2);
        assert!(author_links.iter().all(|l| l.weight == 2 && l.link_type == LinkType::Coauthor));

        let keyword_links: Vec<_> = graph
            .links
            .iter()
            .filter(|l| l.source.starts_with("keyword-"))
            .collect();
        assert_eq!(keyword_links.len(), 2);
        assert!(keyword_links.iter().all(|l| l.weight == 1 && l.link_type == LinkType::Keyword));

        // provisional sizes overwritten by the second pass
        assert_eq!(graph.node("author-a").unwrap().size, 15.0);
        assert_eq!(graph.node("keyword-x").unwrap().size, 17.0);
        assert_eq!(graph.node("paper-1").unwrap().size, 12.0);

        assert_endpoints_present(&graph);
    }

    #[test]
    fn test_single_root_and_unique_ids() {
        let papers = vec![
            paper("1", &["Geoffrey Hinton", "Yann LeCun"], &["Deep Learning", "CNN"], 10),
            paper("2", &["geoffrey  hinton"], &["deep learning"], 20),
            paper("1", &["Yann LeCun"], &["CNN"], 30),
        ];
        let graph = build(&papers, "vision");

        let roots = graph.nodes.iter().filter(|n| n.data.is_query_root()).count();
        assert_eq!(roots, 1);
        assert_unique_ids(&graph);
        assert_endpoints_present(&graph);

        // the later duplicate paper overwrites in place
        let overwritten = graph.node("paper-1").unwrap();
        assert_eq!(overwritten.size, paper_size(30));
        assert_eq!(graph.nodes[1].id, "paper-1");
    }

    #[test]
    fn test_build_twice_same_node_ids() {
        let papers = vec![
            paper("1", &["Geoffrey Hinton", "Yann LeCun"], &["Deep Learning", "CNN"], 10),
            paper("2", &["Yoshua Bengio", "Yann LeCun"], &["Deep Learning", "RNN"], 20),
            paper("3", &["Ian Goodfellow"], &["GAN"], 5),
        ];

        let first = build(&papers, "deep learning");
        let second = build(&papers, "deep learning");

        let ids = |graph: &GraphData| graph.nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.links, second.links);
    }

    #[test]
    fn test_author_cap_and_sizes() {
        let papers = vec![
            paper("1", &["A", "B", "C", "D", "E"], &[], 0),
            paper("2", &["A"], &[], 0),
            paper("3", &["A"], &[], 0),
            paper("4", &["A"], &[], 0),
            paper("5", &["A"], &[], 0),
        ];
        let graph = build(&papers, "q");

        assert_eq!(count_nodes(&graph, NodeType::Author), 3);
        assert!(graph.node("author-d").is_none());
        assert!(graph.node("author-e").is_none());

        // five papers: 12 + 15 capped at 25
        assert_eq!(graph.node("author-a").unwrap().size, 25.0);
        assert_eq!(graph.node("author-b").unwrap().size, 15.0);
    }

    #[test]
    fn test_keyword_cap_and_query_skip() {
        let papers = vec![
            paper("1", &[], &["Graph Neural Network", "GCN", "Message Passing", "Spectral"], 0),
            paper("2", &[], &["GCN"], 0),
        ];
        let graph = build(&papers, "graph neural  network");

        assert!(graph.node("keyword-graph-neural-network").is_none());
        assert!(graph.node("keyword-gcn").is_some());
        assert!(graph.node("keyword-message-passing").is_some());
        // fourth keyword is past the cap
        assert!(graph.node("keyword-spectral").is_none());

        assert_eq!(graph.node("keyword-gcn").unwrap().size, 19.0);
        assert!(graph.links.iter().all(|l| l.source != "keyword-graph-neural-network"));
    }

    #[test]
    fn test_paper_size_monotonic_and_capped() {
        let mut previous = 0.0;
        for citations in [0u64, 1, 9, 99, 999, 9_999, 99_999, 999_999] {
            let size = paper_size(citations);
            assert!(size >= previous);
            assert!(size <= 30.0);
            previous = size;
        }
        assert_eq!(paper_size(0), 12.0);
        assert_eq!(paper_size(9), 17.0);
        assert_eq!(paper_size(1_000_000), 30.0);
    }

    #[test]
    fn test_paper_label_truncation() {
        let long = "Attention Is All You Need For Everything Ever Written";
        let label = paper_label(long);
        assert_eq!(label.chars().count(), TITLE_DISPLAY_LEN + 3);
        assert!(label.ends_with("..."));

        let exact = "a".repeat(TITLE_DISPLAY_LEN);
        assert_eq!(paper_label(&exact), exact);
    }

    #[test]
    fn test_coauthor_links_deduplicated() {
        let papers = vec![
            paper("1", &["A", "B", "C"], &[], 0),
            paper("2", &["B", "A"], &[], 0),
        ];
        let graph = build(&papers, "q");

        let coauthor: Vec<_> = graph
            .links
            .iter()
            .filter(|l| l.source.starts_with("author-") && l.target.starts_with("author-"))
            .collect();
        assert_eq!(coauthor.len(), 3);
        assert!(coauthor.iter().all(|l| l.weight == 1 && l.link_type == LinkType::Coauthor));

        let reversed = build(&[papers[1].clone(), papers[0].clone()], "q");
        let pairs = |g: &GraphData| {
            g.links
                .iter()
                .filter(|l| l.source.starts_with("author-") && l.target.starts_with("author-"))
                .map(|l| {
                    let mut pair = [l.source.clone(), l.target.clone()];
                    pair.sort();
                    pair
                })
                .collect::<HashSet<_>>()
        };
        assert_eq!(pairs(&graph), pairs(&reversed));
    }

    #[test]
    fn test_coauthor_links_can_be_disabled() {
        let builder = GraphBuilder::new(BuilderOptions {
            coauthor_links: false,
            ..BuilderOptions::default()
        });
        let graph = builder.build(&[paper("1", &["A", "B"], &[], 0)], "q");
        assert!(graph.links.iter().all(|l| !l.target.starts_with("author-")));
    }

    #[test]
    fn test_citation_links_only_between_present_papers() {
        let mut citing = paper("1", &[], &[], 0);
        citing.references = vec!["2".into(), "missing".into(), "2".into(), "1".into()];
        let cited = paper("2", &[], &[], 0);

        // reference appears before its target paper in the input
        let graph = build(&[citing, cited], "q");

        let citations: Vec<_> = graph
            .links
            .iter()
            .filter(|l| l.link_type == LinkType::Citation)
            .collect();
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].source, "paper-1");
        assert_eq!(citations[0].target, "paper-2");
        assert_eq!(citations[0].weight, 3);
        assert_endpoints_present(&graph);
    }

    #[test]
    fn test_missing_optional_fields_are_safe() {
        let json = r#"[{ "id": "x", "title": "Untitled", "year": 2021 }]"#;
        let papers: Vec<Paper> = serde_json::from_str(json).unwrap();
        let graph = build(&papers, "q");

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links.len(), 1);
    }

    #[test]
    fn test_metadata_counts() {
        let papers = vec![paper("1", &["A"], &["K"], 5)];
        let graph = build(&papers, "q");
        assert_eq!(graph.metadata.total_nodes, graph.nodes.len());
        assert_eq!(graph.metadata.total_links, graph.links.len());
    }
}
