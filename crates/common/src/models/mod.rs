//! Domain models shared across services

mod graph;
mod paper;

pub use graph::{GraphData, GraphLink, GraphMetadata, GraphNode, LinkType, NodeData, NodeType};
pub use paper::{Paper, SearchResult};

/// Normalize a display name into an id fragment: lowercase, whitespace runs
/// collapsed into a single `-`.
pub fn slug(text: &str) -> String {
    text.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::slug;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Geoffrey Hinton"), "geoffrey-hinton");
        assert_eq!(slug("  Deep   Learning "), "deep-learning");
        assert_eq!(slug("NLP"), "nlp");
        assert_eq!(slug(""), "");
    }
}
