//! Keyword clustering

use super::round_half_up;
use crate::models::Paper;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MAX_CLUSTERS: usize = 20;
const PAPERS_PER_CLUSTER: usize = 5;

/// Years counted as recent, the current one included
const RECENT_WINDOW_YEARS: i32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCluster {
    pub keyword: String,
    pub count: usize,
    pub growth: i64,
    /// Ids of the first papers carrying the keyword
    pub related_papers: Vec<String>,
}

#[derive(Default)]
struct Tally<'a> {
    recent: usize,
    older: usize,
    papers: Vec<&'a str>,
}

/// Group papers by keyword and estimate growth of each group.
///
/// Growth compares papers from the last two years against older ones and
/// is reported as 100 when there are no older papers.
pub fn keyword_clusters(papers: &[Paper], current_year: i32) -> Vec<KeywordCluster> {
    let cutoff = current_year - RECENT_WINDOW_YEARS;
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for paper in papers {
        for keyword in &paper.keywords {
            let tally = tallies.entry(keyword.as_str()).or_insert_with(|| {
                order.push(keyword.as_str());
                Tally::default()
            });
            if paper.year >= cutoff {
                tally.recent += 1;
            } else {
                tally.older += 1;
            }
            tally.papers.push(paper.id.as_str());
        }
    }

    let mut clusters: Vec<KeywordCluster> = order
        .into_iter()
        .map(|keyword| {
            let tally = &tallies[keyword];
            let growth = if tally.older > 0 {
                let change = tally.recent as f64 - tally.older as f64;
                round_half_up(change / tally.older as f64 * 100.0)
            } else {
                100
            };

            KeywordCluster {
                keyword: keyword.to_string(),
                count: tally.papers.len(),
                growth,
                related_papers: tally
                    .papers
                    .iter()
                    .take(PAPERS_PER_CLUSTER)
                    .map(|id| id.to_string())
                    .collect(),
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.count.cmp(&a.count));
    clusters.truncate(MAX_CLUSTERS);
    clusters
}
