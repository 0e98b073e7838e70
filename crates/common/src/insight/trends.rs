//! Keyword trend classification

use super::round_half_up;
use crate::models::Paper;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trends returned per analysis
const MAX_TRENDS: usize = 10;

/// Co-occurring keywords listed per trend
const MAX_RELATED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendKind {
    Hot,
    Rising,
    Stable,
    Declining,
}

impl TrendKind {
    /// Classify a growth percentage
    pub fn from_growth(growth: i64) -> Self {
        if growth > 50 {
            TrendKind::Hot
        } else if growth > 20 {
            TrendKind::Rising
        } else if growth > -10 {
            TrendKind::Stable
        } else {
            TrendKind::Declining
        }
    }

    fn phrase(&self) -> &'static str {
        match self {
            TrendKind::Hot => "is growing rapidly",
            TrendKind::Rising => "is on the rise",
            TrendKind::Stable => "remains stable",
            TrendKind::Declining => "is declining",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub topic: String,
    /// Percentage change between the recent and the earlier window
    pub growth: i64,
    pub papers: usize,
    pub description: String,
    pub related_keywords: Vec<String>,
    pub trend: TrendKind,
}

/// Keywords co-occurring with `keyword`, most frequent first
fn related_keywords(keyword: &str, papers: &[Paper]) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for paper in papers.iter().filter(|p| p.keywords.iter().any(|k| k == keyword)) {
        for other in paper.keywords.iter().filter(|k| *k != keyword) {
            let count = counts.entry(other.as_str()).or_insert_with(|| {
                order.push(other.as_str());
                0
            });
            *count += 1;
        }
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(MAX_RELATED).map(str::to_string).collect()
}

/// Rank keywords by growth between recent years and the years before.
///
/// The recent count is the current year's, or last year's when that is
/// zero. The earlier count is taken two years back, then three, and is 1
/// when both are zero.
pub fn analyze_trends(papers: &[Paper], current_year: i32) -> Vec<TrendAnalysis> {
    let mut order: Vec<&str> = Vec::new();
    let mut year_counts: HashMap<&str, HashMap<i32, usize>> = HashMap::new();

    for paper in papers {
        for keyword in &paper.keywords {
            let years = year_counts.entry(keyword.as_str()).or_insert_with(|| {
                order.push(keyword.as_str());
                HashMap::new()
            });
            *years.entry(paper.year).or_insert(0) += 1;
        }
    }

    let mut trends: Vec<TrendAnalysis> = order
        .into_iter()
        .map(|keyword| {
            let years = &year_counts[keyword];
            let count = |year: i32| years.get(&year).copied().unwrap_or(0);
            let first_nonzero = |a: usize, b: usize, fallback: usize| {
                if a > 0 {
                    a
                } else if b > 0 {
                    b
                } else {
                    fallback
                }
            };

            let recent = first_nonzero(count(current_year), count(current_year - 1), 0);
            let previous = first_nonzero(count(current_year - 2), count(current_year - 3), 1);

            let growth = round_half_up((recent as f64 - previous as f64) / previous as f64 * 100.0);
            let trend = TrendKind::from_growth(growth);

            TrendAnalysis {
                topic: keyword.to_string(),
                growth,
                papers: years.values().sum(),
                description: format!("Research on {} {}", keyword, trend.phrase()),
                related_keywords: related_keywords(keyword, papers),
                trend,
            }
        })
        .collect();

    trends.sort_by(|a, b| b.growth.cmp(&a.growth));
    trends.truncate(MAX_TRENDS);
    trends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::test_support::paper;

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(TrendKind::from_growth(51), TrendKind::Hot);
        assert_eq!(TrendKind::from_growth(50), TrendKind::Rising);
        assert_eq!(TrendKind::from_growth(21), TrendKind::Rising);
        assert_eq!(TrendKind::from_growth(20), TrendKind::Stable);
        assert_eq!(TrendKind::from_growth(-9), TrendKind::Stable);
        assert_eq!(TrendKind::from_growth(-10), TrendKind::Declining);
    }

    #[test]
    fn test_growth_windows() {
        let papers = vec![
            paper("1", 2024, &["Large Language Model", "GPT", "NLP"]),
            paper("2", 2024, &["Large Language Model", "BERT", "Transformer"]),
            paper("3", 2023, &["Large Language Model", "RLHF"]),
            paper("4", 2023, &["Transformer", "NLP"]),
            paper("5", 2022, &["Transformer", "NLP"]),
            paper("6", 2022, &["CNN"]),
        ];

        let trends = analyze_trends(&papers, 2024);
        let by_topic = |t: &str| trends.iter().find(|x| x.topic == t).unwrap();

        // recent = 2 (2024), previous falls back to 1
        let llm = by_topic("Large Language Model");
        assert_eq!(llm.growth, 100);
        assert_eq!(llm.papers, 3);
        assert_eq!(llm.trend, TrendKind::Hot);
        assert_eq!(llm.related_keywords[0], "GPT");

        // recent = 1 (2024), previous = 1 (2022)
        let transformer = by_topic("Transformer");
        assert_eq!(transformer.growth, 0);
        assert_eq!(transformer.trend, TrendKind::Stable);

        // recent falls back to 2023
        assert_eq!(by_topic("RLHF").growth, 0);

        // recent = 0, previous = 1
        let cnn = by_topic("CNN");
        assert_eq!(cnn.growth, -100);
        assert_eq!(cnn.trend, TrendKind::Declining);
        assert!(cnn.description.ends_with("is declining"));

        assert_eq!(trends.first().unwrap().growth, 100);
        assert_eq!(trends.last().unwrap().growth, -100);
    }

    #[test]
    fn test_related_keywords_by_cooccurrence() {
        let papers = vec![
            paper("1", 2020, &["A", "B", "C"]),
            paper("2", 2020, &["A", "C"]),
            paper("3", 2020, &["B", "D"]),
        ];
        assert_eq!(related_keywords("A", &papers), vec!["C", "B"]);
    }

    #[test]
    fn test_at_most_ten_trends() {
        let papers: Vec<_> = (0..12)
            .map(|i| {
                let kw = format!("k{}", i);
                paper(&i.to_string(), 2020, &[kw.as_str()])
            })
            .collect();
        assert_eq!(analyze_trends(&papers, 2024).len(), 10);
    }
}
