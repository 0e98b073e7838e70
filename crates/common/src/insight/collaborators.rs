//! Collaborator recommendation by shared research keywords

use crate::models::{slug, Paper};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const MAX_RECOMMENDATIONS: usize = 10;
const MAX_POTENTIAL_TOPICS: usize = 3;

const COMMON_WEIGHT: f64 = 0.6;
const UNIQUE_WEIGHT: f64 = 0.4;

/// An author and the keywords of the papers they appear on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub author: AuthorSummary,
    pub score: f64,
    pub reason: String,
    pub common_keywords: Vec<String>,
    pub potential_topics: Vec<String>,
}

/// Build one profile per distinct author, keywords in first-seen order
pub fn profile_authors(papers: &[Paper]) -> Vec<AuthorProfile> {
    let mut profiles: Vec<AuthorProfile> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for paper in papers {
        for name in &paper.authors {
            let id = slug(name);
            if id.is_empty() {
                continue;
            }
            let position = *index.entry(id.clone()).or_insert_with(|| {
                profiles.push(AuthorProfile {
                    id,
                    name: name.clone(),
                    affiliation: None,
                    keywords: Vec::new(),
                });
                profiles.len() - 1
            });

            let profile = &mut profiles[position];
            for keyword in &paper.keywords {
                if !profile.keywords.contains(keyword) {
                    profile.keywords.push(keyword.clone());
                }
            }
        }
    }

    profiles
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rank candidates by overlap with `interests`.
///
/// Keywords match case-insensitively. Candidates sharing nothing are
/// dropped. The score weighs shared keywords against the candidate's
/// other keywords.
pub fn recommend_collaborators(
    interests: &[String],
    candidates: &[AuthorProfile],
) -> Vec<Recommendation> {
    let wanted: HashSet<String> = interests.iter().map(|k| k.trim().to_lowercase()).collect();

    let mut recommendations: Vec<Recommendation> = candidates
        .iter()
        .filter_map(|candidate| {
            let (common, unique): (Vec<String>, Vec<String>) = candidate
                .keywords
                .iter()
                .cloned()
                .partition(|k| wanted.contains(&k.to_lowercase()));

            if common.is_empty() {
                return None;
            }

            let score =
                round2(common.len() as f64 * COMMON_WEIGHT + unique.len() as f64 * UNIQUE_WEIGHT);

            Some(Recommendation {
                author: AuthorSummary {
                    id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    affiliation: candidate.affiliation.clone(),
                },
                score,
                reason: format!("Shared research interests in {}", common.join(", ")),
                potential_topics: unique.into_iter().take(MAX_POTENTIAL_TOPICS).collect(),
                common_keywords: common,
            })
        })
        .collect();

    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}
