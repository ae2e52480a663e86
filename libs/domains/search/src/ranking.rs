//! Exhaustive cosine ranking over a corpus snapshot.
//!
//! Each profile is represented by its single best-matching entry (the top
//! chunk); averaging across unrelated attributes would bury a strong match.

use domain_embeddings::cosine_similarity;
use domain_profiles::models::{ProfileVectors, VectorEntry};
use std::cmp::Ordering;

use crate::models::{SearchMatch, TopChunk};

pub const CORE_WEIGHT: f32 = 1.0;
pub const EXTENSION_WEIGHT: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingEngine {
    core_weight: f32,
    extension_weight: f32,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self {
            core_weight: CORE_WEIGHT,
            extension_weight: EXTENSION_WEIGHT,
        }
    }
}

impl RankingEngine {
    /// Custom weights; the core weight is raised to the extension weight if lower.
    pub fn with_weights(core_weight: f32, extension_weight: f32) -> Self {
        Self {
            core_weight: core_weight.max(extension_weight),
            extension_weight,
        }
    }

    fn weight(&self, entry: &VectorEntry) -> f32 {
        if entry.is_core {
            self.core_weight
        } else {
            self.extension_weight
        }
    }

    /// Top `k` profiles by score, descending, ties broken by `user_id`.
    ///
    /// Profiles whose best similarity is not positive are left out.
    pub fn rank_embedding(
        &self,
        query: &[f32],
        corpus: &[ProfileVectors],
        k: usize,
    ) -> Vec<SearchMatch> {
        let mut matches: Vec<SearchMatch> = corpus
            .iter()
            .filter_map(|profile| self.score_profile(query, profile))
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        matches.truncate(k);
        matches
    }

    fn score_profile(&self, query: &[f32], profile: &ProfileVectors) -> Option<SearchMatch> {
        let mut best: Option<(&VectorEntry, f32)> = None;

        for entry in &profile.entries {
            let similarity = cosine_similarity(query, &entry.embedding);
            let better = match best {
                None => true,
                Some((current, current_sim)) => {
                    similarity > current_sim
                        || (similarity == current_sim
                            && self.weight(entry) > self.weight(current))
                }
            };
            if better {
                best = Some((entry, similarity));
            }
        }

        let (entry, similarity) = best?;
        if similarity <= 0.0 {
            return None;
        }

        Some(SearchMatch {
            user_id: profile.user_id,
            name: profile.name.clone(),
            image_url: profile.image_url.clone(),
            top_chunk: TopChunk {
                content: entry.attribute_key.clone(),
                content_text: entry.content_text.clone(),
                similarity,
            },
            score: similarity * self.weight(entry),
        })
    }
}
