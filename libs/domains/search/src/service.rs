use domain_embeddings::EmbeddingProvider;
use domain_notifications::NotificationFanout;
use domain_profiles::ProfileDirectory;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{SearchError, SearchResult};
use crate::models::SearchResponse;
use crate::ranking::RankingEngine;

pub const DEFAULT_RESULT_LIMIT: usize = 10;
pub const MAX_RESULT_LIMIT: usize = 20;

/// Query → embedding → ranking → notification fan-out.
#[derive(Clone)]
pub struct SearchService {
    embedder: Arc<dyn EmbeddingProvider>,
    directory: Arc<dyn ProfileDirectory>,
    fanout: Arc<dyn NotificationFanout>,
    engine: RankingEngine,
}

impl SearchService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        directory: Arc<dyn ProfileDirectory>,
        fanout: Arc<dyn NotificationFanout>,
    ) -> Self {
        Self {
            embedder,
            directory,
            fanout,
            engine: RankingEngine::default(),
        }
    }

    pub fn with_engine(mut self, engine: RankingEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Rank every profile against `query` and notify the matched members.
    ///
    /// Embedding or corpus failures abort the call. Fan-out failures are
    /// logged and never change the response.
    pub async fn search(
        &self,
        principal: Uuid,
        query: &str,
        limit: Option<usize>,
    ) -> SearchResult<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidInput("Query is required".to_string()));
        }
        let k = limit
            .unwrap_or(DEFAULT_RESULT_LIMIT)
            .clamp(1, MAX_RESULT_LIMIT);

        let query_embedding = self.embedder.embed(query).await?;
        let corpus = self.directory.corpus().await?;
        let results = self.engine.rank_embedding(&query_embedding, &corpus, k);

        tracing::info!(
            user_id = %principal,
            candidates = corpus.len(),
            results = results.len(),
            "Search ranked"
        );

        let matched: Vec<Uuid> = results.iter().map(|m| m.user_id).collect();
        if !matched.is_empty() {
            if let Err(e) = self
                .fanout
                .fanout(principal, matched, query.to_string())
                .await
            {
                tracing::warn!(user_id = %principal, error = %e, "Notification fan-out failed");
            }
        }

        Ok(SearchResponse { results })
    }
}
