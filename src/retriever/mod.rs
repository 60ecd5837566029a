use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::SearchPointsBuilder;
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub score: f32,
    pub document: Value,
}

/// Similarity-search seam between the chain and the vector store, so
/// the chain can be exercised against a stub.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(
        &self,
        query_vector: &[f32],
        limit: usize
    ) -> Result<Vec<ScoredDocument>, Box<dyn StdError + Send + Sync>>;
}

pub struct QdrantRetriever {
    client: Arc<Qdrant>,
    collection: String,
}

impl QdrantRetriever {
    pub fn new(client: Arc<Qdrant>, collection: String) -> Self {
        Self { client, collection }
    }
}

#[async_trait]
impl Retriever for QdrantRetriever {
    async fn retrieve(
        &self,
        query_vector: &[f32],
        limit: usize
    ) -> Result<Vec<ScoredDocument>, Box<dyn StdError + Send + Sync>> {
        let resp = self.client.search_points(
            SearchPointsBuilder::new(&self.collection, query_vector.to_vec(), limit as u64)
                .with_payload(true)
                .build()
        ).await?;

        let mut results = Vec::with_capacity(resp.result.len());
        for pt in &resp.result {
            let mut document = serde_json::Map::new();
            for (k, v) in &pt.payload {
                if let Ok(jv) = serde_json::to_value(v) {
                    document.insert(k.clone(), jv);
                }
            }
            results.push(ScoredDocument {
                score: pt.score,
                document: Value::Object(document),
            });
        }

        Ok(results)
    }
}
