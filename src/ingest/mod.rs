use log::{ info, warn };
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Distance, CreateCollectionBuilder, PointStruct, UpsertPointsBuilder, VectorParams,
    value::Kind, vectors_config::Config as VectorsConfig,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::sync::Arc;
use uuid::Uuid;

use crate::cli::Args;
use crate::llm::embedding::EmbeddingClient;

/// One corpus entry, one JSON object per line of the corpus file.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub text: String,
}

pub struct DocumentIngestor {
    client: Arc<Qdrant>,
    embedding_client: Arc<dyn EmbeddingClient>,
    collection: String,
    dimension: usize,
}

impl DocumentIngestor {
    pub fn new(
        client: Arc<Qdrant>,
        embedding_client: Arc<dyn EmbeddingClient>,
        args: &Args
    ) -> Self {
        Self {
            client,
            embedding_client,
            collection: args.collection.clone(),
            dimension: args.dimension,
        }
    }

    /// Populates the collection from the corpus file. With
    /// `load_existing`, an already populated collection is reused and
    /// the corpus is not re-read.
    pub async fn ingest(
        &self,
        corpus_path: &str,
        load_existing: bool
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let points_count = self.collection_points_count().await;
        if reuse_existing(load_existing, points_count) {
            info!("Collection '{}' already populated, skipping ingestion", self.collection);
            return Ok(());
        }

        self.ensure_collection().await?;

        let documents = read_corpus(corpus_path)?;
        if documents.is_empty() {
            warn!("Corpus '{}' contained no documents", corpus_path);
            return Ok(());
        }
        info!("Ingesting {} documents from '{}'", documents.len(), corpus_path);

        let mut points = Vec::with_capacity(documents.len());
        for doc in &documents {
            let embed_resp = self.embedding_client.embed(&doc.text).await?;
            points.push(point_for(doc, embed_resp.embedding));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).build()).await?;
        info!("Ingestion complete: {} points in '{}'", documents.len(), self.collection);

        Ok(())
    }

    /// None when the collection is missing or its point count is
    /// unavailable.
    async fn collection_points_count(&self) -> Option<u64> {
        match self.client.collection_info(&self.collection).await {
            Ok(info) => info.result.and_then(|r| r.points_count),
            Err(_) => None,
        }
    }

    async fn ensure_collection(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.client.collection_info(&self.collection).await.is_ok() {
            return Ok(());
        }
        info!("Creating collection '{}' (dimension {})", self.collection, self.dimension);
        let cfg = CreateCollectionBuilder::new(self.collection.clone())
            .vectors_config(VectorsConfig::Params(VectorParams {
                size: self.dimension as u64,
                distance: Distance::Cosine.into(),
                ..Default::default()
            }))
            .build();
        self.client.create_collection(cfg).await?;
        Ok(())
    }
}

/// Whether an already populated collection should be reused as-is. A
/// missing or empty collection always ingests, as does a forced
/// re-ingest (`load_existing` false).
pub fn reuse_existing(load_existing: bool, points_count: Option<u64>) -> bool {
    load_existing && points_count.map(|n| n > 0).unwrap_or(false)
}

pub fn read_corpus(path: &str) -> Result<Vec<Document>, Box<dyn Error + Send + Sync>> {
    let content = fs
        ::read_to_string(path)
        .map_err(|e| format!("Failed to read corpus file '{}': {}", path, e))?;

    let mut documents = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let doc: Document = serde_json
            ::from_str(line)
            .map_err(|e| format!("Corpus line {} is not a valid document: {}", line_no + 1, e))?;
        documents.push(doc);
    }

    Ok(documents)
}

fn point_for(doc: &Document, embedding: Vec<f32>) -> PointStruct {
    let id = doc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut payload = HashMap::new();
    payload.insert(
        "title".to_string(),
        qdrant_client::qdrant::Value {
            kind: Some(Kind::StringValue(doc.title.clone())),
        },
    );
    payload.insert(
        "text".to_string(),
        qdrant_client::qdrant::Value {
            kind: Some(Kind::StringValue(doc.text.clone())),
        },
    );

    PointStruct::new(id, embedding, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_one_document_per_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"title":"Returns","text":"30-day returns on all items."}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id":"d2","title":"Shipping","text":"Ships in 2 days."}}"#).unwrap();

        let docs = read_corpus(file.path().to_str().unwrap()).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].id.is_none());
        assert_eq!(docs[1].id.as_deref(), Some("d2"));
        assert_eq!(docs[1].title, "Shipping");
    }

    #[test]
    fn rejects_malformed_corpus_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();

        let err = read_corpus(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn missing_corpus_file_is_an_error() {
        assert!(read_corpus("/nonexistent/corpus.jsonl").is_err());
    }

    #[test]
    fn populated_collection_is_reused() {
        assert!(reuse_existing(true, Some(5)));
    }

    #[test]
    fn forced_reingest_ignores_existing_points() {
        assert!(!reuse_existing(false, Some(5)));
    }

    #[test]
    fn missing_or_empty_collection_always_ingests() {
        assert!(!reuse_existing(true, None));
        assert!(!reuse_existing(true, Some(0)));
    }
}
