//! PDF ingestion pipeline

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use drona_core::{DocumentChunk, Embedder, Error, IngestionReport, Result, VectorStore};

/// Character budget for a single chunk before embedding.
pub const CHUNK_CHARS: usize = 1_800;

/// Chunks per upsert call into the vector store.
const BATCH_SIZE: usize = 64;

/// Fixed pacing between embedding calls and between batch upserts. A
/// deliberate backpressure policy for the provider's rate limits, minimal
/// rather than production-grade; there is no backoff or jitter.
const EMBED_DELAY: Duration = Duration::from_millis(200);
const BATCH_DELAY: Duration = Duration::from_millis(200);

/// One page of extracted source text, 1-based.
#[derive(Debug, Clone)]
pub struct PageText {
    pub number: usize,
    pub text: String,
}

/// Offline batch job that turns a PDF source into embedded chunks.
///
/// Single-writer by design; concurrent runs against the same collection are
/// not supported, and queries running alongside an ingestion may observe a
/// partially populated corpus.
pub struct IngestionPipeline<V, E> {
    store: Arc<V>,
    embedder: Arc<E>,
    client: reqwest::Client,
    chunk_chars: usize,
    batch_size: usize,
    embed_delay: Duration,
    batch_delay: Duration,
}

impl<V, E> IngestionPipeline<V, E>
where
    V: VectorStore,
    E: Embedder,
{
    /// Create a new ingestion pipeline over shared provider handles
    pub fn new(store: Arc<V>, embedder: Arc<E>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        Ok(Self {
            store,
            embedder,
            client,
            chunk_chars: CHUNK_CHARS,
            batch_size: BATCH_SIZE,
            embed_delay: EMBED_DELAY,
            batch_delay: BATCH_DELAY,
        })
    }

    /// Override the pacing delays (tests run with zero delays)
    pub fn with_pacing(mut self, embed_delay: Duration, batch_delay: Duration) -> Self {
        self.embed_delay = embed_delay;
        self.batch_delay = batch_delay;
        self
    }

    /// Fetch a PDF over HTTP(S) and ingest it.
    ///
    /// The response must carry a pdf or octet-stream content type; anything
    /// else is a hard ingestion error before any parsing happens.
    pub async fn ingest_url(&self, source_url: &str) -> Result<IngestionReport> {
        let parsed = Url::parse(source_url)
            .map_err(|e| Error::Ingestion(format!("invalid source url '{}': {}", source_url, e)))?;

        let response = self
            .client
            .get(parsed)
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
            .send()
            .await
            .map_err(|e| Error::Ingestion(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Ingestion(format!(
                "fetch failed with status {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();

        if !valid_content_type(&content_type) {
            return Err(Error::Ingestion(format!(
                "invalid file type: {}",
                content_type
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Ingestion(e.to_string()))?;

        self.ingest_bytes(&bytes).await
    }

    /// Ingest a PDF from raw bytes.
    pub async fn ingest_bytes(&self, bytes: &[u8]) -> Result<IngestionReport> {
        let pages = extract_pages(bytes)?;
        if pages.is_empty() {
            return Err(Error::Ingestion("no text extracted from document".to_string()));
        }

        info!(pages = pages.len(), "extracted text, embedding chunks");
        self.ingest_pages(&pages).await
    }

    /// Ingest already-extracted page texts.
    ///
    /// Every chunk is embedded before anything is upserted, so a per-chunk
    /// embedding failure aborts the run and leaves the collection untouched.
    /// A partial corpus with missing vectors is worse than an explicit
    /// failure.
    pub async fn ingest_pages(&self, pages: &[PageText]) -> Result<IngestionReport> {
        let mut chunks = Vec::new();

        for page in pages {
            for (chunk_index, text) in chunk_page(&page.text, self.chunk_chars).into_iter().enumerate()
            {
                let id = format!("page_{}_chunk_{}", page.number, chunk_index);
                let embedding = self.embedder.embed(&text).await.map_err(|e| {
                    Error::Ingestion(format!("embedding failed for chunk '{}': {}", id, e))
                })?;
                tokio::time::sleep(self.embed_delay).await;

                chunks.push(DocumentChunk {
                    id,
                    text,
                    source_locator: format!("page_{}", page.number),
                    embedding,
                });
            }
        }

        for batch in chunks.chunks(self.batch_size) {
            self.store.add(batch).await?;
            tokio::time::sleep(self.batch_delay).await;
        }

        info!(chunks = chunks.len(), "ingestion complete");
        Ok(IngestionReport {
            chunks_added: chunks.len(),
        })
    }
}

/// A fetched source must declare itself as pdf or octet-stream before any
/// parsing happens. Expects an already-lowercased content type.
fn valid_content_type(content_type: &str) -> bool {
    content_type.contains("pdf") || content_type.contains("octet-stream")
}

/// Extract text per page. A page with no extractable text is logged and
/// skipped; extraction itself failing is an ingestion error.
fn extract_pages(bytes: &[u8]) -> Result<Vec<PageText>> {
    let raw_pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| Error::Ingestion(format!("failed to parse pdf: {}", e)))?;

    let mut pages = Vec::new();
    for (number, text) in raw_pages.into_iter().enumerate().map(|(i, t)| (i + 1, t)) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            warn!(page = number, "no extractable text, skipping page");
            continue;
        }
        pages.push(PageText {
            number,
            text: trimmed.to_string(),
        });
    }

    Ok(pages)
}

/// Split one page's text into pieces of at most `budget` characters.
///
/// Prefers cutting at the last newline before the budget, then the last
/// space, to avoid mid-word cuts; when neither exists the cut is hard at
/// the budget boundary.
fn chunk_page(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let boundary = match rest.char_indices().nth(budget) {
            Some((index, _)) => index,
            None => {
                chunks.push(rest.to_string());
                break;
            }
        };

        let window = &rest[..boundary];
        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0)
            .unwrap_or(boundary);

        chunks.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }

    chunks.retain(|chunk| !chunk.is_empty());
    chunks
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use drona_chroma::MemoryStore;
    use drona_core::{Embedder, Error, Result, VectorStore};

    use super::*;

    struct FakeEmbedder {
        calls: AtomicUsize,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, text.bytes().next().unwrap_or(0) as f32, 1.0])
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(Error::Embedding("provider unreachable".to_string()))
        }
    }

    fn pipeline<E: Embedder>(
        store: Arc<MemoryStore>,
        embedder: Arc<E>,
    ) -> IngestionPipeline<MemoryStore, E> {
        IngestionPipeline::new(store, embedder)
            .unwrap()
            .with_pacing(Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn test_content_type_validation() {
        assert!(valid_content_type("application/pdf"));
        assert!(valid_content_type("application/pdf; charset=binary"));
        assert!(valid_content_type("binary/octet-stream"));
        assert!(valid_content_type("application/octet-stream"));
        assert!(!valid_content_type("text/html"));
        assert!(!valid_content_type("text/html; charset=utf-8"));
        assert!(!valid_content_type(""));
    }

    #[test]
    fn test_chunk_page_respects_budget() {
        let text = "word ".repeat(1000);
        let chunks = chunk_page(&text, 180);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 180);
        }
    }

    #[test]
    fn test_chunk_page_prefers_newline_over_space() {
        let text = "first line\nsecond line and more words here";
        let chunks = chunk_page(text, 20);
        assert_eq!(chunks[0], "first line");
    }

    #[test]
    fn test_chunk_page_falls_back_to_space() {
        let text = "alpha beta gamma delta epsilon";
        let chunks = chunk_page(text, 12);
        assert_eq!(chunks[0], "alpha beta");
    }

    #[test]
    fn test_chunk_page_hard_cut_without_breaks() {
        let text = "x".repeat(25);
        let chunks = chunk_page(&text, 10);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_short_page_is_one_chunk() {
        assert_eq!(chunk_page("short page", 1_800), vec!["short page"]);
    }

    #[tokio::test]
    async fn test_ingest_pages_reports_and_stores_all_chunks() {
        let store = Arc::new(MemoryStore::new());
        let embedder = Arc::new(FakeEmbedder::new());
        let pipeline = pipeline(store.clone(), embedder.clone());

        let pages = vec![
            PageText {
                number: 1,
                text: "alumni profile one".to_string(),
            },
            PageText {
                number: 2,
                text: "alumni profile two".to_string(),
            },
        ];

        let report = pipeline.ingest_pages(&pages).await.unwrap();
        assert_eq!(report.chunks_added, 2);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_chunk_ids_are_deterministic_across_runs() {
        let pages = vec![
            PageText {
                number: 1,
                text: "line one\n".repeat(400),
            },
            PageText {
                number: 2,
                text: "second page".to_string(),
            },
        ];

        let mut id_sets = Vec::new();
        for _ in 0..2 {
            let store = Arc::new(MemoryStore::new());
            let pipeline = pipeline(store.clone(), Arc::new(FakeEmbedder::new()));
            pipeline.ingest_pages(&pages).await.unwrap();

            let mut ids: Vec<String> = store
                .query(&[1.0, 1.0, 1.0], usize::MAX)
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.chunk.id)
                .collect();
            ids.sort();
            id_sets.push(ids);
        }

        assert_eq!(id_sets[0], id_sets[1]);
        assert!(id_sets[0].contains(&"page_1_chunk_0".to_string()));
        assert!(id_sets[0].contains(&"page_2_chunk_0".to_string()));
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_before_any_upsert() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(store.clone(), Arc::new(FailingEmbedder));

        let pages = vec![PageText {
            number: 1,
            text: "some text".to_string(),
        }];

        let err = pipeline.ingest_pages(&pages).await.unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));
        assert!(err.to_string().contains("provider unreachable"));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unparsable_bytes_are_an_ingestion_error() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(store, Arc::new(FakeEmbedder::new()));

        let err = pipeline.ingest_bytes(b"not a pdf").await.unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));
    }
}
