//! End-to-end pipeline tests with deterministic stub providers
//!
//! The embedding stub hashes tokens into a small bag-of-words vector so that
//! overlapping texts score high cosine similarity; the LLM stub returns a
//! canned answer. Citation behavior is then fully observable without any
//! model running.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use medreport_rag::config::RagConfig;
use medreport_rag::error::{Error, Result};
use medreport_rag::generation::NO_REPORTS_MESSAGE;
use medreport_rag::providers::{EmbeddingProvider, LlmProvider};
use medreport_rag::service::RagService;
use medreport_rag::types::{ChunkMetadata, UploadStatus};

const STUB_DIMS: usize = 16;

struct StubEmbedder;

fn bag_of_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; STUB_DIMS];
    for token in text.to_lowercase().split_whitespace() {
        let mut h: usize = 0;
        for byte in token.bytes() {
            h = h.wrapping_mul(31).wrapping_add(byte as usize);
        }
        vector[h % STUB_DIMS] += 1.0;
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(bag_of_words(text))
    }

    fn dimensions(&self) -> usize {
        STUB_DIMS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub-embedder"
    }
}

struct StubLlm {
    answer: String,
}

impl StubLlm {
    fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.answer.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub-llm"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::generation("model unavailable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing-llm"
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}

fn service_with_llm(dir: &Path, llm: Arc<dyn LlmProvider>) -> RagService {
    let mut config = RagConfig::default();
    config.index.storage_dir = dir.join("collections");
    RagService::new(&config, Arc::new(StubEmbedder), llm).unwrap()
}

fn service_answering(dir: &Path, answer: &str) -> RagService {
    service_with_llm(dir, StubLlm::answering(answer))
}

const LABS_TEXT: &str =
    "Fasting glucose elevated at 6.2 mmol/L. Diabetes screening positive; insulin therapy recorded.";

const LABS_ANSWER: &str =
    "Your fasting glucose was elevated, and insulin therapy is recorded alongside diabetes screening.";

async fn upload_labs(service: &RagService, user: &str, report: &str) {
    let outcome = service
        .upload(
            user,
            report,
            "labs.pdf",
            LABS_TEXT,
            ChunkMetadata::pdf("labs.pdf", "annual bloodwork"),
        )
        .await
        .unwrap();
    assert_eq!(outcome.status, UploadStatus::Indexed);
    assert_eq!(outcome.chunk_count, 1);
}

#[tokio::test]
async fn ask_with_no_documents_is_a_defined_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(dir.path(), LABS_ANSWER);

    let response = service.ask("newcomer", "Do I have diabetes?").await.unwrap();

    assert_eq!(response.message, NO_REPORTS_MESSAGE);
    assert!(response.citations.is_empty());
}

#[tokio::test]
async fn answer_grounded_in_a_report_cites_it() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(dir.path(), LABS_ANSWER);

    upload_labs(&service, "user-1", "r1").await;
    let response = service.ask("user-1", "What were my glucose results?").await.unwrap();

    assert_eq!(response.message, LABS_ANSWER);
    assert_eq!(response.citations.len(), 1);
    assert_eq!(response.citations[0].document_name, "labs");
}

#[tokio::test]
async fn refusal_answer_suppresses_citations() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(
        dir.path(),
        "I don't have any information about hepatitis in your uploaded documents.",
    );

    upload_labs(&service, "user-1", "r1").await;
    let response = service.ask("user-1", "Do I have hepatitis?").await.unwrap();

    assert!(response.citations.is_empty());
}

#[tokio::test]
async fn unrelated_answer_wording_earns_no_citations() {
    let dir = tempfile::tempdir().unwrap();
    // None of these keywords appear in the indexed chunk.
    let service = service_answering(
        dir.path(),
        "Cardiology angiogram showed stenosis near the ventricular outflow per echocardiogram.",
    );

    upload_labs(&service, "user-1", "r1").await;
    let response = service.ask("user-1", "What about my heart?").await.unwrap();

    assert!(response.citations.is_empty());
}

#[tokio::test]
async fn deleted_report_content_never_surfaces_again() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(dir.path(), LABS_ANSWER);

    upload_labs(&service, "user-1", "r1").await;
    let removed = service.delete_report("user-1", "r1").await.unwrap();
    assert_eq!(removed, 1);

    let response = service.ask("user-1", "What were my glucose results?").await.unwrap();
    assert!(response.citations.is_empty());
}

#[tokio::test]
async fn duplicate_upload_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(dir.path(), LABS_ANSWER);

    upload_labs(&service, "user-1", "r1").await;
    let outcome = service
        .upload(
            "user-1",
            "r1",
            "labs.pdf",
            LABS_TEXT,
            ChunkMetadata::pdf("labs.pdf", "annual bloodwork"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status, UploadStatus::Unchanged);
    assert_eq!(outcome.chunk_count, 0);

    let results = service
        .index()
        .similarity_search("user-1", &bag_of_words(LABS_TEXT), 10)
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn reupload_with_changed_content_replaces_old_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(dir.path(), LABS_ANSWER);

    upload_labs(&service, "user-1", "r1").await;
    let outcome = service
        .upload(
            "user-1",
            "r1",
            "labs.pdf",
            "Renal function panel: creatinine within normal range.",
            ChunkMetadata::pdf("labs.pdf", "repeat bloodwork"),
        )
        .await
        .unwrap();
    assert_eq!(outcome.status, UploadStatus::Updated);

    let results = service
        .index()
        .similarity_search("user-1", &bag_of_words("creatinine"), 10)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].chunk.content.contains("creatinine"));
    assert!(!results[0].chunk.content.contains("glucose"));
}

#[tokio::test]
async fn account_deletion_then_reupload_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(dir.path(), LABS_ANSWER);

    upload_labs(&service, "user-1", "r1").await;
    service.delete_user("user-1").await.unwrap();

    // Account gone: back to the defined no-documents outcome.
    let response = service.ask("user-1", "What were my glucose results?").await.unwrap();
    assert_eq!(response.message, NO_REPORTS_MESSAGE);

    // Deleting again stays a success.
    service.delete_user("user-1").await.unwrap();

    // Re-uploading rebuilds a fresh collection.
    upload_labs(&service, "user-1", "r2").await;
    let response = service.ask("user-1", "What were my glucose results?").await.unwrap();
    assert_eq!(response.citations.len(), 1);
}

#[tokio::test]
async fn generation_failure_surfaces_as_typed_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_with_llm(dir.path(), Arc::new(FailingLlm));

    upload_labs(&service, "user-1", "r1").await;
    let result = service.ask("user-1", "What were my glucose results?").await;

    assert!(matches!(result, Err(Error::GenerationFailed(_))));
}

#[tokio::test]
async fn empty_report_text_is_valid_and_creates_the_collection() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(dir.path(), LABS_ANSWER);

    let outcome = service
        .upload(
            "user-1",
            "r1",
            "blank.pdf",
            "",
            ChunkMetadata::pdf("blank.pdf", ""),
        )
        .await
        .unwrap();
    assert_eq!(outcome.chunk_count, 0);

    // The collection exists now, so the engine generates rather than
    // returning the no-documents message; with nothing retrieved there is
    // nothing to cite.
    let response = service.ask("user-1", "Anything on file?").await.unwrap();
    assert_ne!(response.message, NO_REPORTS_MESSAGE);
    assert!(response.citations.is_empty());
}

#[tokio::test]
async fn users_collections_stay_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_answering(dir.path(), LABS_ANSWER);

    upload_labs(&service, "alice", "r1").await;

    let response = service.ask("bob", "What were my glucose results?").await.unwrap();
    assert_eq!(response.message, NO_REPORTS_MESSAGE);
    assert!(response.citations.is_empty());
}
