//! Capability factory: builds the shared retriever, classifier and auditor
//! once at process start.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AuditConfig, ConfigError};
use crate::pipeline::audit::Auditor;
use crate::pipeline::classify::{
    ClassificationError, ComplianceClassifier, LlmClient, LlmComplianceClassifier, OllamaClient,
};
use crate::pipeline::retrieval::{
    InMemoryVectorSearch, OllamaEmbedder, RetrievalError, RuleRetriever, VectorRuleRetriever,
};

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not load rule index: {0}")]
    Index(#[from] RetrievalError),

    #[error("Could not build Ollama client: {0}")]
    Client(#[from] ClassificationError),
}

/// Build the production auditor from config.
///
/// The index snapshot must load; an unreachable Ollama or a missing model is
/// only logged, since every topic would then fail on its own.
pub fn build_capabilities(config: &AuditConfig) -> Result<Auditor, SetupError> {
    config.validate()?;
    let index = InMemoryVectorSearch::load(&config.index_path)?;

    let llm = OllamaClient::new(&config.ollama_url, config.request_timeout_secs)?;
    check_models(&llm, &[&config.llm_model, &config.embedding_model]);

    let embed_client = OllamaClient::new(&config.ollama_url, config.request_timeout_secs)?;
    let embedder = OllamaEmbedder::new(embed_client, config.embedding_model.clone());

    let retriever: Arc<dyn RuleRetriever> = Arc::new(VectorRuleRetriever::new(embedder, index));
    let classifier: Arc<dyn ComplianceClassifier> =
        Arc::new(LlmComplianceClassifier::new(llm, config.llm_model.clone()));

    tracing::info!(
        ollama = %config.ollama_url,
        llm_model = %config.llm_model,
        embedding_model = %config.embedding_model,
        topics = config.topics.len(),
        top_k = config.top_k,
        "Capabilities ready"
    );

    Ok(Auditor::new(retriever, classifier)
        .with_topics(config.topics.iter().cloned())
        .with_top_k(config.top_k))
}

/// Warn about models Ollama does not list. Never fails.
pub fn check_models(llm: &dyn LlmClient, models: &[&str]) -> Vec<String> {
    let mut missing = Vec::new();
    for model in models {
        match llm.is_model_available(model) {
            Ok(true) => tracing::debug!(model, "Model available"),
            Ok(false) => {
                tracing::warn!(model, "Model not pulled in Ollama; audits will report errors");
                missing.push(model.to_string());
            }
            Err(e) => {
                tracing::warn!(model, error = %e, "Could not check model availability");
                missing.push(model.to_string());
            }
        }
    }
    missing
}
