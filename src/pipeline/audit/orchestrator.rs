use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::finding::{FailureKind, Finding};
use super::state::{AuditState, Worklist};
use super::{AuditError, TopicError};
use crate::config::{DEFAULT_TOPICS, DEFAULT_TOP_K};
use crate::pipeline::classify::ComplianceClassifier;
use crate::pipeline::extraction::DocumentExtractor;
use crate::pipeline::retrieval::RuleRetriever;

/// Control-flow edge taken after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    End,
}

/// START step: seed the worklist and clear findings.
pub fn initialize(state: &mut AuditState, topics: &[String]) {
    tracing::info!(topics = topics.len(), "Starting audit");
    state.seed(Worklist::new(topics.iter().cloned()));
}

/// PROCESS step: audit the head of the worklist and append one finding.
///
/// Retrieval and classification failures (including panics inside either
/// capability) become an Error finding. Returns `None` without touching the
/// state when the worklist is already empty.
pub fn process_next_topic<'s>(
    state: &'s mut AuditState,
    retriever: &dyn RuleRetriever,
    classifier: &dyn ComplianceClassifier,
    top_k: usize,
) -> Option<&'s Finding> {
    let topic = state.dequeue()?;
    tracing::info!(topic = %topic, remaining = state.topics().len(), "Processing topic");

    let finding = match assess_topic(&topic, state.report_text(), retriever, classifier, top_k) {
        Ok(finding) => {
            tracing::info!(
                topic = %topic,
                status = finding.status_label(),
                "Finding recorded"
            );
            finding
        }
        Err(e) => {
            tracing::warn!(
                topic = %topic,
                kind = %e.kind(),
                error = %e,
                "Topic failed, recording error finding"
            );
            Finding::failed(&topic, e.kind(), e.to_string())
        }
    };

    Some(state.record(finding))
}

/// Edge predicate shared by START and PROCESS.
pub fn should_continue(state: &AuditState) -> Transition {
    if state.topics().is_empty() {
        Transition::End
    } else {
        Transition::Continue
    }
}

fn assess_topic(
    topic: &str,
    report_text: &str,
    retriever: &dyn RuleRetriever,
    classifier: &dyn ComplianceClassifier,
    top_k: usize,
) -> Result<Finding, TopicError> {
    let passages = guarded(FailureKind::Retrieval, || retriever.retrieve(topic, top_k))??;

    let rule = passages
        .into_iter()
        .next()
        .ok_or_else(|| TopicError::NoPassages {
            topic: topic.to_string(),
        })?;

    tracing::debug!(
        topic,
        passage_id = %rule.id,
        score = rule.score,
        "Using top-ranked requirement"
    );

    let assessment = guarded(FailureKind::Classification, || {
        classifier.classify(&rule.content, report_text)
    })??;

    Ok(Finding::assessed(topic, rule.content, assessment))
}

/// Run a capability call, turning a panic into a `TopicError`.
fn guarded<T>(stage: FailureKind, f: impl FnOnce() -> T) -> Result<T, TopicError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        TopicError::Panicked { stage, message }
    })
}

/// Result of one audit invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub audit_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub findings: Vec<Finding>,
    /// Whole-audit failure; per-topic failures are findings instead.
    pub error: Option<String>,
}

impl AuditOutcome {
    /// Rendered finding strings, in topic order.
    pub fn finding_lines(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }

    pub fn error_finding_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error()).count()
    }
}

/// Runs audits over one shared set of capabilities.
///
/// Capabilities are read-only; every `invoke` owns a fresh `AuditState`, so
/// one `Auditor` can serve concurrent audits.
#[derive(Clone)]
pub struct Auditor {
    retriever: Arc<dyn RuleRetriever>,
    classifier: Arc<dyn ComplianceClassifier>,
    topics: Vec<String>,
    top_k: usize,
}

impl Auditor {
    pub fn new(retriever: Arc<dyn RuleRetriever>, classifier: Arc<dyn ComplianceClassifier>) -> Self {
        Self {
            retriever,
            classifier,
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Passages requested per topic; only the first is used. Clamped to at least 1.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Drive a state from START to END.
    pub fn run(&self, mut state: AuditState) -> AuditState {
        initialize(&mut state, &self.topics);

        while should_continue(&state) == Transition::Continue {
            process_next_topic(
                &mut state,
                self.retriever.as_ref(),
                self.classifier.as_ref(),
                self.top_k,
            );
        }

        state
    }

    /// Audit one report text against every configured topic.
    pub fn invoke(&self, report_text: &str) -> AuditOutcome {
        let audit_id = Uuid::new_v4();
        let span = tracing::info_span!("audit", audit_id = %audit_id);
        let _enter = span.enter();

        let started_at = Utc::now();
        let state = self.run(AuditState::new(report_text));
        let (findings, error) = state.into_findings();

        let outcome = AuditOutcome {
            audit_id,
            started_at,
            completed_at: Utc::now(),
            findings,
            error,
        };

        tracing::info!(
            findings = outcome.findings.len(),
            errors = outcome.error_finding_count(),
            duration_ms = (outcome.completed_at - outcome.started_at).num_milliseconds(),
            "Audit complete"
        );

        outcome
    }
}

impl fmt::Debug for Auditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auditor")
            .field("topics", &self.topics)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

/// Extract a document's text and audit it.
///
/// Extraction failure is the fatal path: the outcome carries `error` and no
/// findings. Empty extracted text is audited like any other.
pub fn audit_document(
    extractor: &dyn DocumentExtractor,
    auditor: &Auditor,
    bytes: &[u8],
) -> AuditOutcome {
    match extractor.extract(bytes) {
        Ok(text) => {
            if text.trim().is_empty() {
                tracing::warn!("Report has no extractable text; auditing anyway");
            }
            auditor.invoke(&text)
        }
        Err(e) => {
            let error = AuditError::from(e);
            tracing::error!(error = %error, "Audit aborted before any topic");

            let mut state = AuditState::new(String::new());
            state.fail(error.to_string());
            let (findings, error) = state.into_findings();
            let now = Utc::now();

            AuditOutcome {
                audit_id: Uuid::new_v4(),
                started_at: now,
                completed_at: now,
                findings,
                error,
            }
        }
    }
}
