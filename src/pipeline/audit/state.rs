use std::collections::VecDeque;

use super::finding::Finding;

/// FIFO queue of topics still to audit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worklist {
    queue: VecDeque<String>,
}

impl Worklist {
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: topics.into_iter().map(Into::into).collect(),
        }
    }

    pub fn pop_front(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }
}

/// The mutable record threaded through one audit run.
///
/// Created per invocation with only the report text; never shared across audits.
#[derive(Debug, Clone, Default)]
pub struct AuditState {
    report_text: String,
    topics: Worklist,
    current_topic: String,
    findings: Vec<Finding>,
    error: Option<String>,
}

impl AuditState {
    pub fn new(report_text: impl Into<String>) -> Self {
        Self {
            report_text: report_text.into(),
            ..Default::default()
        }
    }

    pub fn report_text(&self) -> &str {
        &self.report_text
    }

    pub fn topics(&self) -> &Worklist {
        &self.topics
    }

    /// Last topic dequeued, empty before the first step.
    pub fn current_topic(&self) -> &str {
        &self.current_topic
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Whole-audit error; the per-topic path never sets it.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_findings(self) -> (Vec<Finding>, Option<String>) {
        (self.findings, self.error)
    }

    pub(super) fn seed(&mut self, topics: Worklist) {
        self.topics = topics;
        self.findings = Vec::new();
    }

    pub(super) fn dequeue(&mut self) -> Option<String> {
        let topic = self.topics.pop_front()?;
        self.current_topic = topic.clone();
        Some(topic)
    }

    pub(super) fn record(&mut self, finding: Finding) -> &Finding {
        self.findings.push(finding);
        &self.findings[self.findings.len() - 1]
    }

    pub(super) fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}
