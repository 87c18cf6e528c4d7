use std::sync::Arc;

use crate::pipeline::audit::Auditor;
use crate::pipeline::extraction::{DocumentExtractor, ReportExtractor};

/// Largest accepted report upload (25 MiB).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Multipart field carrying the report file.
pub const REPORT_FIELD: &str = "report";

/// Shared, read-only state for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub auditor: Arc<Auditor>,
    pub extractor: Arc<dyn DocumentExtractor>,
}

impl ApiContext {
    pub fn new(auditor: Auditor) -> Self {
        Self {
            auditor: Arc::new(auditor),
            extractor: Arc::new(ReportExtractor::new()),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.extractor = extractor;
        self
    }
}
