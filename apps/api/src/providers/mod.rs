//! Analyzer providers: pluggable backends behind a single async trait.
//!
//! `ProviderRegistry` holds them as `Arc<dyn AnalyzerProvider>` and picks one per
//! request by key. The set is closed: `openai` (live model), `copilot` and
//! `gemini` (deterministic, offline).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::errors::AppError;

pub mod copilot;
pub mod gemini;
pub mod heuristics;
pub mod openai;
pub mod registry;

pub use registry::ProviderRegistry;

/// The analyzer trait. Implement this to add a backend without touching the
/// registry, handlers, or frontend contract.
#[async_trait]
pub trait AnalyzerProvider: Send + Sync {
    /// Registry key, e.g. `"openai"`.
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Local check only; never touches the network.
    fn is_available(&self) -> bool;

    async fn analyze(&self, resume_text: &str, job_text: &str)
        -> Result<AnalysisResult, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Active,
    Offline,
}

/// One row of `GET /ai-services`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub available: bool,
    pub status: ProviderStatus,
}

impl ProviderInfo {
    pub fn describe(provider: &dyn AnalyzerProvider) -> Self {
        let available = provider.is_available();
        Self {
            id: provider.id().to_string(),
            name: provider.display_name().to_string(),
            available,
            status: if available {
                ProviderStatus::Active
            } else {
                ProviderStatus::Offline
            },
        }
    }
}
