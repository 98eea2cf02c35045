use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::AnalysisResult;
use crate::config::OpenAiSettings;
use crate::errors::AppError;
use crate::extraction::{DocumentExtractor, TextExtractor};
use crate::providers::copilot::CopilotProvider;
use crate::providers::gemini::GeminiProvider;
use crate::providers::openai::OpenAiProvider;
use crate::providers::{AnalyzerProvider, ProviderInfo};

/// Owns the provider set and mediates every analysis request.
///
/// Built once at startup and read-only afterwards, so it is shared across
/// requests as `Arc<ProviderRegistry>` without locking.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn AnalyzerProvider>>,
    extractor: Arc<dyn TextExtractor>,
}

impl ProviderRegistry {
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            providers: Vec::new(),
            extractor,
        }
    }

    /// `openai`, `copilot` and `gemini` with the document extractor.
    pub fn with_defaults(openai: &OpenAiSettings) -> anyhow::Result<Self> {
        let mut registry = Self::new(Arc::new(DocumentExtractor));
        registry.register(Arc::new(OpenAiProvider::new(openai)?));
        registry.register(Arc::new(CopilotProvider));
        registry.register(Arc::new(GeminiProvider));
        Ok(registry)
    }

    /// Adds a provider. Registering the same key twice is a wiring bug; the
    /// later registration replaces the earlier one in place.
    pub fn register(&mut self, provider: Arc<dyn AnalyzerProvider>) {
        match self.providers.iter().position(|p| p.id() == provider.id()) {
            Some(idx) => {
                warn!(provider = provider.id(), "Provider registered twice, replacing");
                self.providers[idx] = provider;
            }
            None => self.providers.push(provider),
        }
    }

    /// Availability is queried live on every call.
    pub fn list_providers(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|p| ProviderInfo::describe(p.as_ref()))
            .collect()
    }

    fn lookup(&self, key: &str) -> Result<&Arc<dyn AnalyzerProvider>, AppError> {
        self.providers
            .iter()
            .find(|p| p.id() == key)
            .ok_or_else(|| AppError::NotFound(key.to_string()))
    }

    /// Checks, in order: known key, non-empty inputs, provider availability.
    /// The provider's result is returned untouched.
    pub async fn analyze(
        &self,
        provider_key: &str,
        resume_text: &str,
        job_text: &str,
    ) -> Result<AnalysisResult, AppError> {
        let provider = self.lookup(provider_key)?;
        dispatch(provider.as_ref(), resume_text, job_text).await
    }

    /// Same contract as `analyze`, with both documents read from disk first.
    pub async fn analyze_from_files(
        &self,
        provider_key: &str,
        resume_path: &Path,
        job_path: &Path,
    ) -> Result<AnalysisResult, AppError> {
        let provider = self.lookup(provider_key)?;

        let resume_text = self.extractor.extract(resume_path).await?;
        let job_text = self.extractor.extract(job_path).await?;

        dispatch(provider.as_ref(), &resume_text, &job_text).await
    }
}

async fn dispatch(
    provider: &dyn AnalyzerProvider,
    resume_text: &str,
    job_text: &str,
) -> Result<AnalysisResult, AppError> {
    require_text("Resume", resume_text)?;
    require_text("Job description", job_text)?;

    if !provider.is_available() {
        return Err(AppError::Unavailable(provider.id().to_string()));
    }

    info!(
        provider = provider.id(),
        resume_chars = resume_text.len(),
        job_chars = job_text.len(),
        "Dispatching analysis"
    );
    provider.analyze(resume_text, job_text).await
}

fn require_text(label: &str, text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(format!("{label} text cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Provider whose availability can be toggled and which counts its calls.
    struct StubProvider {
        id: &'static str,
        available: AtomicBool,
        calls: AtomicUsize,
        result: AnalysisResult,
    }

    impl StubProvider {
        fn new(id: &'static str, available: bool) -> Arc<Self> {
            Arc::new(Self {
                id,
                available: AtomicBool::new(available),
                calls: AtomicUsize::new(0),
                result: AnalysisResult {
                    summary: format!("from {id}"),
                    keyword_match: 55,
                    ..Default::default()
                },
            })
        }
    }

    #[async_trait]
    impl AnalyzerProvider for StubProvider {
        fn id(&self) -> &str {
            self.id
        }

        fn display_name(&self) -> &str {
            "Stub"
        }

        fn is_available(&self) -> bool {
            self.available.load(Ordering::SeqCst)
        }

        async fn analyze(&self, _resume: &str, _job: &str) -> Result<AnalysisResult, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    fn registry_with(providers: &[Arc<StubProvider>]) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new(Arc::new(DocumentExtractor));
        for p in providers {
            registry.register(p.clone());
        }
        registry
    }

    fn text_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_unknown_key_is_not_found_even_with_empty_input() {
        let registry = registry_with(&[StubProvider::new("stub", true)]);

        let err = registry.analyze("claude", "resume", "job").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref key) if key == "claude"));

        let err = registry.analyze("claude", "", "  ").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_resume_or_job_is_validation_error() {
        let stub = StubProvider::new("stub", true);
        let registry = registry_with(&[stub.clone()]);

        let err = registry.analyze("stub", " \n\t", "job").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = registry.analyze("stub", "resume", "").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_offline_provider_is_unavailable() {
        let stub = StubProvider::new("stub", false);
        let registry = registry_with(&[stub.clone()]);

        let err = registry.analyze("stub", "resume", "job").await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delegates_and_returns_result_unchanged() {
        let stub = StubProvider::new("stub", true);
        let registry = registry_with(&[stub.clone()]);

        let result = registry.analyze("stub", "resume", "job").await.unwrap();
        assert_eq!(result, stub.result);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_list_providers_reflects_live_availability() {
        let stub = StubProvider::new("stub", false);
        let registry = registry_with(&[stub.clone()]);

        let before = registry.list_providers();
        assert!(!before[0].available);
        assert_eq!(before[0].status, crate::providers::ProviderStatus::Offline);

        stub.available.store(true, Ordering::SeqCst);
        let after = registry.list_providers();
        assert!(after[0].available);
        assert_eq!(after[0].status, crate::providers::ProviderStatus::Active);
    }

    #[tokio::test]
    async fn test_duplicate_registration_replaces_in_place() {
        let first = StubProvider::new("stub", true);
        let second = StubProvider::new("stub", true);
        let other = StubProvider::new("other", true);
        let registry = registry_with(&[first.clone(), other, second.clone()]);

        let ids: Vec<_> = registry.list_providers().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["stub", "other"]);

        registry.analyze("stub", "r", "j").await.unwrap();
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_from_files_reads_documents() {
        let stub = StubProvider::new("stub", true);
        let registry = registry_with(&[stub.clone()]);
        let resume = text_file("Rust engineer");
        let job = text_file("Rust role");

        let result = registry
            .analyze_from_files("stub", resume.path(), job.path())
            .await
            .unwrap();
        assert_eq!(result.summary, "from stub");
    }

    #[tokio::test]
    async fn test_analyze_from_files_empty_document_is_validation_error() {
        let registry = registry_with(&[StubProvider::new("stub", true)]);
        let resume = text_file("   \n");
        let job = text_file("Rust role");

        let err = registry
            .analyze_from_files("stub", resume.path(), job.path())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_defaults_register_three_providers() {
        let settings = OpenAiSettings {
            api_key_var: "RESUME_ANALYZER_TEST_KEY_REGISTRY".to_string(),
            ..OpenAiSettings::default()
        };
        std::env::remove_var(&settings.api_key_var);
        let registry = ProviderRegistry::with_defaults(&settings).unwrap();

        let services = registry.list_providers();
        let ids: Vec<_> = services.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["openai", "copilot", "gemini"]);
        assert!(!services[0].available);
        assert!(services[1].available && services[2].available);

        let result = registry
            .analyze("copilot", "Experienced backend engineer", "Seeking Node.js developer")
            .await
            .unwrap();
        assert!(result.is_well_formed());
    }
}
