//! Live-model analyzer registered as `openai`.
//!
//! Availability is the presence of the credential env var, read on every
//! check. One model call per analysis; the reply goes through the result parser
//! so a non-JSON answer degrades to the heuristic result instead of failing.

use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use crate::analysis::prompts::{analysis_system_prompt, build_analysis_prompt};
use crate::analysis::{parse_analysis_response, AnalysisResult};
use crate::config::OpenAiSettings;
use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::providers::AnalyzerProvider;

pub struct OpenAiProvider {
    client: LlmClient,
    api_key_var: String,
}

impl OpenAiProvider {
    pub const ID: &'static str = "openai";

    pub fn new(settings: &OpenAiSettings) -> Result<Self, LlmError> {
        Ok(Self {
            client: LlmClient::new(settings)?,
            api_key_var: settings.api_key_var.clone(),
        })
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[async_trait]
impl AnalyzerProvider for OpenAiProvider {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        "OpenAI GPT"
    }

    fn is_available(&self) -> bool {
        self.api_key().is_some()
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<AnalysisResult, AppError> {
        let api_key = self.api_key().ok_or_else(|| {
            AppError::Configuration(format!(
                "{} is not set; the OpenAI provider is offline",
                self.api_key_var
            ))
        })?;

        let prompt = build_analysis_prompt(resume_text, job_text);
        let started = Instant::now();

        let raw = self
            .client
            .call(&api_key, &analysis_system_prompt(), &prompt)
            .await
            .map_err(|e| {
                AppError::Provider(format!(
                    "OpenAI request failed: {}",
                    e.to_string().replace(&api_key, "[redacted]")
                ))
            })?;

        let outcome = parse_analysis_response(&raw);
        info!(
            model = self.client.model(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            fallback = outcome.is_fallback(),
            "OpenAI analysis completed"
        );

        Ok(outcome.into_result())
    }
}
