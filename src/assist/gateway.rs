use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::assist::dto::TaskBrief;
use crate::assist::provider::{GeminiProvider, TextProvider};
use crate::assist::stub;
use crate::config::AssistConfig;

/// A suggestion produced by the gateway. Never an error: either live
/// provider output or the deterministic fallback.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub text: String,
    pub is_fallback: bool,
    pub warning: Option<String>,
}

enum Mode {
    Stub,
    Live {
        provider: Arc<dyn TextProvider>,
        timeout: Duration,
    },
}

/// Suggestion gateway with graceful degradation. The mode is fixed at
/// startup; in live mode each request makes a single bounded provider call
/// and falls back to the stub text on any failure. Callers never see an
/// error from this type.
pub struct AssistGateway {
    mode: Mode,
}

impl AssistGateway {
    pub fn from_config(cfg: &AssistConfig) -> Self {
        if cfg.stub_mode || cfg.google_api_key.is_empty() {
            info!("assist gateway in stub mode");
            Self { mode: Mode::Stub }
        } else {
            info!(timeout_secs = cfg.timeout_secs, "assist gateway in live mode");
            Self::live(
                Arc::new(GeminiProvider::new(cfg.google_api_key.clone())),
                Duration::from_secs(cfg.timeout_secs),
            )
        }
    }

    /// Live mode with an injected provider; tests use this seam.
    pub fn live(provider: Arc<dyn TextProvider>, timeout: Duration) -> Self {
        Self {
            mode: Mode::Live { provider, timeout },
        }
    }

    pub async fn describe_task(&self, title: &str) -> Suggestion {
        let prompt = format!(
            "You are a project management assistant. Given a short task title, \
             generate a clear, concise task description (2-3 sentences) that includes \
             the goal, key deliverables, and suggested approach.\n\nTask title: {title}"
        );
        self.generate_or_fallback(&prompt, stub::describe_task(title))
            .await
    }

    pub async fn plan_day(&self, tasks: &[TaskBrief]) -> Suggestion {
        let summary: Vec<String> = tasks
            .iter()
            .map(|t| format!("- {} (status: {})", t.title, t.status))
            .collect();
        let prompt = format!(
            "You are a project management assistant. Given a list of tasks with their \
             statuses, create a concise daily plan (5-7 bullet points) prioritizing \
             in-progress work, then reviews, then new items.\n\nTasks:\n{}",
            summary.join("\n")
        );
        self.generate_or_fallback(&prompt, stub::daily_plan(tasks))
            .await
    }

    /// One provider attempt inside a bounded wait, then fallback. Matching
    /// every arm here is what keeps the "never fail the caller" contract.
    async fn generate_or_fallback(&self, prompt: &str, fallback: String) -> Suggestion {
        let (provider, timeout) = match &self.mode {
            Mode::Stub => {
                return Suggestion {
                    text: fallback,
                    is_fallback: true,
                    warning: None,
                }
            }
            Mode::Live { provider, timeout } => (provider, *timeout),
        };

        match tokio::time::timeout(timeout, provider.generate(prompt)).await {
            Ok(Ok(text)) => Suggestion {
                text: text.trim().to_string(),
                is_fallback: false,
                warning: None,
            },
            Ok(Err(e)) => {
                error!(error = %e, "text provider call failed, using fallback");
                Suggestion {
                    text: fallback,
                    is_fallback: true,
                    warning: Some(format!("LLM unavailable, using fallback. Error: {e}")),
                }
            }
            Err(_) => {
                error!(timeout_secs = timeout.as_secs(), "text provider call timed out, using fallback");
                Suggestion {
                    text: fallback,
                    is_fallback: true,
                    warning: Some("LLM unavailable, using fallback. Error: provider timed out".into()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssistConfig;
    use crate::tasks::lifecycle::TaskStatus;
    use async_trait::async_trait;

    struct CannedProvider(&'static str);

    #[async_trait]
    impl TextProvider for CannedProvider {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl TextProvider for FailingProvider {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl TextProvider for HangingProvider {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".into())
        }
    }

    fn stub_gateway() -> AssistGateway {
        AssistGateway::from_config(&AssistConfig {
            stub_mode: true,
            google_api_key: String::new(),
            timeout_secs: 1,
        })
    }

    #[tokio::test]
    async fn stub_mode_is_deterministic() {
        let gateway = stub_gateway();
        let first = gateway.describe_task("X").await;
        let second = gateway.describe_task("X").await;
        assert_eq!(first.text, second.text);
        assert!(first.is_fallback);
        assert!(first.warning.is_none());
    }

    #[tokio::test]
    async fn missing_api_key_forces_stub_mode() {
        let gateway = AssistGateway::from_config(&AssistConfig {
            stub_mode: false,
            google_api_key: String::new(),
            timeout_secs: 1,
        });
        let suggestion = gateway.describe_task("X").await;
        assert!(suggestion.is_fallback);
        assert!(suggestion.warning.is_none());
    }

    #[tokio::test]
    async fn live_success_returns_trimmed_provider_text() {
        let gateway = AssistGateway::live(
            Arc::new(CannedProvider("  generated text \n")),
            Duration::from_secs(1),
        );
        let suggestion = gateway.describe_task("X").await;
        assert_eq!(suggestion.text, "generated text");
        assert!(!suggestion.is_fallback);
        assert!(suggestion.warning.is_none());
    }

    #[tokio::test]
    async fn live_failure_falls_back_to_stub_text_with_warning() {
        let gateway = AssistGateway::live(Arc::new(FailingProvider), Duration::from_secs(1));
        let suggestion = gateway.describe_task("X").await;
        assert!(suggestion.is_fallback);
        assert_eq!(suggestion.text, stub::describe_task("X"));
        let warning = suggestion.warning.expect("warning present");
        assert!(!warning.is_empty());
        assert!(warning.contains("connection refused"));
    }

    #[tokio::test]
    async fn live_timeout_falls_back_to_stub_text_with_warning() {
        let gateway = AssistGateway::live(Arc::new(HangingProvider), Duration::from_millis(20));
        let tasks = vec![TaskBrief {
            title: "Fix login".into(),
            status: TaskStatus::Todo,
        }];
        let suggestion = gateway.plan_day(&tasks).await;
        assert!(suggestion.is_fallback);
        assert_eq!(suggestion.text, stub::daily_plan(&tasks));
        assert!(suggestion.warning.is_some());
    }

    #[tokio::test]
    async fn plan_day_empty_list_message() {
        let gateway = stub_gateway();
        let suggestion = gateway.plan_day(&[]).await;
        assert!(suggestion.text.starts_with("No tasks assigned"));
        assert!(suggestion.is_fallback);
    }
}
