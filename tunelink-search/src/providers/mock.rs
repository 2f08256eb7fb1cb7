//! Mock provider implementation for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::LinkProvider;
use crate::errors::LookupError;
use crate::types::{ProviderPayload, ProviderResult};

type Handler = dyn Fn(&str) -> Result<ProviderResult, LookupError> + Send + Sync;

/// Mock provider for testing.
///
/// Answers from a closure, counts calls and can simulate a slow upstream.
#[derive(Clone)]
pub struct MockProvider {
    name: &'static str,
    handler: Arc<Handler>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    inputs: Arc<std::sync::Mutex<Vec<String>>>,
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("name", &self.name)
            .field("delay", &self.delay)
            .field("calls", &self.call_count())
            .finish()
    }
}

impl MockProvider {
    /// Creates a mock answering every call through `handler`.
    pub fn with_handler<F>(name: &'static str, handler: F) -> Self
    where
        F: Fn(&str) -> Result<ProviderResult, LookupError> + Send + Sync + 'static,
    {
        Self {
            name,
            handler: Arc::new(handler),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            inputs: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock that always returns `result`.
    pub fn returning(name: &'static str, result: ProviderResult) -> Self {
        Self::with_handler(name, move |_| Ok(result.clone()))
    }

    /// Creates a mock that always finds a single web URL.
    pub fn web_url(name: &'static str, url: &str) -> Self {
        Self::returning(
            name,
            ProviderResult::Found(ProviderPayload::WebUrl(url.to_string())),
        )
    }

    /// Creates a mock that always scrapes `urls`.
    pub fn scraped(name: &'static str, urls: &[&str]) -> Self {
        Self::returning(
            name,
            ProviderResult::Found(ProviderPayload::Scraped(
                urls.iter().map(|url| url.to_string()).collect(),
            )),
        )
    }

    /// Creates a mock that never finds anything.
    pub fn not_found(name: &'static str) -> Self {
        Self::returning(name, ProviderResult::NotFound)
    }

    /// Creates a mock whose upstream is always unreachable.
    pub fn failing(name: &'static str) -> Self {
        Self::with_handler(name, move |_| {
            Err(LookupError::ProviderUnavailable {
                provider: name,
                reason: "mock upstream down".to_string(),
            })
        })
    }

    /// Delays every answer by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `fetch` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inputs received so far, in call order.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs
            .lock()
            .map(|inputs| inputs.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LinkProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, input: &str) -> Result<ProviderResult, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(input.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        (self.handler)(input)
    }
}
