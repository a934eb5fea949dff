//! Retrying wrapper around a [`TextGenerator`]
//!
//! Transport failures are retried after a random cool-off drawn from the
//! policy window. With [`RetryLimit::Unbounded`] a service that never comes
//! back suspends the caller forever.

use crate::config::{RetryLimit, RetryPolicy};
use crate::error::{Result, ScreenerError};
use crate::llm::generator::TextGenerator;
use crate::output::progress::{Notice, ProgressReporter, SilentReporter};
use log::warn;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

pub struct ResilientCaller<G> {
    generator: G,
    policy: RetryPolicy,
    reporter: Arc<dyn ProgressReporter>,
}

impl<G: TextGenerator> ResilientCaller<G> {
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self {
            generator,
            policy,
            reporter: Arc::new(SilentReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generated text for `prompt`, retrying transport errors per policy.
    pub async fn call(&self, prompt: &str) -> Result<String> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let error = match self.generator.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(error) if error.is_retryable() => error,
                Err(error) => return Err(error),
            };

            if let RetryLimit::Bounded(max_attempts) = self.policy.limit {
                if attempt >= max_attempts {
                    warn!("{} failed {} times, giving up: {}", self.generator.name(), attempt, error);
                    return Err(ScreenerError::RemoteServiceExhausted {
                        attempts: attempt,
                        source: Box::new(error),
                    });
                }
            }

            let wait = self.cooloff();
            warn!("{} attempt {} failed: {}", self.generator.name(), attempt, error);
            self.reporter.notice(&Notice::info(format!(
                "Remote error {}; retry {}/{} in {}s",
                error,
                attempt,
                self.budget_label(),
                wait.as_secs()
            )));
            tokio::time::sleep(wait).await;
        }
    }

    fn cooloff(&self) -> Duration {
        let min = self.policy.cooloff_min.as_millis() as u64;
        let max = self.policy.cooloff_max.as_millis() as u64;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    fn budget_label(&self) -> String {
        match self.policy.limit {
            RetryLimit::Bounded(max_attempts) => max_attempts.to_string(),
            RetryLimit::Unbounded => "∞".to_string(),
        }
    }
}
