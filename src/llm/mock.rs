//! Scripted text generator for deterministic testing.
//!
//! Replies are chosen by the first rule whose needle occurs in the prompt,
//! then by the anonymous sequence, then by the default reply. A rule or
//! sequence hands out its replies in order and repeats the last one.
//!
//! ```rust
//! use resume_screener::llm::mock::{MockReply, ScriptedGenerator};
//!
//! let generator = ScriptedGenerator::new()
//!     .with_rule("Extract JSON only", vec![MockReply::text(r#"{"full_name": "Jane"}"#)])
//!     .with_default(MockReply::text("Overall Match Percentage: 80%"));
//! ```

use crate::error::{Result, ScreenerError};
use crate::llm::generator::TextGenerator;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    Transport(String),
    Shape(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        MockReply::Transport(message.into())
    }

    pub fn shape(message: impl Into<String>) -> Self {
        MockReply::Shape(message.into())
    }

    fn into_result(self) -> Result<String> {
        match self {
            MockReply::Text(text) => Ok(text),
            MockReply::Transport(message) => Err(ScreenerError::RemoteTransport(message)),
            MockReply::Shape(message) => Err(ScreenerError::ResponseShape(message)),
        }
    }
}

#[derive(Debug)]
struct Rule {
    needle: String,
    replies: VecDeque<MockReply>,
}

#[derive(Debug)]
struct Script {
    rules: Vec<Rule>,
    sequence: VecDeque<MockReply>,
    default: MockReply,
    prompts: Vec<String>,
}

#[derive(Clone)]
pub struct ScriptedGenerator {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                rules: Vec::new(),
                sequence: VecDeque::new(),
                default: MockReply::text("Mock response"),
                prompts: Vec::new(),
            })),
        }
    }

    /// Replies for prompts containing `needle`.
    pub fn with_rule(self, needle: impl Into<String>, replies: Vec<MockReply>) -> Self {
        self.edit(|script| {
            script.rules.push(Rule {
                needle: needle.into(),
                replies: replies.into(),
            })
        });
        self
    }

    /// Replies for prompts no rule matches.
    pub fn with_sequence(self, replies: Vec<MockReply>) -> Self {
        self.edit(|script| script.sequence = replies.into());
        self
    }

    pub fn with_default(self, reply: MockReply) -> Self {
        self.edit(|script| script.default = reply);
        self
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.script
            .lock()
            .map(|script| script.prompts.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }

    fn edit(&self, change: impl FnOnce(&mut Script)) {
        if let Ok(mut script) = self.script.lock() {
            change(&mut script);
        }
    }

    fn next_reply(&self, prompt: &str) -> MockReply {
        let Ok(mut script) = self.script.lock() else {
            return MockReply::transport("mock script poisoned");
        };
        script.prompts.push(prompt.to_string());

        let Script { rules, sequence, default, .. } = &mut *script;
        let queue = rules
            .iter_mut()
            .find(|rule| prompt.contains(&rule.needle))
            .map(|rule| &mut rule.replies)
            .or_else(|| (!sequence.is_empty()).then_some(sequence));

        match queue {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| default.clone()),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| default.clone()),
            None => default.clone(),
        }
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.next_reply(prompt).into_result()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rules_sequence_and_default() {
        let generator = ScriptedGenerator::new()
            .with_rule("extract", vec![MockReply::text("one"), MockReply::text("two")])
            .with_default(MockReply::text("fallback"));

        assert_eq!(generator.generate("please extract").await.unwrap(), "one");
        assert_eq!(generator.generate("please extract").await.unwrap(), "two");
        assert_eq!(generator.generate("please extract").await.unwrap(), "two");
        assert_eq!(generator.generate("anything else").await.unwrap(), "fallback");
        assert_eq!(generator.call_count(), 4);
    }

    #[tokio::test]
    async fn test_error_replies() {
        let generator = ScriptedGenerator::new()
            .with_sequence(vec![MockReply::transport("down"), MockReply::shape("odd")]);

        assert!(matches!(generator.generate("x").await, Err(ScreenerError::RemoteTransport(_))));
        assert!(matches!(generator.generate("x").await, Err(ScreenerError::ResponseShape(_))));
    }
}
