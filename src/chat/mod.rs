//! Conversational workflow: classify each user turn, then answer it.
//!
//! A turn runs a linear pipeline: record the user message, ask the model to
//! classify the request, branch on the validated action, and record the
//! assistant reply. The classifier is an untrusted oracle: its free-text
//! output is parsed against the enumerated action set and anything
//! unrecognized falls back to a direct response, never an unhandled branch.
//!
//! The session is passed in by the caller and mutated in place; persisting
//! it after the turn is the caller's checkpoint.

use crate::error::Error;
use crate::llm::ContentGenerator;
use crate::prompts;
use crate::session::Session;
use tracing::{debug, warn};

/// The enumerated action set a chat turn can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Research,
    DirectResponse,
    End,
}

impl ChatAction {
    /// Parse a classifier label. Matching is trimmed and case-insensitive;
    /// anything else is unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "research" => Some(ChatAction::Research),
            "direct_response" => Some(ChatAction::DirectResponse),
            "end" => Some(ChatAction::End),
            _ => None,
        }
    }

    /// Validate classifier output, falling back to a direct response when
    /// the label is unrecognized.
    pub fn from_classifier(raw: &str) -> Self {
        match Self::parse(raw) {
            Some(action) => action,
            None => {
                warn!("Unrecognized classifier output {:?}, defaulting to direct response", raw);
                ChatAction::DirectResponse
            }
        }
    }
}

/// Result of one chat turn.
#[derive(Debug)]
pub struct ChatTurn {
    pub action: ChatAction,
    pub response: String,
}

/// Linear chat pipeline over a content generator.
pub struct ChatWorkflow<'a> {
    generator: &'a dyn ContentGenerator,
}

impl<'a> ChatWorkflow<'a> {
    pub fn new(generator: &'a dyn ContentGenerator) -> Self {
        Self { generator }
    }

    /// Run one turn: classify the input, execute the chosen action, and
    /// record both sides of the exchange in the session.
    ///
    /// Generator failures propagate unchanged; only unrecognized classifier
    /// text falls back to the default action.
    pub async fn run_turn(
        &self,
        session: &mut Session,
        user_input: &str,
    ) -> Result<ChatTurn, Error> {
        session.record_user(user_input);

        let label = self
            .generator
            .generate(&prompts::classify_action(user_input))
            .await?;
        let action = ChatAction::from_classifier(&label);
        debug!("Classified turn as {:?}", action);

        let response = match action {
            ChatAction::End => {
                return Ok(ChatTurn {
                    action,
                    response: String::new(),
                })
            }
            ChatAction::Research => self.run_research(session, user_input).await?,
            ChatAction::DirectResponse => {
                let context = session.context_summary();
                self.generator
                    .generate(&prompts::context_response(user_input, &context))
                    .await?
            }
        };

        session.record_assistant(&response);
        Ok(ChatTurn { action, response })
    }

    /// Research branch: extract the topic, gather findings, store them in
    /// the session, and answer from the findings.
    async fn run_research(
        &self,
        session: &mut Session,
        user_input: &str,
    ) -> Result<String, Error> {
        let topic = self
            .generator
            .generate(&prompts::extract_topic(user_input))
            .await?;
        let topic = topic.trim().to_string();
        debug!("Research topic: {}", topic);

        let findings = self
            .generator
            .generate(&prompts::research_topic(&topic))
            .await?;
        session.add_research(&topic, &findings);

        self.generator
            .generate(&prompts::research_response(user_input, &topic, &findings))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use std::sync::Mutex;

    /// Generator that replays scripted responses in order.
    struct ScriptedGenerator {
        responses: Mutex<Vec<Result<String, Error>>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<String, Error>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait::async_trait]
    impl ContentGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, Error> {
            self.responses.lock().unwrap().remove(0)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[test]
    fn test_parse_known_labels() {
        assert_eq!(ChatAction::parse("research"), Some(ChatAction::Research));
        assert_eq!(
            ChatAction::parse("  Direct_Response \n"),
            Some(ChatAction::DirectResponse)
        );
        assert_eq!(ChatAction::parse("END"), Some(ChatAction::End));
        assert_eq!(ChatAction::parse("summarize"), None);
    }

    #[test]
    fn test_unrecognized_label_falls_back() {
        assert_eq!(
            ChatAction::from_classifier("I think you want research, maybe?"),
            ChatAction::DirectResponse
        );
        assert_eq!(ChatAction::from_classifier("end"), ChatAction::End);
    }

    #[tokio::test]
    async fn test_direct_response_turn() {
        let generator = ScriptedGenerator::new(vec![
            Ok("direct_response".to_string()),
            Ok("Here is some help.".to_string()),
        ]);
        let workflow = ChatWorkflow::new(&generator);
        let mut session = Session::new("demo");

        let turn = workflow.run_turn(&mut session, "help me tighten the intro").await.unwrap();

        assert_eq!(turn.action, ChatAction::DirectResponse);
        assert_eq!(turn.response, "Here is some help.");
        assert_eq!(session.conversation.len(), 2);
    }

    #[tokio::test]
    async fn test_research_turn_stores_findings() {
        let generator = ScriptedGenerator::new(vec![
            Ok("research".to_string()),
            Ok("remote work".to_string()),
            Ok("Key stat: 30% growth.".to_string()),
            Ok("Research summary for you.".to_string()),
        ]);
        let workflow = ChatWorkflow::new(&generator);
        let mut session = Session::new("demo");

        let turn = workflow
            .run_turn(&mut session, "research remote work trends")
            .await
            .unwrap();

        assert_eq!(turn.action, ChatAction::Research);
        assert_eq!(turn.response, "Research summary for you.");
        assert_eq!(
            session.research("remote work").unwrap().content,
            "Key stat: 30% growth."
        );
        assert_eq!(session.current_state, "research_complete");
    }

    #[tokio::test]
    async fn test_end_turn_short_circuits() {
        let generator = ScriptedGenerator::new(vec![Ok("end".to_string())]);
        let workflow = ChatWorkflow::new(&generator);
        let mut session = Session::new("demo");

        let turn = workflow.run_turn(&mut session, "that's all, thanks").await.unwrap();

        assert_eq!(turn.action, ChatAction::End);
        assert!(turn.response.is_empty());
        // Only the user turn was recorded.
        assert_eq!(session.conversation.len(), 1);
    }

    #[tokio::test]
    async fn test_garbled_classifier_takes_direct_branch() {
        let generator = ScriptedGenerator::new(vec![
            Ok("definitely research this one!".to_string()),
            Ok("Fallback answer.".to_string()),
        ]);
        let workflow = ChatWorkflow::new(&generator);
        let mut session = Session::new("demo");

        let turn = workflow.run_turn(&mut session, "hmm").await.unwrap();
        assert_eq!(turn.action, ChatAction::DirectResponse);
        assert_eq!(turn.response, "Fallback answer.");
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let generator = ScriptedGenerator::new(vec![Err(Error::Llm(
            LlmError::RateLimitExceeded {
                model: "gemini".to_string(),
                retry_after: Some(30),
            },
        ))]);
        let workflow = ChatWorkflow::new(&generator);
        let mut session = Session::new("demo");

        let err = workflow.run_turn(&mut session, "hello").await.unwrap_err();
        assert!(matches!(err, Error::Llm(LlmError::RateLimitExceeded { .. })));
    }
}
