//! Conversational actors: a persona plus a private message history.

use crate::completion::SharedCompletion;
use crate::error::{ConversationError, require_non_empty};
use crate::message::{Message, MessageHistory, Role};
use crate::prompt_templates;
use crate::reply::{PASS_MARKER, pass_sentinel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Temperature used when none is given.
pub const DEFAULT_TEMPERATURE: f32 = 0.65;

/// Temperature used for one-off skillset expansion.
pub const SKILLSET_TEMPERATURE: f32 = 0.65;

const DEFAULT_TOPIC: &str = "Discuss anything at all.";
const DEFAULT_PERSONA: &str = "You are a helpful assistant.";

/// Unique identifier for an actor.
///
/// Conversations compare actors by id, never by name, so two actors that share
/// a name are still distinct participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

static ACTOR_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

impl ActorId {
    pub fn new() -> Self {
        Self(ACTOR_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor-{}", self.0)
    }
}

/// The shape a persona source hands over to build an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub persona: String,
}

/// A participant in a conversation.
///
/// The actor owns its history exclusively. Other components reach it only
/// through [`Actor::hear`], [`Actor::set_topic`] and [`Actor::invoke`].
pub struct Actor {
    id: ActorId,
    first_name: String,
    last_name: String,
    role: String,
    persona: String,
    behavior: Option<String>,
    company: Option<String>,
    skillset: Option<String>,
    temperature: f32,
    topic: String,
    history: MessageHistory,
    completion: Option<SharedCompletion>,
}

impl Actor {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            id: ActorId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
            persona: persona.into(),
            behavior: None,
            company: None,
            skillset: None,
            temperature: DEFAULT_TEMPERATURE,
            topic: DEFAULT_TOPIC.to_string(),
            history: MessageHistory::new(),
            completion: None,
        }
    }

    pub fn from_persona(profile: PersonaProfile) -> Self {
        Self::new(
            profile.first_name,
            profile.last_name,
            profile.role,
            profile.persona,
        )
    }

    /// Binds the completion service this actor calls on `invoke`.
    pub fn with_completion(mut self, completion: SharedCompletion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Result<Self, ConversationError> {
        self.set_temperature(temperature)?;
        Ok(self)
    }

    pub(crate) fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    pub(crate) fn bind_completion(&mut self, completion: SharedCompletion) {
        self.completion = Some(completion);
    }

    fn completion(&self) -> Result<&SharedCompletion, ConversationError> {
        self.completion.as_ref().ok_or_else(|| {
            ConversationError::Configuration(format!(
                "No completion service bound for {}. Bind one with Actor::with_completion \
                 or Conversation::with_completion before invoking.",
                self.full_name()
            ))
        })
    }

    /// Appends an externally sourced message to this actor's history.
    pub fn hear(&mut self, message: &str) {
        trace!(actor = %self.first_name, "heard message");
        self.history.push(Message::human(message));
    }

    /// Produces this actor's next reply.
    ///
    /// If `message` is given it is appended as a human entry first. The whole
    /// history is then sent to the completion service. A reply containing the
    /// pass marker (or an empty reply) is dropped and the pass sentinel is
    /// returned instead; any other reply is recorded as an assistant entry and
    /// returned verbatim.
    #[tracing::instrument(
        name = "actor.invoke",
        skip(self, message),
        fields(actor = %self.first_name, history_len = self.history.len())
    )]
    pub async fn invoke(&mut self, message: Option<&str>) -> Result<String, ConversationError> {
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            self.history.push(Message::human(message));
        }

        let completion = self.completion()?.clone();
        let reply = completion
            .complete(self.history.as_slice(), self.temperature)
            .await?;

        if reply.is_empty() || reply.contains(PASS_MARKER) {
            debug!(actor = %self.first_name, "reply suppressed as pass");
            return Ok(pass_sentinel(&self.first_name));
        }

        self.history.push(Message::assistant(reply.clone()));
        Ok(reply)
    }

    /// Renders behavior, company and persona into this actor's first entry.
    ///
    /// Does nothing if the history already starts with a system message, so
    /// the framing exists at most once.
    pub fn create_system_message(&mut self) -> Result<(), ConversationError> {
        if self.has_system_message() {
            debug!(actor = %self.first_name, "system message already present");
            return Ok(());
        }

        let content = prompt_templates::render_system_message(
            self.behavior.as_deref().unwrap_or_default(),
            self.company.as_deref().unwrap_or_default(),
            &self.persona,
        )?;
        self.history.push_front(Message::system(content));
        Ok(())
    }

    pub fn has_system_message(&self) -> bool {
        self.history
            .first()
            .is_some_and(|m| m.role == Role::System)
    }

    /// Asks the completion service to describe `skillset` and folds the answer
    /// into the persona.
    ///
    /// The exchange is not recorded in the history. Call this before the actor
    /// joins a conversation so the system message picks it up.
    pub async fn learn_skillset(&mut self, skillset: &str) -> Result<String, ConversationError> {
        if skillset.trim().is_empty() {
            return Err(ConversationError::Validation(
                "skillset must not be empty".to_string(),
            ));
        }

        let prompt = prompt_templates::render_skillset_prompt(skillset)?;
        let description = self
            .completion()?
            .complete(&[Message::human(prompt)], SKILLSET_TEMPERATURE)
            .await?;

        self.persona
            .push_str(&format!("\n\nExtra Skillset: {}", description));
        self.skillset = Some(skillset.to_string());
        Ok(description)
    }

    /// Sets a new topic and appends it to the history.
    ///
    /// An empty topic leaves both the topic and the history untouched.
    pub fn set_topic(&mut self, topic: &str) {
        if topic.is_empty() {
            return;
        }
        self.topic = topic.to_string();
        self.history.push(Message::human(topic));
    }

    pub fn set_behavior(&mut self, behavior: impl Into<String>) -> Result<(), ConversationError> {
        self.behavior = Some(require_non_empty("behavior", behavior.into())?);
        Ok(())
    }

    pub fn set_company(&mut self, company: impl Into<String>) -> Result<(), ConversationError> {
        self.company = Some(require_non_empty("company", company.into())?);
        Ok(())
    }

    pub fn set_persona(&mut self, persona: impl Into<String>) -> Result<(), ConversationError> {
        self.persona = require_non_empty("persona", persona.into())?;
        Ok(())
    }

    pub fn set_temperature(&mut self, temperature: f32) -> Result<(), ConversationError> {
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(ConversationError::Validation(format!(
                "temperature must be a non-negative number, got {temperature}"
            )));
        }
        self.temperature = temperature;
        Ok(())
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.role = role.into();
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn behavior(&self) -> Option<&str> {
        self.behavior.as_deref()
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn skillset(&self) -> Option<&str> {
        self.skillset.as_deref()
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    /// Content of the second-to-last entry, or `""` with fewer than two.
    pub fn last_prompt(&self) -> &str {
        self.history
            .second_to_last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    /// Content of the last entry, or `""` for an empty history.
    pub fn last_response(&self) -> &str {
        self.history
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new("Unknown", "Unknown", "Unknown", DEFAULT_PERSONA)
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role", &self.role)
            .field("temperature", &self.temperature)
            .field("topic", &self.topic)
            .field("history_len", &self.history.len())
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.first_name, self.last_name, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionError, CompletionService};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    // Mock completion for testing
    struct MockCompletion {
        responses: Vec<String>,
        calls: Arc<Mutex<Vec<(Vec<Message>, f32)>>>,
    }

    impl MockCompletion {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: responses.into_iter().map(String::from).collect(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl CompletionService for MockCompletion {
        async fn complete(
            &self,
            history: &[Message],
            temperature: f32,
        ) -> Result<String, CompletionError> {
            let mut calls = self.calls.lock().unwrap();
            let idx = calls.len() % self.responses.len();
            calls.push((history.to_vec(), temperature));
            Ok(self.responses[idx].clone())
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl CompletionService for FailingCompletion {
        async fn complete(&self, _: &[Message], _: f32) -> Result<String, CompletionError> {
            Err(CompletionError::Request("connection refused".to_string()))
        }
    }

    fn actor_with(responses: Vec<&str>) -> (Actor, Arc<Mutex<Vec<(Vec<Message>, f32)>>>) {
        let mock = MockCompletion::new(responses);
        let calls = mock.calls.clone();
        let actor = Actor::new("Ann", "Lee", "CTO", "You are Ann.").with_completion(Arc::new(mock));
        (actor, calls)
    }

    #[test]
    fn test_hear_appends_human_message() {
        let mut actor = Actor::default();
        actor.hear("Hello there");
        assert_eq!(actor.history().len(), 1);
        assert_eq!(actor.history().last().unwrap(), &Message::human("Hello there"));
    }

    #[tokio::test]
    async fn test_invoke_records_reply_as_assistant() {
        let (mut actor, calls) = actor_with(vec!["Let's ship it"]);
        actor.hear("What now?");

        let reply = actor.invoke(None).await.unwrap();

        assert_eq!(reply, "Let's ship it");
        assert_eq!(actor.history().len(), 2);
        assert_eq!(actor.last_response(), "Let's ship it");
        assert_eq!(actor.last_prompt(), "What now?");
        assert_eq!(actor.history().last().unwrap().role, Role::Assistant);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec![Message::human("What now?")]);
        assert!((calls[0].1 - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_invoke_with_message_appends_it_first() {
        let (mut actor, calls) = actor_with(vec!["Sure"]);

        actor.invoke(Some("Can you help?")).await.unwrap();

        assert_eq!(calls.lock().unwrap()[0].0, vec![Message::human("Can you help?")]);
        assert_eq!(actor.history().len(), 2);
    }

    #[tokio::test]
    async fn test_invoke_pass_is_suppressed() {
        let (mut actor, _) = actor_with(vec!["I have nothing to add. *Pass*"]);
        actor.hear("Thoughts?");

        let reply = actor.invoke(None).await.unwrap();

        assert_eq!(reply, "Ann: *Pass*");
        assert_eq!(actor.history().len(), 1);
        assert_eq!(actor.history().count_role(Role::Assistant), 0);
    }

    #[tokio::test]
    async fn test_invoke_empty_reply_counts_as_pass() {
        let (mut actor, _) = actor_with(vec![""]);
        assert_eq!(actor.invoke(Some("Hi")).await.unwrap(), "Ann: *Pass*");
        assert_eq!(actor.history().len(), 1);
    }

    #[tokio::test]
    async fn test_invoke_without_completion_is_configuration_error() {
        let mut actor = Actor::default();
        let result = actor.invoke(Some("Hello")).await;
        assert!(matches!(result, Err(ConversationError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_invoke_propagates_service_error() {
        let mut actor = Actor::default().with_completion(Arc::new(FailingCompletion));
        let result = actor.invoke(Some("Hello")).await;
        assert!(matches!(result, Err(ConversationError::Service(_))));
        // The human message was recorded before the call failed.
        assert_eq!(actor.history().len(), 1);
    }

    #[tokio::test]
    async fn test_invoke_uses_actor_temperature() {
        let (actor, calls) = actor_with(vec!["ok"]);
        let mut actor = actor.with_temperature(0.2).unwrap();
        actor.invoke(Some("go")).await.unwrap();
        assert!((calls.lock().unwrap()[0].1 - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_topic_is_noop() {
        let mut actor = Actor::default();
        let before_topic = actor.topic().to_string();

        actor.set_topic("");

        assert_eq!(actor.topic(), before_topic);
        assert!(actor.history().is_empty());
    }

    #[test]
    fn test_topic_is_stored_and_heard() {
        let mut actor = Actor::default();
        actor.set_topic("Pricing strategy");
        assert_eq!(actor.topic(), "Pricing strategy");
        assert_eq!(actor.last_response(), "Pricing strategy");
    }

    #[test]
    fn test_system_message_is_created_once() {
        let mut actor = Actor::new("Ann", "Lee", "CTO", "You are Ann.");
        actor.set_behavior("Be concise.").unwrap();
        actor.set_company("Acme builds rockets.").unwrap();
        actor.hear("early message");

        actor.create_system_message().unwrap();
        actor.create_system_message().unwrap();

        assert_eq!(actor.history().count_role(Role::System), 1);
        assert_eq!(
            actor.history().first().unwrap().content,
            "Be concise.\n\nAcme builds rockets.\n\nYou are Ann."
        );
        assert_eq!(actor.history().len(), 2);
    }

    #[test]
    fn test_last_prompt_and_response_on_short_history() {
        let mut actor = Actor::default();
        assert_eq!(actor.last_prompt(), "");
        assert_eq!(actor.last_response(), "");
        actor.hear("one");
        assert_eq!(actor.last_prompt(), "");
        assert_eq!(actor.last_response(), "one");
    }

    #[test]
    fn test_setters_reject_empty_values() {
        let mut actor = Actor::default();
        assert!(matches!(
            actor.set_behavior("  "),
            Err(ConversationError::Validation(_))
        ));
        assert!(actor.set_company("").is_err());
        assert!(actor.set_persona("").is_err());
        assert!(actor.behavior().is_none());
        assert_eq!(actor.persona(), DEFAULT_PERSONA);
    }

    #[test]
    fn test_temperature_validation() {
        let mut actor = Actor::default();
        assert!(actor.set_temperature(-0.1).is_err());
        assert!(actor.set_temperature(f32::NAN).is_err());
        assert!(actor.set_temperature(1.2).is_ok());
        assert!((actor.temperature() - 1.2).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_learn_skillset_extends_persona_without_touching_history() {
        let (mut actor, calls) = actor_with(vec!["Reading maps, pitching tents."]);

        let description = actor.learn_skillset("Alpine Hiking").await.unwrap();

        assert_eq!(description, "Reading maps, pitching tents.");
        assert_eq!(
            actor.persona(),
            "You are Ann.\n\nExtra Skillset: Reading maps, pitching tents."
        );
        assert_eq!(actor.skillset(), Some("Alpine Hiking"));
        assert!(actor.history().is_empty());

        let calls = calls.lock().unwrap();
        assert_eq!(
            calls[0].0,
            vec![Message::human(
                "Describe the following skillset in detail: Alpine Hiking"
            )]
        );
    }

    #[test]
    fn test_from_persona_and_display() {
        let actor = Actor::from_persona(PersonaProfile {
            first_name: "Raj".to_string(),
            last_name: "Patel".to_string(),
            role: "Designer".to_string(),
            persona: "You are Raj.".to_string(),
        });
        assert_eq!(actor.full_name(), "Raj Patel");
        assert_eq!(actor.to_string(), "Raj Patel (Designer)");
        assert_eq!(actor.persona(), "You are Raj.");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Actor::default();
        let b = Actor::default();
        assert_ne!(a.id(), b.id());
    }
}
