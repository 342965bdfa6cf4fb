//! Round scheduling and broadcast for a group of actors.
//!
//! A [`Conversation`] owns its actors and drives them through a bounded number
//! of rounds. Every round visits a snapshot of the roster in a fresh random
//! order, so no actor keeps a first-speaker advantage:
//!
//! ```text
//! discuss_topic(topic)
//!   └─ topic handed to every actor
//!   └─ while current_round < rounds
//!        └─ conduct_round()
//!             ├─ snapshot + shuffle roster
//!             ├─ actor.invoke() → Reply::classify
//!             │    ├─ Contribution → broadcast to everyone but the speaker
//!             │    ├─ Pass         → nothing is broadcast
//!             │    └─ Done         → stop visiting this round
//!             └─ full pass only: optional moderator comment → broadcast to everyone
//! ```
//!
//! Actors are invoked strictly one at a time; histories are only touched by the
//! task driving the conversation.
//!
//! # Examples
//!
//! ```rust,ignore
//! use roundtable::{Actor, Conversation, ConversationConfig, DonePolicy};
//!
//! let config = ConversationConfig::new(6, DonePolicy::EndConversation)
//!     .with_behavior("Stay in character.")
//!     .with_company("Acme Corp builds drones.");
//! let mut conversation = Conversation::new(config)?.with_completion(completion);
//!
//! conversation.add_stakeholder(Actor::new("Ann", "Lee", "CTO", "You are Ann."))?;
//! conversation.add_stakeholder(Actor::new("Raj", "Patel", "Designer", "You are Raj."))?;
//!
//! let rounds = conversation.discuss_topic("Should we ship in Q3?").await?;
//! ```

use crate::actor::{Actor, ActorId};
use crate::completion::SharedCompletion;
use crate::config::{ConversationConfig, DonePolicy};
use crate::error::{ConversationError, require_non_empty};
use crate::moderator::Moderator;
use crate::reply::Reply;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Where a conversation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// No round is running. Either nothing has started or a round just ended.
    Idle,
    /// Actors are being visited.
    RoundInProgress,
    /// The round budget is spent or a done signal ended the conversation.
    Complete,
}

/// One actor's turn within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub round: usize,
    pub speaker: ActorId,
    pub speaker_name: String,
    pub reply: Reply,
}

/// What happened during a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: usize,

    /// Turns in the order the actors were visited.
    pub turns: Vec<Turn>,

    /// The actor whose done signal cut the round short.
    pub done_by: Option<ActorId>,

    /// Facilitator comment broadcast after the round, if any.
    pub moderator_comment: Option<String>,
}

impl RoundOutcome {
    fn new(round: usize) -> Self {
        Self {
            round,
            turns: Vec::new(),
            done_by: None,
            moderator_comment: None,
        }
    }

    /// Ids of the visited actors, in visiting order.
    pub fn visited(&self) -> Vec<ActorId> {
        self.turns.iter().map(|turn| turn.speaker).collect()
    }

    pub fn ended_early(&self) -> bool {
        self.done_by.is_some()
    }
}

/// A multi-round discussion among actors.
pub struct Conversation {
    stakeholders: Vec<Actor>,
    rounds: usize,
    current_round: usize,
    topic: String,
    behavior: Option<String>,
    company: Option<String>,
    state: ConversationState,
    done_policy: DonePolicy,
    completion: Option<SharedCompletion>,
    moderator: Option<Box<dyn Moderator>>,
    rng: StdRng,
    transcript: Vec<Turn>,
}

impl Conversation {
    /// Creates a conversation from `config`.
    ///
    /// Empty behavior, company or topic text is rejected.
    pub fn new(config: ConversationConfig) -> Result<Self, ConversationError> {
        let mut conversation = Self {
            stakeholders: Vec::new(),
            rounds: config.rounds,
            current_round: 0,
            topic: crate::config::default_topic(),
            behavior: None,
            company: None,
            state: ConversationState::Idle,
            done_policy: config.done_policy,
            completion: None,
            moderator: None,
            rng: StdRng::from_entropy(),
            transcript: Vec::new(),
        };

        conversation.set_topic(config.topic)?;
        if let Some(behavior) = config.behavior {
            conversation.set_behavior(behavior)?;
        }
        if let Some(company) = config.company {
            conversation.set_company(company)?;
        }

        Ok(conversation)
    }

    /// Default completion service for actors that join without one.
    pub fn with_completion(mut self, completion: SharedCompletion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_moderator(mut self, moderator: impl Moderator + 'static) -> Self {
        self.moderator = Some(Box::new(moderator));
        self
    }

    /// Makes the speaking order reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Adds an actor to the roster.
    ///
    /// The conversation's behavior and company are stamped onto the actor, its
    /// completion service is defaulted if it has none, and its system message
    /// is synthesised.
    pub fn add_stakeholder(&mut self, mut actor: Actor) -> Result<ActorId, ConversationError> {
        if let Some(behavior) = &self.behavior {
            actor.set_behavior(behavior.clone())?;
        }
        if let Some(company) = &self.company {
            actor.set_company(company.clone())?;
        }
        if !actor.has_completion() {
            if let Some(completion) = &self.completion {
                actor.bind_completion(completion.clone());
            }
        }
        actor.create_system_message()?;

        let id = actor.id();
        debug!(actor = %actor, %id, "stakeholder joined");
        self.stakeholders.push(actor);
        Ok(id)
    }

    /// Removes an actor from the roster and hands it back.
    pub fn remove_stakeholder(&mut self, id: ActorId) -> Result<Actor, ConversationError> {
        let position = self
            .stakeholders
            .iter()
            .position(|actor| actor.id() == id)
            .ok_or_else(|| {
                ConversationError::Validation(format!(
                    "Cannot remove stakeholder '{}': not in this conversation",
                    id
                ))
            })?;
        Ok(self.stakeholders.remove(position))
    }

    /// Runs the discussion on `topic` until the round budget is spent or a
    /// done signal ends it under [`DonePolicy::EndConversation`].
    pub async fn discuss_topic(
        &mut self,
        topic: &str,
    ) -> Result<Vec<RoundOutcome>, ConversationError> {
        if self.state == ConversationState::Complete {
            return Err(ConversationError::AlreadyComplete);
        }
        self.set_topic(topic)?;
        for member in &mut self.stakeholders {
            member.set_topic(topic);
        }

        info!(topic = %self.topic, "Meeting to discuss topic");

        let mut outcomes = Vec::new();
        while self.state != ConversationState::Complete && self.current_round < self.rounds {
            outcomes.push(self.conduct_round().await?);
        }

        self.state = ConversationState::Complete;
        Ok(outcomes)
    }

    /// Runs the next round: one pass over a shuffled snapshot of the roster.
    ///
    /// Every actor present at the start is visited at most once, and exactly
    /// once unless a done signal stops the round. Each call spends one round
    /// of the budget; once it is spent the conversation is complete.
    pub async fn conduct_round(&mut self) -> Result<RoundOutcome, ConversationError> {
        if self.state == ConversationState::Complete || self.current_round >= self.rounds {
            self.state = ConversationState::Complete;
            return Err(ConversationError::AlreadyComplete);
        }

        self.current_round += 1;
        info!(round = self.current_round, rounds = self.rounds, "Round started");

        self.state = ConversationState::RoundInProgress;
        let result = self.visit_stakeholders().await;
        self.state = match &result {
            Ok(outcome)
                if outcome.ended_early() && self.done_policy == DonePolicy::EndConversation =>
            {
                ConversationState::Complete
            }
            Ok(_) if self.current_round >= self.rounds => ConversationState::Complete,
            _ => ConversationState::Idle,
        };
        result
    }

    async fn visit_stakeholders(&mut self) -> Result<RoundOutcome, ConversationError> {
        let round = self.current_round;
        let mut remaining: Vec<ActorId> = self.stakeholders.iter().map(Actor::id).collect();
        remaining.shuffle(&mut self.rng);

        let mut outcome = RoundOutcome::new(round);

        while let Some(id) = remaining.pop() {
            let Some(actor) = self.stakeholders.iter_mut().find(|a| a.id() == id) else {
                continue;
            };
            let speaker_name = actor.first_name().to_string();
            let response = actor.invoke(None).await?;
            let reply = Reply::classify(&response);

            match &reply {
                Reply::Done(_) => info!(round, speaker = %speaker_name, "done"),
                Reply::Pass => info!(round, speaker = %speaker_name, "pass"),
                Reply::Contribution(text) => {
                    info!(round, speaker = %speaker_name, "{}", text);
                    self.broadcast_to_others(text, Some(id));
                }
            }

            let done = reply.is_done();
            let turn = Turn {
                round,
                speaker: id,
                speaker_name,
                reply,
            };
            self.transcript.push(turn.clone());
            outcome.turns.push(turn);

            if done {
                outcome.done_by = Some(id);
                break;
            }
        }

        // The moderator only speaks after a full pass over the roster.
        if !outcome.ended_early() {
            let comment = match self.moderator.as_mut() {
                Some(moderator) => moderator.comment(round).await?,
                None => None,
            };
            if let Some(comment) = comment {
                info!(round, "moderator: {}", comment);
                self.broadcast_to_others(&comment, None);
                outcome.moderator_comment = Some(comment);
            }
        }

        Ok(outcome)
    }

    /// Delivers `message` to every stakeholder except `speaker`.
    ///
    /// With `speaker = None` every stakeholder hears it.
    pub fn broadcast_to_others(&mut self, message: &str, speaker: Option<ActorId>) {
        for member in self
            .stakeholders
            .iter_mut()
            .filter(|member| Some(member.id()) != speaker)
        {
            trace!(to = %member.first_name(), "broadcast");
            member.hear(message);
        }
    }

    /// Hands `topic` to every stakeholder without changing the conversation's
    /// own topic.
    pub fn broadcast_topic(&mut self, topic: &str) -> Result<(), ConversationError> {
        if topic.trim().is_empty() {
            return Err(ConversationError::Validation(
                "topic must not be empty".to_string(),
            ));
        }
        for member in &mut self.stakeholders {
            member.set_topic(topic);
        }
        Ok(())
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) -> Result<(), ConversationError> {
        self.topic = require_non_empty("topic", topic.into())?;
        Ok(())
    }

    /// Sets the behavior text stamped onto actors that join from now on.
    pub fn set_behavior(&mut self, behavior: impl Into<String>) -> Result<(), ConversationError> {
        self.behavior = Some(require_non_empty("behavior", behavior.into())?);
        Ok(())
    }

    /// Sets the company text stamped onto actors that join from now on.
    pub fn set_company(&mut self, company: impl Into<String>) -> Result<(), ConversationError> {
        self.company = Some(require_non_empty("company", company.into())?);
        Ok(())
    }

    pub fn stakeholders(&self) -> &[Actor] {
        &self.stakeholders
    }

    pub fn stakeholder(&self, id: ActorId) -> Option<&Actor> {
        self.stakeholders.iter().find(|actor| actor.id() == id)
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn behavior(&self) -> Option<&str> {
        self.behavior.as_deref()
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn done_policy(&self) -> DonePolicy {
        self.done_policy
    }

    pub fn is_complete(&self) -> bool {
        self.state == ConversationState::Complete
    }

    /// Every turn taken so far, across all rounds.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }
}
