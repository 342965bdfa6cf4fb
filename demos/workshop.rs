//! A design-thinking workshop between three personas.
//!
//! Requires `OPENAI_API_KEY`. Set `ROUNDTABLE_MODERATOR=1` to comment between
//! rounds from the terminal.
//!
//! ```sh
//! cargo run --example workshop --features openai-api
//! ```

use anyhow::Context;
use roundtable::observability::{self, ObservabilityConfig};
use roundtable::{
    Actor, ConsoleModerator, Conversation, ConversationConfig, DonePolicy, OpenAiCompletion,
    PersonaProfile, Reply,
};
use std::sync::Arc;

const BEHAVIOR: &str = "You are taking part in a workshop. Reply in at most three sentences. \
If you have nothing new to add, reply with *Pass*. If you believe the group has reached a \
decision, reply with *Done*.";

const COMPANY: &str = "Northwind Outfitters sells hiking and camping gear online and in \
twelve stores across the Pacific Northwest.";

fn personas() -> Vec<PersonaProfile> {
    vec![
        PersonaProfile {
            first_name: "Dana".to_string(),
            last_name: "Whitfield".to_string(),
            role: "Head of Product".to_string(),
            persona: "You are Dana, pragmatic and focused on customer outcomes.".to_string(),
        },
        PersonaProfile {
            first_name: "Omar".to_string(),
            last_name: "Haddad".to_string(),
            role: "Store Operations Lead".to_string(),
            persona: "You are Omar, you know what actually happens on the shop floor.".to_string(),
        },
        PersonaProfile {
            first_name: "Lucia".to_string(),
            last_name: "Ferreira".to_string(),
            role: "Data Analyst".to_string(),
            persona: "You are Lucia, you ask for evidence before agreeing to anything."
                .to_string(),
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init(ObservabilityConfig::default())
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    let completion = OpenAiCompletion::try_from_env().context("configuring OpenAI")?;

    let config = ConversationConfig::new(4, DonePolicy::EndConversation)
        .with_behavior(BEHAVIOR)
        .with_company(COMPANY);
    let mut conversation = Conversation::new(config)?.with_completion(Arc::new(completion));
    if std::env::var("ROUNDTABLE_MODERATOR").is_ok() {
        conversation = conversation.with_moderator(ConsoleModerator::stdio());
    }

    for profile in personas() {
        conversation.add_stakeholder(Actor::from_persona(profile))?;
    }

    let outcomes = conversation
        .discuss_topic("How should we launch a gear rental service next spring?")
        .await?;

    for outcome in &outcomes {
        println!("--- Round {} ---", outcome.round);
        for turn in &outcome.turns {
            match &turn.reply {
                Reply::Contribution(text) => println!("{}: {}", turn.speaker_name, text),
                Reply::Pass => println!("{}: (pass)", turn.speaker_name),
                Reply::Done(_) => println!("{}: (done)", turn.speaker_name),
            }
        }
    }

    Ok(())
}
