//! Judgment oracle client.
//!
//! The oracle judges rounds and plays the AI side's cards. It is a black box
//! with defined failure modes: every transport fault, timeout, or
//! unparseable reply surfaces as a typed `DomainError::Oracle`, never a
//! crash, and the client touches no durable or ephemeral state. All
//! free-text parsing of the upstream reply lives here, behind the trait.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::oracle::OracleConfig;
use crate::errors::domain::OracleKind;
use crate::errors::DomainError;
use crate::repos::cards::{PromptCard, ResponseCard};
use crate::repos::personalities::AiPersonality;

/// Winner of a judged (non-tie) round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgedWinner {
    Human,
    Ai,
}

/// A judgment: who won and the judge's short explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub winner: JudgedWinner,
    pub explanation: String,
}

/// Judgment oracle port.
#[async_trait]
pub trait JudgeOracle: Send + Sync {
    /// Declare a winner between the two candidate response sets.
    async fn judge(
        &self,
        prompt: &PromptCard,
        user_cards: &[ResponseCard],
        ai_cards: &[ResponseCard],
        personality: &AiPersonality,
    ) -> Result<Verdict, DomainError>;

    /// Play for the AI side: pick exactly `pick` distinct cards from
    /// `candidates`. Implementations must return a validated selection.
    async fn choose_cards(
        &self,
        prompt: &PromptCard,
        candidates: &[ResponseCard],
        personality: &AiPersonality,
        pick: u8,
    ) -> Result<Vec<i64>, DomainError>;
}

/// Parse the `Winner: <human|ai>` / `Explanation: <text>` reply format.
pub fn parse_verdict(raw: &str) -> Result<Verdict, DomainError> {
    let mut lines = raw.trim().splitn(2, '\n');

    let winner_line = lines.next().unwrap_or_default().trim();
    let winner_token = winner_line
        .strip_prefix("Winner:")
        .ok_or_else(|| malformed_reply(raw))?
        .trim()
        .to_ascii_lowercase();

    let winner = match winner_token.as_str() {
        "human" => JudgedWinner::Human,
        "ai" => JudgedWinner::Ai,
        _ => return Err(malformed_reply(raw)),
    };

    let explanation = lines
        .next()
        .unwrap_or_default()
        .trim()
        .strip_prefix("Explanation:")
        .ok_or_else(|| malformed_reply(raw))?
        .trim()
        .to_string();

    Ok(Verdict {
        winner,
        explanation,
    })
}

fn malformed_reply(raw: &str) -> DomainError {
    DomainError::oracle(
        OracleKind::Unavailable,
        format!("malformed judgment reply: {raw:?}"),
    )
}

/// Parse a comma-separated card id list ("12, 7").
pub fn parse_selection(raw: &str) -> Result<Vec<i64>, DomainError> {
    raw.trim()
        .split(',')
        .map(|token| {
            token.trim().parse::<i64>().map_err(|_| {
                DomainError::oracle(
                    OracleKind::InvalidSelection,
                    format!("unparseable card selection: {raw:?}"),
                )
            })
        })
        .collect()
}

/// Check a selection is exactly `pick` distinct ids drawn from `candidates`.
pub fn validate_selection(
    selection: &[i64],
    candidates: &[ResponseCard],
    pick: u8,
) -> Result<(), DomainError> {
    if selection.len() != pick as usize {
        return Err(DomainError::oracle(
            OracleKind::InvalidSelection,
            format!("expected {pick} cards, oracle picked {}", selection.len()),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for id in selection {
        if !seen.insert(*id) {
            return Err(DomainError::oracle(
                OracleKind::InvalidSelection,
                format!("oracle picked card {id} more than once"),
            ));
        }
        if !candidates.iter().any(|c| c.id == *id) {
            return Err(DomainError::oracle(
                OracleKind::InvalidSelection,
                format!("oracle picked card {id} outside the candidate hand"),
            ));
        }
    }

    Ok(())
}

/// Anthropic Messages API implementation of the oracle.
pub struct AnthropicOracle {
    http: reqwest::Client,
    config: OracleConfig,
}

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl AnthropicOracle {
    pub fn new(config: OracleConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                DomainError::oracle(
                    OracleKind::Unavailable,
                    format!("failed to build oracle HTTP client: {err}"),
                )
            })?;

        Ok(Self { http, config })
    }

    /// One Messages API call; returns the first text block of the reply.
    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, DomainError> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                DomainError::oracle(OracleKind::Unavailable, format!("oracle request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::oracle(
                OracleKind::Unavailable,
                format!("oracle returned HTTP {status}"),
            ));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|err| {
            DomainError::oracle(
                OracleKind::Unavailable,
                format!("unreadable oracle response: {err}"),
            )
        })?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .ok_or_else(|| {
                DomainError::oracle(OracleKind::Unavailable, "oracle reply had no text content")
            })
    }

    fn judge_prompt(
        prompt: &PromptCard,
        user_cards: &[ResponseCard],
        ai_cards: &[ResponseCard],
        personality: &AiPersonality,
    ) -> String {
        let persona = personality
            .description
            .as_deref()
            .unwrap_or(personality.name.as_str());

        format!(
            "You are the judge in a prompt-and-response card game, with the personality of {persona}.\n\
             The prompt card is: {prompt_text}\n\
             The human player's response card(s): {user_texts}\n\
             The AI player's response card(s): {ai_texts}\n\n\
             Determine the winner based on which answer is funnier or more fitting.\n\
             Provide a very brief explanation for your decision.\n\
             Return your response exactly in the format:\n\
             Winner: [human/ai]\nExplanation: [your explanation here]",
            prompt_text = prompt.text,
            user_texts = join_texts(user_cards),
            ai_texts = join_texts(ai_cards),
        )
    }

    fn choose_prompt(
        prompt: &PromptCard,
        candidates: &[ResponseCard],
        personality: &AiPersonality,
        pick: u8,
    ) -> String {
        let persona = personality
            .description
            .as_deref()
            .unwrap_or(personality.name.as_str());

        let hand = serde_json::to_string_pretty(
            &candidates
                .iter()
                .map(|c| json!({"id": c.id, "text": c.text}))
                .collect::<Vec<_>>(),
        )
        .unwrap_or_default();

        format!(
            "You are playing a prompt-and-response card game, with the personality of {persona}.\n\
             The prompt card is: {prompt_text}\n\
             Your response cards are:\n{hand}\n\n\
             Choose the funniest {pick} card(s) to play.\n\
             Return only the id(s) of the chosen card(s), separated by commas if more than one.\n\
             For example, if you choose cards 2 and 5, return exactly: 2,5\n\
             Do not include any other text.",
            prompt_text = prompt.text,
        )
    }
}

fn join_texts(cards: &[ResponseCard]) -> String {
    cards
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl JudgeOracle for AnthropicOracle {
    async fn judge(
        &self,
        prompt: &PromptCard,
        user_cards: &[ResponseCard],
        ai_cards: &[ResponseCard],
        personality: &AiPersonality,
    ) -> Result<Verdict, DomainError> {
        let text = self
            .complete(
                Self::judge_prompt(prompt, user_cards, ai_cards, personality),
                150,
            )
            .await?;
        debug!(prompt_card_id = prompt.id, "oracle judged round");
        parse_verdict(&text)
    }

    async fn choose_cards(
        &self,
        prompt: &PromptCard,
        candidates: &[ResponseCard],
        personality: &AiPersonality,
        pick: u8,
    ) -> Result<Vec<i64>, DomainError> {
        let text = self
            .complete(
                Self::choose_prompt(prompt, candidates, personality, pick),
                20,
            )
            .await?;
        let selection = parse_selection(&text)?;
        validate_selection(&selection, candidates, pick)?;
        debug!(prompt_card_id = prompt.id, ?selection, "oracle chose cards");
        Ok(selection)
    }
}
