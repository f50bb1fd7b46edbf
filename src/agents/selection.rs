//! Selection policies - which draft the sales manager hands off
//!
//! Two policies:
//!
//! - `JudgeSelector` asks an LLM judge (the sales manager persona) to compare
//!   the drafts and answer `SELECT: <n>`. Judgment based, so two runs over the
//!   same drafts may pick differently.
//! - `PreferenceSelector` picks the first draft in a fixed style order.
//!
//! Both require at least one draft; the sales manager never calls them with
//! an empty slice. A policy that consults a model records that call in the
//! run's trace.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use super::Agent;
use crate::domain::{CallTrace, DraftStyle, EmailDraft, RecipientBrief, TraceKind, TraceStep};
use crate::error::{OutreachError, Result};

/// A policy's decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Index into the drafts slice
    pub index: usize,
    pub rationale: String,
}

/// Strategy for choosing one draft among the available ones
#[async_trait]
pub trait SelectionPolicy: Send + Sync {
    /// Short name recorded in the trace
    fn name(&self) -> &str;

    /// Choose one of `drafts` (never empty), recording any agent call in `trace`
    async fn select(
        &self,
        brief: &RecipientBrief,
        drafts: &[EmailDraft],
        trace: &mut CallTrace,
    ) -> Result<Selection>;
}

fn ensure_drafts(drafts: &[EmailDraft]) -> Result<()> {
    if drafts.is_empty() {
        return Err(OutreachError::Selection("no drafts available".to_string()));
    }
    Ok(())
}

/// LLM-as-judge selection
#[derive(Debug, Clone)]
pub struct JudgeSelector {
    agent: Agent,
}

impl JudgeSelector {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Build the comparison prompt shown to the judge
    pub fn build_prompt(brief: &RecipientBrief, drafts: &[EmailDraft]) -> String {
        let mut prompt = String::new();
        prompt.push_str("## Recipient\n\n");
        prompt.push_str(brief.as_str());
        prompt.push_str("\n\n");

        for (i, draft) in drafts.iter().enumerate() {
            prompt.push_str(&format!("## Email {} ({})\n\n", i + 1, draft.author_style));
            prompt.push_str(&draft.body);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!(
            "Respond with `SELECT: <number>` (1-{}) on the first line \
             and one sentence of reasoning on the second.",
            drafts.len()
        ));
        prompt
    }

    /// Ask the judge, recording the exchange as an agent call
    async fn consult(&self, prompt: String, trace: &mut CallTrace) -> Result<String> {
        let input = json!({ "prompt": prompt });
        let step = TraceStep::begin(TraceKind::Agent, self.agent.name(), input);
        match self.agent.run(&prompt).await {
            Ok(answer) => {
                trace.record(step.finish(true, json!({ "answer": answer })));
                Ok(answer)
            }
            Err(e) => {
                trace.record(step.finish(false, json!({ "error": e.to_string() })));
                Err(OutreachError::generation(self.agent.name(), e))
            }
        }
    }
}

#[async_trait]
impl SelectionPolicy for JudgeSelector {
    fn name(&self) -> &str {
        "judge"
    }

    async fn select(
        &self,
        brief: &RecipientBrief,
        drafts: &[EmailDraft],
        trace: &mut CallTrace,
    ) -> Result<Selection> {
        ensure_drafts(drafts)?;

        let answer = self.consult(Self::build_prompt(brief, drafts), trace).await?;

        match parse_selection(&answer, drafts.len()) {
            Some(selection) => {
                log::info!(
                    "{} selected email {} ({})",
                    self.agent.name(),
                    selection.index + 1,
                    drafts[selection.index].author_style
                );
                Ok(selection)
            }
            None => {
                log::warn!(
                    "{} answer could not be parsed, falling back to the first draft: {:?}",
                    self.agent.name(),
                    answer
                );
                Ok(Selection {
                    index: 0,
                    rationale: "Judge answer could not be parsed; \
                                fell back to the first available draft"
                        .to_string(),
                })
            }
        }
    }
}

/// Parse `SELECT: <n>` (1-based) from a judge answer
fn parse_selection(answer: &str, count: usize) -> Option<Selection> {
    let lines: Vec<&str> = answer.lines().map(str::trim).collect();
    let (pos, rest) = lines.iter().enumerate().find_map(|(i, line)| {
        let upper = line.to_ascii_uppercase();
        let start = upper.find("SELECT:")?;
        Some((i, &line[start + "SELECT:".len()..]))
    })?;

    let rest = rest.trim_start();
    let digits: String = rest
        .trim_start_matches(|c: char| c == '#' || c == '*')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let n: usize = digits.parse().ok()?;
    if n == 0 || n > count {
        return None;
    }

    let trailing = rest
        .trim_start_matches(|c: char| c == '#' || c == '*' || c.is_ascii_digit())
        .trim_start_matches(|c: char| {
            c == '.' || c == ')' || c == '-' || c == '*' || c.is_whitespace()
        });
    let rationale = std::iter::once(trailing)
        .chain(lines[pos + 1..].iter().copied())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Some(Selection {
        index: n - 1,
        rationale: if rationale.is_empty() {
            "Selected by the sales manager".to_string()
        } else {
            rationale
        },
    })
}

/// Deterministic selection by style order
#[derive(Debug, Clone)]
pub struct PreferenceSelector {
    order: Vec<DraftStyle>,
}

impl Default for PreferenceSelector {
    fn default() -> Self {
        Self::new(DraftStyle::ALL.to_vec())
    }
}

impl PreferenceSelector {
    pub fn new(order: Vec<DraftStyle>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &[DraftStyle] {
        &self.order
    }
}

#[async_trait]
impl SelectionPolicy for PreferenceSelector {
    fn name(&self) -> &str {
        "preference"
    }

    async fn select(
        &self,
        _brief: &RecipientBrief,
        drafts: &[EmailDraft],
        _trace: &mut CallTrace,
    ) -> Result<Selection> {
        ensure_drafts(drafts)?;

        let found = self
            .order
            .iter()
            .find_map(|style| drafts.iter().position(|d| d.author_style == *style));

        Ok(match found {
            Some(index) => Selection {
                index,
                rationale: format!(
                    "Preferred {} draft by configured style order",
                    drafts[index].author_style
                ),
            },
            None => Selection {
                index: 0,
                rationale: "No draft matched the style order; took the first available draft"
                    .to_string(),
            },
        })
    }
}
