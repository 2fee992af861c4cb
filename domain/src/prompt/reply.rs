//! Reply parsing from model output
//!
//! The negotiation prompt asks for a JSON object with `message` and
//! `emotion` fields, but models wrap it in markdown fences or ignore
//! the format entirely. Parsing is forgiving: structure is recovered
//! when possible, and otherwise the raw text is kept with no emotion
//! (callers then fall back to local inference).

use crate::emotion::Emotion;

/// A parsed agent reply
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub message: String,
    /// Emotion tag supplied by the model, if any and recognizable
    pub emotion: Option<Emotion>,
}

/// Parse a raw model completion into a reply.
///
/// Tries, in order: a fenced ```json block, the whole text as JSON,
/// and the outermost `{...}` span. When none parses, the text itself
/// (fence markers stripped) becomes the message.
pub fn parse_agent_reply(raw: &str) -> AgentReply {
    for candidate in json_candidates(raw) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&candidate)
            && let Some(message) = value.get("message").and_then(|m| m.as_str())
        {
            let emotion = value
                .get("emotion")
                .and_then(|e| e.as_str())
                .and_then(|e| e.parse::<Emotion>().ok());
            return AgentReply {
                message: message.trim().to_string(),
                emotion,
            };
        }
    }

    AgentReply {
        message: strip_fences(raw),
        emotion: None,
    }
}

/// Candidate JSON spans, most specific first.
fn json_candidates(raw: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    // Fenced block: ``` or ```json up to the closing fence
    let mut in_fence = false;
    let mut block = String::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if !in_fence && (trimmed == "```json" || trimmed == "```") {
            in_fence = true;
            block.clear();
        } else if in_fence && trimmed == "```" {
            in_fence = false;
            if !block.trim().is_empty() {
                candidates.push(block.clone());
            }
        } else if in_fence {
            block.push_str(line);
            block.push('\n');
        }
    }

    candidates.push(raw.to_string());

    // Outermost object span, for JSON embedded in prose
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}'))
        && start < end
    {
        candidates.push(raw[start..=end].to_string());
    }

    candidates
}

fn strip_fences(raw: &str) -> String {
    raw.lines()
        .filter(|line| {
            let trimmed = line.trim();
            trimmed != "```" && trimmed != "```json"
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
