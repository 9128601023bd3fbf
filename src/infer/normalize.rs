//! Reduction of upstream replies to a single answer string.
//!
//! Providers are told apart only by which top-level array is present, so the
//! order of the checks in [`UpstreamReply::classify`] decides the shape.

use serde_json::Value;

pub const EMPTY_RESPONSE: &str = "[Empty response]";

#[derive(Debug, PartialEq)]
pub enum UpstreamReply<'a> {
    /// First element of a non-empty `choices` array.
    OpenAiStyle {
        content: Option<&'a str>,
        text: Option<&'a str>,
        parts: Option<Vec<&'a str>>,
    },
    /// Part texts of the first element of a non-empty `candidates` array.
    GeminiStyle { parts: Vec<&'a str> },
    Unrecognized,
}

impl<'a> UpstreamReply<'a> {
    pub fn classify(reply: &'a Value) -> Self {
        if let Some(choice) = first_of(reply, "choices") {
            let message = choice.get("message");
            return Self::OpenAiStyle {
                content: message.and_then(|m| m.get("content")).and_then(Value::as_str),
                text: choice.get("text").and_then(Value::as_str),
                parts: message.and_then(|m| m.get("parts")).and_then(part_texts),
            };
        }

        if let Some(candidate) = first_of(reply, "candidates") {
            return Self::GeminiStyle {
                parts: candidate
                    .get("content")
                    .and_then(|c| c.get("parts"))
                    .and_then(part_texts)
                    .unwrap_or_default(),
            };
        }

        Self::Unrecognized
    }

    /// The answer text, or `None` when the reply carries nothing usable.
    pub fn answer(&self) -> Option<String> {
        let answer = match self {
            Self::OpenAiStyle {
                content,
                text,
                parts,
            } => content
                .filter(|content| !content.is_empty())
                .or(text.filter(|text| !text.is_empty()))
                .map(str::to_owned)
                .or_else(|| parts.as_ref().map(|parts| parts.join("\n")))?,
            Self::GeminiStyle { parts } => parts.join("\n"),
            Self::Unrecognized => return None,
        };

        (!answer.is_empty()).then_some(answer)
    }
}

pub fn normalize(reply: &Value) -> Box<str> {
    UpstreamReply::classify(reply)
        .answer()
        .map(String::into_boxed_str)
        .unwrap_or_else(|| EMPTY_RESPONSE.into())
}

fn first_of<'a>(reply: &'a Value, key: &str) -> Option<&'a Value> {
    reply.get(key)?.as_array()?.first()
}

// Parts without a string `text` count as empty lines.
fn part_texts(parts: &Value) -> Option<Vec<&str>> {
    Some(
        parts
            .as_array()?
            .iter()
            .map(|part| part.get("text").and_then(Value::as_str).unwrap_or(""))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prefers_choice_message_content() {
        let reply = json!({
            "choices": [{ "message": { "content": "4", "parts": [{ "text": "ignored" }] }, "text": "ignored" }]
        });
        assert_eq!(&*normalize(&reply), "4");
    }

    #[test]
    fn falls_back_to_choice_text() {
        let reply = json!({ "choices": [{ "message": { "content": "" }, "text": "legacy completion" }] });
        assert_eq!(&*normalize(&reply), "legacy completion");
    }

    #[test]
    fn falls_back_to_choice_message_parts() {
        let reply = json!({
            "choices": [{ "message": { "parts": [{ "text": "line one" }, { "text": "line two" }] } }]
        });
        assert_eq!(&*normalize(&reply), "line one\nline two");
    }

    #[test]
    fn joins_candidate_parts_with_newlines() {
        let reply = json!({
            "candidates": [{ "content": { "parts": [{ "text": "first" }, {}, { "text": "third" }] } }]
        });
        assert_eq!(
            UpstreamReply::classify(&reply),
            UpstreamReply::GeminiStyle {
                parts: vec!["first", "", "third"]
            }
        );
        assert_eq!(&*normalize(&reply), "first\n\nthird");
    }

    #[test]
    fn choices_win_over_candidates_even_when_empty_handed() {
        let reply = json!({
            "choices": [{ "message": {} }],
            "candidates": [{ "content": { "parts": [{ "text": "never used" }] } }]
        });
        assert!(matches!(
            UpstreamReply::classify(&reply),
            UpstreamReply::OpenAiStyle { .. }
        ));
        assert_eq!(&*normalize(&reply), EMPTY_RESPONSE);
    }

    #[test]
    fn empty_choices_fall_through_to_candidates() {
        let reply = json!({
            "choices": [],
            "candidates": [{ "content": { "parts": [{ "text": "from gemini" }] } }]
        });
        assert_eq!(&*normalize(&reply), "from gemini");
    }

    #[test]
    fn unknown_shapes_yield_placeholder() {
        for reply in [
            json!({}),
            json!({ "choices": [] }),
            json!({ "candidates": [] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{}] }),
            json!({ "error": { "message": "quota exceeded" } }),
            json!("plain string"),
        ] {
            assert_eq!(&*normalize(&reply), EMPTY_RESPONSE, "reply: {reply}");
        }
    }
}
