//! Turning a vision-model reply into a complete [`PlaceGuess`].
//!
//! The reply is loosely-structured text that is supposed to be a JSON object.
//! Missing or mistyped fields are filled from a fixed default table and both
//! suggestion lists are forced to exactly three entries. A reply that cannot
//! be parsed at all yields [`fallback_guess`] instead of an error.

use crate::models::PlaceGuess;
use serde_json::{Map, Value};

pub const SUGGESTION_COUNT: usize = 3;
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

const DEFAULT_BUSINESS_NAME: &str = "Commerce détecté";
const DEFAULT_BUSINESS_TYPE: &str = "Commerce";
const DEFAULT_ADDRESS: &str = "Adresse détectée par IA";
const FALLBACK_ADDRESS: &str = "Lieu analysé par IA";
const DEFAULT_CATEGORY: &str = "Commerce/Service";
const DEFAULT_ICON: &str = "🏪";
const DEFAULT_RATING: u8 = 4;
const DEFAULT_REVIEW: &str = "";
const DEFAULT_CONFIDENCE: f64 = 0.8;

pub const POSITIVE_FILLERS: [&str; SUGGESTION_COUNT] =
    ["Bon accueil", "Bonne qualité", "À recommander"];
pub const NEGATIVE_FILLERS: [&str; SUGGESTION_COUNT] =
    ["Attente longue", "Prix élevés", "Service à améliorer"];

/// Remove a surrounding Markdown code fence, with or without a language tag.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Anything alphanumeric right after the opening fence is the language tag
    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let rest = &rest[tag_len..];

    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse and default a raw model reply. Never fails.
pub fn sanitize_reply(reply: &str) -> PlaceGuess {
    match parse_reply(reply) {
        Ok(fields) => from_fields(&fields),
        Err(reason) => {
            tracing::warn!("Vision reply could not be parsed: {}", reason);
            fallback_guess(reason)
        }
    }
}

/// The record returned whenever the vision pipeline fails.
pub fn fallback_guess(error: impl Into<String>) -> PlaceGuess {
    PlaceGuess {
        business_name: DEFAULT_BUSINESS_NAME.to_string(),
        business_type: DEFAULT_BUSINESS_TYPE.to_string(),
        address: FALLBACK_ADDRESS.to_string(),
        category: DEFAULT_CATEGORY.to_string(),
        icon: DEFAULT_ICON.to_string(),
        suggested_rating: DEFAULT_RATING,
        suggested_review: DEFAULT_REVIEW.to_string(),
        positive_suggestions: fillers(&POSITIVE_FILLERS),
        negative_suggestions: fillers(&NEGATIVE_FILLERS),
        confidence: FALLBACK_CONFIDENCE,
        error: Some(error.into()),
    }
}

fn parse_reply(reply: &str) -> Result<Map<String, Value>, String> {
    let body = strip_code_fence(reply);
    if body.is_empty() {
        return Err("Empty reply from vision model".to_string());
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err("Vision reply is not a JSON object".to_string()),
        Err(e) => Err(format!("Invalid JSON in vision reply: {}", e)),
    }
}

fn from_fields(fields: &Map<String, Value>) -> PlaceGuess {
    PlaceGuess {
        business_name: text_or(fields, "businessName", DEFAULT_BUSINESS_NAME),
        business_type: text_or(fields, "businessType", DEFAULT_BUSINESS_TYPE),
        address: text_or(fields, "address", DEFAULT_ADDRESS),
        category: text_or(fields, "category", DEFAULT_CATEGORY),
        icon: text_or(fields, "icon", DEFAULT_ICON),
        suggested_rating: number(fields, "suggestedRating")
            .map(|rating| rating.round().clamp(1.0, 5.0) as u8)
            .unwrap_or(DEFAULT_RATING),
        suggested_review: text_or(fields, "suggestedReview", DEFAULT_REVIEW),
        positive_suggestions: normalize_suggestions(
            fields.get("positiveSuggestions"),
            &POSITIVE_FILLERS,
        ),
        negative_suggestions: normalize_suggestions(
            fields.get("negativeSuggestions"),
            &NEGATIVE_FILLERS,
        ),
        confidence: number(fields, "confidence")
            .map(|confidence| confidence.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_CONFIDENCE),
        error: None,
    }
}

fn text_or(fields: &Map<String, Value>, key: &str, default: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn number(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

/// Exactly three entries: extras are dropped, gaps are filled from `filler`.
pub fn normalize_suggestions(value: Option<&Value>, filler: &[&str; SUGGESTION_COUNT]) -> Vec<String> {
    let mut suggestions: Vec<String> = value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    suggestions.truncate(SUGGESTION_COUNT);

    for candidate in filler {
        if suggestions.len() >= SUGGESTION_COUNT {
            break;
        }
        if !suggestions.iter().any(|s| s == candidate) {
            suggestions.push(candidate.to_string());
        }
    }

    suggestions
}

fn fillers(filler: &[&str; SUGGESTION_COUNT]) -> Vec<String> {
    filler.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_REPLY: &str = r#"{
        "businessName": "Le Procope",
        "businessType": "Restaurant",
        "address": "13 Rue de l'Ancienne Comédie, Paris",
        "category": "Restaurant historique",
        "icon": "🍽️",
        "suggestedRating": 5,
        "suggestedReview": "",
        "positiveSuggestions": ["cadre historique", "plats copieux", "service rapide"],
        "negativeSuggestions": ["bruyant", "cher", "touristique"],
        "confidence": 0.92
    }"#;

    #[test]
    fn test_full_reply_is_kept() {
        let guess = sanitize_reply(FULL_REPLY);

        assert_eq!(guess.business_name, "Le Procope");
        assert_eq!(guess.icon, "🍽️");
        assert_eq!(guess.suggested_rating, 5);
        assert_eq!(
            guess.positive_suggestions,
            vec!["cadre historique", "plats copieux", "service rapide"]
        );
        assert_eq!(guess.negative_suggestions, vec!["bruyant", "cher", "touristique"]);
        assert_eq!(guess.confidence, 0.92);
        assert!(guess.error.is_none());
    }

    #[test]
    fn test_fenced_reply_parses_like_unfenced() {
        let expected = sanitize_reply(FULL_REPLY);

        let with_tag = format!("```json\n{}\n```", FULL_REPLY);
        let without_tag = format!("```\n{}\n```", FULL_REPLY);
        let one_line = "```json{\"businessName\": \"Le Procope\"}```";

        assert_eq!(sanitize_reply(&with_tag), expected);
        assert_eq!(sanitize_reply(&without_tag), expected);
        assert_eq!(sanitize_reply(one_line).business_name, "Le Procope");
    }

    #[test]
    fn test_strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```JSON\n{}\n```"), "{}");
    }

    #[test]
    fn test_only_business_name_fills_defaults() {
        let guess = sanitize_reply(r#"{"businessName": "Boulangerie Poilâne"}"#);

        assert_eq!(
            guess,
            PlaceGuess {
                business_name: "Boulangerie Poilâne".to_string(),
                business_type: DEFAULT_BUSINESS_TYPE.to_string(),
                address: DEFAULT_ADDRESS.to_string(),
                category: DEFAULT_CATEGORY.to_string(),
                icon: DEFAULT_ICON.to_string(),
                suggested_rating: DEFAULT_RATING,
                suggested_review: String::new(),
                positive_suggestions: fillers(&POSITIVE_FILLERS),
                negative_suggestions: fillers(&NEGATIVE_FILLERS),
                confidence: DEFAULT_CONFIDENCE,
                error: None,
            }
        );
    }

    #[test]
    fn test_suggestions_truncated_and_padded() {
        let guess = sanitize_reply(
            r#"{
                "positiveSuggestions": ["a", "b", "c", "d", "e"],
                "negativeSuggestions": ["trop cher"]
            }"#,
        );

        assert_eq!(guess.positive_suggestions, vec!["a", "b", "c"]);
        assert_eq!(
            guess.negative_suggestions,
            vec!["trop cher", "Attente longue", "Prix élevés"]
        );
    }

    #[test]
    fn test_padding_skips_duplicate_fillers() {
        let value = serde_json::json!(["Bon accueil", 42, "  "]);
        let suggestions = normalize_suggestions(Some(&value), &POSITIVE_FILLERS);
        assert_eq!(suggestions, vec!["Bon accueil", "Bonne qualité", "À recommander"]);
    }

    #[test]
    fn test_rating_and_confidence_are_coerced_and_clamped() {
        let guess = sanitize_reply(r#"{"suggestedRating": "4.6", "confidence": 1.7}"#);
        assert_eq!(guess.suggested_rating, 5);
        assert_eq!(guess.confidence, 1.0);

        let guess = sanitize_reply(r#"{"suggestedRating": -3, "confidence": "high"}"#);
        assert_eq!(guess.suggested_rating, 1);
        assert_eq!(guess.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_wrong_types_fall_back_to_defaults() {
        let guess = sanitize_reply(r#"{"businessName": 12, "icon": null, "positiveSuggestions": "great"}"#);
        assert_eq!(guess.business_name, DEFAULT_BUSINESS_NAME);
        assert_eq!(guess.icon, DEFAULT_ICON);
        assert_eq!(guess.positive_suggestions, fillers(&POSITIVE_FILLERS));
    }

    #[test]
    fn test_blank_strings_fall_back_to_defaults() {
        let guess = sanitize_reply(r#"{"businessName": "   ", "category": "", "icon": "☕"}"#);
        assert_eq!(guess.business_name, DEFAULT_BUSINESS_NAME);
        assert_eq!(guess.category, DEFAULT_CATEGORY);
        assert_eq!(guess.icon, "☕");
    }

    #[test]
    fn test_unparseable_reply_returns_fallback() {
        let guess = sanitize_reply("Je suis désolé, je ne peux pas identifier ce lieu.");

        assert_eq!(guess.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(guess.address, FALLBACK_ADDRESS);
        assert_eq!(guess.positive_suggestions.len(), SUGGESTION_COUNT);
        assert_eq!(guess.negative_suggestions.len(), SUGGESTION_COUNT);
        assert!(guess.error.as_deref().is_some_and(|e| !e.is_empty()));
    }

    #[test]
    fn test_empty_and_non_object_replies_return_fallback() {
        let empty = sanitize_reply("   ");
        assert_eq!(empty.error.as_deref(), Some("Empty reply from vision model"));

        let fenced_empty = sanitize_reply("```json\n```");
        assert_eq!(fenced_empty.confidence, FALLBACK_CONFIDENCE);

        let array = sanitize_reply("[1, 2, 3]");
        assert_eq!(array.error.as_deref(), Some("Vision reply is not a JSON object"));
    }
}
