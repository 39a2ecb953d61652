//! Response parser for LLM classification output

use super::{SentimentError, SentimentLabel, SentimentResult};
use serde::Deserialize;

/// Raw verdict structure from the LLM response
#[derive(Debug, Deserialize)]
struct RawVerdict {
    sentiment: Option<String>,
    score: Option<f64>,
    confidence: Option<f64>,
}

/// Parse an LLM completion into a normalized [`SentimentResult`].
///
/// The model is instructed to answer with a JSON object, but completions
/// sometimes arrive wrapped in prose or a markdown code fence. The payload is
/// located tolerantly; a response with no usable JSON or no recognizable
/// fields is an error, which the caller converts to the neutral fallback.
pub fn parse_verdict(content: &str) -> Result<SentimentResult, SentimentError> {
    let json_str = extract_json(content)
        .ok_or_else(|| SentimentError::Parse("no JSON object in response".to_string()))?;

    let raw: RawVerdict = serde_json::from_str(&json_str)
        .map_err(|e| SentimentError::Parse(format!("JSON parse error: {}", e)))?;

    let label = match raw.sentiment.as_deref() {
        Some(s) => SentimentLabel::from_raw(s),
        None => {
            return Err(SentimentError::Parse(
                "response missing sentiment field".to_string(),
            ))
        }
    };

    let score = raw
        .score
        .ok_or_else(|| SentimentError::Parse("response missing score field".to_string()))?;

    Ok(SentimentResult::new(label, score, raw.confidence))
}

/// Extract a JSON object from potentially mixed text/JSON content
fn extract_json(content: &str) -> Option<String> {
    let trimmed = content.trim();

    // Direct JSON: match braces from the start
    if trimmed.starts_with('{') {
        let mut depth = 0;
        for (i, c) in trimmed.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(trimmed[..=i].to_string());
                    }
                }
                _ => {}
            }
        }
    }

    // JSON inside a markdown code fence
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return Some(trimmed[json_start..json_start + end].trim().to_string());
        }
    }

    // Last resort: widest brace span
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end > start {
        return Some(trimmed[start..=end].to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let result =
            parse_verdict(r#"{"sentiment": "positive", "score": 85, "confidence": 0.9}"#).unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 85);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_parse_markdown_fenced_json() {
        let content = r#"
Here is the analysis:

```json
{"sentiment": "negative", "score": 12, "confidence": 0.8}
```

The review is clearly unhappy.
"#;
        let result = parse_verdict(content).unwrap();
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.score, 12);
    }

    #[test]
    fn test_parse_embedded_json() {
        let content = r#"Sure! {"sentiment": "neutral", "score": 50} hope that helps"#;
        let result = parse_verdict(content).unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.5); // defaulted
    }

    #[test]
    fn test_parse_out_of_range_values() {
        let result =
            parse_verdict(r#"{"sentiment": "positive", "score": 150, "confidence": 2.0}"#).unwrap();
        assert_eq!(result.score, 100);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_parse_unknown_label_coerces_to_neutral() {
        let result = parse_verdict(r#"{"sentiment": "ecstatic", "score": 95}"#).unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_parse_missing_fields_is_error() {
        assert!(parse_verdict(r#"{"score": 80}"#).is_err());
        assert!(parse_verdict(r#"{"sentiment": "positive"}"#).is_err());
    }

    #[test]
    fn test_parse_no_json_is_error() {
        assert!(parse_verdict("the review seems positive to me").is_err());
        assert!(parse_verdict("").is_err());
    }
}
