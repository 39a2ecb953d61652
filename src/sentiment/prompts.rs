//! Prompt templates for the sentiment classification call

/// System instruction for the classification model
pub const SYSTEM_INSTRUCTION: &str = "You are a sentiment analysis expert. \
Analyze the sentiment of the app review and provide a sentiment classification \
(positive, negative, or neutral), a sentiment score from 0 to 100 (where 0 is \
completely negative, 50 is neutral, and 100 is completely positive), and a \
confidence score between 0 and 1. Consider both the tone and content of the \
text. Respond with JSON in this format: \
{ \"sentiment\": string, \"score\": number, \"confidence\": number }";

/// Build the user message for a single review text
pub fn build_user_prompt(text: &str) -> String {
    text.to_string()
}
