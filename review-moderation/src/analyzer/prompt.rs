//! Versioned analysis prompt.

use crate::vocabulary::TopicTag;

/// Bump when the prompt wording or expected reply shape changes.
pub const PROMPT_VERSION: &str = "v1.0";

const TEMPLATE: &str = r#"Analyze the following hotel review and return a JSON object with the exact structure shown.

Review Rating: {rating}
Review Text: {review_text}

{
    "summary": "1-2 line summary of the review",
    "sentiment": "SENTIMENT_POSITIVE or SENTIMENT_NEUTRAL or SENTIMENT_NEGATIVE",
    "signals": {
        "price_mentioned": true/false (mentions price, tariff, currency, amount paid),
        "owner_name_mentioned": true/false (mentions hotel owner/manager name),
        "phone_email_present": true/false (contains phone number or email),
        "abusive_language": true/false (contains profanity, abuse, vulgar language),
        "spam_or_links": true/false (contains links, advertising, spam),
        "hate_sexual_violent": true/false (contains hate speech, sexual content, violent language),
        "too_short": true/false (less than 15 words)
    },
    "topic_tags": ["relevant tags from: {topics}"],
    "flags": ["quality flags such as 'generic' or 'inconsistent_rating'"]
}

Return ONLY the JSON object, no other text."#;

/// Render the analysis prompt for one review.
pub fn render_prompt(review_text: &str, rating: u8) -> String {
    let topics = TopicTag::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    TEMPLATE
        .replace("{rating}", &rating.to_string())
        .replace("{topics}", &topics)
        .replace("{review_text}", review_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_inputs_and_vocabulary() {
        let prompt = render_prompt("Clean rooms, noisy street", 3);
        assert!(prompt.contains("Review Rating: 3"));
        assert!(prompt.contains("Review Text: Clean rooms, noisy street"));
        assert!(prompt.contains("SAFETY_SECURITY"));
        assert!(!prompt.contains("{topics}"));
    }

    #[test]
    fn test_review_text_is_substituted_last() {
        let prompt = render_prompt("I typed {rating} and {topics} literally", 5);
        assert!(prompt.contains("I typed {rating} and {topics} literally"));
    }
}
