//! Tag assembly.

use crate::signals::SignalVector;
use crate::vocabulary::{Sentiment, SpecialTag, Tag, TopicTag};

/// Compose the final tag sequence.
///
/// Order: one sentiment tag, then recognized topic candidates in the order
/// given, then special tags for set signals. Duplicates keep their first
/// position; unrecognized topics are dropped.
pub fn assemble_tags<S: AsRef<str>>(
    sentiment: Sentiment,
    topic_candidates: &[S],
    signals: &SignalVector,
) -> Vec<Tag> {
    let topics = topic_candidates
        .iter()
        .filter_map(|candidate| TopicTag::parse(candidate.as_ref()))
        .map(Tag::Topic);

    let specials = SpecialTag::ALL
        .into_iter()
        .filter(|tag| signals.get(tag.signal()))
        .map(Tag::Special);

    let mut tags: Vec<Tag> = Vec::with_capacity(1 + topic_candidates.len() + SpecialTag::ALL.len());
    for tag in std::iter::once(Tag::Sentiment(sentiment)).chain(topics).chain(specials) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    debug_assert_eq!(tags.iter().filter(|t| t.is_sentiment()).count(), 1);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Signal;

    fn names(tags: &[Tag]) -> Vec<&'static str> {
        tags.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_sentiment_and_topics() {
        let tags = assemble_tags(
            Sentiment::Positive,
            &["SERVICE_STAFF", "AMENITIES"],
            &SignalVector::new(),
        );
        assert_eq!(names(&tags), vec!["SENTIMENT_POSITIVE", "SERVICE_STAFF", "AMENITIES"]);
    }

    #[test]
    fn test_unknown_and_duplicate_topics_dropped() {
        let tags = assemble_tags(
            Sentiment::Neutral,
            &["WIFI", "POOL", "wifi", "NOISE", "SENTIMENT_NEGATIVE"],
            &SignalVector::new(),
        );
        assert_eq!(names(&tags), vec!["SENTIMENT_NEUTRAL", "WIFI", "NOISE"]);
    }

    #[test]
    fn test_special_tags_follow_signals() {
        let signals = SignalVector::with([
            Signal::SpamOrLinks,
            Signal::PriceMentioned,
            Signal::HateSexualViolent,
            Signal::TooShort,
        ]);
        let tags = assemble_tags::<&str>(Sentiment::Negative, &[], &signals);
        assert_eq!(
            names(&tags),
            vec!["SENTIMENT_NEGATIVE", "PRICE_MENTIONED", "SPAM_SUSPECT"]
        );
    }

    #[test]
    fn test_all_special_tags_at_most_five() {
        let signals = SignalVector::with(Signal::ALL);
        let tags = assemble_tags::<String>(Sentiment::Neutral, &[], &signals);
        assert_eq!(tags.iter().filter(|t| t.is_special()).count(), 5);
        assert_eq!(tags.len(), 6);
    }

    #[test]
    fn test_full_topic_vocabulary_bounded() {
        let mut candidates: Vec<String> =
            TopicTag::ALL.iter().map(|t| t.as_str().to_string()).collect();
        candidates.extend(candidates.clone());
        let tags = assemble_tags(Sentiment::Positive, &candidates, &SignalVector::new());
        assert_eq!(tags.iter().filter(|t| t.is_topic()).count(), 14);
    }
}
