//! Sentiment resolution against the star rating.

use crate::vocabulary::Sentiment;

/// Resolve the final sentiment from the semantic label and the rating.
///
/// The rating wins when the two strongly disagree:
///
/// | rating | semantic  | result            |
/// |--------|-----------|-------------------|
/// | 4, 5   | NEGATIVE  | POSITIVE          |
/// | 1, 2   | POSITIVE  | NEGATIVE          |
/// | 3      | any       | NEUTRAL           |
/// | any    | absent    | from rating       |
/// | other  | label     | label unchanged   |
///
/// Out-of-range ratings clamp to the nearest end of the scale.
pub fn resolve_sentiment(semantic: Option<Sentiment>, rating: u8) -> Sentiment {
    let from_rating = Sentiment::from_rating(rating);

    match (semantic, rating) {
        (None, _) | (_, 3) => from_rating,
        (Some(Sentiment::Negative), 4..) => Sentiment::Positive,
        (Some(Sentiment::Positive), 0..=2) => Sentiment::Negative,
        (Some(label), _) => label,
    }
}

/// Resolve from an unparsed label; unrecognized labels count as absent.
pub fn resolve_sentiment_label(label: Option<&str>, rating: u8) -> Sentiment {
    resolve_sentiment(label.and_then(Sentiment::parse), rating)
}
