//! Closed vocabularies shared by the engine and its consumers.
//!
//! | Vocabulary        | Size | Serialized as                     |
//! |-------------------|------|-----------------------------------|
//! | Sentiment tags    | 3    | `SENTIMENT_POSITIVE`, ...         |
//! | Topic tags        | 14   | `CLEANLINESS`, ...                |
//! | Special tags      | 5    | `PRICE_MENTIONED`, ...            |
//! | Signals           | 7    | `price_mentioned`, ...            |
//! | Rejection reasons | 6    | human-readable sentence           |
//!
//! Growing any of these is a contract change: bump [`VOCABULARY_VERSION`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the tag/signal/reason vocabularies.
pub const VOCABULARY_VERSION: &str = "v1.0";

// ============================================================================
// Sentiment
// ============================================================================

/// Overall sentiment of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "SENTIMENT_POSITIVE")]
    Positive,
    #[serde(rename = "SENTIMENT_NEUTRAL")]
    Neutral,
    #[serde(rename = "SENTIMENT_NEGATIVE")]
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Tag form of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "SENTIMENT_POSITIVE",
            Sentiment::Neutral => "SENTIMENT_NEUTRAL",
            Sentiment::Negative => "SENTIMENT_NEGATIVE",
        }
    }

    /// Parse a label in short (`POSITIVE`) or tag (`SENTIMENT_POSITIVE`) form, any case.
    pub fn parse(label: &str) -> Option<Self> {
        let upper = label.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("SENTIMENT_").unwrap_or(&upper);
        match short {
            "POSITIVE" => Some(Sentiment::Positive),
            "NEUTRAL" => Some(Sentiment::Neutral),
            "NEGATIVE" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    /// Sentiment implied by a star rating alone.
    pub fn from_rating(rating: u8) -> Self {
        match rating {
            0..=2 => Sentiment::Negative,
            3 => Sentiment::Neutral,
            _ => Sentiment::Positive,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Topics
// ============================================================================

/// Hotel aspect a review talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopicTag {
    Cleanliness,
    RoomQuality,
    Bathroom,
    FoodBreakfast,
    RestaurantFood,
    ServiceStaff,
    CheckinCheckout,
    Location,
    Amenities,
    Wifi,
    Noise,
    Parking,
    SafetySecurity,
    Maintenance,
}

impl TopicTag {
    pub const ALL: [TopicTag; 14] = [
        TopicTag::Cleanliness,
        TopicTag::RoomQuality,
        TopicTag::Bathroom,
        TopicTag::FoodBreakfast,
        TopicTag::RestaurantFood,
        TopicTag::ServiceStaff,
        TopicTag::CheckinCheckout,
        TopicTag::Location,
        TopicTag::Amenities,
        TopicTag::Wifi,
        TopicTag::Noise,
        TopicTag::Parking,
        TopicTag::SafetySecurity,
        TopicTag::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicTag::Cleanliness => "CLEANLINESS",
            TopicTag::RoomQuality => "ROOM_QUALITY",
            TopicTag::Bathroom => "BATHROOM",
            TopicTag::FoodBreakfast => "FOOD_BREAKFAST",
            TopicTag::RestaurantFood => "RESTAURANT_FOOD",
            TopicTag::ServiceStaff => "SERVICE_STAFF",
            TopicTag::CheckinCheckout => "CHECKIN_CHECKOUT",
            TopicTag::Location => "LOCATION",
            TopicTag::Amenities => "AMENITIES",
            TopicTag::Wifi => "WIFI",
            TopicTag::Noise => "NOISE",
            TopicTag::Parking => "PARKING",
            TopicTag::SafetySecurity => "SAFETY_SECURITY",
            TopicTag::Maintenance => "MAINTENANCE",
        }
    }

    /// Exact (trimmed, case-insensitive) lookup in the vocabulary.
    pub fn parse(label: &str) -> Option<Self> {
        let upper = label.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.as_str() == upper)
    }
}

// ============================================================================
// Signals
// ============================================================================

/// A named moderation-relevant property of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    PriceMentioned,
    OwnerNameMentioned,
    PhoneEmailPresent,
    AbusiveLanguage,
    SpamOrLinks,
    HateSexualViolent,
    TooShort,
}

impl Signal {
    pub const ALL: [Signal; 7] = [
        Signal::PriceMentioned,
        Signal::OwnerNameMentioned,
        Signal::PhoneEmailPresent,
        Signal::AbusiveLanguage,
        Signal::SpamOrLinks,
        Signal::HateSexualViolent,
        Signal::TooShort,
    ];

    /// Wire name used by the semantic analyzer and in serialized vectors.
    pub fn name(&self) -> &'static str {
        match self {
            Signal::PriceMentioned => "price_mentioned",
            Signal::OwnerNameMentioned => "owner_name_mentioned",
            Signal::PhoneEmailPresent => "phone_email_present",
            Signal::AbusiveLanguage => "abusive_language",
            Signal::SpamOrLinks => "spam_or_links",
            Signal::HateSexualViolent => "hate_sexual_violent",
            Signal::TooShort => "too_short",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Special tag bound to this signal, if any.
    pub fn special_tag(&self) -> Option<SpecialTag> {
        SpecialTag::ALL.into_iter().find(|t| t.signal() == *self)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Special tags
// ============================================================================

/// Tag surfaced whenever its bound signal is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialTag {
    PriceMentioned,
    OwnerMentioned,
    ContactInfoMentioned,
    AbusiveContent,
    SpamSuspect,
}

impl SpecialTag {
    pub const ALL: [SpecialTag; 5] = [
        SpecialTag::PriceMentioned,
        SpecialTag::OwnerMentioned,
        SpecialTag::ContactInfoMentioned,
        SpecialTag::AbusiveContent,
        SpecialTag::SpamSuspect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialTag::PriceMentioned => "PRICE_MENTIONED",
            SpecialTag::OwnerMentioned => "OWNER_MENTIONED",
            SpecialTag::ContactInfoMentioned => "CONTACT_INFO_MENTIONED",
            SpecialTag::AbusiveContent => "ABUSIVE_CONTENT",
            SpecialTag::SpamSuspect => "SPAM_SUSPECT",
        }
    }

    pub fn signal(&self) -> Signal {
        match self {
            SpecialTag::PriceMentioned => Signal::PriceMentioned,
            SpecialTag::OwnerMentioned => Signal::OwnerNameMentioned,
            SpecialTag::ContactInfoMentioned => Signal::PhoneEmailPresent,
            SpecialTag::AbusiveContent => Signal::AbusiveLanguage,
            SpecialTag::SpamSuspect => Signal::SpamOrLinks,
        }
    }
}

// ============================================================================
// Rejection reasons
// ============================================================================

/// Why a review was rejected. Serialized as its human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectionReason {
    #[serde(rename = "Price, tariff, or monetary amount mentioned")]
    PriceMentioned,
    #[serde(rename = "Hotel owner or manager name mentioned")]
    OwnerMentioned,
    #[serde(rename = "Phone number or email address present")]
    ContactInfo,
    #[serde(rename = "Contains profanity or abusive language")]
    AbusiveLanguage,
    #[serde(rename = "Contains spam, advertisements, or links")]
    SpamLinks,
    #[serde(rename = "Contains hate speech, sexual, or violent content")]
    HateSexualViolent,
}

impl RejectionReason {
    pub const ALL: [RejectionReason; 6] = [
        RejectionReason::PriceMentioned,
        RejectionReason::OwnerMentioned,
        RejectionReason::ContactInfo,
        RejectionReason::AbusiveLanguage,
        RejectionReason::SpamLinks,
        RejectionReason::HateSexualViolent,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::PriceMentioned => "Price, tariff, or monetary amount mentioned",
            RejectionReason::OwnerMentioned => "Hotel owner or manager name mentioned",
            RejectionReason::ContactInfo => "Phone number or email address present",
            RejectionReason::AbusiveLanguage => "Contains profanity or abusive language",
            RejectionReason::SpamLinks => "Contains spam, advertisements, or links",
            RejectionReason::HateSexualViolent => "Contains hate speech, sexual, or violent content",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ============================================================================
// Tags
// ============================================================================

/// A tag from one of the three disjoint tag vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Sentiment(Sentiment),
    Topic(TopicTag),
    Special(SpecialTag),
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Sentiment(s) => s.as_str(),
            Tag::Topic(t) => t.as_str(),
            Tag::Special(s) => s.as_str(),
        }
    }

    pub fn is_sentiment(&self) -> bool {
        matches!(self, Tag::Sentiment(_))
    }

    pub fn is_topic(&self) -> bool {
        matches!(self, Tag::Topic(_))
    }

    pub fn is_special(&self) -> bool {
        matches!(self, Tag::Special(_))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
