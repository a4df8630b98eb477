//! Deterministic pattern detectors.
//!
//! One detector per rule-bound signal. Every detector is a pure, total
//! function of the review text returning whether it fired and the first
//! matched excerpt.
//!
//! # Tokenization policy
//!
//! - Matching is case-insensitive, except the name token of the owner
//!   detector which must start with an uppercase letter.
//! - Vocabulary detectors (profanity, severe content) match whole words only,
//!   using the Unicode-aware `\b` of the `regex` crate: `ass` matches in
//!   "kiss my ass" but not in "classic" or "assistant"; `hell` matches
//!   "hell" and "Hell's" but not "hello" or "shell".

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use review_common::util::truncate_with_ellipsis;

use crate::vocabulary::Signal;

/// Longest excerpt kept from a match.
const MAX_EXCERPT_CHARS: usize = 80;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid detector pattern {p}: {e}")))
        .collect()
}

static PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // ₹5000, $ 120, €80.50
        r"[₹$€£]\s?\d[\d,]*(?:\.\d+)?",
        // Rs. 5000, INR 4500
        r"(?i)\b(?:rs\.?|inr|usd|eur|gbp)\s?\d[\d,]*",
        // 5000 rupees, 120 dollars
        r"(?i)\b\d[\d,]*(?:\.\d+)?\s?(?:rs|inr|usd|rupees?|dollars?|euros?|bucks)\b",
        // rupees 5000
        r"(?i)\b(?:rupees?|dollars?|euros?)\s+\d",
        // 6500 per night, 5000/- per day, 99/night. Single digits are counts.
        r"(?i)\b\d[\d,]*\d(?:\.\d+)?\s*(?:/-\s*)?(?:per|a|/)\s*(?:night|day|room|person|stay)\b",
        // paid 6500, tariff was 4000, the bill came to 3000
        r"(?i)\b(?:tariff|price|cost|costs|charged|paid|fare|bill)\s+(?:[a-z]+\s+){0,2}?(?:(?:rs\.?\s?|inr\s?|[₹$€£]\s?)\d|\d[\d,]*\d)",
        // room rate of 3000
        r"(?i)\brate\s+(?:of|was|is)\s+(?:(?:rs\.?\s?|inr\s?|[₹$€£]\s?)\d|\d[\d,]*\d)",
    ])
});

static CONTACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // name@example.com
        r"(?i)\b[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.[a-z]{2,}\b",
        // 9876543210, 123-456-7890, (555) 123 4567, +1 555.123.4567
        r"(?:\+\d{1,3}[\s.-]?)?\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b",
        // 98765 43210
        r"\b\d{5}[\s-]\d{5}\b",
    ])
});

static OWNER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // manager Rahul, owner is Mr. Kapoor, manager, Sunita
        r"\b(?i:owner|manager|proprietor|gm)\b[,:]?\s+(?:(?i:is|was|named|called|mr\.?|mrs\.?|ms\.?|shri|sir)\s+)*(\p{Lu}\p{Ll}+)",
        // Rahul the manager, Kapoor, the owner. A bare "Friendly manager" is not a name.
        r"\b(\p{Lu}\p{Ll}+)(?:,\s*|\s+(?i:the|our)\s+)(?:(?i:the|our|hotel)\s+)*(?i:owner|manager|proprietor)\b",
    ])
});

static PROFANITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\b(?:damn|damned|dammit|shit|shitty|bullshit|crap|crappy|fuck|fucking|fucked|fucker|wtf|bastards?|bitch(?:es|y)?|asshole|ass|arse|idiots?|morons?|bloody|hell|scumbag)\b",
        r"(?i)\bf\*+k(?:ing)?\b",
    ])
});

static SPAM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bhttps?://\S+",
        r"(?i)\bwww\.\S+",
        r"(?i)\b(?:click here|visit (?:our|my) (?:site|website|page|profile)|check out (?:my|our) (?:channel|page|profile|website)|use (?:promo|coupon|discount|referral) code|(?:promo|coupon|discount|referral) code|dm me|whatsapp me|follow (?:me|us) on|subscribe to (?:my|our)|buy now|order now|limited offer|earn money|work from home)\b",
    ])
});

static SEVERE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\b(?:kill(?:ed|ing)?\s+(?:you|him|her|them|everyone)|i(?:'ll| will)\s+kill|murder(?:ed|er)?|raped?|terrorists?|nazis?|porn(?:o|ography)?|xxx|sex|sexual|nude|naked|genocide|lynch(?:ed)?|behead(?:ed)?|slut|whore|retard(?:ed)?)\b",
        r"(?i)\bgo back to your (?:own )?country\b",
    ])
});

/// Capitalized words that follow or precede a role noun without being a name.
const NOT_A_NAME: &[&str] = &[
    "The", "This", "That", "These", "Those", "And", "But", "Or", "So", "He", "She", "They", "We",
    "It", "Its", "His", "Her", "Our", "Their", "My", "Your", "Who", "Was", "Is", "Were", "Very",
    "Also", "Then", "When", "If", "Not", "Please", "Hotel", "Restaurant", "General", "Duty",
    "Front", "Office", "Desk", "Night", "Floor", "Assistant", "Shift", "Property", "Resort",
    "Guest", "Relations", "Sales", "Operations", "Kitchen", "Bar", "Store", "Spa", "Lobby",
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "January",
    "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December", "Today", "Yesterday", "Tonight", "Met", "Ask", "Asked", "Tell",
    "Told", "Call", "Called", "Contact", "Thank", "Thanks", "Loved", "Complain", "Complained",
];

// ============================================================================
// Detection results
// ============================================================================

/// Outcome of one detector on one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl Detection {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn hit(excerpt: &str) -> Self {
        Self {
            matched: true,
            excerpt: Some(truncate_with_ellipsis(excerpt.trim(), MAX_EXCERPT_CHARS)),
        }
    }
}

fn first_match(patterns: &[Regex], text: &str) -> Detection {
    patterns
        .iter()
        .find_map(|re| re.find(text))
        .map_or_else(Detection::miss, |m| Detection::hit(m.as_str()))
}

// ============================================================================
// Detectors
// ============================================================================

/// Currency symbols and codes, amounts next to night/tariff wording.
pub fn detect_price(text: &str) -> Detection {
    first_match(&PRICE_PATTERNS, text)
}

/// Phone-number-shaped digit runs and email addresses.
pub fn detect_contact(text: &str) -> Detection {
    first_match(&CONTACT_PATTERNS, text)
}

/// A role noun ("owner", "manager") next to a capitalized name.
pub fn detect_owner_name(text: &str) -> Detection {
    for re in OWNER_PATTERNS.iter() {
        for caps in re.captures_iter(text) {
            let Some(name) = caps.get(1) else { continue };
            if NOT_A_NAME.contains(&name.as_str()) {
                continue;
            }
            if let Some(whole) = caps.get(0) {
                return Detection::hit(whole.as_str());
            }
        }
    }
    Detection::miss()
}

/// Profane or insulting words.
pub fn detect_profanity(text: &str) -> Detection {
    first_match(&PROFANITY_PATTERNS, text)
}

/// URLs, `www.` hosts and promotional call-to-action phrasing.
pub fn detect_spam(text: &str) -> Detection {
    first_match(&SPAM_PATTERNS, text)
}

/// Hate speech, sexual or violent vocabulary.
pub fn detect_severe_content(text: &str) -> Detection {
    first_match(&SEVERE_PATTERNS, text)
}

/// Signature shared by all detectors.
pub type DetectorFn = fn(&str) -> Detection;

/// The full detector set, one entry per rule-bound signal.
pub const DETECTORS: [(Signal, DetectorFn); 6] = [
    (Signal::PriceMentioned, detect_price),
    (Signal::OwnerNameMentioned, detect_owner_name),
    (Signal::PhoneEmailPresent, detect_contact),
    (Signal::AbusiveLanguage, detect_profanity),
    (Signal::SpamOrLinks, detect_spam),
    (Signal::HateSexualViolent, detect_severe_content),
];

/// Results of running every detector over one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectorReport {
    results: BTreeMap<Signal, Detection>,
}

impl DetectorReport {
    /// Run the full detector set.
    pub fn scan(text: &str) -> Self {
        let results = DETECTORS
            .iter()
            .map(|(signal, detect)| (*signal, detect(text)))
            .collect();
        Self { results }
    }

    /// Whether the detector for `signal` fired. Signals without a detector are false.
    pub fn fired(&self, signal: Signal) -> bool {
        self.results.get(&signal).is_some_and(|d| d.matched)
    }

    /// Whether `signal` has a detector at all.
    pub fn covers(&self, signal: Signal) -> bool {
        self.results.contains_key(&signal)
    }

    pub fn get(&self, signal: Signal) -> Option<&Detection> {
        self.results.get(&signal)
    }

    /// Signals whose detector fired, in vocabulary order.
    pub fn fired_signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.results
            .iter()
            .filter(|(_, d)| d.matched)
            .map(|(s, _)| *s)
    }

    /// Matched excerpts keyed by signal wire name.
    pub fn excerpts(&self) -> BTreeMap<String, String> {
        self.results
            .iter()
            .filter_map(|(s, d)| d.excerpt.clone().map(|e| (s.name().to_string(), e)))
            .collect()
    }
}
