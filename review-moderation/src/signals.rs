//! Canonical signal vector.

use serde::{Deserialize, Serialize};

use crate::vocabulary::Signal;

/// Named booleans describing a review.
///
/// Signals only ever go from false to true: there is no API to clear one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalVector {
    #[serde(default)]
    price_mentioned: bool,
    #[serde(default)]
    owner_name_mentioned: bool,
    #[serde(default)]
    phone_email_present: bool,
    #[serde(default)]
    abusive_language: bool,
    #[serde(default)]
    spam_or_links: bool,
    #[serde(default)]
    hate_sexual_violent: bool,
    #[serde(default)]
    too_short: bool,
}

impl SignalVector {
    /// All signals false.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector with the given signals set.
    pub fn with(signals: impl IntoIterator<Item = Signal>) -> Self {
        let mut vector = Self::new();
        for signal in signals {
            vector.raise(signal);
        }
        vector
    }

    pub fn get(&self, signal: Signal) -> bool {
        match signal {
            Signal::PriceMentioned => self.price_mentioned,
            Signal::OwnerNameMentioned => self.owner_name_mentioned,
            Signal::PhoneEmailPresent => self.phone_email_present,
            Signal::AbusiveLanguage => self.abusive_language,
            Signal::SpamOrLinks => self.spam_or_links,
            Signal::HateSexualViolent => self.hate_sexual_violent,
            Signal::TooShort => self.too_short,
        }
    }

    /// Set a signal to true.
    pub fn raise(&mut self, signal: Signal) {
        let slot = match signal {
            Signal::PriceMentioned => &mut self.price_mentioned,
            Signal::OwnerNameMentioned => &mut self.owner_name_mentioned,
            Signal::PhoneEmailPresent => &mut self.phone_email_present,
            Signal::AbusiveLanguage => &mut self.abusive_language,
            Signal::SpamOrLinks => &mut self.spam_or_links,
            Signal::HateSexualViolent => &mut self.hate_sexual_violent,
            Signal::TooShort => &mut self.too_short,
        };
        *slot = true;
    }

    /// Set a signal to true when `value` is true; false leaves it untouched.
    pub fn raise_if(&mut self, signal: Signal, value: bool) {
        if value {
            self.raise(signal);
        }
    }

    /// Signals currently set, in vocabulary order.
    pub fn active(&self) -> impl Iterator<Item = Signal> + '_ {
        Signal::ALL.into_iter().filter(move |s| self.get(*s))
    }

    pub fn any(&self) -> bool {
        self.active().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_is_monotonic() {
        let mut v = SignalVector::new();
        v.raise(Signal::SpamOrLinks);
        v.raise_if(Signal::SpamOrLinks, false);
        assert!(v.get(Signal::SpamOrLinks));
        v.raise(Signal::SpamOrLinks);
        assert!(v.get(Signal::SpamOrLinks));
    }

    #[test]
    fn test_active_in_vocabulary_order() {
        let v = SignalVector::with([Signal::TooShort, Signal::PriceMentioned]);
        let active: Vec<_> = v.active().collect();
        assert_eq!(active, vec![Signal::PriceMentioned, Signal::TooShort]);
        assert!(v.any());
        assert!(!SignalVector::new().any());
    }

    #[test]
    fn test_serialized_shape_uses_wire_names() {
        let v = SignalVector::with([Signal::HateSexualViolent]);
        let json = serde_json::to_value(v).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        for signal in Signal::ALL {
            assert!(obj.contains_key(signal.name()));
        }
        assert_eq!(json["hate_sexual_violent"], true);
        assert_eq!(json["price_mentioned"], false);
    }
}
