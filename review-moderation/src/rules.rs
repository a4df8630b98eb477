//! Hard publishing rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::signals::SignalVector;
use crate::vocabulary::{RejectionReason, Signal};

/// Fixed, ordered rule table. Closed: exactly one entry per rule-bound signal.
pub const RULE_TABLE: [(Signal, RejectionReason); 6] = [
    (Signal::PriceMentioned, RejectionReason::PriceMentioned),
    (Signal::OwnerNameMentioned, RejectionReason::OwnerMentioned),
    (Signal::PhoneEmailPresent, RejectionReason::ContactInfo),
    (Signal::AbusiveLanguage, RejectionReason::AbusiveLanguage),
    (Signal::SpamOrLinks, RejectionReason::SpamLinks),
    (Signal::HateSexualViolent, RejectionReason::HateSexualViolent),
];

/// Publish decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PublishDecision {
    Publish,
    Reject,
}

impl PublishDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishDecision::Publish => "PUBLISH",
            PublishDecision::Reject => "REJECT",
        }
    }
}

impl fmt::Display for PublishDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision plus the reasons behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub decision: PublishDecision,
    pub reasons: Vec<RejectionReason>,
}

/// Evaluate the rule table against a canonical signal vector.
pub fn evaluate(signals: &SignalVector) -> Verdict {
    let mut reasons: Vec<RejectionReason> = Vec::new();

    for (signal, reason) in RULE_TABLE {
        if signals.get(signal) && !reasons.contains(&reason) {
            reasons.push(reason);
        }
    }

    let decision = if reasons.is_empty() {
        PublishDecision::Publish
    } else {
        PublishDecision::Reject
    };

    Verdict { decision, reasons }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_table_is_closed() {
        let signals: HashSet<_> = RULE_TABLE.iter().map(|(s, _)| *s).collect();
        let reasons: HashSet<_> = RULE_TABLE.iter().map(|(_, r)| *r).collect();
        assert_eq!(signals.len(), 6);
        assert_eq!(reasons.len(), 6);
        assert!(!signals.contains(&Signal::TooShort));
    }

    #[test]
    fn test_clean_vector_publishes() {
        let verdict = evaluate(&SignalVector::new());
        assert_eq!(verdict.decision, PublishDecision::Publish);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn test_too_short_never_rejects() {
        let verdict = evaluate(&SignalVector::with([Signal::TooShort]));
        assert_eq!(verdict.decision, PublishDecision::Publish);
    }

    #[test]
    fn test_reasons_follow_table_order() {
        let signals = SignalVector::with([
            Signal::HateSexualViolent,
            Signal::PriceMentioned,
            Signal::SpamOrLinks,
        ]);
        let verdict = evaluate(&signals);
        assert_eq!(verdict.decision, PublishDecision::Reject);
        assert_eq!(
            verdict.reasons,
            vec![
                RejectionReason::PriceMentioned,
                RejectionReason::SpamLinks,
                RejectionReason::HateSexualViolent,
            ]
        );
    }

    #[test]
    fn test_single_reason_message() {
        let verdict = evaluate(&SignalVector::with([Signal::PriceMentioned]));
        let messages: Vec<_> = verdict.reasons.iter().map(|r| r.message()).collect();
        assert_eq!(messages, vec!["Price, tariff, or monetary amount mentioned"]);
    }

    #[test]
    fn test_decision_serializes_uppercase() {
        assert_eq!(serde_json::to_value(PublishDecision::Reject).unwrap(), "REJECT");
        assert_eq!(serde_json::to_value(PublishDecision::Publish).unwrap(), "PUBLISH");
    }
}
