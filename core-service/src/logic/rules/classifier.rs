//! Rule Classifier
//!
//! Matching and scoring only. Input: full transcript. Output: RiskResult.
//! Always re-scans from the first turn; holds no per-call state.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::thresholds::{explanation_for, LabelThresholds};
use crate::constants::MAX_RISK_SCORE;
use crate::logic::lexicon::{Lexicon, LexiconEntry};
use crate::logic::types::{RiskResult, TriggerTag, Turn};

#[derive(Debug, Clone)]
pub struct RuleClassifier {
    lexicon: Arc<Lexicon>,
    thresholds: LabelThresholds,
}

impl RuleClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_thresholds(lexicon, LabelThresholds::default())
    }

    pub fn with_thresholds(lexicon: Arc<Lexicon>, thresholds: LabelThresholds) -> Self {
        Self { lexicon, thresholds }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn thresholds(&self) -> &LabelThresholds {
        &self.thresholds
    }

    /// Score the transcript from the start
    pub fn classify(&self, turns: &[Turn]) -> RiskResult {
        let haystack = search_text(turns);

        let mut score: u32 = 0;
        let mut triggers = BTreeSet::new();

        // each entry counts once, however often its phrase repeats
        for entry in self.matching_entries(&haystack) {
            score = score.saturating_add(entry.weight());
            triggers.extend(entry.tags().iter().cloned());
        }

        if triggers.is_empty() {
            score = 0;
            triggers.insert(TriggerTag::NoRiskDetected);
        }

        let score = score.min(MAX_RISK_SCORE as u32) as u8;
        let label = self.thresholds.label_for(score);

        log::debug!(
            "Rule verdict: score={} label={} triggers={}",
            score,
            label,
            triggers.len()
        );

        RiskResult::new(score as u32, label, explanation_for(label), triggers)
    }

    fn matching_entries<'a>(&'a self, haystack: &'a str) -> impl Iterator<Item = &'a LexiconEntry> + 'a {
        self.lexicon
            .entries()
            .iter()
            .filter(move |entry| haystack.contains(entry.phrase()))
    }
}

/// All turn texts, case-folded, space-joined
fn search_text(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| t.text().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HIGH_EXPLANATION, MEDIUM_EXPLANATION, SAFE_EXPLANATION};
    use crate::logic::lexicon::{Category, CategoryWeights, PhraseSpec};
    use crate::logic::types::{RiskLabel, Speaker};

    fn builtin() -> RuleClassifier {
        RuleClassifier::new(Arc::new(Lexicon::builtin(&CategoryWeights::default())))
    }

    fn caller(text: &str) -> Turn {
        Turn::new(Speaker::Caller, text)
    }

    #[test]
    fn test_empty_transcript_is_safe() {
        let result = builtin().classify(&[]);
        assert_eq!(result.score(), 0);
        assert_eq!(result.label(), RiskLabel::Safe);
        assert_eq!(result.triggers().len(), 1);
        assert!(result.has_trigger(&TriggerTag::NoRiskDetected));
        assert_eq!(result.explanation(), SAFE_EXPLANATION);
    }

    #[test]
    fn test_otp_request_is_high() {
        let result = builtin().classify(&[caller("please share your OTP now")]);
        assert_eq!(result.score(), 80);
        assert_eq!(result.label(), RiskLabel::High);
        assert!(result.has_trigger(&TriggerTag::RequestOtp));
        assert_eq!(result.explanation(), HIGH_EXPLANATION);
    }

    #[test]
    fn test_prize_offer_is_medium() {
        let result = builtin().classify(&[caller("you have won a lucky draw refund")]);
        assert_eq!(result.score(), 30);
        assert_eq!(result.label(), RiskLabel::Medium);
        assert!(result.has_trigger(&TriggerTag::UrgencyScam));
        assert_eq!(result.explanation(), MEDIUM_EXPLANATION);
    }

    #[test]
    fn test_small_talk_is_safe() {
        let result = builtin().classify(&[caller("hello, how are you today")]);
        assert_eq!(result.score(), 0);
        assert_eq!(result.label(), RiskLabel::Safe);
        assert_eq!(result.triggers().iter().collect::<Vec<_>>(), vec![&TriggerTag::NoRiskDetected]);
    }

    #[test]
    fn test_repeated_phrase_counts_once() {
        let once = builtin().classify(&[caller("lottery")]);
        let thrice = builtin().classify(&[caller("lottery lottery"), caller("lottery again")]);
        assert_eq!(once.score(), 30);
        assert_eq!(thrice.score(), 30);
    }

    #[test]
    fn test_score_accumulates_across_turns_and_clamps() {
        let result = builtin().classify(&[
            caller("sir your lottery prize is ready"),
            Turn::new(Speaker::Callee, "really?"),
            caller("install anydesk and tell me the otp"),
        ]);
        assert_eq!(result.score(), 100);
        assert_eq!(result.label(), RiskLabel::High);
        assert!(result.has_trigger(&TriggerTag::RemoteAccess));
        assert!(result.has_trigger(&TriggerTag::RequestOtp));
        assert!(result.has_trigger(&TriggerTag::UrgencyScam));
        assert!(!result.has_trigger(&TriggerTag::NoRiskDetected));
    }

    #[test]
    fn test_two_medium_phrases_stay_below_high() {
        let result = builtin().classify(&[caller("claim your cashback, it is urgent")]);
        assert_eq!(result.score(), 60);
        assert_eq!(result.label(), RiskLabel::Medium);
    }

    #[test]
    fn test_regional_pattern() {
        let result = builtin().classify(&[caller("mee account block avutundi, verify cheyandi")]);
        assert_eq!(result.score(), 50);
        assert_eq!(result.label(), RiskLabel::Medium);
        assert!(result.has_trigger(&TriggerTag::RegionalFraudPattern));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let result = builtin().classify(&[caller("Open TeamViewer please")]);
        assert_eq!(result.label(), RiskLabel::High);
        assert!(result.has_trigger(&TriggerTag::RemoteAccess));
    }

    #[test]
    fn test_adding_phrases_never_lowers_score() {
        let rules = builtin();
        let mut turns = vec![caller("your kyc update is pending")];
        let mut last = rules.classify(&turns).score();
        assert!(last >= 70);

        for text in ["there is a prize", "send it immediately", "otp sollunga", "hello"] {
            turns.push(caller(text));
            let score = rules.classify(&turns).score();
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_deterministic() {
        let rules = builtin();
        let turns = vec![caller("confirm your details for the refund process")];
        assert_eq!(rules.classify(&turns), rules.classify(&turns));
    }

    #[test]
    fn test_substring_false_positive_is_preserved() {
        // "pin" inside "shopping" still fires
        let result = builtin().classify(&[caller("i was shopping yesterday")]);
        assert_eq!(result.label(), RiskLabel::High);
        assert!(result.has_trigger(&TriggerTag::RequestUpiPin));
    }

    #[test]
    fn test_custom_weights_and_thresholds() {
        let weights = CategoryWeights { high: 80, medium: 10, regional: 50 };
        let lexicon = Lexicon::from_specs("t", vec![PhraseSpec::new("prize", Category::Medium)], &weights).unwrap();
        let rules = RuleClassifier::with_thresholds(
            Arc::new(lexicon),
            LabelThresholds { high_min: 90, medium_min: 5 },
        );

        let result = rules.classify(&[caller("a prize for you")]);
        assert_eq!(result.score(), 10);
        assert_eq!(result.label(), RiskLabel::Medium);
    }
}
