//! Built-in phrase tables
//!
//! Short, unambiguous tokens only where the source list had them (otp, pin,
//! cvv). Prize and refund wording is multi-word so a single offer sentence
//! counts once.

use once_cell::sync::Lazy;

use super::types::{Category, CategoryWeights, LexiconEntry, PhraseSpec};
use crate::logic::types::TriggerTag;

const HIGH_RISK_PHRASES: &[&str] = &[
    "otp",
    "one time password",
    "verification code",
    "pin",
    "cvv",
    "password",
    "card number",
    "expiry date",
    "bank details",
    "account blocked",
    "kyc update",
    "kyc pending",
    "aadhaar number",
    "pan card",
    "anydesk",
    "screen share",
];

const REMOTE_ACCESS_PHRASES: &[&str] = &["teamviewer", "quicksupport", "rustdesk"];

const IMPERSONATION_PHRASES: &[&str] = &[
    "calling from your bank",
    "rbi officer",
    "cyber crime police",
    "customs department",
];

const MEDIUM_RISK_PHRASES: &[&str] = &[
    "lottery",
    "prize",
    "lucky draw",
    "cashback",
    "reward points",
    "gift voucher",
    "refund amount",
    "refund process",
    "claim your refund",
    "processing fee",
    "urgent",
    "immediately",
    "last chance",
    "within 24 hours",
    "verify your account",
    "confirm your details",
];

/// Hindi, Telugu and Tamil, as speech-to-text usually renders them in Latin script
const REGIONAL_PHRASES: &[&str] = &[
    // Hindi
    "otp batao",
    "otp bata do",
    "pin batao",
    "khata band",
    "khata block",
    "inaam jeeta",
    "turant paise bhejo",
    "paise wapas milenge",
    // Telugu
    "otp cheppandi",
    "pin cheppandi",
    "account block avutundi",
    "dabbu pampandi",
    // Tamil
    "otp sollunga",
    "pin sollunga",
    "account block aagidum",
    "panam anuppunga",
];

static BUILTIN_SPECS: Lazy<Vec<PhraseSpec>> = Lazy::new(|| {
    let mut specs = Vec::new();

    specs.extend(HIGH_RISK_PHRASES.iter().map(|p| PhraseSpec::new(*p, Category::High)));
    specs.extend(
        REMOTE_ACCESS_PHRASES
            .iter()
            .map(|p| PhraseSpec::new(*p, Category::High).with_tag(TriggerTag::RemoteAccess)),
    );
    specs.extend(
        IMPERSONATION_PHRASES
            .iter()
            .map(|p| PhraseSpec::new(*p, Category::High).with_tag(TriggerTag::ImpersonationBank)),
    );
    specs.extend(MEDIUM_RISK_PHRASES.iter().map(|p| PhraseSpec::new(*p, Category::Medium)));
    specs.extend(REGIONAL_PHRASES.iter().map(|p| PhraseSpec::new(*p, Category::Regional)));

    specs
});

/// Built-in entries weighted with `weights`
pub fn entries(weights: &CategoryWeights) -> Vec<LexiconEntry> {
    BUILTIN_SPECS
        .iter()
        .map(|spec| LexiconEntry::new(spec.phrase.clone(), spec.category, weights, spec.tags.iter().cloned()))
        .collect()
}

/// Built-in phrase definitions, e.g. as a starting point for a custom file
pub fn specs() -> &'static [PhraseSpec] {
    &BUILTIN_SPECS
}
