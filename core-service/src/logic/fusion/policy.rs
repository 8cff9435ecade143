//! Fusion Policy
//!
//! 1. Rules first. A rule HIGH is final; the model is not consulted.
//! 2. Model second, under a timeout. Any model error → rule verdict.
//! 3. Rule MEDIUM vs model SAFE → promote to MEDIUM.
//! 4. Otherwise the model verdict stands.

use std::sync::Arc;
use std::time::Duration;

use crate::constants::PROMOTION_EXPLANATION;
use crate::error::EngineResult;
use crate::logic::config::EngineConfig;
use crate::logic::model::{GeminiClassifier, ModelClassifier, ModelError};
use crate::logic::rules::RuleClassifier;
use crate::logic::types::{RiskLabel, RiskResult, TriggerTag, Turn};

pub struct FusionPolicy {
    rules: RuleClassifier,
    model: Option<Arc<dyn ModelClassifier>>,
    model_timeout: Duration,
}

impl FusionPolicy {
    pub fn new(rules: RuleClassifier, model: Option<Arc<dyn ModelClassifier>>, model_timeout: Duration) -> Self {
        Self {
            rules,
            model,
            model_timeout,
        }
    }

    /// No model configured
    pub fn rule_only(rules: RuleClassifier) -> Self {
        Self::new(rules, None, Duration::ZERO)
    }

    /// Lexicon + optional Gemini classifier from config
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let lexicon = Arc::new(config.load_lexicon()?);
        let rules = RuleClassifier::with_thresholds(lexicon, config.thresholds);

        let model: Option<Arc<dyn ModelClassifier>> = match &config.api_key {
            Some(key) => {
                let gemini = GeminiClassifier::new(key, &config.model_name, config.model_timeout())?;
                log::info!("Model classifier enabled: gemini/{}", gemini.model());
                let model: Arc<dyn ModelClassifier> = Arc::new(gemini);
                Some(model)
            }
            None => {
                log::warn!("No model API key configured - running rule-only");
                None
            }
        };

        Ok(Self::new(rules, model, config.model_timeout()))
    }

    pub fn rules(&self) -> &RuleClassifier {
        &self.rules
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Score the full transcript. Never fails.
    pub async fn score(&self, turns: &[Turn]) -> RiskResult {
        let rule_result = self.rules.classify(turns);

        if rule_result.label() == RiskLabel::High {
            log::debug!("Rule HIGH override ({}), model skipped", rule_result.score());
            return rule_result;
        }

        let Some(model) = self.model.as_ref() else {
            return rule_result;
        };

        if turns.is_empty() {
            return rule_result;
        }

        match self.consult(model.as_ref(), turns).await {
            Ok(model_result) => reconcile(rule_result, model_result),
            Err(e) => {
                log::warn!("Model classifier {} failed, using rule verdict: {}", model.name(), e);
                rule_result
            }
        }
    }

    async fn consult(&self, model: &dyn ModelClassifier, turns: &[Turn]) -> Result<RiskResult, ModelError> {
        let judgement = tokio::time::timeout(self.model_timeout, model.judge(turns))
            .await
            .map_err(|_| ModelError::Timeout(self.model_timeout))??;

        judgement.validate()
    }
}

/// Combine a non-HIGH rule verdict with a validated model verdict
pub fn reconcile(rule_result: RiskResult, model_result: RiskResult) -> RiskResult {
    if rule_result.label() == RiskLabel::Medium && model_result.label() == RiskLabel::Safe {
        let score = rule_result.score().max(model_result.score());
        log::debug!("Model said SAFE over rule MEDIUM, promoting to MEDIUM ({})", score);

        // keyword tags justify the MEDIUM; a model "no risk" tag would contradict it
        let triggers = rule_result
            .triggers()
            .iter()
            .chain(model_result.triggers())
            .filter(|tag| **tag != TriggerTag::NoRiskDetected)
            .cloned();
        return RiskResult::new(score as u32, RiskLabel::Medium, PROMOTION_EXPLANATION, triggers);
    }

    log::debug!(
        "Model verdict {} ({}) stands over rule {}",
        model_result.label(),
        model_result.score(),
        rule_result.label()
    );
    model_result
}
