//! Query pipeline metrics tracking

use biograph_domain::{Intent, QueryOutcome, QueryType};
use serde::Serialize;
use std::collections::HashMap;

/// Counters accumulated over the pipeline's lifetime
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineMetrics {
    /// Questions answered or failed
    pub total_queries: usize,

    /// Questions for which a template was selected
    pub template_matches: usize,

    /// Successful outcomes produced by a template
    pub template_hits: usize,

    /// Successful outcomes produced by generation
    pub generation_hits: usize,

    /// Successful outcomes
    pub successes: usize,

    /// Failed outcomes
    pub failures: usize,

    /// Questions that bypassed the template matcher on request
    pub forced_generation: usize,

    /// Attempts summed over all questions
    pub total_attempts: usize,

    /// Questions per classified intent
    pub by_intent: HashMap<Intent, usize>,
}

impl PipelineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished question
    ///
    /// `template_selected` is whether the matcher produced a candidate,
    /// regardless of whether that candidate survived.
    pub fn record_outcome(&mut self, outcome: &QueryOutcome, template_selected: bool, forced: bool) {
        self.total_queries += 1;
        self.total_attempts += outcome.attempts_used;
        *self.by_intent.entry(outcome.intent).or_insert(0) += 1;

        if template_selected {
            self.template_matches += 1;
        }
        if forced {
            self.forced_generation += 1;
        }

        if outcome.success {
            self.successes += 1;
            match outcome.query_type {
                QueryType::Template => self.template_hits += 1,
                QueryType::Text2Query => self.generation_hits += 1,
            }
        } else {
            self.failures += 1;
        }
    }

    /// Fraction of questions that succeeded, 0.0 before any question
    pub fn success_rate(&self) -> f64 {
        if self.total_queries == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_queries as f64
        }
    }

    /// Mean attempts per question, 0.0 before any question
    pub fn average_attempts(&self) -> f64 {
        if self.total_queries == 0 {
            0.0
        } else {
            self.total_attempts as f64 / self.total_queries as f64
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Pipeline Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Questions: {}", self.total_queries),
            format!(
                "Succeeded: {} ({:.1}%)",
                self.successes,
                self.success_rate() * 100.0
            ),
            format!("Failed: {}", self.failures),
            format!("Template matches: {}", self.template_matches),
            format!("Answered by template: {}", self.template_hits),
            format!("Answered by generation: {}", self.generation_hits),
            format!("Forced generation: {}", self.forced_generation),
            format!("Average attempts: {:.2}", self.average_attempts()),
        ];

        if !self.by_intent.is_empty() {
            lines.push(String::new());
            lines.push("Questions by intent:".to_string());
            for intent in Intent::ALL {
                if let Some(count) = self.by_intent.get(&intent) {
                    lines.push(format!("  {}: {}", intent, count));
                }
            }
        }

        lines.join("\n")
    }
}
