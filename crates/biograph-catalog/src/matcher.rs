//! Template selection and scoring

use crate::extract::{extract_entity, extract_parameters};
use crate::TemplateCatalog;
use biograph_domain::{ClassificationResult, Parameters, QueryTemplate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Scoring weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Added per tag phrase found in the question
    pub tag_weight: f64,
    /// Added per keyword found among the question's words
    pub keyword_weight: f64,
    /// Added per required entity parameter the question fills
    pub entity_bonus: f64,
    /// Lowest score that counts as a match
    pub min_score: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            tag_weight: 1.5,
            keyword_weight: 0.5,
            entity_bonus: 2.0,
            min_score: 1.0,
        }
    }
}

/// A selected template with its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMatch<'a> {
    /// Winning template
    pub template: &'a QueryTemplate,
    /// Values for every declared parameter
    pub parameters: Parameters,
    /// Match score
    pub score: f64,
}

/// Why no template was selected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoMatch {
    /// No template scored at least the minimum
    #[error("no template scored above {min_score} (best {best_score})")]
    BelowThreshold {
        /// Best score seen
        best_score: f64,
        /// Configured minimum
        min_score: f64,
    },

    /// The best template needs values the question does not supply
    #[error("template {template} is missing required parameters: {}", missing.join(", "))]
    MissingParameters {
        /// Winning template
        template: String,
        /// Unfilled parameter names
        missing: Vec<String>,
    },
}

/// One ranked suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Template name
    pub template_name: String,
    /// Template description
    pub description: String,
    /// Match score
    pub score: f64,
}

/// Scores catalog templates against a question
pub struct TemplateMatcher<'a> {
    catalog: &'a TemplateCatalog,
    config: MatcherConfig,
}

impl<'a> TemplateMatcher<'a> {
    /// Create a matcher over a catalog
    pub fn new(catalog: &'a TemplateCatalog, config: MatcherConfig) -> Self {
        Self { catalog, config }
    }

    /// Active weights
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Best template for the question, or the reason there is none
    ///
    /// Templates for the classified intent are scored first; when none of them
    /// reaches the minimum score the whole catalog is scored. Ties go to the
    /// template registered first.
    pub fn find_match(
        &self,
        question: &str,
        classification: &ClassificationResult,
    ) -> Result<TemplateMatch<'a>, NoMatch> {
        let words = question_words(question);

        let in_intent: Vec<&'a QueryTemplate> =
            self.catalog.by_intent(classification.intent).collect();
        let mut best = self.best_of(&in_intent, question, &words);

        if best.is_none_or(|(_, score)| score < self.config.min_score) {
            let all: Vec<&'a QueryTemplate> = self.catalog.iter().collect();
            let fallback = self.best_of(&all, question, &words);
            debug!(
                intent = %classification.intent,
                "No intent template reached the minimum, scoring whole catalog"
            );
            best = fallback;
        }

        let Some((template, score)) = best else {
            return Err(NoMatch::BelowThreshold {
                best_score: 0.0,
                min_score: self.config.min_score,
            });
        };
        if score < self.config.min_score {
            debug!(best = %template.name, score, "Best template below minimum score");
            return Err(NoMatch::BelowThreshold {
                best_score: score,
                min_score: self.config.min_score,
            });
        }

        match extract_parameters(template, question) {
            Ok(parameters) => {
                info!(template = %template.name, score, "Template matched");
                Ok(TemplateMatch {
                    template,
                    parameters,
                    score,
                })
            }
            Err(missing) => {
                info!(
                    template = %template.name,
                    missing = ?missing,
                    "Template matched but parameters are missing"
                );
                Err(NoMatch::MissingParameters {
                    template: template.name.clone(),
                    missing,
                })
            }
        }
    }

    /// Best template, if any
    pub fn find(
        &self,
        question: &str,
        classification: &ClassificationResult,
    ) -> Option<TemplateMatch<'a>> {
        self.find_match(question, classification).ok()
    }

    /// Top `k` templates for the question over the whole catalog
    ///
    /// Zero-score templates are left out. Nothing is executed and parameters
    /// need not be extractable.
    pub fn get_suggestions(&self, question: &str, k: usize) -> Vec<Suggestion> {
        let words = question_words(question);
        let mut scored: Vec<(usize, &QueryTemplate, f64)> = self
            .catalog
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t, self.score(t, question, &words)))
            .filter(|(_, _, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));

        scored
            .into_iter()
            .take(k)
            .map(|(_, template, score)| Suggestion {
                template_name: template.name.clone(),
                description: template.description.clone(),
                score,
            })
            .collect()
    }

    /// Score one template against a question
    pub fn score_template(&self, template: &QueryTemplate, question: &str) -> f64 {
        self.score(template, question, &question_words(question))
    }

    fn best_of(
        &self,
        templates: &[&'a QueryTemplate],
        question: &str,
        words: &HashSet<String>,
    ) -> Option<(&'a QueryTemplate, f64)> {
        let mut best: Option<(&'a QueryTemplate, f64)> = None;
        for template in templates {
            let score = self.score(template, question, words);
            // Strictly greater, so the earlier template keeps a tie
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((*template, score));
            }
        }
        best
    }

    fn score(&self, template: &QueryTemplate, question: &str, words: &HashSet<String>) -> f64 {
        let lowered = question.to_lowercase();

        let tag_hits = template
            .tags
            .iter()
            .filter(|tag| lowered.contains(&tag.to_lowercase()))
            .count();
        let keyword_hits = template
            .keywords
            .iter()
            .filter(|kw| words.contains(&normalize_word(kw)))
            .count();

        let lexical =
            tag_hits as f64 * self.config.tag_weight + keyword_hits as f64 * self.config.keyword_weight;
        if lexical <= 0.0 {
            return 0.0;
        }

        let fillable = template
            .required_parameters()
            .filter_map(|spec| spec.entity_kind())
            .filter(|kind| extract_entity(question, *kind).is_some())
            .count();

        lexical + fillable as f64 * self.config.entity_bonus
    }
}

/// Lower-cased words with a trailing plural `s` removed
fn question_words(question: &str) -> HashSet<String> {
    question
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(normalize_word)
        .collect()
}

fn normalize_word(word: &str) -> String {
    let lowered = word.to_lowercase();
    if lowered.len() > 3 && lowered.ends_with('s') && !lowered.ends_with("ss") {
        lowered[..lowered.len() - 1].to_string()
    } else {
        lowered
    }
}
