//! Keyword-phrase intent classification

use biograph_domain::{ClassificationResult, Intent};
use tracing::debug;

/// Deterministic intent classifier
///
/// Each intent owns a list of lower-case phrases. A phrase hits when it occurs
/// in the question starting at a word boundary. The intent with the most hits
/// wins, ties going to the intent declared first.
///
/// Confidence is `(1 - 0.5^m) * (m / T)`, where `m` is the winner's hit count and
/// `T` the hit count summed over all intents. It grows with the evidence for the
/// winner and shrinks when other intents are also hit.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    phrases: Vec<(Intent, Vec<String>)>,
}

impl IntentClassifier {
    /// Classifier with the built-in BKB phrase table
    pub fn new() -> Self {
        Self::with_phrases(default_phrases())
    }

    /// Classifier with a custom phrase table
    ///
    /// Phrases are lower-cased. Entries for `GeneralQuery` are ignored.
    pub fn with_phrases(phrases: Vec<(Intent, Vec<String>)>) -> Self {
        let mut phrases: Vec<(Intent, Vec<String>)> = phrases
            .into_iter()
            .filter(|(intent, _)| *intent != Intent::GeneralQuery)
            .map(|(intent, list)| (intent, list.into_iter().map(|p| p.to_lowercase()).collect()))
            .collect();
        phrases.sort_by_key(|(intent, _)| intent.rank());
        Self { phrases }
    }

    /// Phrases registered for an intent
    pub fn phrases_for(&self, intent: Intent) -> &[String] {
        self.phrases
            .iter()
            .find(|(i, _)| *i == intent)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Classify a question; never fails
    pub fn classify(&self, question: &str) -> ClassificationResult {
        let lowered = question.to_lowercase();

        let hits: Vec<(Intent, Vec<String>)> = self
            .phrases
            .iter()
            .map(|(intent, list)| {
                let matched = list
                    .iter()
                    .filter(|phrase| contains_phrase(&lowered, phrase))
                    .cloned()
                    .collect();
                (*intent, matched)
            })
            .collect();

        let total: usize = hits.iter().map(|(_, m)| m.len()).sum();
        let best = hits.iter().map(|(_, m)| m.len()).max().unwrap_or(0);
        if best == 0 {
            debug!("No intent phrases matched");
            return ClassificationResult::general();
        }

        // `hits` is in declaration order, so the first maximum wins ties
        let mut leaders = hits.iter().filter(|(_, m)| m.len() == best);
        let Some((intent, matched)) = leaders.next() else {
            return ClassificationResult::general();
        };
        let tied_with: Vec<Intent> = leaders.map(|(i, _)| *i).collect();

        let m = best as f64;
        let confidence = (1.0 - 0.5f64.powi(best as i32)) * (m / total as f64);

        debug!(
            intent = %intent,
            confidence,
            hits = best,
            total,
            tied = tied_with.len(),
            "Classified question"
        );

        ClassificationResult {
            intent: *intent,
            confidence,
            matched_keywords: matched.clone(),
            tied_with,
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Phrase occurs starting at a word boundary
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    haystack.match_indices(phrase).any(|(start, _)| {
        haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

fn default_phrases() -> Vec<(Intent, Vec<String>)> {
    let table: [(Intent, &[&str]); 9] = [
        (
            Intent::DrugRepurposing,
            &["repurpose", "repurposing", "repurposed", "similar drugs", "alternative use", "similar targets"],
        ),
        (
            Intent::TargetIdentification,
            &["target", "gene", "protein", "identify", "druggable", "undrugged"],
        ),
        (
            Intent::IndicationExpansion,
            &["new indication", "indications", "expand", "new use", "additional indication", "new diseases"],
        ),
        (Intent::PathwayAnalysis, &["pathway", "signaling", "mechanism"]),
        (Intent::DiseaseDrugRelation, &["treat", "treatment", "therapy"]),
        (Intent::BiomarkerDiscovery, &["biomarker", "marker", "diagnostic"]),
        (
            Intent::DrugTargetInteraction,
            &["target", "drugs target", "drug target", "targets of", "interact", "bind", "inhibit"],
        ),
        (Intent::GeneDiseaseAssociation, &["associated with", "cause", "linked to"]),
        (
            Intent::CompoundSimilarity,
            &["similar compound", "similar to", "chemical similarity", "compounds similar"],
        ),
    ];

    table
        .into_iter()
        .map(|(intent, list)| (intent, list.iter().map(|s| s.to_string()).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drug_target_question() {
        let result = IntentClassifier::new().classify("What drugs target EGFR?");
        assert_eq!(result.intent, Intent::DrugTargetInteraction);
        assert_eq!(result.matched_keywords, vec!["target", "drugs target"]);
        assert!((result.confidence - 0.5).abs() < 1e-9);
        assert!(!result.is_ambiguous());
    }

    #[test]
    fn test_no_phrases_is_general_query() {
        let result = IntentClassifier::new().classify("Describe the history of biomedicine");
        assert_eq!(result.intent, Intent::GeneralQuery);
        assert_eq!(result.confidence, 0.0);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_tie_goes_to_declaration_order() {
        // "target" hits TargetIdentification and DrugTargetInteraction once each
        let result = IntentClassifier::new().classify("Which target is best?");
        assert_eq!(result.intent, Intent::TargetIdentification);
        assert_eq!(result.tied_with, vec![Intent::DrugTargetInteraction]);
        assert!(result.is_ambiguous());
        // m = 1, T = 2
        assert!((result.confidence - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_single_intent_confidence() {
        let result = IntentClassifier::new().classify("What are the biomarkers and diagnostic markers for lung cancer?");
        assert_eq!(result.intent, Intent::BiomarkerDiscovery);
        // biomarker, marker, diagnostic: m = T = 3
        assert!((result.confidence - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_phrases_need_word_start() {
        // "because" must not count as "cause"
        let result = IntentClassifier::new().classify("It failed because of weather");
        assert_eq!(result.intent, Intent::GeneralQuery);
    }

    #[test]
    fn test_custom_table() {
        let classifier = IntentClassifier::with_phrases(vec![
            (Intent::PathwayAnalysis, vec!["Cascade".into()]),
            (Intent::GeneralQuery, vec!["anything".into()]),
        ]);
        assert_eq!(classifier.phrases_for(Intent::PathwayAnalysis), ["cascade".to_string()]);
        assert!(classifier.phrases_for(Intent::GeneralQuery).is_empty());
        assert_eq!(
            classifier.classify("Show the kinase cascade").intent,
            Intent::PathwayAnalysis
        );
    }
}
