//! Intent module - the closed set of question classes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of biomedical question being asked
///
/// Declaration order matters: when two intents score equally during
/// classification, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// New uses for existing drugs, or drugs similar to a reference drug
    DrugRepurposing,

    /// Genes, proteins or biomarkers behind a disease
    TargetIdentification,

    /// New disease indications for an existing drug
    IndicationExpansion,

    /// Biological pathways and their components
    PathwayAnalysis,

    /// Drugs that treat a given disease
    DiseaseDrugRelation,

    /// Biomarkers for a disease
    BiomarkerDiscovery,

    /// Which targets a drug acts on, or which drugs act on a target
    DrugTargetInteraction,

    /// Genes associated with diseases
    GeneDiseaseAssociation,

    /// Chemically similar compounds
    CompoundSimilarity,

    /// Anything else; always answered by generation
    GeneralQuery,
}

impl Intent {
    /// Every intent, in declaration order
    pub const ALL: [Intent; 10] = [
        Intent::DrugRepurposing,
        Intent::TargetIdentification,
        Intent::IndicationExpansion,
        Intent::PathwayAnalysis,
        Intent::DiseaseDrugRelation,
        Intent::BiomarkerDiscovery,
        Intent::DrugTargetInteraction,
        Intent::GeneDiseaseAssociation,
        Intent::CompoundSimilarity,
        Intent::GeneralQuery,
    ];

    /// Get the intent label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::DrugRepurposing => "drug_repurposing",
            Intent::TargetIdentification => "target_identification",
            Intent::IndicationExpansion => "indication_expansion",
            Intent::PathwayAnalysis => "pathway_analysis",
            Intent::DiseaseDrugRelation => "disease_drug_relation",
            Intent::BiomarkerDiscovery => "biomarker_discovery",
            Intent::DrugTargetInteraction => "drug_target_interaction",
            Intent::GeneDiseaseAssociation => "gene_disease_association",
            Intent::CompoundSimilarity => "compound_similarity",
            Intent::GeneralQuery => "general_query",
        }
    }

    /// Parse an intent label (case-insensitive, dashes accepted)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == normalized)
    }

    /// Position in declaration order
    pub fn rank(&self) -> usize {
        Self::ALL
            .iter()
            .position(|intent| intent == self)
            .unwrap_or(Self::ALL.len())
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid intent: {}", s))
    }
}

/// Result of classifying one question
///
/// Produced once per question and consumed immediately by the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning intent
    pub intent: Intent,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Phrases that contributed to the winning intent
    pub matched_keywords: Vec<String>,

    /// Intents that tied with the winner, if any
    pub tied_with: Vec<Intent>,
}

impl ClassificationResult {
    /// Fallback result for questions with no recognizable intent
    pub fn general() -> Self {
        Self {
            intent: Intent::GeneralQuery,
            confidence: 0.0,
            matched_keywords: Vec::new(),
            tied_with: Vec::new(),
        }
    }

    /// Whether the top score was shared with another intent
    pub fn is_ambiguous(&self) -> bool {
        !self.tied_with.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_labels_roundtrip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::parse(intent.as_str()), Some(intent));
        }
    }

    #[test]
    fn test_intent_parse_is_lenient() {
        assert_eq!(
            Intent::parse("  Drug-Target-Interaction "),
            Some(Intent::DrugTargetInteraction)
        );
        assert_eq!(Intent::parse("astrology"), None);
        assert!("astrology".parse::<Intent>().is_err());
    }

    #[test]
    fn test_rank_follows_declaration_order() {
        assert_eq!(Intent::DrugRepurposing.rank(), 0);
        assert_eq!(Intent::GeneralQuery.rank(), 9);
        assert!(Intent::TargetIdentification.rank() < Intent::GeneDiseaseAssociation.rank());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Intent::CompoundSimilarity).unwrap();
        assert_eq!(json, "\"compound_similarity\"");
    }

    #[test]
    fn test_general_classification_is_not_ambiguous() {
        let result = ClassificationResult::general();
        assert_eq!(result.intent, Intent::GeneralQuery);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.is_ambiguous());
    }
}
