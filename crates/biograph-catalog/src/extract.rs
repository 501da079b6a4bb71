//! Parameter extraction from question text

use biograph_domain::{EntityKind, ParamSource, ParamValue, Parameters, QueryTemplate};
use regex::Regex;
use std::sync::LazyLock;

static NAMED_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:drug|compound|to|like|for|of|called|named)\s+([A-Z][A-Za-z0-9-]*)")
        .expect("drug pattern is valid")
});

static NAMED_AFTER_LOWERCASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:similar\s+to|like|called|named)\s+([a-z][a-z0-9-]*)")
        .expect("lowercase drug pattern is valid")
});

static GENE_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Z0-9]+(?:-[A-Z0-9]+)?)\b")
        .expect("gene pattern is valid")
});

static DISEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:for|with|treat|treats|treating|against)\s+(?:the\s+)?([^?.,;!]+)")
        .expect("disease pattern is valid")
});

static TISSUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bin\s+(?:the\s+)?([a-z][\w-]*(?:\s+[a-z][\w-]*)?)\s+(?:tissues?|cells?)\b")
        .expect("tissue pattern is valid")
});

static LIMIT: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\b(?:top|first|limit|show)\s+(\d+)\b"),
        Regex::new(r"(?i)\b(\d+)\s+results?\b"),
    ]
    .map(|r| r.expect("limit pattern is valid"))
});

static COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bat\s+least\s+(\d+)\b")
        .expect("count pattern is valid")
});

static THRESHOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:threshold|confidence|similarity|expression(?:\s+level)?)\s+(?:of\s+|above\s+|over\s+|>\s*)?(\d+(?:\.\d+)?)\s*(%?)",
    )
    .expect("threshold pattern is valid")
});

/// All-caps tokens that are not gene symbols
const NOT_GENES: &[&str] = &[
    "DNA", "RNA", "FDA", "ID", "OR", "AND", "NOT", "US", "USA", "UK", "EU", "WHO", "CDC", "NIH",
    "COVID", "SARS", "MERS", "HIV", "AIDS",
];

/// Capitalized words that never name a drug
const NOT_DRUGS: &[&str] = &["The", "A", "An", "What", "Which", "Find", "Show", "List", "I"];

/// Lowercase words that follow "like" or "similar to" without naming a drug
const NOT_DRUGS_LOWERCASE: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "other", "it", "its", "them", "to", "one",
    "ones", "any", "drug", "drugs", "compound", "compounds", "known", "existing", "approved",
];

/// Words that end a pathway name when reading backwards from "pathway"
const PATHWAY_STOPWORDS: &[&str] = &[
    "the", "a", "an", "in", "of", "to", "for", "on", "by", "within", "and", "with", "target",
    "targets", "targeting", "that", "which", "drugs", "genes", "find", "show", "list", "what",
    "are", "is", "affect", "affecting", "involved",
];

/// Phrases that end a disease name
const DISEASE_TERMINATORS: &[&str] = &[
    " based on", " via ", " using ", " that ", " which ", " where ", " with ", " and show",
    " top ", " limit ",
];

/// Extract a named entity of the given kind
pub fn extract_entity(question: &str, kind: EntityKind) -> Option<String> {
    match kind {
        EntityKind::Drug | EntityKind::Compound => extract_drug(question),
        EntityKind::Gene => extract_gene(question),
        EntityKind::Disease => extract_disease(question),
        EntityKind::Pathway => extract_pathway(question),
        EntityKind::Tissue => extract_tissue(question),
    }
}

/// Result size from "top N", "first N", "limit N", "show N" or "N results"
pub fn extract_limit(question: &str) -> Option<i64> {
    LIMIT.iter().find_map(|re| {
        re.captures(question)
            .and_then(|caps| caps[1].parse::<i64>().ok())
            .map(|n| n.max(1))
    })
}

/// Lower bound from "at least N"
pub fn extract_count(question: &str) -> Option<i64> {
    COUNT
        .captures(question)
        .and_then(|caps| caps[1].parse::<i64>().ok())
}

/// Fraction from "threshold/confidence/similarity/expression level (of|above) N%"
///
/// Values above 1 are read as percentages.
pub fn extract_threshold(question: &str) -> Option<f64> {
    let caps = THRESHOLD.captures(question)?;
    let value: f64 = caps[1].parse().ok()?;
    if value > 1.0 || &caps[2] == "%" {
        Some(value / 100.0)
    } else {
        Some(value)
    }
}

/// Bind every parameter of a template from the question
///
/// Values not found fall back to the declared default. Returns the names of
/// required parameters that could not be filled.
pub fn extract_parameters(
    template: &QueryTemplate,
    question: &str,
) -> std::result::Result<Parameters, Vec<String>> {
    let mut parameters = Parameters::new();
    let mut missing = Vec::new();

    for spec in &template.parameters {
        let extracted = match spec.source {
            ParamSource::Entity(kind) => extract_entity(question, kind).map(ParamValue::Text),
            ParamSource::Limit => extract_limit(question).map(ParamValue::Integer),
            ParamSource::Count => extract_count(question).map(ParamValue::Integer),
            ParamSource::Threshold => extract_threshold(question).map(ParamValue::Float),
            ParamSource::Fixed => None,
        };

        match extracted.or_else(|| spec.default.clone()) {
            Some(value) => {
                parameters.insert(spec.name.clone(), value);
            }
            None => missing.push(spec.name.clone()),
        }
    }

    if missing.is_empty() {
        Ok(parameters)
    } else {
        Err(missing)
    }
}

fn extract_drug(question: &str) -> Option<String> {
    let named = NAMED_AFTER
        .captures_iter(question)
        .map(|caps| caps[1].to_string())
        .find(|word| !NOT_DRUGS.contains(&word.as_str()));
    if named.is_some() {
        return named;
    }

    // First capitalized, mixed-case word after the sentence start
    question
        .split_whitespace()
        .skip(1)
        .map(|word| {
            word.split(|c: char| !(c.is_alphanumeric() || c == '-'))
                .next()
                .unwrap_or("")
        })
        .find(|word| {
            word.chars().next().is_some_and(|c| c.is_uppercase())
                && word.chars().any(|c| c.is_lowercase())
                && !NOT_DRUGS.contains(word)
        })
        .map(str::to_string)
        .or_else(|| {
            NAMED_AFTER_LOWERCASE
                .captures_iter(question)
                .map(|caps| caps[1].to_string())
                .find(|word| !NOT_DRUGS_LOWERCASE.contains(&word.as_str()))
                .map(|word| title_case(&word))
        })
}

fn extract_gene(question: &str) -> Option<String> {
    GENE_SYMBOL
        .captures_iter(question)
        .map(|caps| caps[1].to_string())
        .find(|symbol| !NOT_GENES.contains(&symbol.as_str()) && !is_numbered_designation(symbol))
}

/// Disease or strain names such as `COVID-19`: a letters-only stem of four
/// or more followed by a numeric suffix
fn is_numbered_designation(symbol: &str) -> bool {
    symbol.split_once('-').is_some_and(|(stem, suffix)| {
        stem.len() >= 4
            && stem.chars().all(|c| c.is_ascii_alphabetic())
            && suffix.chars().all(|c| c.is_ascii_digit())
    })
}

fn extract_disease(question: &str) -> Option<String> {
    let caps = DISEASE.captures(question)?;
    let mut name = caps[1].trim().to_string();
    let lowered = name.to_ascii_lowercase();
    if let Some(cut) = DISEASE_TERMINATORS
        .iter()
        .filter_map(|t| lowered.find(t))
        .min()
    {
        name.truncate(cut);
    }
    let name = title_case(name.trim());
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn extract_pathway(question: &str) -> Option<String> {
    let words: Vec<&str> = question.split_whitespace().collect();
    let anchor = words.iter().position(|w| {
        w.to_lowercase()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .starts_with("pathway")
    })?;

    let mut parts: Vec<String> = words[..anchor]
        .iter()
        .rev()
        .map(|w| w.trim_matches(|c: char| !(c.is_alphanumeric() || c == '/' || c == '-')))
        .take_while(|w| !w.is_empty() && !PATHWAY_STOPWORDS.contains(&w.to_lowercase().as_str()))
        .map(str::to_string)
        .collect();
    if parts.is_empty() {
        return None;
    }
    parts.reverse();
    Some(format!("{} Pathway", title_case(&parts.join(" "))))
}

fn extract_tissue(question: &str) -> Option<String> {
    TISSUE
        .captures(question)
        .map(|caps| title_case(caps[1].trim()))
}

/// Upper-case the first letter of each word, leaving the rest untouched
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
