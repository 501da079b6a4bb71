//! Candidate validation logic

use crate::lexer::{tokenize, Token, TokenKind};
use crate::ValidatorConfig;
use biograph_domain::{
    GraphSchema, QueryCandidate, ValidationIssue, ValidationOutcome, ValidationWarning,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Clauses a statement may start with
const READ_CLAUSES: &[&str] = &[
    "MATCH", "OPTIONAL", "WITH", "UNWIND", "CALL", "RETURN", "EXPLAIN", "PROFILE", "USE",
];

/// Keywords that modify the graph or its indexes
const WRITE_CLAUSES: &[&str] = &[
    "CREATE", "MERGE", "DELETE", "DETACH", "SET", "REMOVE", "DROP", "FOREACH", "LOAD",
];

/// Procedure namespaces that administer or modify the database
const FORBIDDEN_PROCEDURE_NAMESPACES: &[&str] = &["dbms", "db", "apoc"];

/// Read-only `db.` procedures; entries ending in `.` allow a whole sub-namespace
const READ_ONLY_PROCEDURES: &[&str] = &[
    "db.labels",
    "db.relationshipTypes",
    "db.propertyKeys",
    "db.schema.",
];

/// Words that can follow `(` without naming a variable
const NON_VARIABLES: &[&str] = &["DISTINCT", "CASE", "NOT", "EXISTS"];

/// Labels, types and property references found in a statement
#[derive(Debug, Default)]
struct PatternScan {
    labels: Vec<String>,
    rel_types: Vec<String>,
    node_bindings: BTreeMap<String, BTreeSet<String>>,
    rel_bindings: BTreeMap<String, BTreeSet<String>>,
    property_refs: Vec<(String, String)>,
    node_keys: Vec<(Vec<String>, String)>,
    rel_keys: Vec<(Vec<String>, String)>,
    params: Vec<String>,
    unbounded_var_length: bool,
}

/// Static query validator
///
/// Never touches the database: every check is a function of the candidate
/// text, its bindings and the schema.
pub struct QueryValidator {
    config: ValidatorConfig,
}

impl QueryValidator {
    /// Create a validator with the given configuration
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidatorConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a candidate against the schema
    ///
    /// Checks run in order (syntax, labels, properties, parameters) and every
    /// problem is reported, not just the first.
    pub fn validate(&self, candidate: &QueryCandidate, schema: &GraphSchema) -> ValidationOutcome {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let text = candidate.query_text.trim();

        if text.is_empty() {
            errors.push(ValidationIssue::Syntax {
                message: "query is empty".to_string(),
            });
            return ValidationOutcome::from_findings(errors, warnings);
        }

        let tokens = match tokenize(text) {
            Ok(tokens) => tokens,
            Err(e) => {
                errors.push(ValidationIssue::Syntax {
                    message: e.to_string(),
                });
                return ValidationOutcome::from_findings(errors, warnings);
            }
        };
        let tokens = strip_trailing_semicolons(tokens);

        // 1. Syntax
        if self.config.check_syntax {
            self.check_syntax(&tokens, &mut errors);
        }

        let scan = scan_patterns(&tokens);

        // 2. Labels and relationship types
        if self.config.check_labels {
            self.check_names(&scan, schema, &mut errors);
        }

        // 3. Properties
        if self.config.check_properties {
            check_properties(&scan, schema, &mut errors);
        }

        // 4. Parameters
        if self.config.check_parameters {
            check_parameters(&scan, candidate, &mut errors);
        }

        if !has_keyword(&tokens, "LIMIT") {
            if self.config.require_limit {
                errors.push(ValidationIssue::Syntax {
                    message: "query must end with a LIMIT clause".to_string(),
                });
            } else {
                warnings.push(ValidationWarning::MissingLimit);
            }
        }
        if scan.unbounded_var_length {
            warnings.push(ValidationWarning::UnboundedVariableLength);
        }
        let match_count = count_plain_matches(&tokens);
        if match_count > 1 && !has_keyword(&tokens, "WHERE") {
            warnings.push(ValidationWarning::PossibleCartesianProduct);
        }

        debug!(
            errors = errors.len(),
            warnings = warnings.len(),
            "Validated candidate"
        );
        ValidationOutcome::from_findings(errors, warnings)
    }

    fn check_syntax(&self, tokens: &[Token], errors: &mut Vec<ValidationIssue>) {
        // Delimiters
        let mut stack: Vec<(char, usize)> = Vec::new();
        for token in tokens {
            if let TokenKind::Symbol(c) = token.kind {
                match c {
                    '(' | '[' | '{' => stack.push((c, token.offset)),
                    ')' | ']' | '}' => {
                        let expected = match c {
                            ')' => '(',
                            ']' => '[',
                            _ => '{',
                        };
                        match stack.pop() {
                            Some((open, _)) if open == expected => {}
                            Some((open, at)) => {
                                errors.push(ValidationIssue::Syntax {
                                    message: format!(
                                        "'{}' at offset {} closes '{}' opened at offset {}",
                                        c, token.offset, open, at
                                    ),
                                });
                                return;
                            }
                            None => {
                                errors.push(ValidationIssue::Syntax {
                                    message: format!(
                                        "unmatched '{}' at offset {}",
                                        c, token.offset
                                    ),
                                });
                                return;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        if let Some((open, at)) = stack.pop() {
            errors.push(ValidationIssue::Syntax {
                message: format!("'{}' opened at offset {} is never closed", open, at),
            });
        }

        // Single statement
        if tokens.iter().any(|t| t.is_symbol(';')) {
            errors.push(ValidationIssue::Syntax {
                message: "multiple statements are not allowed".to_string(),
            });
        }

        // Leading clause
        match tokens.first() {
            Some(first) if READ_CLAUSES.iter().any(|kw| first.is_keyword(kw)) => {}
            Some(first) => {
                let found = first.ident().unwrap_or("a symbol");
                errors.push(ValidationIssue::Syntax {
                    message: format!(
                        "query must start with MATCH, OPTIONAL MATCH, WITH, UNWIND, CALL or RETURN (found '{}')",
                        found
                    ),
                });
            }
            None => {}
        }

        // Result clause
        let starts_with_call = tokens.first().is_some_and(|t| t.is_keyword("CALL"));
        if !starts_with_call && !has_keyword(tokens, "RETURN") {
            errors.push(ValidationIssue::Syntax {
                message: "query has no RETURN clause".to_string(),
            });
        }

        // Write clauses
        if !self.config.allow_write_clauses {
            let mut seen = BTreeSet::new();
            for (i, token) in tokens.iter().enumerate() {
                let Some(name) = token.ident() else { continue };
                let upper = name.to_ascii_uppercase();
                if !WRITE_CLAUSES.contains(&upper.as_str()) || !is_clause_position(tokens, i) {
                    continue;
                }
                if seen.insert(upper.clone()) {
                    errors.push(ValidationIssue::ForbiddenClause { clause: upper });
                }
            }

            // Procedure calls
            for (i, token) in tokens.iter().enumerate() {
                if !token.is_keyword("CALL") || !is_clause_position(tokens, i) {
                    continue;
                }
                let Some(procedure) = procedure_name(tokens, i + 1) else { continue };
                if is_forbidden_procedure(&procedure) {
                    let clause = format!("CALL {}", procedure);
                    if seen.insert(clause.clone()) {
                        errors.push(ValidationIssue::ForbiddenClause { clause });
                    }
                }
            }
        }
    }

    fn check_names(
        &self,
        scan: &PatternScan,
        schema: &GraphSchema,
        errors: &mut Vec<ValidationIssue>,
    ) {
        let mut reported = BTreeSet::new();
        for label in &scan.labels {
            if schema.has_label(label) || !reported.insert(format!(":{}", label)) {
                continue;
            }
            let suggestion = if self.config.suggest_names {
                closest_name(label, &schema.node_labels())
            } else {
                None
            };
            errors.push(ValidationIssue::UnknownLabel {
                label: label.clone(),
                suggestion,
            });
        }
        for rel in &scan.rel_types {
            if schema.has_relationship(rel) || !reported.insert(format!("[{}", rel)) {
                continue;
            }
            let suggestion = if self.config.suggest_names {
                closest_name(rel, &schema.relationship_type_names())
            } else {
                None
            };
            errors.push(ValidationIssue::UnknownRelationship {
                rel_type: rel.clone(),
                suggestion,
            });
        }
    }
}

impl Default for QueryValidator {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Validate with the default configuration
pub fn validate(candidate: &QueryCandidate, schema: &GraphSchema) -> ValidationOutcome {
    QueryValidator::default_config().validate(candidate, schema)
}

/// Non-blocking hints for improving a query
pub fn suggest_improvements(query: &str) -> Vec<String> {
    let mut suggestions = Vec::new();
    let Ok(tokens) = tokenize(query) else {
        return suggestions;
    };

    if !has_keyword(&tokens, "LIMIT") {
        suggestions.push("Add a LIMIT clause to bound the result size".to_string());
    }

    let compares_strings = tokens
        .windows(2)
        .any(|w| w[0].is_symbol('=') && w[1].kind == TokenKind::Str);
    let uses_to_lower = tokens.iter().any(|t| t.is_keyword("toLower"));
    if compares_strings && !uses_to_lower {
        suggestions.push(
            "Use toLower() on both sides for case-insensitive string matching".to_string(),
        );
    }

    if scan_patterns(&tokens).unbounded_var_length {
        suggestions.push("Give variable-length patterns an upper bound, e.g. *1..3".to_string());
    }

    suggestions
}

fn strip_trailing_semicolons(mut tokens: Vec<Token>) -> Vec<Token> {
    while tokens.last().is_some_and(|t| t.is_symbol(';')) {
        tokens.pop();
    }
    tokens
}

fn has_keyword(tokens: &[Token], keyword: &str) -> bool {
    tokens
        .iter()
        .enumerate()
        .any(|(i, t)| t.is_keyword(keyword) && is_clause_position(tokens, i))
}

/// An identifier that is not a property name, map key, label or alias
fn is_clause_position(tokens: &[Token], i: usize) -> bool {
    let prev_ok = i == 0
        || !(tokens[i - 1].is_symbol('.')
            || tokens[i - 1].is_symbol(':')
            || tokens[i - 1].is_keyword("AS"));
    let next_ok = !tokens.get(i + 1).is_some_and(|t| t.is_symbol(':'));
    prev_ok && next_ok
}

/// Dotted procedure name starting at `start`, e.g. `db.schema.visualization`
fn procedure_name(tokens: &[Token], start: usize) -> Option<String> {
    let mut parts = vec![tokens.get(start)?.ident()?];
    let mut i = start + 1;
    while tokens.get(i).is_some_and(|t| t.is_symbol('.')) {
        match tokens.get(i + 1).and_then(Token::ident) {
            Some(part) => parts.push(part),
            None => break,
        }
        i += 2;
    }
    Some(parts.join("."))
}

fn is_forbidden_procedure(procedure: &str) -> bool {
    let lowered = procedure.to_ascii_lowercase();
    let Some((namespace, _)) = lowered.split_once('.') else {
        return false;
    };
    if !FORBIDDEN_PROCEDURE_NAMESPACES.contains(&namespace) {
        return false;
    }
    !READ_ONLY_PROCEDURES.iter().any(|allowed| {
        let allowed = allowed.to_ascii_lowercase();
        if allowed.ends_with('.') {
            lowered.starts_with(&allowed)
        } else {
            lowered == allowed
        }
    })
}

fn count_plain_matches(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            t.is_keyword("MATCH")
                && is_clause_position(tokens, *i)
                && (*i == 0 || !tokens[*i - 1].is_keyword("OPTIONAL"))
        })
        .count()
}

fn scan_patterns(tokens: &[Token]) -> PatternScan {
    let mut scan = PatternScan::default();

    for (i, token) in tokens.iter().enumerate() {
        match &token.kind {
            TokenKind::Symbol('(') => scan_node(tokens, i, &mut scan),
            TokenKind::Symbol('[') if i > 0 && tokens[i - 1].is_symbol('-') => {
                scan_relationship(tokens, i, &mut scan)
            }
            TokenKind::Param(name) => scan.params.push(name.clone()),
            TokenKind::Ident(var) => {
                let after_dot = i > 0 && tokens[i - 1].is_symbol('.');
                let is_access = tokens.get(i + 1).is_some_and(|t| t.is_symbol('.'));
                let prop = tokens.get(i + 2).and_then(|t| t.ident());
                let is_call = tokens.get(i + 3).is_some_and(|t| t.is_symbol('('));
                if let (false, true, Some(prop), false) = (after_dot, is_access, prop, is_call) {
                    scan.property_refs.push((var.clone(), prop.to_string()));
                }
            }
            _ => {}
        }
    }

    scan
}

/// Node pattern `(var:Label:Other {key: value})` starting at `start`
fn scan_node(tokens: &[Token], start: usize, scan: &mut PatternScan) {
    let mut j = start + 1;
    let mut var = None;

    if let Some(name) = tokens.get(j).and_then(|t| t.ident()) {
        let follows = tokens.get(j + 1);
        let is_var = follows.is_some_and(|t| t.is_symbol(':') || t.is_symbol(')') || t.is_symbol('{'));
        if !is_var || NON_VARIABLES.iter().any(|kw| name.eq_ignore_ascii_case(kw)) {
            return;
        }
        var = Some(name.to_string());
        j += 1;
    } else if !tokens.get(j).is_some_and(|t| t.is_symbol(':') || t.is_symbol(')')) {
        return;
    }

    let mut labels = Vec::new();
    while tokens.get(j).is_some_and(|t| t.is_symbol(':') || t.is_symbol('|') || t.is_symbol('&')) {
        match tokens.get(j + 1).and_then(|t| t.ident()) {
            Some(label) => {
                labels.push(label.to_string());
                j += 2;
            }
            None => break,
        }
    }

    let keys = if tokens.get(j).is_some_and(|t| t.is_symbol('{')) {
        match map_keys(tokens, j) {
            Some((keys, end)) => {
                j = end + 1;
                keys
            }
            None => return,
        }
    } else {
        Vec::new()
    };

    if !tokens.get(j).is_some_and(|t| t.is_symbol(')')) {
        return;
    }

    for label in &labels {
        scan.labels.push(label.clone());
    }
    if let Some(var) = var {
        if !labels.is_empty() {
            scan.node_bindings
                .entry(var)
                .or_default()
                .extend(labels.iter().cloned());
        }
    }
    if !labels.is_empty() {
        for key in keys {
            scan.node_keys.push((labels.clone(), key));
        }
    }
}

/// Relationship pattern `[var:TYPE|OTHER*1..3 {key: value}]` starting at `start`
fn scan_relationship(tokens: &[Token], start: usize, scan: &mut PatternScan) {
    let mut j = start + 1;
    let mut var = None;

    if let Some(name) = tokens.get(j).and_then(|t| t.ident()) {
        let follows = tokens.get(j + 1);
        let is_var = follows.is_some_and(|t| {
            t.is_symbol(':') || t.is_symbol(']') || t.is_symbol('*') || t.is_symbol('{')
        });
        if !is_var {
            return;
        }
        var = Some(name.to_string());
        j += 1;
    }

    let mut types = Vec::new();
    if tokens.get(j).is_some_and(|t| t.is_symbol(':')) {
        j += 1;
        loop {
            match tokens.get(j).and_then(|t| t.ident()) {
                Some(rel) => {
                    types.push(rel.to_string());
                    j += 1;
                }
                None => break,
            }
            if tokens.get(j).is_some_and(|t| t.is_symbol('|')) {
                j += 1;
                if tokens.get(j).is_some_and(|t| t.is_symbol(':')) {
                    j += 1;
                }
            } else {
                break;
            }
        }
    }

    let mut unbounded = false;
    if tokens.get(j).is_some_and(|t| t.is_symbol('*')) {
        j += 1;
        let is_range = |k: usize| {
            tokens.get(k).is_some_and(|t| t.is_symbol('.'))
                && tokens.get(k + 1).is_some_and(|t| t.is_symbol('.'))
        };
        let is_number = |k: usize| matches!(tokens.get(k).map(|t| &t.kind), Some(TokenKind::Number(_)));

        if is_number(j) {
            j += 1;
            if is_range(j) {
                j += 2;
                if is_number(j) {
                    j += 1;
                } else {
                    unbounded = true;
                }
            }
        } else if is_range(j) {
            j += 2;
            if is_number(j) {
                j += 1;
            } else {
                unbounded = true;
            }
        } else {
            unbounded = true;
        }
    }

    let keys = if tokens.get(j).is_some_and(|t| t.is_symbol('{')) {
        match map_keys(tokens, j) {
            Some((keys, end)) => {
                j = end + 1;
                keys
            }
            None => return,
        }
    } else {
        Vec::new()
    };

    if !tokens.get(j).is_some_and(|t| t.is_symbol(']')) {
        return;
    }

    scan.unbounded_var_length |= unbounded;
    scan.rel_types.extend(types.iter().cloned());
    if let Some(var) = var {
        if !types.is_empty() {
            scan.rel_bindings
                .entry(var)
                .or_default()
                .extend(types.iter().cloned());
        }
    }
    if !types.is_empty() {
        for key in keys {
            scan.rel_keys.push((types.clone(), key));
        }
    }
}

/// Top-level keys of the map literal opening at `open`, and the index of its `}`
fn map_keys(tokens: &[Token], open: usize) -> Option<(Vec<String>, usize)> {
    let mut keys = Vec::new();
    let mut depth = 0usize;
    for (k, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::Symbol('{') | TokenKind::Symbol('(') | TokenKind::Symbol('[') => depth += 1,
            TokenKind::Symbol('}') | TokenKind::Symbol(')') | TokenKind::Symbol(']') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some((keys, k));
                }
            }
            TokenKind::Ident(ref key) if depth == 1 => {
                let prev_opens = tokens[k - 1].is_symbol('{') || tokens[k - 1].is_symbol(',');
                let next_colon = tokens.get(k + 1).is_some_and(|t| t.is_symbol(':'));
                if prev_opens && next_colon {
                    keys.push(key.clone());
                }
            }
            _ => {}
        }
    }
    None
}

fn check_properties(scan: &PatternScan, schema: &GraphSchema, errors: &mut Vec<ValidationIssue>) {
    let mut reported = BTreeSet::new();

    for (var, prop) in &scan.property_refs {
        let node_labels: Vec<&String> = scan
            .node_bindings
            .get(var)
            .map(|labels| labels.iter().filter(|l| schema.has_label(l)).collect())
            .unwrap_or_default();
        let rel_types: Vec<&String> = scan
            .rel_bindings
            .get(var)
            .map(|types| types.iter().filter(|t| schema.has_relationship(t)).collect())
            .unwrap_or_default();

        if node_labels.is_empty() && rel_types.is_empty() {
            continue;
        }

        let known = node_labels
            .iter()
            .any(|l| schema.label_has_property(l, prop))
            || rel_types
                .iter()
                .any(|t| schema.relationship_has_property(t, prop));

        if !known && reported.insert((var.clone(), prop.clone())) {
            let owner = node_labels
                .iter()
                .chain(rel_types.iter())
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join("|");
            errors.push(ValidationIssue::UnknownProperty {
                variable: var.clone(),
                owner,
                property: prop.clone(),
            });
        }
    }

    for (labels, key) in &scan.node_keys {
        let known_labels: Vec<&String> = labels.iter().filter(|l| schema.has_label(l)).collect();
        if known_labels.is_empty() {
            continue;
        }
        let known = known_labels.iter().any(|l| schema.label_has_property(l, key));
        let owner = labels.join("|");
        if !known && reported.insert((owner.clone(), key.clone())) {
            errors.push(ValidationIssue::UnknownProperty {
                variable: String::new(),
                owner,
                property: key.clone(),
            });
        }
    }

    for (types, key) in &scan.rel_keys {
        let known_types: Vec<&String> = types.iter().filter(|t| schema.has_relationship(t)).collect();
        if known_types.is_empty() {
            continue;
        }
        let known = known_types
            .iter()
            .any(|t| schema.relationship_has_property(t, key));
        let owner = types.join("|");
        if !known && reported.insert((owner.clone(), key.clone())) {
            errors.push(ValidationIssue::UnknownProperty {
                variable: String::new(),
                owner,
                property: key.clone(),
            });
        }
    }
}

fn check_parameters(scan: &PatternScan, candidate: &QueryCandidate, errors: &mut Vec<ValidationIssue>) {
    let mut reported = BTreeSet::new();

    for name in &scan.params {
        if !candidate.parameters.contains_key(name) && reported.insert(name.clone()) {
            errors.push(ValidationIssue::MissingParameter { name: name.clone() });
        }
    }

    for spec in &candidate.declared_parameters {
        match candidate.parameters.get(&spec.name) {
            None => {
                if reported.insert(spec.name.clone()) {
                    errors.push(ValidationIssue::MissingParameter {
                        name: spec.name.clone(),
                    });
                }
            }
            Some(value) if !spec.param_type.accepts(value) => {
                errors.push(ValidationIssue::ParameterTypeMismatch {
                    name: spec.name.clone(),
                    expected: spec.param_type,
                    found: value.type_name().to_string(),
                });
            }
            Some(_) => {}
        }
    }
}

/// Closest known name by case-insensitive edit distance
fn closest_name(name: &str, known: &[&str]) -> Option<String> {
    let lowered = name.to_lowercase();
    let threshold = (name.chars().count() / 3).max(2);
    known
        .iter()
        .map(|candidate| (levenshtein(&lowered, &candidate.to_lowercase()), *candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            current[j + 1] = (previous[j] + cost)
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        previous = current;
    }
    previous[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use biograph_domain::{EntityKind, ParamSpec, ParamValue, Parameters};

    fn schema() -> GraphSchema {
        GraphSchema::builtin().unwrap()
    }

    fn generated(query: &str) -> QueryCandidate {
        QueryCandidate::generated(query)
    }

    #[test]
    fn test_valid_query_passes() {
        let outcome = validate(
            &generated(
                "MATCH (drug:Drug)-[:TARGETS]->(gene:Gene {symbol: 'EGFR'})
                 RETURN drug.name AS drug_name, drug.indication AS indication
                 LIMIT 10",
            ),
            &schema(),
        );
        assert!(outcome.valid, "{:?}", outcome.errors);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_empty_query() {
        let outcome = validate(&generated("   "), &schema());
        assert!(!outcome.valid);
        assert!(matches!(outcome.errors[0], ValidationIssue::Syntax { .. }));
    }

    #[test]
    fn test_unbalanced_parenthesis() {
        let outcome = validate(&generated("MATCH (d:Drug RETURN d.name LIMIT 5"), &schema());
        assert!(!outcome.valid);
        match &outcome.errors[0] {
            ValidationIssue::Syntax { message } => assert!(message.contains("never closed")),
            other => panic!("Expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn test_must_start_with_read_clause() {
        let outcome = validate(&generated("Here is the query: MATCH (d:Drug) RETURN d"), &schema());
        assert!(outcome.errors.iter().any(|e| matches!(
            e,
            ValidationIssue::Syntax { message } if message.contains("must start with")
        )));
    }

    #[test]
    fn test_missing_return() {
        let outcome = validate(&generated("MATCH (d:Drug) WHERE d.name = 'Aspirin'"), &schema());
        assert!(outcome.errors.iter().any(|e| matches!(
            e,
            ValidationIssue::Syntax { message } if message.contains("no RETURN")
        )));
    }

    #[test]
    fn test_write_clauses_are_forbidden() {
        let outcome = validate(
            &generated("MATCH (d:Drug) DETACH DELETE d RETURN count(d)"),
            &schema(),
        );
        let clauses: Vec<_> = outcome
            .errors
            .iter()
            .filter_map(|e| match e {
                ValidationIssue::ForbiddenClause { clause } => Some(clause.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(clauses, vec!["DETACH", "DELETE"]);
    }

    fn forbidden_clauses(query: &str) -> Vec<String> {
        validate(&generated(query), &schema())
            .errors
            .into_iter()
            .filter_map(|e| match e {
                ValidationIssue::ForbiddenClause { clause } => Some(clause),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_admin_procedures_are_forbidden() {
        assert_eq!(
            forbidden_clauses("CALL dbms.security.createUser('x', 'y', false)"),
            vec!["CALL dbms.security.createUser"]
        );
        assert_eq!(
            forbidden_clauses("CALL db.clearQueryCaches()"),
            vec!["CALL db.clearQueryCaches"]
        );
    }

    #[test]
    fn test_apoc_procedures_are_forbidden() {
        let clauses = forbidden_clauses(
            "CALL apoc.periodic.iterate('MATCH (n) RETURN n', 'DETACH DELETE n', {batchSize: 100})",
        );
        assert_eq!(clauses, vec!["CALL apoc.periodic.iterate"]);

        // also after a leading MATCH
        let clauses = forbidden_clauses(
            "MATCH (d:Drug) CALL apoc.create.setProperty(d, 'x', 1) YIELD node RETURN node LIMIT 1",
        );
        assert_eq!(clauses, vec!["CALL apoc.create.setProperty"]);
    }

    #[test]
    fn test_read_only_schema_procedures_are_allowed() {
        assert!(forbidden_clauses("CALL db.labels() YIELD label RETURN label LIMIT 50").is_empty());
        assert!(forbidden_clauses("CALL db.relationshipTypes()").is_empty());
        assert!(forbidden_clauses("CALL db.schema.visualization()").is_empty());
        assert!(forbidden_clauses(
            "MATCH (d:Drug) CALL { WITH d RETURN d.name AS name } RETURN name LIMIT 5"
        )
        .is_empty());
    }

    #[test]
    fn test_procedure_name() {
        let tokens = tokenize("CALL db.schema.visualization() YIELD nodes").unwrap();
        assert_eq!(procedure_name(&tokens, 1).as_deref(), Some("db.schema.visualization"));
        assert!(is_forbidden_procedure("DBMS.killQuery"));
        assert!(!is_forbidden_procedure("db.schema.nodeTypeProperties"));
        assert!(!is_forbidden_procedure("gds.pageRank.stream"));
    }

    #[test]
    fn test_write_keyword_as_property_is_allowed() {
        let outcome = validate(
            &generated("MATCH (p:Pathway) RETURN p.source AS set LIMIT 5"),
            &schema(),
        );
        assert!(outcome.valid, "{:?}", outcome.errors);
    }

    #[test]
    fn test_keywords_inside_strings_are_ignored() {
        let outcome = validate(
            &generated("MATCH (d:Drug) WHERE d.mechanism CONTAINS 'DELETE (x:Fake)' RETURN d.name LIMIT 1"),
            &schema(),
        );
        assert!(outcome.valid, "{:?}", outcome.errors);
    }

    #[test]
    fn test_unknown_label_and_relationship_with_suggestions() {
        let outcome = validate(
            &generated("MATCH (d:Drugs)-[:TARGET]->(g:Gene) RETURN d.name LIMIT 5"),
            &schema(),
        );
        assert_eq!(
            outcome.errors,
            vec![
                ValidationIssue::UnknownLabel {
                    label: "Drugs".into(),
                    suggestion: Some("Drug".into()),
                },
                ValidationIssue::UnknownRelationship {
                    rel_type: "TARGET".into(),
                    suggestion: Some("TARGETS".into()),
                },
            ]
        );
    }

    #[test]
    fn test_unknown_property_on_bound_variable() {
        let outcome = validate(
            &generated("MATCH (g:Gene) RETURN g.symbol, g.toxicity LIMIT 5"),
            &schema(),
        );
        assert_eq!(
            outcome.errors,
            vec![ValidationIssue::UnknownProperty {
                variable: "g".into(),
                owner: "Gene".into(),
                property: "toxicity".into(),
            }]
        );
    }

    #[test]
    fn test_relationship_properties() {
        let ok = validate(
            &generated(
                "MATCH (t:Tissue {name: 'Brain'})<-[expr:EXPRESSED_IN]-(g:Gene)
                 WHERE expr.expression_level > 0.8 RETURN g.symbol LIMIT 25",
            ),
            &schema(),
        );
        assert!(ok.valid, "{:?}", ok.errors);

        let bad = validate(
            &generated("MATCH (g:Gene)-[e:EXPRESSED_IN {tpm: 5}]->(t:Tissue) RETURN g.symbol LIMIT 5"),
            &schema(),
        );
        assert!(bad.errors.iter().any(|e| matches!(
            e,
            ValidationIssue::UnknownProperty { property, .. } if property == "tpm"
        )));
    }

    #[test]
    fn test_inline_map_keys_checked_against_label() {
        let outcome = validate(
            &generated("MATCH (d:Drug {title: 'Aspirin'}) RETURN d.name LIMIT 1"),
            &schema(),
        );
        assert!(outcome.errors.iter().any(|e| matches!(
            e,
            ValidationIssue::UnknownProperty { owner, property, .. } if owner == "Drug" && property == "title"
        )));
    }

    #[test]
    fn test_map_literals_in_expressions_are_not_patterns() {
        let outcome = validate(
            &generated(
                "MATCH (d:Drug)-[r:TARGETS|ACTIVATES]->(g:Gene)
                 RETURN d.name, collect(DISTINCT {gene: g.symbol, relationship: type(r)}) AS interactions
                 LIMIT 15",
            ),
            &schema(),
        );
        assert!(outcome.valid, "{:?}", outcome.errors);
    }

    #[test]
    fn test_unbound_parameter() {
        let outcome = validate(
            &generated("MATCH (d:Drug {name: $drug_name}) RETURN d.name LIMIT 5"),
            &schema(),
        );
        assert_eq!(
            outcome.errors,
            vec![ValidationIssue::MissingParameter {
                name: "drug_name".into()
            }]
        );
    }

    #[test]
    fn test_declared_parameter_types() {
        let mut candidate = generated(
            "MATCH (d:Drug)-[:TARGETS]->(g:Gene {symbol: $gene_symbol}) RETURN d.name LIMIT $limit",
        );
        candidate.declared_parameters = vec![
            ParamSpec::entity("gene_symbol", EntityKind::Gene),
            ParamSpec::limit(10),
        ];
        let mut params = Parameters::new();
        params.insert("gene_symbol".into(), ParamValue::Text("EGFR".into()));
        params.insert("limit".into(), ParamValue::Text("ten".into()));
        candidate.parameters = params;

        let outcome = validate(&candidate, &schema());
        assert_eq!(
            outcome.errors,
            vec![ValidationIssue::ParameterTypeMismatch {
                name: "limit".into(),
                expected: biograph_domain::ParamType::Integer,
                found: "text".into(),
            }]
        );
    }

    #[test]
    fn test_collects_errors_from_every_stage() {
        let outcome = validate(
            &generated("MATCH (d:Medicine)-[:TREATS]->(x:Disease) RETURN x.colour, d.name LIMIT $n"),
            &schema(),
        );
        assert_eq!(outcome.errors.len(), 3);
        assert!(matches!(outcome.errors[0], ValidationIssue::UnknownLabel { .. }));
        assert!(matches!(outcome.errors[1], ValidationIssue::UnknownProperty { .. }));
        assert!(matches!(outcome.errors[2], ValidationIssue::MissingParameter { .. }));
    }

    #[test]
    fn test_warnings() {
        let outcome = validate(
            &generated("MATCH (a:Gene)-[:INTERACTS_WITH*]-(b:Gene) MATCH (c:Drug) RETURN a.symbol, c.name"),
            &schema(),
        );
        assert!(outcome.valid, "{:?}", outcome.errors);
        assert_eq!(
            outcome.warnings,
            vec![
                ValidationWarning::MissingLimit,
                ValidationWarning::UnboundedVariableLength,
                ValidationWarning::PossibleCartesianProduct,
            ]
        );
    }

    #[test]
    fn test_bounded_variable_length_has_no_warning() {
        let outcome = validate(
            &generated("MATCH (a:Gene)-[:INTERACTS_WITH*1..3]-(b:Gene) RETURN b.symbol LIMIT 10"),
            &schema(),
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_strict_requires_limit() {
        let validator = QueryValidator::new(ValidatorConfig::strict());
        let outcome = validator.validate(&generated("MATCH (d:Drug) RETURN d.name"), &schema());
        assert!(!outcome.valid);
    }

    #[test]
    fn test_permissive_skips_schema() {
        let validator = QueryValidator::new(ValidatorConfig::permissive());
        let outcome = validator.validate(
            &generated("MATCH (d:Medicine) RETURN d.colour LIMIT 1"),
            &schema(),
        );
        assert!(outcome.valid);
    }

    #[test]
    fn test_trailing_semicolon_is_tolerated() {
        let outcome = validate(&generated("MATCH (d:Drug) RETURN d.name LIMIT 1;"), &schema());
        assert!(outcome.valid, "{:?}", outcome.errors);
    }

    #[test]
    fn test_suggest_improvements() {
        let hints = suggest_improvements("MATCH (d:Drug) WHERE d.name = 'aspirin' RETURN d");
        assert_eq!(hints.len(), 2);
        assert!(hints[0].contains("LIMIT"));
        assert!(hints[1].contains("toLower"));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("drugs", "drug"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(closest_name("Protien", &["Protein", "Pathway"]), Some("Protein".into()));
        assert_eq!(closest_name("Spaceship", &["Protein", "Pathway"]), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: arbitrary text never panics and validation is repeatable
        #[test]
        fn test_validation_is_deterministic(query in "\\PC{0,120}") {
            let schema = GraphSchema::builtin().unwrap();
            let candidate = QueryCandidate::generated(query);
            let first = validate(&candidate, &schema);
            let second = validate(&candidate, &schema);
            prop_assert_eq!(first, second);
        }

        /// Property: an outcome is valid exactly when it has no errors
        #[test]
        fn test_valid_iff_no_errors(label in "[A-Z][a-z]{2,10}", prop in "[a-z_]{2,12}") {
            let schema = GraphSchema::builtin().unwrap();
            let query = format!("MATCH (n:{}) RETURN n.{} LIMIT 5", label, prop);
            let outcome = validate(&QueryCandidate::generated(query), &schema);
            prop_assert_eq!(outcome.valid, outcome.errors.is_empty());
        }

        /// Property: write clauses are always rejected
        #[test]
        fn test_write_clause_rejected(clause in prop::sample::select(vec!["CREATE", "MERGE", "SET", "DELETE", "REMOVE"])) {
            let schema = GraphSchema::builtin().unwrap();
            let query = format!("MATCH (d:Drug) {} (x:Drug) RETURN d.name LIMIT 1", clause);
            let outcome = validate(&QueryCandidate::generated(query), &schema);
            let rejected = outcome.errors.iter().any(|e| matches!(
                e,
                ValidationIssue::ForbiddenClause { clause: c } if c == clause
            ));
            prop_assert!(rejected);
        }
    }
}
