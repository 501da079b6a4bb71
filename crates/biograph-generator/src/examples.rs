//! Few-shot question/Cypher pairs for the BKB

use std::collections::HashSet;

/// A question paired with a Cypher statement that answers it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FewShotExample {
    /// Natural-language question
    pub question: &'static str,
    /// Cypher that answers it
    pub cypher: &'static str,
}

const fn pair(question: &'static str, cypher: &'static str) -> FewShotExample {
    FewShotExample { question, cypher }
}

static EXAMPLES: [FewShotExample; 15] = [
    pair(
        "What drugs target the EGFR gene?",
        "MATCH (drug:Drug)-[:TARGETS]->(gene:Gene {symbol: 'EGFR'})
RETURN drug.name as drug_name, drug.indication as indication
LIMIT 10",
    ),
    pair(
        "Find genes associated with breast cancer",
        "MATCH (disease:Disease {name: 'Breast Cancer'})<-[:ASSOCIATED_WITH]-(gene:Gene)
RETURN gene.symbol as gene_symbol, gene.name as gene_name
LIMIT 20",
    ),
    pair(
        "Which drugs treat Alzheimer's disease?",
        "MATCH (drug:Drug)-[:TREATS]->(disease:Disease {name: \"Alzheimer's Disease\"})
RETURN drug.name as drug_name, drug.mechanism as mechanism
LIMIT 15",
    ),
    pair(
        "Show me proteins that interact with TP53",
        "MATCH (p1:Protein {name: 'TP53'})-[:INTERACTS_WITH]-(p2:Protein)
RETURN p2.name as protein_name, p2.protein_class as protein_class
LIMIT 20",
    ),
    pair(
        "Find pathways involving MAPK signaling",
        "MATCH (pathway:Pathway)
WHERE toLower(pathway.name) CONTAINS 'mapk'
OPTIONAL MATCH (pathway)<-[:PARTICIPATES_IN]-(gene:Gene)
RETURN pathway.name as pathway_name,
       collect(DISTINCT gene.symbol)[..10] as sample_genes
LIMIT 10",
    ),
    pair(
        "What are the targets of Imatinib?",
        "MATCH (drug:Drug {name: 'Imatinib'})-[:TARGETS]->(target)
RETURN target.symbol as target_symbol,
       target.name as target_name,
       labels(target) as target_type
LIMIT 20",
    ),
    pair(
        "Find drugs that both activate and target genes in the PI3K pathway",
        "MATCH (pathway:Pathway {name: 'PI3K Pathway'})<-[:PARTICIPATES_IN]-(gene:Gene)
MATCH (drug:Drug)-[r:TARGETS|ACTIVATES]->(gene)
RETURN drug.name as drug_name,
       collect(DISTINCT {gene: gene.symbol, relationship: type(r)}) as interactions
LIMIT 15",
    ),
    pair(
        "Show diseases associated with BRCA1 or BRCA2 genes",
        "MATCH (gene:Gene)-[:ASSOCIATED_WITH]->(disease:Disease)
WHERE gene.symbol IN ['BRCA1', 'BRCA2']
RETURN gene.symbol as gene,
       disease.name as disease_name,
       disease.category as category
LIMIT 20",
    ),
    pair(
        "Find biomarkers for lung cancer",
        "MATCH (disease:Disease {name: 'Lung Cancer'})<-[:ASSOCIATED_WITH]-(biomarker:Biomarker)
RETURN biomarker.name as biomarker_name,
       biomarker.biomarker_type as type
LIMIT 15",
    ),
    pair(
        "Which drugs inhibit genes in the EGFR signaling pathway?",
        "MATCH (pathway:Pathway {name: 'EGFR Signaling Pathway'})<-[:PARTICIPATES_IN]-(gene:Gene)
MATCH (drug:Drug)-[:INHIBITS]->(gene)
RETURN drug.name as drug_name,
       collect(DISTINCT gene.symbol) as inhibited_genes,
       drug.indication as current_indication
LIMIT 20",
    ),
    pair(
        "Find genes highly expressed in brain tissue",
        "MATCH (tissue:Tissue {name: 'Brain'})<-[expr:EXPRESSED_IN]-(gene:Gene)
WHERE expr.expression_level > 0.8
RETURN gene.symbol as gene_symbol,
       gene.name as gene_name,
       expr.expression_level as expression
ORDER BY expr.expression_level DESC
LIMIT 25",
    ),
    pair(
        "What compounds are similar to Aspirin based on molecular weight?",
        "MATCH (c1:Compound {name: 'Aspirin'})
MATCH (c2:Compound)
WHERE c2 <> c1
  AND abs(c1.molecular_weight - c2.molecular_weight) < 50
RETURN c2.name as compound_name,
       c2.molecular_weight as molecular_weight,
       abs(c1.molecular_weight - c2.molecular_weight) as weight_difference
ORDER BY weight_difference ASC
LIMIT 20",
    ),
    pair(
        "Find drugs that could be repurposed for diabetes by targeting genes associated with the disease",
        "MATCH (disease:Disease {name: 'Diabetes'})<-[:ASSOCIATED_WITH]-(gene:Gene)
MATCH (drug:Drug)-[:TARGETS]->(gene)
OPTIONAL MATCH (drug)-[:TREATS]->(current_disease:Disease)
WHERE current_disease.name <> 'Diabetes'
WITH drug,
     collect(DISTINCT gene.symbol) as targeted_genes,
     collect(DISTINCT current_disease.name) as current_indications
RETURN drug.name as drug_name,
       current_indications,
       targeted_genes,
       size(targeted_genes) as gene_count
ORDER BY gene_count DESC
LIMIT 15",
    ),
    pair(
        "Find protein-protein interactions in the apoptosis pathway",
        "MATCH (pathway:Pathway {name: 'Apoptosis Pathway'})<-[:PARTICIPATES_IN]-(gene:Gene)
MATCH (gene)-[:TRANSCRIBES]->(protein1:Protein)
MATCH (protein1)-[:INTERACTS_WITH]-(protein2:Protein)
MATCH (protein2)<-[:TRANSCRIBES]-(gene2:Gene)-[:PARTICIPATES_IN]->(pathway)
RETURN protein1.name as protein_1,
       protein2.name as protein_2,
       gene.symbol as gene_1,
       gene2.symbol as gene_2
LIMIT 30",
    ),
    pair(
        "What are undrugged genes associated with cancer that have drugged interactors?",
        "MATCH (disease:Disease {name: 'Cancer'})<-[:ASSOCIATED_WITH]-(gene:Gene)
WHERE NOT (gene)<-[:TARGETS]-(:Drug)
MATCH (gene)-[:INTERACTS_WITH]-(interactor:Gene)<-[:TARGETS]-(drug:Drug)
WITH gene,
     collect(DISTINCT {interactor: interactor.symbol, drug: drug.name}) as drugged_neighbors
RETURN gene.symbol as undrugged_gene,
       gene.name as gene_name,
       drugged_neighbors,
       size(drugged_neighbors) as drugability_score
ORDER BY drugability_score DESC
LIMIT 20",
    ),
];

/// Words too common in questions to say anything about relevance
const STOPWORDS: &[&str] = &[
    "the", "and", "are", "for", "that", "what", "which", "with", "find", "show", "me", "of", "in",
    "or", "by", "to", "based", "have", "could", "both",
];

/// Every built-in example, in library order
pub fn all_examples() -> &'static [FewShotExample] {
    &EXAMPLES
}

/// Up to `max` examples most relevant to `question`
///
/// Relevance is the number of distinct content words an example question
/// shares with `question`. Ties keep library order, so a question sharing no
/// words gets the first `max` examples.
pub fn select_examples(question: &str, max: usize) -> Vec<&'static FewShotExample> {
    let wanted = content_words(question);

    let mut scored: Vec<(usize, &'static FewShotExample)> = EXAMPLES
        .iter()
        .map(|example| {
            let overlap = content_words(example.question)
                .intersection(&wanted)
                .count();
            (overlap, example)
        })
        .collect();

    // Stable sort keeps library order among equal scores
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(max).map(|(_, e)| e).collect()
}

/// Render examples as a numbered prompt section
pub fn format_examples(examples: &[&FewShotExample]) -> String {
    let mut out = String::from("# Example Cypher Queries:\n");
    for (i, example) in examples.iter().enumerate() {
        out.push_str(&format!(
            "\n## Example {}:\nQuestion: {}\nCypher:\n{}\n",
            i + 1,
            example.question,
            example.cypher
        ));
    }
    out
}

fn content_words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1 && !STOPWORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_size() {
        assert_eq!(all_examples().len(), 15);
        assert!(all_examples().iter().all(|e| e.cypher.contains("LIMIT")));
    }

    #[test]
    fn test_most_relevant_example_first() {
        let selected = select_examples("Which drugs treat Parkinson's disease?", 3);
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].question, "Which drugs treat Alzheimer's disease?");
    }

    #[test]
    fn test_unrelated_question_keeps_library_order() {
        let selected = select_examples("Describe the history of biomedicine", 2);
        assert_eq!(selected[0].question, all_examples()[0].question);
        assert_eq!(selected[1].question, all_examples()[1].question);
    }

    #[test]
    fn test_max_zero_selects_nothing() {
        assert!(select_examples("What drugs target EGFR?", 0).is_empty());
    }

    #[test]
    fn test_format_numbers_examples() {
        let selected = select_examples("What drugs target EGFR?", 2);
        let text = format_examples(&selected);
        assert!(text.starts_with("# Example Cypher Queries:"));
        assert!(text.contains("## Example 1:\nQuestion: What drugs target the EGFR gene?"));
        assert!(text.contains("## Example 2:"));
        assert!(!text.contains("## Example 3:"));
    }
}
