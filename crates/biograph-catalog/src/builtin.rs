//! Built-in BKB query templates
//!
//! Grouped by research workflow: drug repurposing, target identification,
//! indication expansion and direct lookups. Catalog order matters: it breaks
//! score ties in the matcher.

use biograph_domain::{EntityKind, Intent, ParamSpec, QueryTemplate};

struct Def {
    name: &'static str,
    description: &'static str,
    cypher: &'static str,
    parameters: Vec<ParamSpec>,
    intent: Intent,
    example_question: &'static str,
    tags: &'static [&'static str],
    keywords: &'static [&'static str],
}

impl From<Def> for QueryTemplate {
    fn from(def: Def) -> Self {
        QueryTemplate {
            name: def.name.to_string(),
            description: def.description.to_string(),
            cypher: unindent(def.cypher),
            parameters: def.parameters,
            intent: def.intent,
            example_question: def.example_question.to_string(),
            tags: def.tags.iter().map(|s| s.to_string()).collect(),
            keywords: def.keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn unindent(cypher: &str) -> String {
    cypher
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn drug() -> ParamSpec {
    ParamSpec::entity("drug_name", EntityKind::Drug)
}

fn disease() -> ParamSpec {
    ParamSpec::entity("disease_name", EntityKind::Disease)
}

fn pathway() -> ParamSpec {
    ParamSpec::entity("pathway_name", EntityKind::Pathway)
}

fn limit() -> ParamSpec {
    ParamSpec::limit(10)
}

/// Every built-in template, in catalog order
pub fn builtin_templates() -> Vec<QueryTemplate> {
    let mut templates = Vec::new();
    templates.extend(drug_repurposing());
    templates.extend(target_identification());
    templates.extend(indication_expansion());
    templates.extend(direct_lookups());
    templates
}

fn drug_repurposing() -> Vec<QueryTemplate> {
    vec![
        Def {
            name: "similar_drugs_by_target",
            description: "Find drugs that target similar genes/proteins as a reference drug",
            cypher: r#"
                MATCH (drug1:Drug {name: $drug_name})-[:TARGETS]->(target:Gene)
                MATCH (drug2:Drug)-[:TARGETS]->(target)
                WHERE drug1 <> drug2
                WITH drug2, collect(DISTINCT target.symbol) AS shared_targets, count(DISTINCT target) AS target_count
                WHERE target_count >= $min_shared_targets
                RETURN drug2.name AS drug_name,
                       drug2.indication AS current_indication,
                       shared_targets,
                       target_count,
                       drug2.mechanism AS mechanism
                ORDER BY target_count DESC
                LIMIT $limit
            "#,
            parameters: vec![drug(), ParamSpec::count("min_shared_targets", 1), limit()],
            intent: Intent::DrugRepurposing,
            example_question: "Find drugs with similar targets to Imatinib",
            tags: &["similar drugs", "shared targets", "drug repurposing", "similar mechanism"],
            keywords: &["similar", "drug", "target", "repurpose", "repurposing"],
        }
        .into(),
        Def {
            name: "drugs_for_disease_targets",
            description: "Find existing drugs that target genes associated with a disease",
            cypher: r#"
                MATCH (disease:Disease {name: $disease_name})<-[:ASSOCIATED_WITH|CAUSES]-(gene:Gene)
                MATCH (drug:Drug)-[:TARGETS]->(gene)
                WITH drug, disease, collect(DISTINCT gene.symbol) AS targeted_genes, count(DISTINCT gene) AS gene_count
                OPTIONAL MATCH (drug)-[:TREATS]->(current_disease:Disease)
                RETURN drug.name AS drug_name,
                       drug.indication AS current_indication,
                       collect(DISTINCT current_disease.name) AS current_diseases,
                       targeted_genes,
                       gene_count,
                       drug.mechanism AS mechanism
                ORDER BY gene_count DESC
                LIMIT $limit
            "#,
            parameters: vec![disease(), limit()],
            intent: Intent::DrugRepurposing,
            example_question: "Find drugs that could be repurposed for Alzheimer's disease",
            tags: &["drug repurposing", "new indication", "disease treatment", "repurpose"],
            keywords: &["repurposed", "repurpose", "drug", "disease"],
        }
        .into(),
        Def {
            name: "drugs_targeting_pathway",
            description: "Find drugs that target genes in a specific biological pathway",
            cypher: r#"
                MATCH (pathway:Pathway {name: $pathway_name})<-[:PARTICIPATES_IN]-(gene:Gene)
                MATCH (drug:Drug)-[r:TARGETS|ACTIVATES|INHIBITS]->(gene)
                WITH drug, collect(DISTINCT gene.symbol) AS pathway_genes, count(DISTINCT gene) AS gene_count, collect(DISTINCT type(r)) AS interaction_types
                RETURN drug.name AS drug_name,
                       drug.indication AS current_indication,
                       pathway_genes,
                       gene_count,
                       interaction_types,
                       drug.mechanism AS mechanism
                ORDER BY gene_count DESC
                LIMIT $limit
            "#,
            parameters: vec![pathway(), limit()],
            intent: Intent::DrugRepurposing,
            example_question: "Find drugs that target the PI3K/AKT signaling pathway",
            tags: &["pathway", "pathway targeting", "drug repurposing", "signaling"],
            keywords: &["drug", "pathway", "target"],
        }
        .into(),
        Def {
            name: "drugs_with_inverse_mechanism",
            description: "Find drugs that have opposite effect on disease-associated genes",
            cypher: r#"
                MATCH (disease:Disease {name: $disease_name})<-[:ASSOCIATED_WITH]-(gene:Gene)
                MATCH (gene)<-[causal:UPREGULATES|DOWNREGULATES]-(disease_entity)
                WITH gene, type(causal) AS disease_effect
                MATCH (drug:Drug)-[drug_effect:UPREGULATES|DOWNREGULATES|ACTIVATES|INHIBITS]->(gene)
                WHERE (disease_effect = 'UPREGULATES' AND type(drug_effect) IN ['DOWNREGULATES', 'INHIBITS'])
                   OR (disease_effect = 'DOWNREGULATES' AND type(drug_effect) IN ['UPREGULATES', 'ACTIVATES'])
                WITH drug, collect(DISTINCT {gene: gene.symbol, disease_effect: disease_effect, drug_effect: type(drug_effect)}) AS gene_effects
                RETURN drug.name AS drug_name,
                       drug.indication AS current_indication,
                       gene_effects,
                       size(gene_effects) AS corrective_targets,
                       drug.mechanism AS mechanism
                ORDER BY corrective_targets DESC
                LIMIT $limit
            "#,
            parameters: vec![disease(), limit()],
            intent: Intent::DrugRepurposing,
            example_question: "Find drugs that could correct the molecular changes in cancer",
            tags: &["opposite mechanism", "inverse effect", "corrective therapy", "repurposing"],
            keywords: &["opposite", "inverse", "correct", "reverse"],
        }
        .into(),
        Def {
            name: "similar_compounds",
            description: "Find drugs with similar chemical structure to a reference compound",
            cypher: r#"
                MATCH (compound1:Compound {name: $compound_name})
                MATCH (compound2:Compound)
                WHERE compound1 <> compound2
                  AND compound2.molecular_weight IS NOT NULL
                  AND abs(compound1.molecular_weight - compound2.molecular_weight) < $weight_tolerance
                WITH compound2, abs(compound1.molecular_weight - compound2.molecular_weight) AS weight_diff
                OPTIONAL MATCH (compound2)<-[:SIMILAR_TO]-(drug:Drug)
                OPTIONAL MATCH (drug)-[:TREATS]->(disease:Disease)
                RETURN compound2.name AS compound_name,
                       compound2.molecular_weight AS molecular_weight,
                       weight_diff,
                       collect(DISTINCT drug.name) AS related_drugs,
                       collect(DISTINCT disease.name) AS indications
                ORDER BY weight_diff ASC
                LIMIT $limit
            "#,
            parameters: vec![
                ParamSpec::entity("compound_name", EntityKind::Compound),
                ParamSpec::fixed_float("weight_tolerance", 50.0),
                limit(),
            ],
            intent: Intent::CompoundSimilarity,
            example_question: "Find compounds similar to Metformin",
            tags: &["compound similarity", "chemical structure", "similar compounds", "molecular weight"],
            keywords: &["compound", "similar", "structure", "chemical"],
        }
        .into(),
    ]
}

fn target_identification() -> Vec<QueryTemplate> {
    vec![
        Def {
            name: "genes_for_disease",
            description: "Find genes causally associated with a specific disease",
            cypher: r#"
                MATCH (disease:Disease {name: $disease_name})<-[rel:ASSOCIATED_WITH|CAUSES]-(gene:Gene)
                OPTIONAL MATCH (gene)-[:PARTICIPATES_IN]->(pathway:Pathway)
                WITH gene, rel, collect(DISTINCT pathway.name) AS pathways
                RETURN gene.symbol AS gene_symbol,
                       gene.name AS gene_name,
                       gene.description AS description,
                       type(rel) AS association_type,
                       pathways,
                       gene.chromosome AS chromosome
                ORDER BY gene.symbol
                LIMIT $limit
            "#,
            parameters: vec![disease(), limit()],
            intent: Intent::TargetIdentification,
            example_question: "What genes are associated with breast cancer?",
            tags: &["gene association", "disease genes", "target identification", "genetic targets", "genes are associated", "genes associated"],
            keywords: &["gene", "associated", "genetic", "disease"],
        }
        .into(),
        Def {
            name: "proteins_for_disease",
            description: "Find protein targets associated with a disease",
            cypher: r#"
                MATCH (disease:Disease {name: $disease_name})<-[:ASSOCIATED_WITH|CAUSES]-(gene:Gene)-[:TRANSCRIBES]->(protein:Protein)
                OPTIONAL MATCH (protein)-[:INTERACTS_WITH]->(interactor:Protein)
                WITH protein, gene, collect(DISTINCT interactor.name) AS interacting_proteins
                OPTIONAL MATCH (drug:Drug)-[:TARGETS]->(protein)
                RETURN protein.name AS protein_name,
                       protein.uniprot_id AS uniprot_id,
                       protein.protein_class AS protein_class,
                       gene.symbol AS gene_symbol,
                       interacting_proteins,
                       collect(DISTINCT drug.name) AS existing_drugs
                ORDER BY size(existing_drugs) DESC, protein_name
                LIMIT $limit
            "#,
            parameters: vec![disease(), limit()],
            intent: Intent::TargetIdentification,
            example_question: "Find protein targets for Parkinson's disease",
            tags: &["protein targets", "disease proteins", "therapeutic targets", "druggable targets"],
            keywords: &["protein", "target", "druggable", "therapeutic"],
        }
        .into(),
        Def {
            name: "targets_in_pathway",
            description: "Find druggable targets within a specific pathway",
            cypher: r#"
                MATCH (pathway:Pathway {name: $pathway_name})<-[:PARTICIPATES_IN]-(gene:Gene)
                OPTIONAL MATCH (drug:Drug)-[:TARGETS]->(gene)
                WITH gene, count(DISTINCT drug) AS drug_count, collect(DISTINCT drug.name) AS targeting_drugs
                RETURN gene.symbol AS gene_symbol,
                       gene.name AS gene_name,
                       gene.description AS description,
                       drug_count,
                       targeting_drugs,
                       CASE WHEN drug_count > 0 THEN 'Drugged' ELSE 'Undrugged' END AS target_status
                ORDER BY drug_count DESC, gene_symbol
                LIMIT $limit
            "#,
            parameters: vec![pathway(), limit()],
            intent: Intent::TargetIdentification,
            example_question: "Find druggable targets in the MAPK signaling pathway",
            tags: &["pathway targets", "druggable genes", "signaling pathway", "target validation", "targets in"],
            keywords: &["druggable", "target", "pathway", "gene"],
        }
        .into(),
        Def {
            name: "biomarkers_for_disease",
            description: "Find biomarkers associated with a disease",
            cypher: r#"
                MATCH (disease:Disease {name: $disease_name})<-[:ASSOCIATED_WITH]-(biomarker:Biomarker)
                OPTIONAL MATCH (biomarker)-[:MEASURED_BY]->(gene:Gene)
                RETURN biomarker.name AS biomarker_name,
                       biomarker.biomarker_type AS biomarker_type,
                       collect(DISTINCT gene.symbol) AS associated_genes,
                       biomarker.associated_diseases AS diseases
                ORDER BY biomarker_name
                LIMIT $limit
            "#,
            parameters: vec![disease(), limit()],
            intent: Intent::BiomarkerDiscovery,
            example_question: "What are the biomarkers for lung cancer?",
            tags: &["biomarkers", "diagnostic markers", "disease markers", "prognostic markers"],
            keywords: &["biomarker", "marker", "diagnostic", "prognostic"],
        }
        .into(),
        Def {
            name: "targets_by_tissue_expression",
            description: "Find genes highly expressed in specific tissue or cell type",
            cypher: r#"
                MATCH (tissue:Tissue {name: $tissue_name})<-[expr:EXPRESSED_IN]-(gene:Gene)
                WHERE expr.expression_level >= $min_expression_level
                OPTIONAL MATCH (gene)<-[:TARGETS]-(drug:Drug)
                OPTIONAL MATCH (gene)-[:ASSOCIATED_WITH]->(disease:Disease)
                RETURN gene.symbol AS gene_symbol,
                       gene.name AS gene_name,
                       expr.expression_level AS expression_level,
                       collect(DISTINCT drug.name) AS targeting_drugs,
                       collect(DISTINCT disease.name) AS associated_diseases
                ORDER BY expression_level DESC
                LIMIT $limit
            "#,
            parameters: vec![
                ParamSpec::entity("tissue_name", EntityKind::Tissue),
                ParamSpec::threshold("min_expression_level", 0.7),
                limit(),
            ],
            intent: Intent::TargetIdentification,
            example_question: "Find genes highly expressed in brain tissue",
            tags: &["tissue expression", "cell type", "expression level", "tissue-specific targets", "expressed in"],
            keywords: &["tissue", "expressed", "expression", "cell"],
        }
        .into(),
        Def {
            name: "undrugged_disease_targets",
            description: "Find genes associated with disease that are not currently targeted by drugs",
            cypher: r#"
                MATCH (disease:Disease {name: $disease_name})<-[:ASSOCIATED_WITH|CAUSES]-(gene:Gene)
                WHERE NOT (gene)<-[:TARGETS]-(:Drug)
                OPTIONAL MATCH (gene)-[:PARTICIPATES_IN]->(pathway:Pathway)
                OPTIONAL MATCH (gene)-[:INTERACTS_WITH]-(interactor:Gene)<-[:TARGETS]-(drug:Drug)
                WITH gene,
                     collect(DISTINCT pathway.name) AS pathways,
                     collect(DISTINCT {interactor: interactor.symbol, drug: drug.name}) AS drugged_interactors
                RETURN gene.symbol AS gene_symbol,
                       gene.name AS gene_name,
                       gene.description AS description,
                       pathways,
                       drugged_interactors,
                       size(drugged_interactors) AS indirect_drugability_score
                ORDER BY indirect_drugability_score DESC, gene_symbol
                LIMIT $limit
            "#,
            parameters: vec![disease(), limit()],
            intent: Intent::TargetIdentification,
            example_question: "Find novel undrugged targets for diabetes",
            tags: &["undrugged targets", "novel targets", "drug discovery", "target validation"],
            keywords: &["undrugged", "novel", "target", "untargeted"],
        }
        .into(),
    ]
}

fn indication_expansion() -> Vec<QueryTemplate> {
    vec![
        Def {
            name: "new_indications_via_targets",
            description: "Find potential new disease indications for a drug based on its targets",
            cypher: r#"
                MATCH (drug:Drug {name: $drug_name})-[:TARGETS]->(target:Gene)-[:ASSOCIATED_WITH|CAUSES]->(disease:Disease)
                WHERE NOT (drug)-[:TREATS]->(disease)
                WITH disease, collect(DISTINCT target.symbol) AS shared_targets, count(DISTINCT target) AS target_count
                OPTIONAL MATCH (disease)<-[:TREATS]-(competitor_drug:Drug)
                WITH disease, shared_targets, target_count, collect(DISTINCT competitor_drug.name) AS existing_treatments
                RETURN disease.name AS disease_name,
                       disease.category AS disease_category,
                       shared_targets,
                       target_count,
                       existing_treatments,
                       size(existing_treatments) AS treatment_count
                ORDER BY target_count DESC, treatment_count ASC
                LIMIT $limit
            "#,
            parameters: vec![drug(), limit()],
            intent: Intent::IndicationExpansion,
            example_question: "What new diseases could Metformin treat?",
            tags: &["indication expansion", "new indications", "drug repurposing", "new uses", "new diseases"],
            keywords: &["indication", "new", "disease", "expand"],
        }
        .into(),
        Def {
            name: "indications_via_pathway",
            description: "Find new indications for a drug based on pathway involvement",
            cypher: r#"
                MATCH (drug:Drug {name: $drug_name})-[:TARGETS|ACTIVATES|INHIBITS]->(gene:Gene)-[:PARTICIPATES_IN]->(pathway:Pathway)
                MATCH (pathway)<-[:PARTICIPATES_IN]-(disease_gene:Gene)-[:ASSOCIATED_WITH]->(disease:Disease)
                WHERE NOT (drug)-[:TREATS]->(disease)
                WITH disease,
                     collect(DISTINCT pathway.name) AS shared_pathways,
                     count(DISTINCT pathway) AS pathway_count,
                     collect(DISTINCT disease_gene.symbol) AS disease_genes
                RETURN disease.name AS disease_name,
                       disease.description AS description,
                       shared_pathways,
                       pathway_count,
                       disease_genes
                ORDER BY pathway_count DESC
                LIMIT $limit
            "#,
            parameters: vec![drug(), limit()],
            intent: Intent::IndicationExpansion,
            example_question: "Find new indications for Imatinib based on pathway involvement",
            tags: &["pathway overlap", "indication expansion", "shared pathways", "mechanism overlap", "pathway involvement"],
            keywords: &["indication", "pathway", "overlap", "involvement"],
        }
        .into(),
        Def {
            name: "related_disease_indications",
            description: "Find diseases related to current indication that drug might treat",
            cypher: r#"
                MATCH (drug:Drug {name: $drug_name})-[:TREATS]->(current_disease:Disease)
                MATCH (current_disease)<-[:ASSOCIATED_WITH]-(gene:Gene)-[:ASSOCIATED_WITH]->(related_disease:Disease)
                WHERE current_disease <> related_disease
                WITH related_disease, collect(DISTINCT gene.symbol) AS shared_genes, count(DISTINCT gene) AS gene_count
                OPTIONAL MATCH (related_disease)<-[:TREATS]-(existing_drug:Drug)
                RETURN related_disease.name AS disease_name,
                       related_disease.category AS disease_category,
                       related_disease.description AS description,
                       shared_genes,
                       gene_count,
                       collect(DISTINCT existing_drug.name) AS existing_treatments
                ORDER BY gene_count DESC
                LIMIT $limit
            "#,
            parameters: vec![drug(), limit()],
            intent: Intent::IndicationExpansion,
            example_question: "Find related diseases to expand indication for Aspirin",
            tags: &["related diseases", "disease similarity", "indication expansion", "comorbidities"],
            keywords: &["related", "disease", "comorbidity", "expand"],
        }
        .into(),
        Def {
            name: "indications_by_mechanism",
            description: "Find diseases where drug's mechanism of action could be therapeutic",
            cypher: r#"
                MATCH (drug:Drug {name: $drug_name})-[effect:ACTIVATES|INHIBITS|UPREGULATES|DOWNREGULATES]->(target:Gene)
                MATCH (disease:Disease)<-[disease_rel:ASSOCIATED_WITH]-(target)
                WHERE NOT (drug)-[:TREATS]->(disease)
                WITH disease,
                     collect(DISTINCT {target: target.symbol, drug_effect: type(effect), disease_association: type(disease_rel)}) AS mechanisms,
                     count(DISTINCT target) AS target_count
                WHERE target_count >= $min_targets
                OPTIONAL MATCH (disease)<-[:TREATS]-(competitor:Drug)
                RETURN disease.name AS disease_name,
                       disease.category AS category,
                       mechanisms,
                       target_count,
                       collect(DISTINCT competitor.name) AS competing_drugs
                ORDER BY target_count DESC
                LIMIT $limit
            "#,
            parameters: vec![drug(), ParamSpec::count("min_targets", 1), limit()],
            intent: Intent::IndicationExpansion,
            example_question: "Find diseases where Rapamycin's mechanism could work",
            tags: &["mechanism of action", "drug mechanism", "indication expansion", "therapeutic mechanism"],
            keywords: &["mechanism", "action", "disease", "work"],
        }
        .into(),
        Def {
            name: "orphan_disease_opportunities",
            description: "Find rare/orphan diseases with few treatments that drug might address",
            cypher: r#"
                MATCH (drug:Drug {name: $drug_name})-[:TARGETS]->(target:Gene)-[:ASSOCIATED_WITH]->(disease:Disease)
                WHERE disease.category CONTAINS 'rare' OR disease.category CONTAINS 'orphan'
                OPTIONAL MATCH (disease)<-[:TREATS]-(existing_drug:Drug)
                WITH disease,
                     collect(DISTINCT target.symbol) AS drug_targets,
                     count(DISTINCT existing_drug) AS treatment_count
                WHERE treatment_count < $max_existing_treatments
                RETURN disease.name AS disease_name,
                       disease.description AS description,
                       drug_targets,
                       size(drug_targets) AS target_count,
                       treatment_count,
                       CASE WHEN treatment_count = 0 THEN 'Unmet Need' ELSE 'Limited Options' END AS opportunity_type
                ORDER BY treatment_count ASC, target_count DESC
                LIMIT $limit
            "#,
            parameters: vec![
                drug(),
                ParamSpec::fixed_integer("max_existing_treatments", 3),
                limit(),
            ],
            intent: Intent::IndicationExpansion,
            example_question: "Find orphan disease opportunities for Sirolimus",
            tags: &["orphan diseases", "rare diseases", "unmet need", "indication expansion", "orphan disease"],
            keywords: &["orphan", "rare", "unmet", "opportunity"],
        }
        .into(),
        Def {
            name: "indications_via_biomarkers",
            description: "Find diseases with similar biomarker profiles for indication expansion",
            cypher: r#"
                MATCH (drug:Drug {name: $drug_name})-[:TREATS]->(current_disease:Disease)
                MATCH (current_disease)<-[:ASSOCIATED_WITH]-(biomarker:Biomarker)-[:ASSOCIATED_WITH]->(new_disease:Disease)
                WHERE current_disease <> new_disease
                WITH new_disease,
                     collect(DISTINCT biomarker.name) AS shared_biomarkers,
                     count(DISTINCT biomarker) AS biomarker_count
                OPTIONAL MATCH (new_disease)<-[:TREATS]-(competitor:Drug)
                WITH new_disease, shared_biomarkers, biomarker_count, collect(DISTINCT competitor.name) AS existing_treatments
                RETURN new_disease.name AS disease_name,
                       new_disease.category AS category,
                       shared_biomarkers,
                       biomarker_count,
                       existing_treatments,
                       size(existing_treatments) AS treatment_count
                ORDER BY biomarker_count DESC, treatment_count ASC
                LIMIT $limit
            "#,
            parameters: vec![drug(), limit()],
            intent: Intent::IndicationExpansion,
            example_question: "Find indication expansion opportunities for Trastuzumab via biomarkers",
            tags: &["biomarker overlap", "indication expansion", "precision medicine", "via biomarkers"],
            keywords: &["biomarker", "indication", "overlap", "profile"],
        }
        .into(),
    ]
}

fn direct_lookups() -> Vec<QueryTemplate> {
    vec![
        Def {
            name: "drugs_targeting_gene",
            description: "Find drugs that act directly on a gene",
            cypher: r#"
                MATCH (drug:Drug)-[r:TARGETS|INHIBITS|ACTIVATES|BINDS_TO]->(gene:Gene {symbol: $gene_symbol})
                RETURN drug.name AS drug_name,
                       drug.mechanism AS mechanism,
                       drug.approval_status AS approval_status,
                       collect(DISTINCT type(r)) AS interaction_types
                ORDER BY drug_name
                LIMIT $limit
            "#,
            parameters: vec![ParamSpec::entity("gene_symbol", EntityKind::Gene), limit()],
            intent: Intent::DrugTargetInteraction,
            example_question: "What drugs target EGFR?",
            tags: &["drugs target", "drugs that target", "drugs targeting", "inhibitors of", "drugs inhibit"],
            keywords: &["drug", "target", "inhibitor", "gene"],
        }
        .into(),
        Def {
            name: "targets_of_drug",
            description: "List the genes a drug acts on and the pathways they belong to",
            cypher: r#"
                MATCH (drug:Drug {name: $drug_name})-[r:TARGETS|INHIBITS|ACTIVATES|BINDS_TO]->(gene:Gene)
                OPTIONAL MATCH (gene)-[:PARTICIPATES_IN]->(pathway:Pathway)
                RETURN gene.symbol AS gene_symbol,
                       gene.name AS gene_name,
                       type(r) AS interaction_type,
                       collect(DISTINCT pathway.name) AS pathways
                ORDER BY gene_symbol
                LIMIT $limit
            "#,
            parameters: vec![drug(), limit()],
            intent: Intent::DrugTargetInteraction,
            example_question: "What are the targets of Imatinib?",
            tags: &["targets of", "target of", "does it bind", "binds to"],
            keywords: &["target", "bind", "act", "protein"],
        }
        .into(),
        Def {
            name: "drugs_treating_disease",
            description: "Find drugs with a known treatment relationship to a disease",
            cypher: r#"
                MATCH (drug:Drug)-[:TREATS]->(disease:Disease {name: $disease_name})
                RETURN drug.name AS drug_name,
                       drug.drug_class AS drug_class,
                       drug.mechanism AS mechanism,
                       drug.approval_status AS approval_status
                ORDER BY drug_name
                LIMIT $limit
            "#,
            parameters: vec![disease(), limit()],
            intent: Intent::DiseaseDrugRelation,
            example_question: "Which drugs treat Rheumatoid Arthritis?",
            tags: &["drugs treat", "drugs that treat", "treatments for", "approved for", "therapies for"],
            keywords: &["treat", "treatment", "therapy", "drug", "medication"],
        }
        .into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_names_are_unique() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 20);
        let names: HashSet<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), templates.len());
    }

    #[test]
    fn test_every_placeholder_is_declared() {
        for template in builtin_templates() {
            for spec in &template.parameters {
                assert!(
                    template.cypher.contains(&format!("${}", spec.name)),
                    "{} declares ${} but never uses it",
                    template.name,
                    spec.name
                );
            }
            assert!(template.cypher.contains("LIMIT $limit"), "{}", template.name);
        }
    }

    #[test]
    fn test_each_template_has_one_required_entity() {
        for template in builtin_templates() {
            let required: Vec<_> = template.required_parameters().collect();
            assert_eq!(required.len(), 1, "{}", template.name);
            assert!(required[0].entity_kind().is_some());
        }
    }

    #[test]
    fn test_cypher_is_unindented() {
        let templates = builtin_templates();
        let first = &templates[0];
        assert!(first.cypher.starts_with("MATCH (drug1:Drug {name: $drug_name})"));
        assert!(first.cypher.lines().all(|l| !l.starts_with(' ')));
    }
}
