//! Templates command implementation. Runs offline.

use crate::cli::TemplatesArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use biograph_catalog::TemplateCatalog;
use biograph_domain::{Intent, QueryTemplate};

/// Execute the templates command.
pub fn execute_templates(args: TemplatesArgs, formatter: &Formatter) -> Result<()> {
    let catalog = TemplateCatalog::builtin();
    let selected = select_templates(&catalog, args.intent.as_deref())?;
    println!("{}", formatter.templates(selected.iter().copied()));
    println!("{}", formatter.info(&format!("{} template(s)", selected.len())));
    Ok(())
}

/// Templates in catalog order, optionally restricted to one intent.
pub fn select_templates<'a>(
    catalog: &'a TemplateCatalog,
    intent: Option<&str>,
) -> Result<Vec<&'a QueryTemplate>> {
    match intent {
        None => Ok(catalog.iter().collect()),
        Some(label) => {
            let intent = Intent::parse(label).ok_or_else(|| {
                let known: Vec<&str> = Intent::ALL.iter().map(Intent::as_str).collect();
                CliError::InvalidInput(format!(
                    "Unknown intent: {}. Expected one of: {}",
                    label,
                    known.join(", ")
                ))
            })?;
            Ok(catalog.by_intent(intent).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates() {
        let catalog = TemplateCatalog::builtin();
        let selected = select_templates(&catalog, None).unwrap();
        assert_eq!(selected.len(), catalog.len());
    }

    #[test]
    fn test_intent_filter() {
        let catalog = TemplateCatalog::builtin();
        let selected = select_templates(&catalog, Some("Target-Identification")).unwrap();
        assert!(!selected.is_empty());
        assert!(selected.iter().all(|t| t.intent == Intent::TargetIdentification));
    }

    #[test]
    fn test_known_intent_without_templates() {
        let catalog = TemplateCatalog::builtin();
        let selected = select_templates(&catalog, Some("pathway_analysis")).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_unknown_intent() {
        let catalog = TemplateCatalog::builtin();
        let result = select_templates(&catalog, Some("astrology"));
        assert!(matches!(result, Err(CliError::InvalidInput(msg)) if msg.contains("drug_repurposing")));
    }
}
