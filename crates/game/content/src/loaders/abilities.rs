//! Ability catalog loader.

use std::path::Path;

use tactics_core::{AbilityCatalog, AbilityDraft};

use crate::loaders::{LoadResult, read_file};

/// Loader for the ability catalog from RON files.
///
/// RON format: `Vec<(String, AbilityDraft)>`. File order becomes catalog
/// order.
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses and registers every record, aborting on the first invalid one.
    pub fn parse(content: &str) -> LoadResult<AbilityCatalog> {
        let drafts: Vec<(String, AbilityDraft)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        let mut catalog = AbilityCatalog::new();
        for (key, draft) in drafts {
            catalog
                .register(key.clone(), draft)
                .map_err(|e| anyhow::anyhow!("Invalid ability '{}': {}", key, e))?;
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_field_aborts_loading() {
        let table = r#"#![enable(implicit_some)]
            [
                ("jab", (name: "Jab", description: "d", type: "active", category: "combat", base_success_rate: 80.0)),
                ("broken", (name: "Broken", type: "active", category: "combat", base_success_rate: 80.0)),
            ]
        "#;
        let err = AbilityLoader::parse(table).unwrap_err().to_string();
        assert!(err.contains("broken"), "{err}");
        assert!(err.contains("description"), "{err}");
    }

    #[test]
    fn invalid_type_aborts_loading() {
        let table = r#"#![enable(implicit_some)]
            [("jab", (name: "Jab", description: "d", type: "reactive", category: "combat", base_success_rate: 80.0))]
        "#;
        assert!(AbilityLoader::parse(table).is_err());
    }
}
