//! Status-effect table loader.

use std::path::Path;

use tactics_core::{StatusEffectDefinition, StatusEffectLedger};

use crate::loaders::{LoadResult, read_file};

/// Loader for status-effect definitions from RON files.
pub struct StatusLoader;

impl StatusLoader {
    /// Load and register every definition in the file.
    ///
    /// Registration stops at the first invalid definition.
    pub fn load(path: &Path) -> LoadResult<StatusEffectLedger> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<StatusEffectLedger> {
        let definitions: Vec<StatusEffectDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status table RON: {}", e))?;

        let mut ledger = StatusEffectLedger::new();
        for definition in definitions {
            let key = definition.key.clone();
            ledger
                .register(definition)
                .map_err(|e| anyhow::anyhow!("Invalid status effect '{}': {}", key, e))?;
        }
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stackable_without_stacks_is_rejected() {
        let table = r#"[(key: "hex", kind: debuff, stackable: true, max_stacks: 0)]"#;
        let err = StatusLoader::parse(table).unwrap_err();
        assert!(err.to_string().contains("hex"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let table = r#"[(key: "hex", kind: debuff), (key: "hex", kind: buff)]"#;
        assert!(StatusLoader::parse(table).is_err());
    }
}
