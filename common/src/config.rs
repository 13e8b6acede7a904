use serde::{Deserialize, Serialize};

/// Editing policies of a mapping session.
///
/// Both default to `false`, which keeps the permissive behavior users already
/// rely on: identical pairs may be added twice and any table name is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorOptions {
    /// Refuse to add a pair that is already in the working list.
    pub dedupe_pairs: bool,
    /// Only accept table names present in the side's latest listing.
    pub require_listed_table: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let options: EditorOptions = serde_json::from_str(r#"{ "dedupePairs": true }"#).unwrap();
        assert!(options.dedupe_pairs);
        assert!(!options.require_listed_table);

        let options: EditorOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, EditorOptions::default());
    }
}
