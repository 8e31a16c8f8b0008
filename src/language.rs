//! Language Support - tree-sitter grammar selection
//!
//! Store modules are TypeScript; `.tsx` sources need the TSX dialect of the same grammar.
//! All grammar configuration lives here so the rest of the crate never names a grammar crate.

use crate::error::{PipelineError, Result};
use std::path::Path;

/// Get the tree-sitter language for a given dialect name
pub fn get_tree_sitter_language(language: &str) -> Result<tree_sitter::Language> {
    match language {
        "typescript" => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
        _ => Err(PipelineError::Language(format!(
            "Unsupported language: '{}'. Supported languages: typescript, tsx",
            language
        ))),
    }
}

/// Detect the dialect from a file extension
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "ts" | "mts" | "cts" => Some("typescript"),
        "tsx" => Some("tsx"),
        _ => None,
    }
}

/// Detect the dialect for a path, `None` for anything that is not TypeScript
pub fn detect_language_from_path(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(detect_language_from_extension)
}

/// Build a parser for the given dialect
pub fn create_parser(language: &str) -> Result<tree_sitter::Parser> {
    let lang = get_tree_sitter_language(language)?;
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&lang)
        .map_err(|e| PipelineError::Language(e.to_string()))?;
    Ok(parser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_supported_dialects_load() {
        assert!(get_tree_sitter_language("typescript").is_ok());
        assert!(get_tree_sitter_language("tsx").is_ok());
    }

    #[test]
    fn test_unsupported_language_errors() {
        let err = get_tree_sitter_language("python").unwrap_err();
        assert!(err.to_string().contains("Unsupported language"));
    }

    #[test]
    fn test_detect_from_path() {
        assert_eq!(
            detect_language_from_path(&PathBuf::from("src/UserStore.ts")),
            Some("typescript")
        );
        assert_eq!(
            detect_language_from_path(&PathBuf::from("src/stores.d.ts")),
            Some("typescript")
        );
        assert_eq!(
            detect_language_from_path(&PathBuf::from("src/App.tsx")),
            Some("tsx")
        );
        assert_eq!(detect_language_from_path(&PathBuf::from("src/App.vue")), None);
    }

    #[test]
    fn test_create_parser_parses_typescript() {
        let mut parser = create_parser("typescript").unwrap();
        let tree = parser.parse("const x: number = 1;", None).unwrap();
        assert_eq!(tree.root_node().kind(), "program");
    }
}
