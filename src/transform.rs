//! Rewrite of the application's `StoreManager.boot()` call
//!
//! A zero-argument `StoreManager.boot()` is replaced with a boot call that eagerly
//! imports the generated loader, addressed relative to the module being transformed:
//!
//! ```text
//! app.use(StoreManager.boot());
//! app.use(StoreManager.boot(import.meta.glob('./Stores/Generated/StoreLoader.ts', {eager:true})));
//! ```

use crate::extractors::base::{Field, SourceModule, Span, SyntaxKind, SyntaxNode};
use crate::utils::{relative_path, relativeify};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

static BOOT_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bStoreManager\s*\.\s*boot\s*\(").expect("valid boot call pattern"));

const DEPENDENCY_DIR: &str = "node_modules/";
const VITE_CACHE_DIR: &str = ".vite/";

/// Dependencies are never rewritten, except for the dev server's pre-bundle cache
fn is_dependency(id: &str) -> bool {
    id.match_indices(DEPENDENCY_DIR)
        .any(|(at, _)| !id[at + DEPENDENCY_DIR.len()..].starts_with(VITE_CACHE_DIR))
}

/// Rewrite every argument-less `StoreManager.boot()` call in `code`
///
/// Returns `None` when the module is not eligible or nothing was rewritten.
pub fn transform_boot_call(code: &str, id: &str, loader_path: &Path) -> Option<String> {
    if is_dependency(id) || !id.ends_with(".ts") {
        return None;
    }
    if !BOOT_CALL.is_match(code) {
        return None;
    }

    let module_path = Path::new(id);
    let module = match SourceModule::from_source(module_path, code.to_string()) {
        Ok(module) => module,
        Err(e) => {
            debug!("Skipping boot call transform for {}: {}", id, e);
            return None;
        }
    };

    let mut calls: Vec<Span> = Vec::new();
    module.root().walk(&mut |node| {
        if is_bare_boot_call(node) {
            calls.push(node.span());
        }
    });
    if calls.is_empty() {
        return None;
    }

    let module_dir = module_path.parent().unwrap_or(Path::new(""));
    let replacement = format!(
        "StoreManager.boot(import.meta.glob('{}', {{eager:true}}))",
        relativeify(&relative_path(module_dir, loader_path))
    );

    let mut output = code.to_string();
    // Back to front so earlier offsets stay valid
    for span in calls.iter().rev() {
        info!(
            "Transformed boot call from \"{}\" to \"{}\"",
            &code[span.start..span.end],
            replacement
        );
        output.replace_range(span.start..span.end, &replacement);
    }

    (output != code).then_some(output)
}

fn is_bare_boot_call<'a, N: SyntaxNode<'a>>(node: N) -> bool {
    if node.kind() != SyntaxKind::CallExpression {
        return false;
    }
    let Some(callee) = node.field(Field::Function) else {
        return false;
    };
    if callee.kind() != SyntaxKind::MemberExpression {
        return false;
    }

    let object_is_manager = callee
        .field(Field::Object)
        .is_some_and(|object| object.kind() == SyntaxKind::Identifier && object.text() == "StoreManager");
    let property_is_boot = callee
        .field(Field::Property)
        .is_some_and(|property| property.text() == "boot");
    let no_arguments = node
        .field(Field::Arguments)
        .is_some_and(|arguments| arguments.named_children().is_empty());

    object_is_manager && property_is_boot && no_arguments
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOADER: &str = "/app/src/Stores/Generated/StoreLoader.ts";

    #[test]
    fn test_rewrites_boot_call() {
        let code = "import { createApp } from 'vue';\nconst app = createApp(App);\napp.use(StoreManager.boot());\n";
        let output = transform_boot_call(code, "/app/src/main.ts", Path::new(LOADER)).unwrap();

        assert_eq!(
            output,
            "import { createApp } from 'vue';\nconst app = createApp(App);\napp.use(StoreManager.boot(import.meta.glob('./Stores/Generated/StoreLoader.ts', {eager:true})));\n"
        );
    }

    #[test]
    fn test_path_is_relative_to_the_module() {
        let code = "StoreManager.boot();";
        let output =
            transform_boot_call(code, "/app/src/app/setup.ts", Path::new(LOADER)).unwrap();
        assert!(output.contains("import.meta.glob('../Stores/Generated/StoreLoader.ts'"));
    }

    #[test]
    fn test_existing_arguments_are_left_alone() {
        let code = "app.use(StoreManager.boot(stores));";
        assert_eq!(
            transform_boot_call(code, "/app/src/main.ts", Path::new(LOADER)),
            None
        );
    }

    #[test]
    fn test_other_calls_are_left_alone() {
        let code = "Other.boot();\nStoreManager.start();\nconst boot = () => 'StoreManager.boot()';";
        assert_eq!(
            transform_boot_call(code, "/app/src/main.ts", Path::new(LOADER)),
            None
        );
    }

    #[test]
    fn test_module_filter() {
        let code = "StoreManager.boot();";
        assert!(transform_boot_call(code, "/app/node_modules/pkg/index.ts", Path::new(LOADER)).is_none());
        assert!(transform_boot_call(code, "/app/src/main.js", Path::new(LOADER)).is_none());
        assert!(
            transform_boot_call(code, "/app/node_modules/.vite/deps/main.ts", Path::new(LOADER))
                .is_some()
        );
    }
}
