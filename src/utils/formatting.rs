//! Naming conventions for generated bindings

/// Default framework binding for a store class
///
/// Strips a trailing `Store`, lowercases the first letter and prefixes `$`:
/// `UserStore` becomes `$user`, `NewYeetStore` becomes `$newYeet`.
pub fn format_vue_binding_name(class_name: &str) -> String {
    let base = match class_name.strip_suffix("Store") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => class_name,
    };

    format!("${}", lowercase_first(base))
}

/// Suggested export binding for a class, used in "missing export" hints
pub fn create_export_name(class_name: &str) -> String {
    lowercase_first(class_name)
}

fn lowercase_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
