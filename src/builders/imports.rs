//! Import statement rendering

use super::value::quote;
use crate::utils::format_import_string;

/// `import { a, b } from "specifier";`
pub fn named_import(names: &[&str], specifier: &str) -> String {
    format!("import {{ {} }} from {};", names.join(", "), quote(specifier))
}

/// Import from a path relative to the importing module; `.ts` is dropped and `./` added
pub fn relative_import(names: &[&str], relative_file_path: &str) -> String {
    named_import(names, &format_import_string(relative_file_path))
}
