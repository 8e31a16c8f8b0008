// Path conversion utilities
//
// Generated modules reference store files with Unix-style relative specifiers,
// regardless of the platform the pipeline runs on.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Convert an absolute path to a relative Unix-style path (with `/` separators)
///
/// Fails if `absolute` does not live under `root`.
pub fn to_relative_unix_style(absolute: &Path, root: &Path) -> Result<String> {
    // Canonicalize when possible so symlinked roots (/var -> /private/var) still match
    let (path_to_use, root_to_use) = match (absolute.canonicalize(), root.canonicalize()) {
        (Ok(canonical_abs), Ok(canonical_root)) => (canonical_abs, canonical_root),
        _ => (absolute.to_path_buf(), root.to_path_buf()),
    };

    let relative = path_to_use.strip_prefix(&root_to_use).with_context(|| {
        format!(
            "File path '{}' is not within root '{}'",
            path_to_use.display(),
            root_to_use.display()
        )
    })?;

    let path_str = relative.to_str().context("Path contains invalid UTF-8")?;
    Ok(slash(path_str))
}

/// Lexically compute the path of `to` relative to the directory `from_dir`
///
/// Mirrors node's `path.relative`: walks up with `..` where the two paths diverge.
/// Neither path has to exist. The result always uses `/` separators.
pub fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from = normalize(from_dir);
    let to = normalize(to);

    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        segments.push("..".to_string());
    }
    for part in &to_parts[common..] {
        segments.push(part.as_os_str().to_string_lossy().to_string());
    }

    segments.join("/")
}

/// Resolve `.` and `..` components without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Make a relative specifier explicit: `''` becomes `.`, `foo` becomes `./foo`
pub fn relativeify(relative: &str) -> String {
    if relative.is_empty() {
        return ".".to_string();
    }
    if !relative.starts_with('.') {
        return format!("./{}", relative);
    }
    relative.to_string()
}

/// Turn a relative store path into an import specifier: drop `.ts`, prefix `./`
pub fn format_import_string(import: &str) -> String {
    let trimmed = import.strip_suffix(".ts").unwrap_or(import);
    if trimmed.starts_with("./") {
        trimmed.to_string()
    } else {
        format!("./{}", trimmed)
    }
}

/// Replace platform-specific separators with `/`
fn slash(path: &str) -> String {
    // Extended-length Windows paths must keep their backslashes
    if path.starts_with(r"\\?\") {
        return path.to_string();
    }
    if MAIN_SEPARATOR == '\\' {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_linux_absolute_to_relative() {
        let root = PathBuf::from("/home/dev/app/src/stores");
        let absolute = PathBuf::from("/home/dev/app/src/stores/nested/UserStore.ts");

        let result = to_relative_unix_style(&absolute, &root).unwrap();

        assert_eq!(result, "nested/UserStore.ts");
        assert!(!result.contains('\\'), "Should have no backslashes");
    }

    #[test]
    fn test_file_outside_root_rejected() {
        let root = PathBuf::from("/home/dev/app/src/stores");
        let outside = PathBuf::from("/etc/passwd");

        let result = to_relative_unix_style(&outside, &root);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not within root"));
    }

    #[test]
    fn test_relative_path_from_generated_dir() {
        let generated = PathBuf::from("/app/src/Stores/Generated");
        let store = PathBuf::from("/app/src/Stores/TestingStore.ts");

        assert_eq!(relative_path(&generated, &store), "../TestingStore.ts");
    }

    #[test]
    fn test_relative_path_into_subdirectory() {
        let from = PathBuf::from("/app/src");
        let to = PathBuf::from("/app/src/Stores/Generated/StoreLoader.ts");

        assert_eq!(
            relative_path(&from, &to),
            "Stores/Generated/StoreLoader.ts"
        );
    }

    #[test]
    fn test_relative_path_same_dir_is_empty() {
        let dir = PathBuf::from("/app/src/./Stores");
        assert_eq!(relative_path(&dir, Path::new("/app/src/Stores")), "");
    }

    #[test]
    fn test_normalize_resolves_parent_components() {
        let path = PathBuf::from("/app/src/../lib/./Store.ts");
        assert_eq!(normalize(&path), PathBuf::from("/app/lib/Store.ts"));
    }

    #[test]
    fn test_relativeify() {
        assert_eq!(relativeify(""), ".");
        assert_eq!(relativeify("Stores/Loader.ts"), "./Stores/Loader.ts");
        assert_eq!(relativeify("../Loader.ts"), "../Loader.ts");
    }

    #[test]
    fn test_format_import_string() {
        assert_eq!(format_import_string("../TestingStore.ts"), "./../TestingStore");
        assert_eq!(format_import_string("./UserStore.ts"), "./UserStore");
        assert_eq!(format_import_string("nested/Cart"), "./nested/Cart");
    }
}
