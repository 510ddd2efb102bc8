use std::path::{Component, Path, PathBuf};

/// Join directory and filename into a normalized path (no filesystem checks).
pub(crate) fn join_paths(left: &str, right: &str) -> String {
    let mut buf = if left.is_empty() {
        PathBuf::new()
    } else {
        PathBuf::from(left)
    };

    for comp in Path::new(right).components() {
        match comp {
            Component::CurDir => continue,
            Component::ParentDir => {
                buf.pop();
            }
            other => buf.push(other.as_os_str()),
        }
    }

    buf.to_string_lossy().into_owned()
}

/// Pseudo file names such as `<autogenerated>` or `<built-in>`
pub(crate) fn is_pseudo_file(filename: &str) -> bool {
    filename.starts_with('<') && filename.ends_with('>')
}

/// Resolve a line-table file name against its directory entry and the
/// unit's compilation directory.
pub(crate) fn resolve_file_path(comp_dir: &str, directory: Option<&str>, filename: &str) -> String {
    if filename.is_empty() {
        return String::new();
    }

    if Path::new(filename).is_absolute() || is_pseudo_file(filename) {
        return filename.to_string();
    }

    let comp_dir = comp_dir.trim();
    let directory = match directory.map(str::trim) {
        None | Some("") => comp_dir.to_string(),
        Some(dir) if Path::new(dir).is_absolute() || comp_dir.is_empty() => dir.to_string(),
        Some(dir) => join_paths(comp_dir, dir),
    };

    if directory.is_empty() {
        filename.to_string()
    } else {
        join_paths(&directory, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_directory() {
        assert_eq!(
            resolve_file_path("/src/proj", Some("pkg/../lib"), "util.go"),
            "/src/proj/lib/util.go"
        );
    }

    #[test]
    fn test_resolve_absolute_and_pseudo_names() {
        assert_eq!(
            resolve_file_path("/src", Some("/usr/lib/go"), "/abs/main.go"),
            "/abs/main.go"
        );
        assert_eq!(
            resolve_file_path(".", None, "<autogenerated>"),
            "<autogenerated>"
        );
    }

    #[test]
    fn test_resolve_without_directories() {
        assert_eq!(resolve_file_path("", None, "main.go"), "main.go");
        assert_eq!(resolve_file_path("/src", Some(""), "main.go"), "/src/main.go");
    }
}
