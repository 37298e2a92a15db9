//! Lexical path functions.
//!
//! Paths are handled as `/`-separated strings; no filesystem access happens
//! except for `absolute`, which needs the working directory.

use crate::error::{FormatError, Result};
use crate::value::Value;

use super::{arity, string_arg, Builtin};

pub(crate) const FUNCTIONS: &[(&str, Builtin)] = &[
    ("absolute", absolute),
    ("base", base),
    ("clean", clean),
    ("directory", directory),
    ("extension", extension),
];

/// Shortest path equivalent to `path` by purely lexical processing.
///
/// ```rust
/// use bracefmt::functions::path::clean_path;
///
/// assert_eq!(clean_path("a/./b/../c//"), "a/c");
/// assert_eq!(clean_path("/../x"), "/x");
/// assert_eq!(clean_path(""), ".");
/// ```
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Last element of `path`, ignoring trailing slashes.
pub fn base_name(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind('/') {
        Some(i) => trimmed[i + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Everything but the last element of `path`, cleaned.
pub fn directory_name(path: &str) -> String {
    match path.rfind('/') {
        Some(i) => clean_path(&path[..=i]),
        None => ".".to_string(),
    }
}

/// Extension of the last element, including the dot.
pub fn extension_of(path: &str) -> String {
    let name = match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    };
    match name.rfind('.') {
        Some(i) => name[i..].to_string(),
        None => String::new(),
    }
}

fn absolute(args: &[Value]) -> Result<Value> {
    let [path] = arity::<1>("absolute", args)?;
    let path = string_arg("absolute", path)?;
    if path.starts_with('/') {
        return Ok(Value::from(clean_path(path)));
    }
    let cwd = std::env::current_dir()
        .map_err(|e| FormatError::expression(format!("absolute: {}", e)))?;
    let joined = format!("{}/{}", cwd.to_string_lossy(), path);
    Ok(Value::from(clean_path(&joined)))
}

fn base(args: &[Value]) -> Result<Value> {
    let [path] = arity::<1>("base", args)?;
    Ok(Value::from(base_name(string_arg("base", path)?)))
}

fn clean(args: &[Value]) -> Result<Value> {
    let [path] = arity::<1>("clean", args)?;
    Ok(Value::from(clean_path(string_arg("clean", path)?)))
}

fn directory(args: &[Value]) -> Result<Value> {
    let [path] = arity::<1>("directory", args)?;
    Ok(Value::from(directory_name(string_arg("directory", path)?)))
}

fn extension(args: &[Value]) -> Result<Value> {
    let [path] = arity::<1>("extension", args)?;
    Ok(Value::from(extension_of(string_arg("extension", path)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/dir/dir/../file"), "/dir/file");
        assert_eq!(clean_path("a//b"), "a/b");
        assert_eq!(clean_path("../../a"), "../../a");
        assert_eq!(clean_path("a/../.."), "..");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("/.."), "/");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/dir/dir/file"), "file");
        assert_eq!(base_name("/dir/dir/"), "dir");
        assert_eq!(base_name("file"), "file");
        assert_eq!(base_name("///"), "/");
        assert_eq!(base_name(""), ".");
    }

    #[test]
    fn test_directory_name() {
        assert_eq!(directory_name("/dir/dir/file"), "/dir/dir");
        assert_eq!(directory_name("file"), ".");
        assert_eq!(directory_name("/file"), "/");
        assert_eq!(directory_name("a/b/"), "a/b");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/dir/dir/file.ext"), ".ext");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("dir.d/file"), "");
        assert_eq!(extension_of("noext"), "");
    }

    #[test]
    #[cfg(unix)]
    fn test_absolute() {
        let out = absolute(&[Value::from("/a/./b")]).unwrap();
        assert_eq!(out, Value::from("/a/b"));

        let out = absolute(&[Value::from("x")]).unwrap().to_string();
        assert!(out.starts_with('/'));
        assert!(out.ends_with("/x"));
    }

    #[test]
    fn test_path_functions_require_strings() {
        assert!(base(&[Value::from(1)]).is_err());
        assert!(extension(&[]).is_err());
    }
}
