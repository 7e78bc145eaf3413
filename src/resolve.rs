use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::path::{is_separator, Path, PathBuf};

/// Directories that requests are confined to, picked by the requested file's suffix.
#[derive(Clone, Debug)]
pub struct RootSet {
    /// `*.zst` and `*.zst.sig`
    pub packages: PathBuf,
    /// `*.db`
    pub databases: PathBuf,
    /// Everything else, and the fallback for suspicious paths
    pub default: PathBuf,
}

impl RootSet {
    /// Rules are checked in order: packages, then databases, then the default root.
    pub fn select(&self, path: &str) -> &Path {
        if path.ends_with(".zst") || path.ends_with(".zst.sig") {
            &self.packages
        } else if path.ends_with(".db") {
            &self.databases
        } else {
            &self.default
        }
    }
}

/// Map an untrusted request path onto the filesystem.
///
/// Never fails: traversal segments are skipped, and a symbolic link anywhere along
/// the way sends the whole request to the default root.
pub fn resolve(raw_path: &str, roots: &RootSet) -> PathBuf {
    log::debug!("Path: {}", raw_path);

    // query and fragment are never part of the file path
    let path = match raw_path.find(['?', '#']) {
        Some(end) => &raw_path[..end],
        None => raw_path,
    };
    // normalization eats trailing slashes, so remember it for later
    let trailing_slash = path.trim_end().ends_with('/');

    let decoded = decode(path);
    let normalized = normalize(&decoded);

    let mut resolved = roots.select(&normalized).to_path_buf();
    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        if segment.chars().any(is_separator) || segment == "." || segment == ".." {
            continue;
        }

        let joined = resolved.join(segment);
        if joined.is_symlink() {
            log::debug!("Symbolic link detected: {}", joined.display());
            resolved = roots.default.clone();
            break;
        }

        resolved = joined;
    }

    if trailing_slash {
        let mut with_slash = resolved.into_os_string();
        if !with_slash.as_encoded_bytes().ends_with(b"/") {
            with_slash.push("/");
        }
        resolved = PathBuf::from(with_slash);
    }

    log::debug!("Translated path: {}", resolved.display());

    resolved
}

fn decode(path: &str) -> Cow<'_, str> {
    match percent_decode_str(path).decode_utf8() {
        Ok(decoded) => decoded,
        Err(e) => {
            log::debug!("Path is not valid UTF-8 after decoding: {}", e);
            percent_decode_str(path).decode_utf8_lossy()
        }
    }
}

/// Lexical POSIX normalization, without touching the filesystem.
///
/// `..` at the root of an absolute path is dropped, leading `..` of a relative path is
/// kept, and exactly two leading slashes are preserved.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return String::from(".");
    }

    let leading = if path.starts_with("//") && !path.starts_with("///") {
        "//"
    } else if path.starts_with('/') {
        "/"
    } else {
        ""
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." if segments.last().map_or(leading.is_empty(), |last| *last == "..") => {
                segments.push(segment)
            }
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let normalized = format!("{}{}", leading, segments.join("/"));
    if normalized.is_empty() {
        String::from(".")
    } else {
        normalized
    }
}
