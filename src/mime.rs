use std::path::Path;

/// Content-Type for a file, guessed from its extension.
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        // pacman
        Some("zst") => "application/zstd",
        Some("sig") => "application/pgp-signature",
        Some("db" | "files") => "application/octet-stream",
        Some("xz") => "application/x-xz",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",

        // text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("js") => "application/javascript",
        Some("json") => "application/json",

        // images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_files() {
        assert_eq!(
            content_type(Path::new("/cache/linux-6.1-1-x86_64.pkg.tar.zst")),
            "application/zstd"
        );
        assert_eq!(
            content_type(Path::new("/cache/linux-6.1-1-x86_64.pkg.tar.zst.sig")),
            "application/pgp-signature"
        );
        assert_eq!(
            content_type(Path::new("/sync/core.db")),
            "application/octet-stream"
        );
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(content_type(Path::new("INDEX.HTML")), "text/html; charset=utf-8");
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(content_type(Path::new("README")), "application/octet-stream");
        assert_eq!(content_type(Path::new("a.unknown")), "application/octet-stream");
        assert_eq!(content_type(Path::new("/srv/www/")), "application/octet-stream");
    }
}
