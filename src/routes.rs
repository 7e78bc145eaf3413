use crate::body;
use crate::err::IoErrorExt;
use crate::mime;
use crate::resolve::{resolve, RootSet};
use headers::{ContentLength, HeaderMapExt, IfModifiedSince, LastModified};
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE, IF_NONE_MATCH, LOCATION};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Request, Response, StatusCode};
use std::fmt::Display;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

pub struct State {
    pub roots: RootSet,
}

pub async fn respond_to_request(
    req: Request<Incoming>,
    state: &State,
) -> Response<BoxBody<Bytes, io::Error>> {
    // request bodies are never read
    let (parts, _) = req.into_parts();
    respond(&parts, state).await
}

async fn respond(req: &Parts, state: &State) -> Response<BoxBody<Bytes, io::Error>> {
    if log::log_enabled!(log::Level::Debug) {
        log::debug!(
            "{} {}\n--- Header start ---\n{}--- Header end ---",
            req.method,
            req.uri,
            format_headers(&req.headers)
        );
    }

    let head_only = match req.method {
        Method::GET => false,
        Method::HEAD => true,
        _ => return status(req, StatusCode::NOT_IMPLEMENTED, "unsupported method"),
    };

    let raw_path = req.uri.path_and_query().map_or("/", |p| p.as_str());
    let path = resolve(raw_path, &state.roots);

    let metadata = match fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) => return file_error(req, &path, e),
    };

    let (path, metadata) = if metadata.is_dir() {
        if !req.uri.path().ends_with('/') {
            return redirect_to_dir(req);
        }
        match find_index(&path).await {
            Some(index) => index,
            None => return status(req, StatusCode::NOT_FOUND, "no index file"),
        }
    } else {
        (path, metadata)
    };

    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => return file_error(req, &path, e),
    };

    let modified = metadata.modified().ok();
    let not_modified = match (modified, req.headers.typed_get::<IfModifiedSince>()) {
        // If-None-Match takes precedence, and there are no etags to compare it against
        (Some(modified), Some(since)) if !req.headers.contains_key(IF_NONE_MATCH) => {
            !since.is_modified(modified)
        }
        _ => false,
    };
    if not_modified {
        return status(req, StatusCode::NOT_MODIFIED, path.display());
    }

    log::info!(
        "{} {} -> {} [{} bytes]",
        req.method,
        req.uri,
        path.display(),
        metadata.len()
    );
    let mut resp = Response::new(if head_only {
        body::empty()
    } else {
        body::from_file(file)
    });
    let headers = resp.headers_mut();
    headers.typed_insert(ContentLength(metadata.len()));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(mime::content_type(&path)),
    );
    if let Some(modified) = modified {
        headers.typed_insert(LastModified::from(modified));
    }
    resp
}

/// Index files are looked up without following links.
async fn find_index(dir: &Path) -> Option<(PathBuf, Metadata)> {
    for name in INDEX_FILES {
        let candidate = dir.join(name);
        match fs::symlink_metadata(&candidate).await {
            Ok(metadata) if metadata.is_file() => return Some((candidate, metadata)),
            _ => {}
        }
    }
    None
}

fn redirect_to_dir(req: &Parts) -> Response<BoxBody<Bytes, io::Error>> {
    let location = match req.uri.query() {
        Some(query) => format!("{}/?{}", req.uri.path(), query),
        None => format!("{}/", req.uri.path()),
    };
    let mut resp = status(req, StatusCode::MOVED_PERMANENTLY, &location);
    if let Ok(location) = HeaderValue::from_str(&location) {
        resp.headers_mut().insert(LOCATION, location);
    }
    resp
}

fn file_error(req: &Parts, path: &Path, e: io::Error) -> Response<BoxBody<Bytes, io::Error>> {
    status(
        req,
        e.file_status(),
        format_args!("{} : {}", path.display(), e),
    )
}

fn status(
    req: &Parts,
    status: StatusCode,
    detail: impl Display,
) -> Response<BoxBody<Bytes, io::Error>> {
    log::info!("{} {} -> [{}] {}", req.method, req.uri, status, detail);
    let mut resp = Response::new(body::empty());
    *resp.status_mut() = status;
    resp
}

fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}\n", name, String::from_utf8_lossy(value.as_bytes())))
        .collect()
}
