use futures::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::StreamBody;
use http_body_util::{BodyExt, Empty};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

pub fn empty<E>() -> BoxBody<Bytes, E> {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

pub fn from_file(file: File) -> BoxBody<Bytes, io::Error> {
    let stream = ReaderStream::with_capacity(file, 64 * 1024);
    StreamBody::new(stream.map_ok(Frame::data)).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_body_streams_whole_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("big.pkg.tar.zst");
        let contents = vec![7u8; 200 * 1024];
        std::fs::write(&path, &contents).unwrap();

        let body = from_file(File::open(&path).await.unwrap());
        let collected = body.collect().await.unwrap().to_bytes();

        assert_eq!(collected.len(), contents.len());
        assert_eq!(&collected[..], &contents[..]);
    }

    #[tokio::test]
    async fn empty_body() {
        let collected = empty::<io::Error>().collect().await.unwrap().to_bytes();
        assert!(collected.is_empty());
    }
}
