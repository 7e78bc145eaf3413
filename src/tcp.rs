use crate::err::{AppliesTo, IoErrorExt};
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

/// Bind to the first address that works.
pub async fn bind(addrs: &[SocketAddr]) -> Result<TcpListener, io::Error> {
    let mut last_error = None;
    for addr in addrs {
        log::debug!("Binding to: {}", addr);
        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                log::warn!("Failed to bind to {}: {}", addr, e);
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "No addresses to bind to")
    }))
}

pub async fn accept(listener: &mut TcpListener) -> Result<TcpStream, io::Error> {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(e) => match e.applies_to() {
                AppliesTo::Connection => log::debug!("Aborted connection dropped: {}", e),
                AppliesTo::Listener => return Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_skips_unusable_addresses() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken_addr = taken.local_addr().unwrap();
        let free_addr: SocketAddr = "127.0.0.1:0".parse().unwrap();

        let listener = bind(&[taken_addr, free_addr]).await.unwrap();
        assert_ne!(listener.local_addr().unwrap(), taken_addr);
    }

    #[tokio::test]
    async fn bind_with_no_addresses() {
        let err = bind(&[]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AddrNotAvailable);
    }

    #[tokio::test]
    async fn accept_sets_nodelay() {
        let mut listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _client = TcpStream::connect(addr).await.unwrap();

        let stream = accept(&mut listener).await.unwrap();
        assert!(stream.nodelay().unwrap());
    }
}
