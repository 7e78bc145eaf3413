use crate::tcp;
use hyper::body::{Body, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve every accepted connection on its own task until the listener fails.
pub async fn run_simple_server<S, F, B>(
    mut listener: TcpListener,
    state: S,
    handle_req: F,
) -> Result<(), io::Error>
where
    S: Send + Sync + 'static,
    F: for<'s> ServiceFn<'s, Request<Incoming>, S, Response<B>> + Copy + Send + 'static,
    B: Body + Send + 'static,
    <B as Body>::Data: Send,
    <B as Body>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let state = Arc::new(state);

    loop {
        let tcp = tcp::accept(&mut listener).await?;
        let peer = tcp.peer_addr().ok();
        let io = TokioIo::new(tcp);

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let serve = service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(handle_req(req, &state).await) }
            });

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(io, serve)
                .await
            {
                match peer {
                    Some(peer) => log::error!("Error serving connection from {}: {}", peer, e),
                    None => log::error!("Error serving connection: {}", e),
                }
            }
        });
    }
}

// The handler's future borrows the shared state, so its bound needs a lifetime tied to
// that borrow: `for<'s> FnOnce(Request, &'s S) -> Fut<'s>`. That can't be written
// directly, so the function and future bounds live together in this trait instead.
pub trait ServiceFn<'s, T, S, R>
where
    Self: FnOnce(T, &'s S) -> Self::Fut,
    Self::Fut: Future<Output = R> + Send + 's,
    S: 's,
{
    type Fut;
}

impl<'s, T, S, R, F, Fut> ServiceFn<'s, T, S, R> for F
where
    F: FnOnce(T, &'s S) -> Fut,
    Fut: Future<Output = R> + Send + 's,
    S: 's,
{
    type Fut = Fut;
}
