//! HTTP shell: every `GET` is answered with a freshly generated animation.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;

use axum::extract::rejection::QueryRejection;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri, Version};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::animation::generate;
use crate::config::Limits;
use crate::encode::MIME_TYPE;
use crate::error::LissajousError;
use crate::params::{first_values, resolve, AnimationConfig};

#[derive(Debug, Clone, Copy)]
struct AppState {
    limits: Limits,
}

/// Build the router. Any path is accepted; only the query string matters.
pub fn router(limits: Limits) -> Router {
    Router::new()
        .route("/", get(lissajous))
        .route("/{*path}", get(lissajous))
        .with_state(AppState { limits })
}

/// Serve on `listener` until Ctrl-C is received.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve(listener: TcpListener, limits: Limits) -> Result<(), LissajousError> {
    serve_with_shutdown(listener, limits, shutdown_signal()).await
}

/// Serve on `listener` until `signal` resolves.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    limits: Limits,
    signal: F,
) -> Result<(), LissajousError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, ?limits, "listening");
    axum::serve(listener, router(limits).into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(signal)
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn lissajous(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(pairs)) => first_values(pairs),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable query string, using defaults");
            HashMap::new()
        }
    };
    log_request(&method, &uri, version, &headers, remote, &params);

    let config = resolve(&params);
    tracing::info!(?config, "resolved configuration");

    match render(config, state.limits).await {
        Ok(body) => ([(header::CONTENT_TYPE, MIME_TYPE)], body).into_response(),
        Err(e) => error_response(&e),
    }
}

fn log_request(
    method: &Method,
    uri: &Uri,
    version: Version,
    headers: &HeaderMap,
    remote: SocketAddr,
    params: &HashMap<String, String>,
) {
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok()).unwrap_or_default();
    tracing::info!(%method, %uri, ?version, host, %remote, "request");
    for (name, value) in headers {
        tracing::debug!(header = %name, ?value, "request header");
    }
    for (key, value) in params {
        tracing::debug!(%key, %value, "query parameter");
    }
}

async fn render(config: AnimationConfig, limits: Limits) -> Result<Vec<u8>, LissajousError> {
    limits.check(&config)?;
    tokio::task::spawn_blocking(move || {
        let mut body = Vec::new();
        let summary = generate(&config, &mut body)?;
        tracing::info!(
            frames = summary.frames,
            side = summary.side,
            freq = summary.frequency_ratio,
            bytes = body.len(),
            "animation generated"
        );
        Ok::<_, LissajousError>(body)
    })
    .await
    .map_err(|e| LissajousError::Io(std::io::Error::other(e)))?
}

fn error_response(err: &LissajousError) -> Response {
    let status = if err.is_client_error() {
        tracing::warn!(error = %err, "rejected request");
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!(error = %err, "generation failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::tests::loop_count;

    async fn spawn_server(limits: Limits) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_with_shutdown(listener, limits, std::future::pending()));
        addr
    }

    fn frame_count(bytes: &[u8]) -> (u16, usize) {
        let mut decoder = gif::DecodeOptions::new().read_info(bytes).unwrap();
        let side = decoder.width();
        let mut frames = 0;
        while decoder.read_next_frame().unwrap().is_some() {
            frames += 1;
        }
        (side, frames)
    }

    #[tokio::test]
    async fn serves_gif_from_query() {
        let addr = spawn_server(Limits::default()).await;
        let resp = reqwest::get(format!("http://{addr}/?cycles=2&size=10&nframes=3&delay=4"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(resp.headers()[reqwest::header::CONTENT_TYPE], "image/gif");

        let body = resp.bytes().await.unwrap();
        assert_eq!(frame_count(&body), (21, 3));
        assert_eq!(loop_count(&body), Some(3));
    }

    #[tokio::test]
    async fn any_path_is_served() {
        let addr = spawn_server(Limits::default()).await;
        let resp = reqwest::get(format!("http://{addr}/some/where?size=5&nframes=2"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body = resp.bytes().await.unwrap();
        assert_eq!(frame_count(&body), (11, 2));
    }

    #[tokio::test]
    async fn zero_size_uses_default_canvas() {
        let addr = spawn_server(Limits::default()).await;
        let resp = reqwest::get(format!("http://{addr}/?size=0&nframes=1&res=0.01"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body = resp.bytes().await.unwrap();
        assert_eq!(frame_count(&body), (201, 1));
    }

    #[tokio::test]
    async fn over_limit_is_bad_request() {
        let limits = Limits { max_frames: 2, ..Limits::default() };
        let addr = spawn_server(limits).await;
        let resp = reqwest::get(format!("http://{addr}/?size=5&nframes=3")).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let text = resp.text().await.unwrap();
        assert!(text.contains("nframes 3 is larger than 2"), "{text}");
    }

    #[tokio::test]
    async fn too_many_pixels_is_bad_request() {
        let addr = spawn_server(Limits::default()).await;
        let resp =
            reqwest::get(format!("http://{addr}/?size=2000&nframes=1000&cycles=0.0001"))
                .await
                .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(resp.text().await.unwrap().contains("pixels requested"));
    }

    #[tokio::test]
    async fn frame_count_beyond_gif_is_bad_request() {
        let addr = spawn_server(Limits::default()).await;
        let resp = reqwest::get(format!("http://{addr}/?size=5&nframes=70000")).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let text = resp.text().await.unwrap();
        assert!(text.contains("nframes 70000 is larger than 1000"), "{text}");
    }

    #[tokio::test]
    async fn repeated_key_uses_first_value() {
        let addr = spawn_server(Limits::default()).await;
        let resp = reqwest::get(format!("http://{addr}/?size=10&size=20&nframes=1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body = resp.bytes().await.unwrap();
        assert_eq!(frame_count(&body), (21, 1));
    }

    #[tokio::test]
    async fn oversized_canvas_is_bad_request() {
        let limits = Limits { max_size: 100_000, max_pixels: u64::MAX, ..Limits::default() };
        let addr = spawn_server(limits).await;
        let resp =
            reqwest::get(format!("http://{addr}/?size=40000&nframes=1&cycles=0.001&res=0.1"))
                .await
                .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(resp.text().await.unwrap().contains("exceeds the GIF limit"));
    }

    #[test]
    fn encoding_failures_are_server_errors() {
        let err = LissajousError::Io(std::io::Error::other("broken pipe"));
        assert_eq!(error_response(&err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
