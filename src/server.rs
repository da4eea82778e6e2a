//! HTTP endpoint serving CSV downloads.
//!
//! Every `GET /download` performs its own fetch from the configured source
//! and returns the full, unfiltered series. Dashboard state (date range,
//! pause) never affects the download.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use metricwatch::{HttpSource, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = Arc::new(HttpSource::new("http://localhost:8080/data")?);
//!     let listener = server::bind("0.0.0.0:8000").await?;
//!     server::serve(listener, source).await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::export::to_csv;
use crate::source::SampleSource;

/// Default listen address for the download endpoint.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Path of the CSV download.
pub const DOWNLOAD_PATH: &str = "/download";

// Must name CSV_FILENAME.
const DOWNLOAD_DISPOSITION: &str = "attachment; filename=metrics.csv";

/// Bind the listener. Separate from [`serve`] so callers learn about bind
/// failures before starting the UI.
pub async fn bind(addr: &str) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    if let Ok(local) = listener.local_addr() {
        info!(addr = %local, "export endpoint listening");
    }
    Ok(listener)
}

/// Accept connections forever, serving each on its own task.
pub async fn serve(listener: TcpListener, source: Arc<dyn SampleSource>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let source = source.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let source = source.clone();
                async move { handle_request(req, source.as_ref()).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(%peer, error = %e, "connection error");
            }
        });
    }
}

async fn handle_request<B>(
    req: Request<B>,
    source: &dyn SampleSource,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path();

    let response = match (req.method(), path) {
        (&Method::GET, DOWNLOAD_PATH) => download(source).await,
        (_, DOWNLOAD_PATH) => text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
        (&Method::GET, "/health" | "/healthz") => text(StatusCode::OK, "OK"),
        _ => text(StatusCode::NOT_FOUND, "Not Found"),
    };

    Ok(response)
}

async fn download(source: &dyn SampleSource) -> Response<Full<Bytes>> {
    match source.fetch().await {
        Ok(series) => {
            info!(samples = series.len(), "serving csv export");
            let mut response = Response::new(Full::new(Bytes::from(to_csv(&series))));
            let headers = response.headers_mut();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv"));
            headers.insert(
                CONTENT_DISPOSITION,
                HeaderValue::from_static(DOWNLOAD_DISPOSITION),
            );
            response
        }
        Err(e) => {
            warn!(error = %e, source = source.description(), "csv export fetch failed");
            text(StatusCode::BAD_GATEWAY, &format!("Upstream fetch failed: {}", e))
        }
    }
}

fn text(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleSeries;
    use crate::error::FetchError;
    use crate::export::{CSV_FILENAME, CSV_HEADER};
    use async_trait::async_trait;
    use std::net::SocketAddr;

    #[derive(Debug)]
    struct FixedSource(Option<&'static str>);

    #[async_trait]
    impl SampleSource for FixedSource {
        async fn fetch(&self) -> Result<SampleSeries, FetchError> {
            match self.0 {
                Some(json) => SampleSeries::from_json_slice(json.as_bytes()),
                None => Err(FetchError::Connection("refused".to_string())),
            }
        }

        fn description(&self) -> &str {
            "fixed"
        }
    }

    const INPUT: &str = r#"[
        {"time": "2024-01-01T00:05:00Z", "cpu": 5, "memory": 3},
        {"time": "2024-01-01T00:00:00Z", "cpu": 1, "memory": 2}
    ]"#;

    async fn start(source: FixedSource) -> SocketAddr {
        let listener = bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, Arc::new(source)));
        addr
    }

    #[test]
    fn test_disposition_matches_filename() {
        assert!(DOWNLOAD_DISPOSITION.ends_with(CSV_FILENAME));
    }

    #[tokio::test]
    async fn test_download_returns_csv_attachment() {
        let addr = start(FixedSource(Some(INPUT))).await;
        let response = reqwest::get(format!("http://{}/download", addr)).await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=metrics.csv"
        );

        let body = response.text().await.unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec![
                CSV_HEADER,
                "2024-01-01T00:00:00Z,1,2",
                "2024-01-01T00:05:00Z,5,3"
            ]
        );
    }

    #[tokio::test]
    async fn test_download_upstream_failure_is_bad_gateway() {
        let addr = start(FixedSource(None)).await;
        let response = reqwest::get(format!("http://{}/download", addr)).await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
        let body = response.text().await.unwrap();
        assert!(body.contains("Upstream fetch failed"));
        assert!(!body.contains(CSV_HEADER));
    }

    #[tokio::test]
    async fn test_health_and_not_found() {
        let addr = start(FixedSource(Some("[]"))).await;

        let health = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(health.status(), reqwest::StatusCode::OK);

        let missing = reqwest::get(format!("http://{}/nope", addr)).await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_rejects_post() {
        let addr = start(FixedSource(Some("[]"))).await;
        let response = reqwest::Client::new()
            .post(format!("http://{}/download", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }
}
