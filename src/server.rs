//! Loopback HTTP listener hosting the callback page.
//!
//! Runs a minimal local server so the login redirect has somewhere to land.
//! Each accepted connection is one page load: the processor runs once and the
//! response carries the acknowledgment card plus the follow-on redirect.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::callback::{CallbackProcessor, Navigator, Notifier, TokenStore, LOGIN_PATH};
use crate::config::AppConfig;

const BAD_REQUEST_HTML: &str = "<html><body><h1>400 Bad Request</h1></body></html>";
const NOT_FOUND_HTML: &str = "<html><body><h1>404 Not Found</h1></body></html>";
const SERVER_ERROR_HTML: &str =
    "<html><body><h1>500 Internal Server Error</h1></body></html>";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct CallbackServer {
    listener: TcpListener,
    callback_path: String,
}

impl CallbackServer {
    pub async fn bind(config: &AppConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind((config.bind_addr.as_str(), config.port)).await?;
        info!(addr = %listener.local_addr()?, "callback listener bound");
        Ok(Self {
            listener,
            callback_path: config.callback_path.clone(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve page loads until the process is stopped. Every connection is an
    /// independent one-shot callback run.
    pub async fn run(self, store: Arc<dyn TokenStore + Send + Sync>) -> Result<(), ServerError> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            debug!(%peer, "connection accepted");
            if let Err(err) = handle_connection(stream, &self.callback_path, store.as_ref()).await {
                warn!("callback request failed: {err}");
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    callback_path: &str,
    store: &(dyn TokenStore + Send + Sync),
) -> Result<(), ServerError> {
    let mut buffer = vec![0u8; 8192];
    let n = stream.read(&mut buffer).await?;
    let request = String::from_utf8_lossy(&buffer[..n]);

    let Some((method, target)) = parse_request_line(&request) else {
        return write_response(&mut stream, "400 Bad Request", BAD_REQUEST_HTML).await;
    };

    // The target is origin-form; parse it against a throwaway base to split
    // the path from the raw query.
    let Ok(url) = Url::parse(&format!("http://localhost{target}")) else {
        return write_response(&mut stream, "400 Bad Request", BAD_REQUEST_HTML).await;
    };

    if method != "GET" || url.path() != callback_path {
        debug!(method, path = url.path(), "ignoring request off the callback path");
        return write_response(&mut stream, "404 Not Found", NOT_FOUND_HTML).await;
    }

    let mut notifier = PageNotifier::default();
    let mut navigator = PageNavigator::default();
    let processor = CallbackProcessor::new(store, &mut notifier, &mut navigator);

    match processor.process(url.query().unwrap_or("")) {
        Ok(outcome) => {
            info!(?outcome, "callback processed");
            let message = notifier.message.unwrap_or_default();
            let target = navigator.target.unwrap_or_else(|| LOGIN_PATH.to_string());
            let body = acknowledgment_page(&message, &target);
            write_response(&mut stream, "200 OK", &body).await
        }
        Err(err) => {
            error!("callback processing aborted: {err}");
            write_response(&mut stream, "500 Internal Server Error", SERVER_ERROR_HTML).await
        }
    }
}

fn parse_request_line(request: &str) -> Option<(&str, &str)> {
    let first = request.lines().next()?;
    let mut parts = first.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    Some((method, target))
}

/// The user-facing acknowledgment: the message the original page showed in an
/// alert, followed by the navigation it performed.
fn acknowledgment_page(message: &str, redirect: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="1;url={redirect}">
    <title>네이버 로그인</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
               display: flex; justify-content: center; align-items: center; height: 100vh;
               margin: 0; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }}
        .card {{ background: white; padding: 40px; border-radius: 16px; text-align: center;
                box-shadow: 0 10px 40px rgba(0,0,0,0.2); }}
        p {{ color: #333; }}
    </style>
</head>
<body>
    <div class="card">
        <p>{message}</p>
        <p><a href="{redirect}">계속하기</a></p>
    </div>
</body>
</html>"#
    )
}

async fn write_response(
    stream: &mut TcpStream,
    status: &str,
    body: &str,
) -> Result<(), ServerError> {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

#[derive(Default)]
struct PageNotifier {
    message: Option<String>,
}

impl Notifier for PageNotifier {
    fn notify(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }
}

#[derive(Default)]
struct PageNavigator {
    target: Option<String>,
}

impl Navigator for PageNavigator {
    fn go_to(&mut self, path: &str) {
        self.target = Some(path.to_string());
    }
}
