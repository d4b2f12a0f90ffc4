//! Common test utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum_extra::extract::cookie::Cookie;
use reqwest::Client;
use reqwest::header::{COOKIE, SET_COOKIE};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use tessera_server::{Server, ServerConfig};
use tessera_session::{Manager, ProviderRegistry};

/// A test server that runs in the background.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client configured for this server.
    pub client: Client,
    /// Cancels the server and its GC task.
    pub shutdown: CancellationToken,
    /// Handle to the server task.
    pub handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with a one hour session lifetime.
    pub async fn start() -> Result<Self> {
        Self::start_with_lifetime(3600).await
    }

    /// Start a new test server with the given session lifetime in seconds.
    pub async fn start_with_lifetime(max_lifetime_secs: u64) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let registry = ProviderRegistry::with_memory();
        let manager = Manager::new(&registry, "memory", "gosessionid", max_lifetime_secs)?;
        let config = ServerConfig::new()
            .with_bind_address(addr)
            .with_request_logging(false);

        let shutdown = CancellationToken::new();
        let server = Server::new(manager, config);
        let gc = server.state().manager.spawn_gc(shutdown.clone());

        let server_shutdown = shutdown.clone();
        let handle = tokio::spawn(async move {
            let _ = server.serve(listener, server_shutdown).await;
            let _ = gc.await;
        });

        let client = Client::new();
        wait_for_server(&client, addr).await?;

        Ok(Self {
            addr,
            client,
            shutdown,
            handle,
        })
    }

    /// Get the base URL for the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// GET `path`, optionally presenting a `name=value` cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<reqwest::Response> {
        let mut req = self.client.get(format!("{}{}", self.base_url(), path));
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        Ok(req.send().await?)
    }

    /// POST `path`, optionally presenting a `name=value` cookie.
    pub async fn post(&self, path: &str, cookie: Option<&str>) -> Result<reqwest::Response> {
        let mut req = self.client.post(format!("{}{}", self.base_url(), path));
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        Ok(req.send().await?)
    }

    /// Stop the server and wait for it to exit.
    pub async fn stop(self) -> Result<()> {
        self.shutdown.cancel();
        timeout(Duration::from_secs(5), self.handle).await??;
        Ok(())
    }
}

/// The cookie set by a response, decoded, if any.
pub fn response_cookie(resp: &reqwest::Response) -> Option<Cookie<'static>> {
    let header = resp.headers().get(SET_COOKIE)?.to_str().ok()?;
    Cookie::parse_encoded(header.to_string()).ok()
}

/// `Cookie` request header a browser sends back for `cookie`.
pub fn cookie_header(cookie: &Cookie<'_>) -> String {
    cookie.encoded().stripped().to_string()
}

/// Wait for the server to become ready.
async fn wait_for_server(client: &Client, addr: SocketAddr) -> Result<()> {
    let url = format!("http://{}/health", addr);

    let result = timeout(Duration::from_secs(5), async {
        loop {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return,
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    })
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!("Timeout waiting for server to start"),
    }
}
