//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use site_router::config::{parse_config, SiteConfig};
use site_router::http::SiteEndpoint;
use site_router::{HttpServer, SharedRoutes, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A server running on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub routes: Arc<SharedRoutes<SiteEndpoint>>,
    pub updates: mpsc::UnboundedSender<SiteConfig>,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// The site used by most tests: admin at `admin/`, application at the root,
/// no catch-all route.
pub fn site_config() -> SiteConfig {
    parse_config(
        r#"
        [listener]
        bind_address = "127.0.0.1:0"

        [[app.routes]]
        pattern = "items/{id:int}/"
        name = "item-detail"
        respond = { kind = "echo" }

        [[app.routes]]
        pattern = "old-items/{id:int}/"
        respond = { kind = "redirect", route = "item-detail" }

        [[app.routes]]
        pattern = "health/"
        name = "health"
        respond = { kind = "json", body = { ok = true }, status = 200 }

        [[app.routes]]
        pattern = "about/"
        respond = { kind = "text", body = "about us", status = 200 }
        "#,
    )
    .expect("test config is valid")
}

/// Start a server for `config` and wait until it accepts connections.
pub async fn start_server(config: SiteConfig) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).expect("routes build");
    let routes = server.routes();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        addr,
        routes,
        updates,
        shutdown,
    }
}

/// A client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
