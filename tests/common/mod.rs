//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use rule_router::config::{parse_config, RouterConfig};
use rule_router::http::HttpServer;
use rule_router::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// The blog routing table used across tests.
pub const BLOG_CONFIG: &str = r#"
[routing]
default = { controller = "Home", action = "index" }

[[routing.rules]]
pattern = "/"
controller = "Home"
action = "index"

[[routing.rules]]
pattern = "/article/:slug"
controller = "Article"
action = "show"

[[routing.rules]]
pattern = "/user/:id/post/:postId"
controller = "Post"
action = "show"

[[handlers]]
controller = "Home"
action = "index"
body = "home"

[[handlers]]
controller = "Article"
action = "show"
body = "article {{ slug }}"
arity = 1

[[handlers]]
controller = "Post"
action = "show"
content_type = "application/json"
body = '{"user":"{{ params[0] }}","post":"{{ postId }}"}'
"#;

pub fn blog_config() -> RouterConfig {
    parse_config(BLOG_CONFIG).expect("blog config is valid")
}

/// A running server and the handles to control it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub config_updates: mpsc::UnboundedSender<RouterConfig>,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Start `server` on an ephemeral local port.
pub async fn start(server: HttpServer) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, rx, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        config_updates,
        handle,
    }
}

/// Client without connection pooling, so servers can shut down promptly.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
