//! Dispatch over HTTP against a running server.

use std::time::Duration;

use reqwest::StatusCode;
use rule_router::config::parse_config;
use rule_router::dispatch::{HandlerError, HandlerRegistry, Reply};
use rule_router::http::{HttpServer, ServerError};
use rule_router::routing::{Params, RouteTarget};

mod common;

#[tokio::test]
async fn test_dispatches_rule_with_params() {
    let server = common::start(HttpServer::new(common::blog_config()).unwrap()).await;
    let client = common::client();

    let res = client.get(server.url("/article/my-post")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "article my-post");

    let res = client.get(server.url("/user/42/post/7")).send().await.unwrap();
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.text().await.unwrap(), r#"{"user":"42","post":"7"}"#);

    server.stop().await;
}

#[tokio::test]
async fn test_unmatched_path_uses_default() {
    let server = common::start(HttpServer::new(common::blog_config()).unwrap()).await;
    let client = common::client();

    for path in ["/", "/unknown/path", "/article/a/b", "/article/x?page=2"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "path {path}");
        let body = res.text().await.unwrap();
        if path == "/article/x?page=2" {
            assert_eq!(body, "article x");
        } else {
            assert_eq!(body, "home", "path {path}");
        }
    }

    server.stop().await;
}

#[tokio::test]
async fn test_any_method_is_routed() {
    let server = common::start(HttpServer::new(common::blog_config()).unwrap()).await;

    let res = common::client()
        .post(server.url("/article/posted"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "article posted");

    server.stop().await;
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = common::start(HttpServer::new(common::blog_config()).unwrap()).await;

    let res = common::client()
        .get(server.url("/"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-123");

    server.stop().await;
}

#[tokio::test]
async fn test_mount_prefix_is_stripped() {
    let mut config = common::blog_config();
    config.listener.mount_prefix = "/blog".into();
    let server = common::start(HttpServer::new(config).unwrap()).await;

    let res = common::client()
        .get(server.url("/blog/article/mounted"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "article mounted");

    server.stop().await;
}

#[tokio::test]
async fn test_missing_handler_fails_at_startup() {
    let config = parse_config(
        r#"
        [routing]
        default = { controller = "Home", action = "index" }

        [[routing.rules]]
        pattern = "/x"
        controller = "Nowhere"
        action = "run"
        "#,
    )
    .unwrap();

    let err = HttpServer::new(config).err().unwrap();
    let message = err.to_string();
    assert!(message.contains("Nowhere::run"), "{message}");
    assert!(message.contains("Home::index"), "{message}");
}

#[test]
fn test_broken_body_template_fails_startup() {
    let mut config = common::blog_config();
    config.handlers[1].body = "article {{ slug".into();

    let err = HttpServer::new(config).err().unwrap();
    assert!(matches!(err, ServerError::Template(_)), "{err}");
    assert!(err.to_string().contains("Article::show"), "{err}");
}

#[tokio::test]
async fn test_code_handlers_and_error_target() {
    let mut config = common::blog_config();
    config.routing.error = Some(RouteTarget::new("Error", "show"));
    config.routing.rules.push(rule_router::config::RuleConfig {
        pattern: "/fail/:why".into(),
        controller: "Fail".into(),
        action: "run".into(),
    });

    let mut handlers = HandlerRegistry::new();
    handlers
        .register(RouteTarget::new("Fail", "run"), |params: &Params| -> Result<Reply, HandlerError> {
            Err(HandlerError::Failed(params.values().collect::<Vec<_>>().join(",")))
        })
        .register(RouteTarget::new("Error", "show"), |_: &Params| -> Result<Reply, HandlerError> {
            Ok(Reply::new(503, "try later"))
        });

    let server = common::start(HttpServer::with_handlers(config, handlers).unwrap()).await;

    let res = common::client().get(server.url("/fail/db")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.text().await.unwrap(), "try later");

    server.stop().await;
}

#[tokio::test]
async fn test_handler_failure_without_error_target() {
    let mut config = common::blog_config();
    config.routing.rules.insert(
        0,
        rule_router::config::RuleConfig {
            pattern: "/boom".into(),
            controller: "Boom".into(),
            action: "run".into(),
        },
    );

    let mut handlers = HandlerRegistry::new();
    handlers.register(RouteTarget::new("Boom", "run"), |_: &Params| -> Result<Reply, HandlerError> {
        Err(HandlerError::Failed("boom".into()))
    });

    let server = common::start(HttpServer::with_handlers(config, handlers).unwrap()).await;

    let res = common::client().get(server.url("/boom")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    server.stop().await;
}

#[tokio::test]
async fn test_config_reload_swaps_routes() {
    let server = common::start(HttpServer::new(common::blog_config()).unwrap()).await;
    let client = common::client();

    let res = client.get(server.url("/about")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "home");

    let mut config = common::blog_config();
    config.routing.rules.push(rule_router::config::RuleConfig {
        pattern: "/about".into(),
        controller: "About".into(),
        action: "index".into(),
    });
    config.handlers.push(
        parse_config(
            r#"
            [routing]
            default = { controller = "About", action = "index" }

            [[handlers]]
            controller = "About"
            action = "index"
            body = "about us"
            "#,
        )
        .unwrap()
        .handlers
        .remove(0),
    );
    server.config_updates.send(config).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let res = client.get(server.url("/about")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "about us");

    // A reload that leaves a target without a handler is rejected.
    let mut broken = common::blog_config();
    broken.routing.rules.insert(
        0,
        rule_router::config::RuleConfig {
            pattern: "/about".into(),
            controller: "Missing".into(),
            action: "index".into(),
        },
    );
    server.config_updates.send(broken).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let res = client.get(server.url("/about")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "about us");

    server.stop().await;
}
