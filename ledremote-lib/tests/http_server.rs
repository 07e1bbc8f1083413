//! End-to-end tests driving a live server over TCP.

use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::sync::Arc;

use ledremote_lib::server::Server;
use ledremote_lib::server::ServerConfig;
use ledremote_lib::server::GUI_HTML;
use ledremote_lib::status::AmbientRecord;
use ledremote_lib::status::FileStore;
use ledremote_lib::status::MemoryStore;
use ledremote_lib::status::Slot;
use ledremote_lib::status::StatusStore;
use ledremote_lib::Rgb;
use tokio_util::sync::CancellationToken;

struct TestServer {
    addr: SocketAddr,
    cancel: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(store: Arc<dyn StatusStore>, config: ServerConfig) -> Self {
        let config = config
            .with_bind(IpAddr::V4(Ipv4Addr::LOCALHOST))
            .with_port(0);
        let server = Server::bind(&config, store).await.expect("bind");
        let addr = server.local_addr();

        let cancel = CancellationToken::new();
        tokio::spawn(server.run_until_cancelled(cancel.clone()));

        Self {
            addr,
            cancel,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn get(&self, path: &str) -> (u16, String) {
        let response = self.client.get(self.url(path)).send().await.expect("GET");
        let status = response.status().as_u16();
        (status, response.text().await.expect("body"))
    }

    async fn post(&self, body: impl Into<reqwest::Body>) -> Result<(u16, String), reqwest::Error> {
        let response = self
            .client
            .post(self.url("/"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        Ok((status, response.text().await?))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("ledremote-it-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_connection_probe() {
    let server = TestServer::start(Arc::new(MemoryStore::new()), ServerConfig::default()).await;

    assert_eq!(server.get("/test_connection").await, (200, "ok".to_string()));
}

#[tokio::test]
async fn test_root_serves_gui() {
    let server = TestServer::start(Arc::new(MemoryStore::new()), ServerConfig::default()).await;

    let (status, body) = server.get("/").await;
    assert_eq!(status, 200);
    assert_eq!(body, GUI_HTML);

    let (status, body) = server.get("/?unknown=1").await;
    assert_eq!(status, 200);
    assert_eq!(body, GUI_HTML);
}

#[tokio::test]
async fn test_named_color_with_brightness_via_query() {
    let store = Arc::new(MemoryStore::new());
    let server = TestServer::start(store.clone(), ServerConfig::default()).await;

    let path = format!("/?rgb={}&brightness=100", urlencoding::encode("light blue"));
    assert_eq!(server.get(&path).await, (200, "ok".to_string()));

    let text = store.read(Slot::Ambient).await.unwrap().unwrap();
    let record = AmbientRecord::parse(&text).unwrap();
    assert_eq!(record.color, Rgb::new(0, 255, 255));
}

#[tokio::test]
async fn test_post_form_matches_query() {
    let store = Arc::new(MemoryStore::new());
    let server = TestServer::start(store.clone(), ServerConfig::default()).await;

    let response = server
        .client
        .post(server.url("/"))
        .form(&[("r", "255"), ("b", "255"), ("ai", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");

    let text = store.read(Slot::AmbientAi).await.unwrap().unwrap();
    assert!(text.starts_with("255 0 255\n"), "got {text:?}");
    assert!(store.read(Slot::Ambient).await.unwrap().is_none());
}

#[tokio::test]
async fn test_oversized_post_drops_connection() {
    let store = Arc::new(MemoryStore::new());
    let server = TestServer::start(store.clone(), ServerConfig::default()).await;

    let mut body = b"set_preferences=".to_vec();
    body.resize(1_000_001, b'x');

    let result = server.post(body).await;
    assert!(
        !matches!(result, Ok((200, ref text)) if text == "ok"),
        "oversized body was accepted"
    );
    assert!(store.read(Slot::Preferences).await.unwrap().is_none());

    // the server keeps serving other connections
    assert_eq!(server.get("/test_connection").await, (200, "ok".to_string()));
}

#[tokio::test]
async fn test_file_store_end_to_end() {
    let status_dir = temp_dir();
    let web_root = temp_dir();
    std::fs::create_dir_all(&web_root).unwrap();
    std::fs::write(web_root.join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();

    let store = Arc::new(FileStore::new(&status_dir));
    let config = ServerConfig::default().with_web_root(&web_root);
    let server = TestServer::start(store, config).await;

    server
        .post("add_notification=app1&rgb=1+2+3")
        .await
        .unwrap();
    server
        .post("add_notification=app1&rgb=4+5+6")
        .await
        .unwrap();
    server.post("set_preferences=mode%3Dpulse").await.unwrap();

    assert_eq!(
        std::fs::read_to_string(status_dir.join("notifications")).unwrap(),
        r#"[{"package":"app1","rgb":"4 5 6"}]"#
    );
    assert_eq!(server.get("/prefs").await, (200, "mode=pulse".to_string()));

    let response = server
        .client
        .get(server.url("/favicon.ico"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["content-type"], "image/x-icon");
    assert_eq!(response.bytes().await.unwrap().as_ref(), &[0u8, 0, 1, 0]);

    let _ = std::fs::remove_dir_all(status_dir);
    let _ = std::fs::remove_dir_all(web_root);
}
