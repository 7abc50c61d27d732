//! End-to-end tests over real sockets

use lantern::config::Config;
use lantern::server::listener::serve;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start_server() -> (SocketAddr, TempDir) {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::create_dir(root.path().join("dir")).unwrap();
    std::fs::write(root.path().join("dir").join("index.html"), "<p>dir</p>").unwrap();
    std::fs::write(root.path().join("logo.png"), [0x89u8, b'P', b'N', b'G']).unwrap();

    let mut cfg = Config::default();
    cfg.static_files.doc_root = root.path().to_path_buf();
    cfg.server.idle_timeout_ms = 300;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Arc::new(cfg)));

    (addr, root)
}

async fn exchange(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    out
}

#[tokio::test]
async fn test_serves_file_with_headers() {
    let (addr, _root) = start_server().await;

    let out = exchange(addr, b"GET /logo.png HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
    let head_end = out.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
    let head = std::str::from_utf8(&out[..head_end]).unwrap();

    let mut lines = head.split("\r\n");
    assert_eq!(lines.next(), Some("HTTP/1.1 200 OK"));
    let keys: Vec<&str> = lines.map(|l| l.split(':').next().unwrap()).collect();
    assert_eq!(
        keys,
        vec!["Connection", "Content-Length", "Content-Type", "Date", "Last-Modified"]
    );
    assert!(head.contains("Content-Type: image/png"));
    assert!(head.contains("Content-Length: 4"));
    assert_eq!(&out[head_end + 4..], &[0x89u8, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_directory_index_and_slash_rules() {
    let (addr, _root) = start_server().await;

    let out = exchange(addr, b"GET /dir/ HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(out.ends_with("<p>dir</p>"));

    let out = exchange(addr, b"GET /dir HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[tokio::test]
async fn test_traversal_is_not_found() {
    let (addr, _root) = start_server().await;

    let out = exchange(
        addr,
        b"GET /../../../../etc/passwd HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(String::from_utf8(out).unwrap().starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[tokio::test]
async fn test_bad_version_closes_connection() {
    let (addr, _root) = start_server().await;

    let out = exchange(addr, b"GET / HTTP/1.0\r\nHost: test\r\n\r\n").await;
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("HTTP/1.1 400 Bad Request\r\nConnection: close\r\nDate: "));
}

#[tokio::test]
async fn test_concurrent_connections_are_independent() {
    let (addr, _root) = start_server().await;

    // Holds a partial request open while other clients are served.
    let mut slow = TcpStream::connect(addr).await.unwrap();
    slow.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        tasks.push(tokio::spawn(exchange(
            addr,
            b"GET / HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
        )));
    }
    for task in tasks {
        let out = String::from_utf8(task.await.unwrap()).unwrap();
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(out.ends_with("<h1>home</h1>"));
    }

    let mut out = Vec::new();
    slow.read_to_end(&mut out).await.unwrap();
    assert!(String::from_utf8(out).unwrap().starts_with("HTTP/1.1 400 Bad Request\r\n"));
}
