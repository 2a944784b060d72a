//! Integration Tests for the TCP protocol
//!
//! Runs a real server on an ephemeral port and drives it like a client would.

use std::time::Duration;

use mini_cache::cache::CacheStore;
use mini_cache::{serve, ServerState};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

const MAX_MESSAGE_SIZE: usize = 1024;

// == Helper Functions ==

async fn start_server(max_entries: usize) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = ServerState::new(CacheStore::new(max_entries), MAX_MESSAGE_SIZE);

    tokio::spawn(serve(listener, state, std::future::pending::<()>()));
    addr
}

struct Client {
    stream: BufReader<TcpStream>,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        Self {
            stream: BufReader::new(stream),
        }
    }

    async fn send(&mut self, data: &[u8]) {
        self.stream.get_mut().write_all(data).await.unwrap();
    }

    async fn read_line(&mut self) -> String {
        let mut line = Vec::new();
        self.stream.read_until(b'\n', &mut line).await.unwrap();
        String::from_utf8(line).unwrap()
    }

    async fn read_exact(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.stream.read_exact(&mut buf).await.unwrap();
        buf
    }

    async fn set(&mut self, key: &str, ttl: u64, payload: &[u8]) -> String {
        self.send(format!("set {} {} {}\r\n", key, ttl, payload.len()).as_bytes())
            .await;
        let prompt = self.read_line().await;
        assert_eq!(
            prompt,
            format!("Send {} bytes, terminated with \\r\\n.\r\n", payload.len())
        );

        let mut framed = payload.to_vec();
        framed.extend_from_slice(b"\r\n");
        self.send(&framed).await;
        self.read_line().await
    }

    // Returns the value of a hit, or None on NOT_FOUND.
    async fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        self.send(format!("get {}\r\n", key).as_bytes()).await;
        let header = self.read_line().await;
        if header == "NOT_FOUND\r\n" {
            return None;
        }

        let len: usize = header.trim_end().parse().unwrap();
        let body = self.read_exact(len + 2).await;
        assert_eq!(&body[len..], b"\r\n");
        Some(body[..len].to_vec())
    }

    async fn del(&mut self, key: &str) -> String {
        self.send(format!("del {}\r\n", key).as_bytes()).await;
        self.read_line().await
    }

    // True once the server has closed the connection.
    async fn is_closed(&mut self) -> bool {
        let mut buf = [0u8; 1];
        matches!(
            tokio::time::timeout(Duration::from_secs(5), self.stream.read(&mut buf)).await,
            Ok(Ok(0)) | Ok(Err(_))
        )
    }
}

// == Command Scenarios ==

#[tokio::test]
async fn test_get_missing() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    client.send(b"get missing\r\n").await;
    assert_eq!(client.read_line().await, "NOT_FOUND\r\n");
}

#[tokio::test]
async fn test_set_get_raw_bytes() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    client.send(b"set a 0 3\r\n").await;
    assert_eq!(
        client.read_line().await,
        "Send 3 bytes, terminated with \\r\\n.\r\n"
    );
    client.send(b"abc\r\n").await;
    assert_eq!(client.read_line().await, "SUCCESS\r\n");

    client.send(b"get a\r\n").await;
    assert_eq!(client.read_exact(8).await, b"3\r\nabc\r\n");
}

#[tokio::test]
async fn test_overwrite_replaces_value() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    assert_eq!(client.set("a", 0, b"abc").await, "SUCCESS\r\n");
    assert_eq!(client.set("a", 0, b"X").await, "SUCCESS\r\n");

    client.send(b"get a\r\n").await;
    assert_eq!(client.read_exact(6).await, b"1\r\nX\r\n");
}

#[tokio::test]
async fn test_ttl_expiration() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    assert_eq!(client.set("b", 1, b"Y").await, "SUCCESS\r\n");
    assert_eq!(client.get("b").await, Some(b"Y".to_vec()));

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(client.get("b").await, None);
}

#[tokio::test]
async fn test_delete_twice() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    client.set("a", 0, b"abc").await;

    assert_eq!(client.del("a").await, "SUCCESS\r\n");
    assert_eq!(client.del("a").await, "COMMAND_FAILED\r\n");
    assert_eq!(client.get("a").await, None);
}

#[tokio::test]
async fn test_unknown_command_keeps_connection_open() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    client.send(b"frobnicate x\r\n").await;
    assert_eq!(
        client.read_line().await,
        "Unknown command: frobnicate. Supported commands are: set,get,del.\r\n"
    );

    assert_eq!(client.get("anything").await, None);
}

#[tokio::test]
async fn test_binary_payload_roundtrip() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;
    let payload: Vec<u8> = (0..=255u8).chain(b"\r\n\r\n".iter().copied()).collect();

    assert_eq!(client.set("my_file", 0, &payload).await, "SUCCESS\r\n");
    assert_eq!(client.get("my_file").await, Some(payload));
}

#[tokio::test]
async fn test_empty_payload() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    assert_eq!(client.set("empty", 0, b"").await, "SUCCESS\r\n");
    assert_eq!(client.get("empty").await, Some(Vec::new()));
}

// == Eviction ==

#[tokio::test]
async fn test_lru_eviction_over_the_wire() {
    let addr = start_server(2).await;
    let mut client = Client::connect(addr).await;

    client.set("one", 0, b"1").await;
    client.set("two", 0, b"2").await;
    assert!(client.get("one").await.is_some());
    client.set("three", 0, b"3").await;

    assert_eq!(client.get("two").await, None);
    assert_eq!(client.get("one").await, Some(b"1".to_vec()));
    assert_eq!(client.get("three").await, Some(b"3".to_vec()));
}

// == Error Handling ==

#[tokio::test]
async fn test_bad_arguments() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    client.send(b"set a x 3\r\n").await;
    assert_eq!(
        client.read_line().await,
        "Bad argument: \"ttl\" must be integer\r\n"
    );

    client.send(b"set a 0 4096\r\n").await;
    assert_eq!(
        client.read_line().await,
        "Bad argument: \"size\" must be <= 1024\r\n"
    );

    client.send(b"get\r\n").await;
    assert_eq!(client.read_line().await, "Usage: get [key]\r\n");
}

#[tokio::test]
async fn test_bad_payload_terminator_closes_connection() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    client.send(b"set a 0 3\r\n").await;
    client.read_line().await;
    client.send(b"abcXY").await;

    assert_eq!(
        client.read_line().await,
        "Protocol error (fatal): unexpected message length or termination marker.\r\n"
    );
    assert!(client.is_closed().await);

    // Nothing was stored and the server keeps serving others
    let mut other = Client::connect(addr).await;
    assert_eq!(other.get("a").await, None);
}

#[tokio::test]
async fn test_oversized_line_closes_connection() {
    let addr = start_server(100).await;
    let mut client = Client::connect(addr).await;

    let mut line = b"get ".to_vec();
    line.extend(std::iter::repeat(b'k').take(MAX_MESSAGE_SIZE + 10));
    line.extend_from_slice(b"\r\n");
    client.send(&line).await;

    assert!(client
        .read_line()
        .await
        .starts_with("Protocol error (fatal):"));
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_disconnect_mid_payload_stores_nothing() {
    let addr = start_server(100).await;

    {
        let mut client = Client::connect(addr).await;
        client.send(b"set half 0 10\r\n").await;
        client.read_line().await;
        client.send(b"12345").await;
    }

    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut other = Client::connect(addr).await;
    assert_eq!(other.get("half").await, None);
}

// == Concurrency ==

#[tokio::test]
async fn test_concurrent_clients_share_cache() {
    let addr = start_server(1000).await;

    let mut handles = Vec::new();
    for worker in 0..8 {
        handles.push(tokio::spawn(async move {
            let mut client = Client::connect(addr).await;
            for index in 0..25 {
                let key = format!("w{}_{}", worker, index);
                let value = format!("value-{}-{}", worker, index);
                assert_eq!(client.set(&key, 0, value.as_bytes()).await, "SUCCESS\r\n");
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut reader = Client::connect(addr).await;
    for worker in 0..8 {
        for index in 0..25 {
            let key = format!("w{}_{}", worker, index);
            let expected = format!("value-{}-{}", worker, index).into_bytes();
            assert_eq!(reader.get(&key).await, Some(expected));
        }
    }
}

#[tokio::test]
async fn test_insert_then_delete_many() {
    let addr = start_server(5000).await;
    let mut client = Client::connect(addr).await;
    let value = "V".repeat(1000);

    for index in 0..200 {
        assert_eq!(
            client.set(&index.to_string(), 0, value.as_bytes()).await,
            "SUCCESS\r\n"
        );
    }
    for index in 0..200 {
        assert_eq!(client.del(&index.to_string()).await, "SUCCESS\r\n");
    }
}
