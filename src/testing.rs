//! Test helpers: a local http server and in-memory archives.
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use bzip2::write::BzEncoder;

/// What the server answers for a path.
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Vec<u8>),
    Status(u16),
    /// Announces `len` bytes, sends `sent` then goes silent.
    Stall { sent: Vec<u8>, len: usize },
}

/// Serves fixed replies on a random local port, on a background thread.
/// Unknown paths get a 404.
pub struct Server {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Server {
    pub fn start(routes: Vec<(&str, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = routes.clone();
                let log = log.clone();
                thread::spawn(move || serve(stream, &routes, &log));
            }
        });

        Self { port, requests }
    }

    /// Absolute url of `path`, which starts with a `/`.
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Requested paths, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(stream: TcpStream, routes: &HashMap<String, Reply>, log: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // skip headers
    let mut line = String::new();
    while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) && line != "\r\n" {
        line.clear();
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(path.clone());

    let mut stream = stream;
    let (status, body, len) = match routes.get(&path) {
        Some(Reply::Ok(body)) => (200, body.clone(), body.len()),
        Some(Reply::Status(status)) => (*status, b"error".to_vec(), 5),
        Some(Reply::Stall { sent, len }) => (200, sent.clone(), *len),
        None => (404, b"not found".to_vec(), 9),
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        if status == 200 { "OK" } else { "Error" },
        len
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();

    if len > body.len() {
        thread::sleep(Duration::from_secs(10));
    }
}

/// A `.tar.bz2` archive holding `members`.
pub fn tar_bz2(members: &[(&str, &[u8])]) -> Vec<u8> {
    let enc = BzEncoder::new(Vec::new(), bzip2::Compression::default());
    let mut builder = tar::Builder::new(enc);
    for (member, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, member, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}
