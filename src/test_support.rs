//! In-process HTTP server standing in for the remote content API.

use parking_lot::Mutex;
use std::{borrow::Cow, io::Read, sync::Arc};
use tiny_http::{Header, Response, Server};

/// A request seen by the fake server: method, decoded URL, body.
pub type Recorded = (String, String, String);

pub struct FakeServer {
    pub url: String,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeServer {
    /// Decoded URLs of all requests received so far.
    pub fn urls(&self) -> Vec<String> {
        self.requests.lock().iter().map(|(_, url, _)| url.clone()).collect()
    }
}

/// Start a server on an ephemeral port answering with `respond(url)`.
///
/// The URL passed to `respond` is percent-decoded and includes the query.
pub fn spawn_server<F>(respond: F) -> FakeServer
where
    F: Fn(&str) -> (u16, String) + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    std::thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let url = urlencoding::decode(request.url())
                .map(Cow::into_owned)
                .unwrap_or_default();
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).ok();
            seen.lock()
                .push((request.method().to_string(), url.clone(), body));

            let (status, payload) = respond(&url);
            let response = Response::from_string(payload)
                .with_status_code(status)
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            request.respond(response).ok();
        }
    });

    FakeServer {
        url: format!("http://{addr}"),
        requests,
    }
}
