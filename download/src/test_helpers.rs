//! Utilities for testing downloads
use httptest::{matchers::*, responders::*, Expectation};

const BODY: &[u8] = b"hello, world";

/// SHA-256 of `b"hello, world"`
pub(crate) const HELLO_SHA256: &str =
    "09ca7e4eaa6e8ae9c7d261167129184883644d07dfba7cbfbc4c8a2e08360d5b";

/// A fake server of a single document at `/data`, answering exactly one request.
pub(crate) struct FakeDataServer {
    server: httptest::Server,
}

impl FakeDataServer {
    /// Build a server answering with the given status.  For 200, the body is "hello, world".
    pub(crate) fn new(status: u16, content_type: Option<&str>) -> Self {
        let server = httptest::Server::run();
        let mut responder = status_code(status);
        if let Some(content_type) = content_type {
            responder = responder.append_header("Content-Type", content_type.to_owned());
        }
        let responder = if status == 200 {
            responder.body(BODY)
        } else {
            responder.body(&b""[..])
        };
        server.expect(
            Expectation::matching(request::method_path("GET", "/data"))
                .times(1)
                .respond_with(responder),
        );
        Self { server }
    }

    /// A server that expects no requests; useful for obtaining a URL that will stop answering
    /// once the server is dropped.
    pub(crate) fn unused() -> Self {
        Self {
            server: httptest::Server::run(),
        }
    }

    pub(crate) fn data_url(&self) -> String {
        self.server.url_str("/data")
    }
}
