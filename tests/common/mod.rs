//! Common test utilities for integration tests

use std::fs;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Helper function to write a test HTML page into a directory
#[allow(dead_code)]
pub fn create_test_html_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Page in the layout of the countries listing, with one nameless block
/// and a few malformed numeric fields.
#[allow(dead_code)]
pub const SAMPLE_COUNTRIES_PAGE: &str = r#"<!doctype html>
<html>
<body>
  <div class="container">
    <div class="row">
      <div class="col-md-4 country">
        <h3 class="country-name">
          <i class="flag-icon flag-icon-fr"></i>
          France
        </h3>
        <div class="country-info">
          <strong>Capital:</strong> <span class="country-capital">Paris</span><br>
          <strong>Population:</strong> <span class="country-population">64057792</span><br>
          <strong>Area (km<sup>2</sup>):</strong> <span class="country-area">550500.0</span><br>
          <span class="country-region">Europe</span>
        </div>
      </div>
      <div class="col-md-4 country">
        <h3 class="country-name">Foo</h3>
        <div class="country-info">
          <span class="country-population">12,345</span>
        </div>
      </div>
      <div class="col-md-4 country">
        <h3 class="country-name">   </h3>
        <div class="country-info">
          <span class="country-capital">Ghost Town</span>
          <span class="country-population">1000</span>
          <span class="country-area">10.0</span>
          <span class="country-region">Nowhere</span>
        </div>
      </div>
      <div class="col-md-4 country">
        <h3 class="country-name">Andorra</h3>
        <div class="country-info">
          <span class="country-capital">Andorra la Vella</span>
          <span class="country-population">84000</span>
          <span class="country-area">468.0</span>
          <span class="country-region">Europe</span>
        </div>
      </div>
      <div class="col-md-4 country">
        <h3 class="country-name">United States</h3>
        <div class="country-info">
          <span class="country-capital">Washington, D.C.</span>
          <span class="country-population">310232863</span>
          <span class="country-area">9629091.0</span>
          <span class="country-region">The "Americas"</span>
        </div>
      </div>
      <div class="col-md-4 country">
        <h3 class="country-name">Atlantis</h3>
        <div class="country-info">
          <span class="country-capital">Poseidonis</span>
          <span class="country-population">-1</span>
          <span class="country-area">unknown</span>
          <span class="country-region">Ocean</span>
        </div>
      </div>
    </div>
  </div>
</body>
</html>"#;

/// Page without any country blocks
#[allow(dead_code)]
pub const EMPTY_PAGE: &str = r#"<!doctype html>
<html><body><div class="container"><p>Nothing to see</p></div></body></html>"#;

/// Raw `404 Not Found` response with an empty body
#[allow(dead_code)]
pub const NOT_FOUND_RESPONSE: &str =
    "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Raw `200 OK` response carrying `body` as HTML
#[allow(dead_code)]
pub fn ok_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Starts a local server that answers a single request with `response`.
///
/// Returns the page URL and a handle resolving to the raw request head.
#[allow(dead_code)]
pub async fn serve_once(response: String) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request: Vec<u8> = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    let url = Url::parse(&format!("http://{addr}/pages/simple/")).unwrap();
    (url, handle)
}
