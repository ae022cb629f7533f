use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use tapkit_theme::prelude::*;

const THEME_JSON: &str = r##"{
    "GlobalValues": { "Colors": { "brand": "#336699" } },
    "cardNumberTextField": { "textColor": "brand", "font": "Roboto-Bold,14" }
}"##;

#[test]
fn test_load_file_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("theme.json");
    let toml = dir.path().join("theme.toml");
    std::fs::write(&json, THEME_JSON).unwrap();
    std::fs::write(&toml, "[card]\ncornerRadius = 8\ntextColor = \"#000\"\n").unwrap();

    let loader = DocumentLoader::new();
    let doc = loader.load(&DocumentSource::file(&json)).unwrap();
    assert_eq!(
        doc.resolve("cardNumberTextField.font").and_then(DocValue::as_str),
        Some("Roboto-Bold,14")
    );

    let doc = loader.load(&DocumentSource::file(&toml)).unwrap();
    assert_eq!(doc.resolve("card.cornerRadius").and_then(DocValue::as_f64), Some(8.0));
}

#[test]
fn test_load_bundle_resource() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("LightTheme.json"), THEME_JSON).unwrap();

    let bundle = Bundle::new(dir.path());
    let doc = DocumentLoader::new()
        .load(&DocumentSource::bundle(bundle.clone(), "LightTheme", "json"))
        .unwrap();
    assert!(doc.get("GlobalValues").is_some());

    let err = DocumentLoader::new()
        .load(&DocumentSource::bundle(bundle, "DarkTheme", "json"))
        .unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
}

#[test]
fn test_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DocumentLoader::new();

    let err = loader.load_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ \"card\": ").unwrap();
    assert!(matches!(loader.load_file(&broken), Err(LoadError::Parse { .. })));
}

#[test]
fn test_invalid_remote_urls_fail_before_fetching() {
    let loader = DocumentLoader::new();
    for url in ["https://example.com/theme.xml", "theme.json", "https://"] {
        assert!(
            matches!(loader.load(&DocumentSource::remote(url)), Err(LoadError::InvalidUrl { .. })),
            "{url}"
        );
    }
}

/// Serve `body` with `status` to the first connection, returning the URL.
#[cfg(feature = "remote")]
fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
    });

    format!("http://{addr}/themes/light.json")
}

#[cfg(feature = "remote")]
#[test]
fn test_remote_document_is_fetched() {
    let url = serve_once("200 OK", THEME_JSON);
    let doc = DocumentLoader::new().load(&DocumentSource::remote(url)).unwrap();
    assert_eq!(
        doc.resolve("GlobalValues.Colors.brand").and_then(DocValue::as_str),
        Some("#336699")
    );
}

#[cfg(feature = "remote")]
#[test]
fn test_remote_http_error_is_network_error() {
    let url = serve_once("404 Not Found", "{}");
    let err = DocumentLoader::new().load(&DocumentSource::remote(url)).unwrap_err();
    assert!(matches!(err, LoadError::Network { .. }));
}

#[cfg(feature = "remote")]
#[test]
fn test_remote_non_json_body_is_parse_error() {
    let url = serve_once("200 OK", "<html></html>");
    let err = DocumentLoader::new().load(&DocumentSource::remote(url)).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
}

#[cfg(feature = "remote")]
#[test]
fn test_remote_timeout_is_opt_in() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(2));
        drop(stream);
    });

    let loader =
        DocumentLoader::new().with_remote_options(RemoteOptions::default().with_timeout(Duration::from_millis(200)));
    let err = loader
        .load(&DocumentSource::remote(format!("http://{addr}/slow.json")))
        .unwrap_err();
    assert!(matches!(err, LoadError::Network { .. }));
    server.join().unwrap();
}
