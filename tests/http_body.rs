use requests::Session;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn start_server() -> (Runtime, MockServer) {
    let _ = env_logger::builder().is_test(true).try_init();
    let runtime = Runtime::new().expect("runtime");
    let server = runtime.block_on(MockServer::start());
    (runtime, server)
}

fn mount_ok(runtime: &Runtime, server: &MockServer) {
    runtime.block_on(
        Mock::given(path("/body"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(server),
    );
}

fn received(runtime: &Runtime, server: &MockServer) -> Vec<wiremock::Request> {
    runtime
        .block_on(server.received_requests())
        .expect("requests")
}

fn content_types(request: &wiremock::Request) -> Vec<String> {
    request
        .headers
        .get_all("content-type")
        .iter()
        .map(|v| v.to_str().expect("ascii").to_string())
        .collect()
}

#[cfg_attr(miri, ignore)]
#[test]
fn test_body_params_are_form_encoded() {
    if !can_bind_localhost() {
        return;
    }

    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/form"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("a=1&a=2"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server),
    );

    let response = Session::new()
        .expect("session should build")
        .post(&format!("{}/form", server.uri()))
        .expect("request should build")
        .set_body_param("a", ["1", "2"])
        .send()
        .expect("request should succeed");
    assert_eq!(response.status_code(), 200);
}

#[cfg_attr(miri, ignore)]
#[test]
fn test_json_body_forces_content_type() {
    if !can_bind_localhost() {
        return;
    }

    let (runtime, server) = start_server();
    mount_ok(&runtime, &server);

    Session::new()
        .expect("session should build")
        .put(&format!("{}/body", server.uri()))
        .expect("request should build")
        .set_header("Content-Type", ["text/plain"])
        .set_json(r#"{"name":"widget"}"#)
        .send()
        .expect("request should succeed");

    let requests = received(&runtime, &server);
    assert_eq!(requests.len(), 1);
    assert_eq!(content_types(&requests[0]), vec!["application/json"]);
    assert_eq!(requests[0].body, br#"{"name":"widget"}"#.to_vec());
}

#[cfg_attr(miri, ignore)]
#[test]
fn test_raw_body_keeps_caller_content_type() {
    if !can_bind_localhost() {
        return;
    }

    let (runtime, server) = start_server();
    mount_ok(&runtime, &server);

    Session::new()
        .expect("session should build")
        .post(&format!("{}/body", server.uri()))
        .expect("request should build")
        .set_header("Content-Type", ["text/csv"])
        .set_body_param("ignored", ["1"])
        .set_body(b"a,b\n1,2\n".to_vec())
        .send()
        .expect("request should succeed");

    let requests = received(&runtime, &server);
    assert_eq!(content_types(&requests[0]), vec!["text/csv"]);
    assert_eq!(requests[0].body, b"a,b\n1,2\n".to_vec());
}

#[cfg_attr(miri, ignore)]
#[test]
fn test_get_drops_body_params() {
    if !can_bind_localhost() {
        return;
    }

    let (runtime, server) = start_server();
    mount_ok(&runtime, &server);

    Session::new()
        .expect("session should build")
        .get(&format!("{}/body", server.uri()))
        .expect("request should build")
        .set_body_param("dropped", ["1"])
        .send()
        .expect("request should succeed");

    let requests = received(&runtime, &server);
    assert!(requests[0].body.is_empty());
    assert!(content_types(&requests[0]).is_empty());
}

#[cfg_attr(miri, ignore)]
#[test]
fn test_files_are_sent_as_multipart() {
    if !can_bind_localhost() {
        return;
    }

    let (runtime, server) = start_server();
    mount_ok(&runtime, &server);

    Session::new()
        .expect("session should build")
        .post(&format!("{}/body", server.uri()))
        .expect("request should build")
        .set_header("Content-Type", ["text/plain"])
        .set_body_param("tags", ["a", "b"])
        .add_file("upload", "notes.txt", b"file contents".to_vec())
        .send()
        .expect("request should succeed");

    let requests = received(&runtime, &server);
    let content_types = content_types(&requests[0]);
    assert_eq!(content_types.len(), 1);
    assert!(content_types[0].starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8(requests[0].body.clone()).expect("utf8 body");
    assert_eq!(body.matches("filename=").count(), 1);
    assert!(body.contains(r#"Content-Disposition: form-data; name="upload"; filename="notes.txt""#));
    assert!(body.contains("file contents"));
    assert!(body.contains(r#"Content-Disposition: form-data; name="tags""#));
    assert!(body.contains("\r\n\r\ntags=a&tags=b\r\n"));
}
