//! Integration tests for `Interface` against a wiremock server.

use std::time::Duration;

use assert2::{check, let_assert};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_test::traced_test;
use webapi::{
    Decoded, DecoderRegistry, Envelope, Error, HyperClient, Interface, Method, Params, codec,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn api(server: &MockServer) -> Interface {
    Interface::new(server.uri()).expect("valid URL")
}

#[tokio::test]
async fn status_path_hits_resolved_uri() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status/514"))
        .respond_with(ResponseTemplate::new(514))
        .expect(1)
        .mount(&mock_server)
        .await;

    let status = api(&mock_server).member("status").index(514);
    check!(status.resolve() == format!("{}/status/514", mock_server.uri()));

    let response = status.invoke_raw(Method::Get, ()).await.expect("response");
    check!(response.status() == 514);
}

#[tokio::test]
async fn raw_get_returns_body_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bytes/4"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "abc123")
                .set_body_bytes(vec![0_u8, 1, 2, 3]),
        )
        .mount(&mock_server)
        .await;

    let response = api(&mock_server)
        .member("bytes")
        .index(4)
        .invoke_raw(Method::Get, ())
        .await
        .expect("response");

    check!(response.status() == 200);
    check!(response.header("x-request-id") == Some("abc123"));
    check!(&response.body()[..] == [0_u8, 1, 2, 3]);
}

#[tokio::test]
async fn json_body_decodes_to_mapping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": 1})))
        .mount(&mock_server)
        .await;

    let decoded = api(&mock_server).member("json").get(()).await.expect("decoded");
    check!(decoded == Decoded::Data(json!({"a": 1})));
}

#[tokio::test]
async fn invoke_as_deserializes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Alice"})))
        .mount(&mock_server)
        .await;

    let user: User = api(&mock_server)
        .member("users")
        .index(1)
        .invoke_as(Method::Get, ())
        .await
        .expect("user");

    check!(
        user == User {
            id: 1,
            name: "Alice".to_string()
        }
    );
}

#[tokio::test]
async fn invoke_as_reports_field_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "one", "name": "Alice"})))
        .mount(&mock_server)
        .await;

    let result = api(&mock_server)
        .member("users")
        .index(1)
        .invoke_as::<User>(Method::Get, ())
        .await;

    let_assert!(Err(Error::JsonDeserialization { path, .. }) = result);
    check!(path == "id");
}

#[tokio::test]
async fn unknown_content_type_is_unsupported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/report"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("a,b\n1,2\n", "text/csv"))
        .mount(&mock_server)
        .await;

    let result = api(&mock_server).member("report").get(()).await;

    let_assert!(Err(Error::UnsupportedContentType { content_type }) = result);
    check!(content_type == "text/csv");
}

#[tokio::test]
async fn missing_content_type_is_octet_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x00\x01".to_vec()))
        .mount(&mock_server)
        .await;

    let result = api(&mock_server).member("blob").get(()).await;
    let_assert!(Err(Error::UnsupportedContentType { content_type }) = result);
    check!(content_type == "application/octet-stream");

    let api = Interface::builder(mock_server.uri())
        .decoder("application/octet-stream", codec::passthrough)
        .build()
        .expect("valid URL");
    let decoded = api.member("blob").get(()).await.expect("decoded");
    check!(decoded == Decoded::Raw(Bytes::from_static(b"\x00\x01")));
}

#[tokio::test]
async fn get_sends_params_as_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust lang"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let decoded = api(&mock_server)
        .member("search")
        .get(Params::from([("q", "rust lang"), ("page", "2")]))
        .await
        .expect("decoded");

    check!(decoded.as_data() == Some(&json!({"hits": []})));
}

#[tokio::test]
async fn post_sends_params_as_form_body() {
    let mock_server = MockServer::start().await;

    #[derive(Serialize)]
    struct NewUser<'a> {
        name: &'a str,
        tags: Vec<&'a str>,
    }

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("name=Bob+Smith&tags=a&tags=b"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42, "name": "Bob Smith"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = Params::serialize(&NewUser {
        name: "Bob Smith",
        tags: vec!["a", "b"],
    })
    .expect("params");

    let user: User = api(&mock_server)
        .member("users")
        .invoke_as(Method::Post, params)
        .await
        .expect("user");

    check!(user.id == 42);
}

#[tokio::test]
async fn put_patch_and_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/7"))
        .and(body_string("name=Carol"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": "put"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/7"))
        .and(body_string("name=Dan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": "patch"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/7"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = api(&mock_server).member("users").index(7);

    let put = user.put(Params::from([("name", "Carol")])).await.expect("put");
    check!(put.as_data() == Some(&json!({"updated": "put"})));

    let patch = user.patch(Params::from([("name", "Dan")])).await.expect("patch");
    check!(patch.as_data() == Some(&json!({"updated": "patch"})));

    let deleted = user.delete(Params::from([("force", true)])).await.expect("delete");
    check!(deleted.as_data() == Some(&json!({"deleted": true})));
}

#[tokio::test]
async fn head_and_options_are_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).insert_header("X-Total", "12"))
        .mount(&mock_server)
        .await;
    Mock::given(method("OPTIONS"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(204).insert_header("Allow", "GET, POST"))
        .mount(&mock_server)
        .await;

    let items = api(&mock_server).member("items");

    let head = items.head(()).await.expect("head");
    check!(head.header("x-total") == Some("12"));
    check!(head.body().is_empty());

    let options = items.options(()).await.expect("options");
    check!(options.status() == 204);
    check!(options.header("allow") == Some("GET, POST"));
}

#[tokio::test]
async fn default_headers_reach_descendants() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/3/repos"))
        .and(header("accept", "application/json"))
        .and(header("accept-language", "fr"))
        .and(header("x-api-key", "k-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let root = Interface::builder(mock_server.uri())
        .accept("application/json")
        .language("fr")
        .header("X-Api-Key", "k-123")
        .build()
        .expect("valid URL");

    let repos = root.member("v1").member("users").index(3).member("repos");
    let decoded = repos.get(()).await.expect("decoded");
    check!(decoded.as_data() == Some(&json!([])));
}

#[tokio::test]
#[traced_test]
async fn accept_mismatch_still_decodes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": 0})))
        .mount(&mock_server)
        .await;

    let api = Interface::builder(mock_server.uri())
        .accept("application/xml")
        .build()
        .expect("valid URL");

    let decoded = api.member("feed").get(()).await.expect("decoded");
    check!(decoded.as_data() == Some(&json!({"items": 0})));
    check!(logs_contain("response content type does not match Accept"));
    check!(logs_contain("content_type=application/json"));
}

#[tokio::test]
#[traced_test]
async fn matching_accept_logs_no_warning() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": 0})))
        .mount(&mock_server)
        .await;

    let api = Interface::builder(mock_server.uri())
        .accept("application/json, text/*;q=0.5")
        .build()
        .expect("valid URL");

    api.member("feed").get(()).await.expect("decoded");
    check!(!logs_contain("does not match Accept"));
}

#[tokio::test]
async fn error_status_is_decoded_unless_validated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&mock_server)
        .await;

    let decoded = api(&mock_server).member("missing").get(()).await.expect("decoded");
    check!(decoded.as_data() == Some(&json!({"error": "not found"})));

    let validated = Interface::builder(mock_server.uri())
        .validated(true)
        .build()
        .expect("valid URL");
    let err = validated.member("missing").get(()).await.expect_err("http error");

    check!(err.status() == Some(404));
    check!(err.is_client_error());
    check!(err.body().map(|body| body.is_empty()) == Some(false));
}

#[tokio::test]
async fn envelope_unwraps_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "data": {"items": [{"id": 7}]}})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/denied"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": false, "error": {"message": "quota exceeded"}})),
        )
        .mount(&mock_server)
        .await;

    let api = Interface::builder(mock_server.uri())
        .envelope(
            Envelope::new()
                .success("ok")
                .message("error.message")
                .content("data.items.0"),
        )
        .build()
        .expect("valid URL");

    let item = api.member("ok").get(()).await.expect("item");
    check!(item.as_data() == Some(&json!({"id": 7})));

    let result = api.member("denied").get(()).await;
    let_assert!(Err(Error::Unsuccessful { message }) = result);
    check!(message.as_deref() == Some("quota exceeded"));
}

#[cfg(feature = "xml")]
#[tokio::test]
async fn xml_body_decodes_to_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<?xml version="1.0"?><user id="7"><name>Ann &amp; Co</name></user>"#,
            "application/xml; charset=utf-8",
        ))
        .mount(&mock_server)
        .await;

    let decoded = api(&mock_server).member("xml").get(()).await.expect("decoded");

    let_assert!(Some(root) = decoded.as_document());
    check!(root.name() == "user");
    check!(root.attr("id") == Some("7"));
    check!(root.child("name").map(webapi::Element::text) == Some("Ann & Co".to_string()));
}

#[tokio::test]
async fn replaced_decoder_is_used() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": 1})))
        .mount(&mock_server)
        .await;

    let registry = DecoderRegistry::default().with(
        "application/json",
        |body: &Bytes| -> webapi::Result<Decoded> { Ok(Decoded::Data(json!(body.len()))) },
    );

    let api = Interface::builder(mock_server.uri())
        .registry(registry)
        .build()
        .expect("valid URL");

    let decoded = api.member("json").get(()).await.expect("decoded");
    check!(decoded.as_data() == Some(&json!(7)));
}

#[tokio::test]
async fn connection_error_is_returned_as_is() {
    let api = Interface::new("http://127.0.0.1:1").expect("valid URL");

    let err = api.member("anything").get(()).await.expect_err("connection error");
    check!(err.is_connection(), "expected connection error, got: {err}");
}

#[tokio::test]
async fn slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delay/5"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let api = Interface::builder(mock_server.uri())
        .client(
            HyperClient::builder()
                .timeout(Duration::from_millis(100))
                .build(),
        )
        .build()
        .expect("valid URL");

    let err = api.member("delay").index(5).get(()).await.expect_err("timeout");
    check!(err.is_timeout(), "expected timeout, got: {err}");
}
