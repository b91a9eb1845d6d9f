use mockito::Matcher;
use resume_nlu::{
    Error,
    config::Service,
    nlu::{AnalysisResult, Credentials, FEATURES, NluClient, ParseDiagnostic, SERVICE_VERSION},
};

const BODY: &str = r#"{"language":"en","keywords":[{"text":"Rust","relevance":0.9}],"categories":[]}"#;

fn client(endpoint: String) -> NluClient {
    let cfg = Service {
        endpoint,
        timeout_seconds: 10,
        ..Service::default()
    };
    NluClient::new(&cfg, Credentials::new("user", "pass")).unwrap()
}

#[test]
fn request_pins_version_features_and_encodes_text() {
    let c = client("https://nlu.example.test/v1/analyze".into());
    let text = "C++ & Rust; 100% = \"fun\"?\nnext line #tag";
    let req = c.request(text).unwrap();

    let url = req.url();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("version".to_string(), SERVICE_VERSION.to_string()),
            ("text".to_string(), text.to_string()),
            ("features".to_string(), FEATURES.join(",")),
        ]
    );

    let raw = url.query().unwrap();
    assert!(!raw.contains("C++"));
    assert!(!raw.contains(" & "));
    assert!(!raw.contains('#'));
    assert!(url.fragment().is_none());

    let auth = req.headers().get("authorization").unwrap();
    assert_eq!(auth.to_str().unwrap(), "Basic dXNlcjpwYXNz");
}

#[test]
fn analyze_round_trip_against_local_endpoint() {
    let mut server = mockito::Server::new();
    let text = "Jane Doe & Co: 10+ years";
    let mock = server
        .mock("GET", "/analyze")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("version".into(), SERVICE_VERSION.into()),
            Matcher::UrlEncoded("text".into(), text.into()),
            Matcher::UrlEncoded(
                "features".into(),
                "categories,concepts,entities,keywords".into(),
            ),
        ]))
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BODY)
        .create();

    let result = client(format!("{}/analyze", server.url()))
        .analyze(text)
        .unwrap();
    mock.assert();

    assert_eq!(result.language.as_deref(), Some("en"));
    assert_eq!(result.keywords.as_ref().unwrap()[0].text, "Rust");
    assert_eq!(result.categories.as_deref().map(|c| c.len()), Some(0));
    assert_eq!(result.raw_response_log(), format!("{BODY}\n"));
}

#[test]
fn garbage_body_is_not_an_error() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/analyze")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("upstream hiccup")
        .create();

    let c = client(format!("{}/analyze", server.url()));
    let mut result = AnalysisResult::new();
    let parsed = c.analyze_into("text", &mut result).unwrap();
    mock.assert();

    assert!(!parsed);
    assert_eq!(result.raw_response_log(), "upstream hiccup\n");
    assert!(matches!(
        result.diagnostics(),
        [ParseDiagnostic::InvalidJson { .. }]
    ));
    assert!(result.language.is_none());
}

#[test]
fn repeated_calls_accumulate_the_raw_log() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/analyze")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(BODY)
        .expect(2)
        .create();

    let c = client(format!("{}/analyze", server.url()));
    let mut result = AnalysisResult::new();
    c.analyze_into("same text", &mut result).unwrap();
    let first = result.keywords.clone();
    c.analyze_into("same text", &mut result).unwrap();
    mock.assert();

    assert_eq!(result.keywords, first);
    assert_eq!(result.raw_response_log(), format!("{BODY}\n{BODY}\n"));
}

#[test]
fn unauthorized_is_a_transport_failure() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/analyze")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":"Unauthorized","code":401}"#)
        .create();

    let c = client(format!("{}/analyze", server.url()));
    let mut result = AnalysisResult::new();
    let err = c.analyze_into("text", &mut result).unwrap_err();
    mock.assert();

    assert!(err.is_transport());
    assert!(matches!(err, Error::Status { status: 401, .. }));
    assert!(result.raw_response_log().is_empty());
}

#[test]
fn unreachable_endpoint_is_a_transport_failure() {
    // Bind then drop a listener to get a port nothing is serving on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let err = client(format!("http://127.0.0.1:{port}/analyze"))
        .analyze("text")
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}

#[test]
fn credentials_debug_hides_password() {
    let creds = Credentials::new("user", "s3cret");
    let dbg = format!("{creds:?}");
    assert!(dbg.contains("user"));
    assert!(!dbg.contains("s3cret"));
}

#[test]
fn credentials_require_a_username() {
    let cfg = Service {
        username_env: String::new(),
        password_env: String::new(),
        ..Service::default()
    };
    assert!(Credentials::from_config(&cfg).is_err());

    let cfg = Service {
        username: "apikey".into(),
        password: "pw".into(),
        username_env: String::new(),
        password_env: String::new(),
        ..Service::default()
    };
    assert_eq!(Credentials::from_config(&cfg).unwrap().username(), "apikey");
}
