//! Integration tests for the unAPI client against a fake endpoint

mod common;

use common::{FakeTransport, FORMATS, MARC_RECORD, PICA_RECORD};
use unapi::pretty::pretty_response;
use unapi::{Client, ClientConfig, Encoding, Response, UnapiError};

const BASE: &str = "http://unapi.test";

fn client(transport: FakeTransport) -> Client<FakeTransport> {
    let config = ClientConfig::default().with_url(format!("{BASE}/")).with_db("k10plus");
    Client::with_transport(config, transport.page(BASE, 200, FORMATS))
}

#[test]
fn test_formats_keep_document_order() {
    let client = client(FakeTransport::default());
    let formats = client.formats().unwrap();

    let names: Vec<&str> = formats.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["picajson", "marcjson", "marcxml", "pp"]);
    assert_eq!(
        formats["marcjson"].docs.as_deref(),
        Some("http://format.gbv.de/marc/json")
    );
}

#[test]
fn test_request_records_in_both_encodings() {
    let client = client(
        FakeTransport::default()
            .page(
                &format!("{BASE}/?id=k10plus:ppn:1234567890&format=picajson"),
                200,
                PICA_RECORD,
            )
            .page(
                &format!("{BASE}/?id=k10plus:ppn:1234567890&format=marcjson"),
                200,
                MARC_RECORD,
            ),
    );

    let pica = client.request_record("1234567890", Encoding::PicaJson).unwrap();
    let marc = client.request_record("1234567890", Encoding::MarcJson).unwrap();
    assert_eq!(pica.holdings_from_isil("DE-15"), Some(vec!["222222222".to_string()]));
    assert_eq!(marc.holdings_from_isil("DE-15"), Some(vec!["222222222".to_string()]));
}

#[test]
fn test_xml_response_is_pretty_printed() {
    let client = client(FakeTransport::default().page(
        &format!("{BASE}/?id=k10plus:ppn:1&format=marcxml"),
        200,
        "<record><controlfield tag=\"001\">1</controlfield></record>",
    ));

    let response = client.request("1", "marcxml").unwrap();
    assert!(matches!(response, Response::Xml(_)));
    assert_eq!(
        pretty_response(&response).unwrap(),
        "<record>\n  <controlfield tag=\"001\">1</controlfield>\n</record>"
    );
}

#[test]
fn test_unsupported_schema() {
    let client = client(FakeTransport::default());

    let err = client.request("1", "mods").unwrap_err();
    assert!(matches!(err, UnapiError::UnsupportedSchema(ref s) if s == "mods"));
}

#[test]
fn test_missing_record_status() {
    let client = client(FakeTransport::default().page(
        &format!("{BASE}/?id=k10plus:ppn:0&format=picajson"),
        404,
        "not found",
    ));

    match client.request("0", "picajson") {
        Err(UnapiError::Status { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("format=picajson"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn test_text_schema_is_not_a_record() {
    let client = client(FakeTransport::default().page(
        &format!("{BASE}/?id=k10plus:ppn:1&format=pp"),
        200,
        "003@ $01",
    ));
    assert_eq!(
        client.request("1", "pp").unwrap(),
        Response::Text("003@ $01".to_string())
    );
}

#[test]
fn test_requested_urls() {
    let transport = FakeTransport::default().page(
        &format!("{BASE}/?id=k10plus:ppn:1&format=picajson"),
        200,
        r#"[["003@", null, "0", "1"]]"#,
    );
    let config = ClientConfig::default().with_url(BASE).with_db("k10plus");
    let client = Client::with_transport(config, transport.page(BASE, 200, FORMATS));

    client.request("1", "picajson").unwrap();
    assert!(client.request("1", "dc").is_err());
    assert_eq!(
        client.transport().requested(),
        vec![
            BASE.to_string(),
            format!("{BASE}/?id=k10plus:ppn:1&format=picajson"),
            BASE.to_string(),
        ]
    );
}
