use mockito::Matcher;
use soapclient::soap::build_soap_fault;
use soapclient::{ClientError, ClientOptions, SoapClient, SoapValue, SoapVersion, WsdlError};

/// WSDL de test ; `{location}` est remplacé par l'URL du serveur mock
const CURRENCY_WSDL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns:tns="http://tempuri.org/"
    targetNamespace="http://tempuri.org/">
  <wsdl:portType name="CurrencySoap">
    <wsdl:operation name="GetConversionAmount"/>
  </wsdl:portType>
  <wsdl:binding name="CurrencySoap" type="tns:CurrencySoap">
    <soap:binding transport="http://schemas.xmlsoap.org/soap/http" style="document"/>
    <wsdl:operation name="GetConversionAmount">
      <soap:operation soapAction="http://tempuri.org/GetConversionAmount" style="document"/>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:service name="Currency">
    <wsdl:port name="CurrencySoap" binding="tns:CurrencySoap">
      <soap:address location="{location}"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>"#;

const CONVERSION_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <GetConversionAmountResponse xmlns="http://tempuri.org/">
      <GetConversionAmountResult>108.50</GetConversionAmountResult>
    </GetConversionAmountResponse>
  </soap:Body>
</soap:Envelope>"#;

fn wsdl_for(location: &str) -> String {
    CURRENCY_WSDL.replace("{location}", location)
}

#[test]
fn test_wsdl_over_http() {
    let mut server = mockito::Server::new();
    let location = format!("{}/currency.asmx", server.url());

    let wsdl_mock = server
        .mock("GET", "/currency.wsdl")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(wsdl_for(&location))
        .create();

    let call_mock = server
        .mock("POST", "/currency.asmx")
        .match_header("SOAPAction", "\"http://tempuri.org/GetConversionAmount\"")
        .match_header("content-type", "text/xml; charset=utf-8")
        .match_body(Matcher::Regex("<CurrencyFrom>EUR</CurrencyFrom>".to_string()))
        .with_status(200)
        .with_body(CONVERSION_RESPONSE)
        .create();

    let client = SoapClient::new(
        Some(&format!("{}/currency.wsdl", server.url())),
        ClientOptions::default(),
    )
    .unwrap();

    assert_eq!(client.location(), location);
    assert_eq!(client.namespace(), "http://tempuri.org/");
    assert_eq!(client.functions(), vec!["GetConversionAmount".to_string()]);

    let amount = client
        .call(
            "GetConversionAmount",
            SoapValue::map([("CurrencyFrom", "EUR"), ("CurrencyTo", "USD"), ("Amount", "100")]),
        )
        .unwrap();
    assert_eq!(amount, SoapValue::String("108.50".to_string()));

    wsdl_mock.assert();
    call_mock.assert();
}

#[test]
fn test_wsdl_from_file_and_unknown_operation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("currency.wsdl");
    std::fs::write(&path, wsdl_for("http://localhost:1/currency.asmx")).unwrap();

    let client = SoapClient::new(Some(path.to_str().unwrap()), ClientOptions::default()).unwrap();
    assert_eq!(client.location(), "http://localhost:1/currency.asmx");

    // Refusé avant toute requête réseau
    let err = client.call("GetRates", SoapValue::Null).unwrap_err();
    assert!(matches!(err, ClientError::UnknownOperation(name) if name == "GetRates"));
}

#[test]
fn test_location_option_overrides_wsdl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("currency.wsdl");
    std::fs::write(&path, wsdl_for("http://localhost:1/currency.asmx")).unwrap();

    let options = ClientOptions {
        location: Some("http://override.example.com/soap".to_string()),
        uri: Some("urn:override".to_string()),
        ..Default::default()
    };
    let client = SoapClient::new(Some(path.to_str().unwrap()), options).unwrap();
    assert_eq!(client.location(), "http://override.example.com/soap");
    assert_eq!(client.namespace(), "urn:override");
}

#[test]
fn test_missing_wsdl_file() {
    let err = SoapClient::new(Some("/nonexistent/service.wsdl"), ClientOptions::default())
        .unwrap_err();
    assert!(matches!(err, ClientError::Io(_)));
}

#[test]
fn test_wsdl_without_address() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noaddress.wsdl");
    std::fs::write(
        &path,
        r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/" targetNamespace="urn:x"/>"#,
    )
    .unwrap();

    let err = SoapClient::new(Some(path.to_str().unwrap()), ClientOptions::default()).unwrap_err();
    assert!(matches!(err, ClientError::Wsdl(WsdlError::MissingAddress)));
}

#[test]
fn test_wsdl_http_error() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/missing.wsdl").with_status(404).create();

    let err = SoapClient::new(
        Some(&format!("{}/missing.wsdl", server.url())),
        ClientOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ClientError::HttpStatus { status: 404, .. }));
}

#[test]
fn test_fault_response() {
    let mut server = mockito::Server::new();
    let fault = build_soap_fault(
        SoapVersion::V1_1,
        "SOAP-ENV:Client",
        "Unknown currency",
        Some("XYZ"),
    )
    .unwrap();
    let _mock = server
        .mock("POST", "/soap")
        .with_status(500)
        .with_body(fault)
        .create();

    let options = ClientOptions {
        location: Some(format!("{}/soap", server.url())),
        uri: Some("http://tempuri.org/".to_string()),
        ..Default::default()
    };
    let client = SoapClient::new(None, options).unwrap();

    let err = client
        .call("GetConversionAmount", SoapValue::map([("CurrencyFrom", "XYZ")]))
        .unwrap_err();
    let fault = err.as_fault().unwrap();
    assert_eq!(fault.code, "SOAP-ENV:Client");
    assert_eq!(fault.message, "Unknown currency");
}
