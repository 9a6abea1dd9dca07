//! Wire encoding tests for the HTTP-Redirect binding.

use samlsso::codec::{self, WireDepth};
use samlsso::{SamlMessage, Settings};

use crate::common::{init_tracing, response, ASSERTION};

const AUTHN_REQUEST: &str = concat!(
    r#"<samlp:AuthnRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
    r#"xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_req1" Version="2.0" "#,
    r#"IssueInstant="2024-03-01T11:59:58Z" Destination="https://idp.example.org/sso" "#,
    r#"AssertionConsumerServiceURL="https://sp.example.org/acs">"#,
    r#"<saml:Issuer>https://sp.example.org</saml:Issuer>"#,
    r#"<samlp:NameIDPolicy Format="urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress" AllowCreate="true"/>"#,
    r#"</samlp:AuthnRequest>"#
);

/// Tests that compressed and uncompressed messages survive the round trip.
#[test]
fn test_redirect_roundtrip() -> anyhow::Result<()> {
    init_tracing();
    let message = SamlMessage::new();

    for compress in [true, false] {
        let settings = Settings::default().with_compress_request(compress);
        let wire = message.encode_raw_saml(AUTHN_REQUEST, &settings)?;
        assert!(
            wire.bytes().all(|b| b.is_ascii_alphanumeric() || b"%-_.*+".contains(&b)),
            "wire text must be URL-safe: {wire}"
        );

        let decoded = message.decode_raw_saml(&codec::unescape(&wire)?);
        assert_eq!(decoded.as_deref(), Some(AUTHN_REQUEST), "compress = {compress}");
    }
    Ok(())
}

/// Tests that each encoding depth is recognized.
#[test]
fn test_detected_depths() -> anyhow::Result<()> {
    let xml = response(ASSERTION);

    let plain = codec::decode_raw_saml_with_depth(&xml);
    assert_eq!(plain.map(|(depth, _)| depth), Some(WireDepth::Xml));

    let base64 = codec::decode_raw_saml_with_depth(&codec::encode64(&xml));
    assert_eq!(base64, Some((WireDepth::Base64, xml.clone())));

    let deflated = codec::encode(codec::deflate(&xml)?);
    let inflated = codec::decode_raw_saml_with_depth(&deflated);
    assert_eq!(inflated, Some((WireDepth::DeflatedBase64, xml)));
    Ok(())
}

/// Tests that a POST-binding style payload with line breaks is accepted.
#[test]
fn test_multiline_base64() {
    let wire = codec::encode64(AUTHN_REQUEST);
    assert!(wire.contains('\n'));
    assert_eq!(
        SamlMessage::new().decode_raw_saml(&wire).as_deref(),
        Some(AUTHN_REQUEST)
    );
}

/// Tests that non-SAML input yields no result.
#[test]
fn test_garbage_is_not_decoded() {
    let message = SamlMessage::new();
    for input in ["", "hello world", "SAMLRequest=abc", "////", "aGVsbG8gd29ybGQ="] {
        assert_eq!(message.decode_raw_saml(input), None, "{input:?}");
    }
}

/// Tests that a decoded request validates against the protocol schema.
#[test]
fn test_decoded_request_is_schema_valid() -> anyhow::Result<()> {
    let message = SamlMessage::new();
    let wire = message.encode_raw_saml(AUTHN_REQUEST, &Settings::default())?;
    let decoded = message
        .decode_raw_saml(&codec::unescape(&wire)?)
        .ok_or_else(|| anyhow::anyhow!("message did not decode"))?;
    assert!(message.valid_saml(&decoded, false)?);
    Ok(())
}
