use reqwest::StatusCode;
use strum::IntoEnumIterator;

use super::*;
use crate::{Operation, Payload};

fn parse_body(body: &str) -> Result<ResultSet, ClientError> {
    parse(&RawResponse::new(StatusCode::OK, body))
}

const VERIFY_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<AddressValidateResponse>
  <Address ID="0">
    <Address2>6406 IVY LN</Address2>
    <City>GREENBELT</City>
    <State>MD</State>
    <Zip5>20770</Zip5>
    <Zip4>1441</Zip4>
  </Address>
  <Address ID="1">
    <FirmName>SMITH &amp; SONS</FirmName>
    <Address2>8 WILDWOOD DR</Address2>
    <City>OLD LYME</City>
    <State>CT</State>
    <Zip5>06371</Zip5>
    <Zip4/>
  </Address>
</AddressValidateResponse>"#;

#[test]
fn decodes_addresses() {
    let results = parse_body(VERIFY_RESPONSE).unwrap();
    assert_eq!(results.len(), 2);

    let first = results.get("0").unwrap();
    assert_eq!(first.address2(), "6406 IVY LN");
    assert_eq!(first.last_line(), "GREENBELT, MD 20770-1441");
    assert_eq!(first.field(Field::FirmName), None);

    let second = results.get("1").unwrap();
    assert_eq!(second.firmname(), "SMITH & SONS");
    assert_eq!(second.field(Field::Zip4), Some(""));
    assert_eq!(second.zipcode(), "06371-");
}

#[test]
fn lookup_is_distinct_from_end_of_iteration() {
    let results = parse_body(VERIFY_RESPONSE).unwrap();

    assert_eq!(
        results.get("2"),
        Err(LookupError::NotFound("2".to_string()))
    );

    let mut iter = results.into_iter();
    assert_eq!(iter.next().unwrap().id(), "0");
    assert_eq!(iter.next().unwrap().id(), "1");
    assert!(iter.next().is_none());
}

#[test]
fn reassociates_by_id() {
    let results = parse_body(
        r#"<ZipCodeLookupResponse>
            <Address ID="2"><City>C</City></Address>
            <Address ID="10"><City>D</City></Address>
            <Address ID="0"><City>A</City></Address>
            <Address ID="1"><City>B</City></Address>
        </ZipCodeLookupResponse>"#,
    )
    .unwrap();

    let ids: Vec<_> = results.iter().map(|a| a.id()).collect();
    assert_eq!(ids, ["0", "1", "2", "10"]);
    assert_eq!(results.get("10").unwrap().city(), "D");

    let reversed: Vec<_> = results.into_iter().rev().map(|a| a.city().to_string()).collect();
    assert_eq!(reversed, ["D", "C", "B", "A"]);
}

#[test]
fn later_duplicate_wins() {
    let results = parse_body(
        r#"<R><Address ID="0"><City>OLD</City></Address><Address ID="0"><City>NEW</City></Address></R>"#,
    )
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.get("0").unwrap().city(), "NEW");
}

#[test]
fn finds_nested_addresses() {
    let results = parse_body(
        r#"<CityStateLookupResponse>
            <Wrapper><Inner><Address ID="0"><City>GREENBELT</City><State>MD</State></Address></Inner></Wrapper>
        </CityStateLookupResponse>"#,
    )
    .unwrap();

    assert_eq!(results.get("0").unwrap().citystate(), "GREENBELT, MD");
}

#[test]
fn ignores_unknown_children() {
    let results = parse_body(
        r#"<AddressValidateResponse><Address ID="0">
            <Address2>6406 IVY LN</Address2>
            <DeliveryPoint>06</DeliveryPoint>
            <Urbanization/>
        </Address></AddressValidateResponse>"#,
    )
    .unwrap();

    let address = results.get("0").unwrap();
    assert_eq!(address.address2(), "6406 IVY LN");
    assert_eq!(address.field(Field::City), None);
}

#[test]
fn empty_response() {
    let results = parse_body("<AddressValidateResponse/>").unwrap();
    assert!(results.is_empty());
    assert_eq!(results.iter().count(), 0);
}

#[test]
fn per_address_error() {
    let results = parse_body(
        r#"<AddressValidateResponse>
            <Address ID="0">
                <Error>
                    <Number>-2147219401</Number>
                    <Source>clsAMS</Source>
                    <Description>Address Not Found.</Description>
                </Error>
            </Address>
            <Address ID="1"><City>GREENBELT</City></Address>
        </AddressValidateResponse>"#,
    )
    .unwrap();

    assert_eq!(results.get("0").unwrap().error(), Some("Address Not Found."));
    assert_eq!(results.get("1").unwrap().error(), None);
    assert_eq!(results.get("1").unwrap().city(), "GREENBELT");
}

#[test]
fn error_root_is_service_error() {
    let body = r#"<?xml version="1.0"?>
<Error>
    <Number>80040B1A</Number>
    <Description>Authorization failure.  Perhaps username and/or password is incorrect.</Description>
    <Source>USPSCOM::DoAuth</Source>
</Error>"#;

    let Err(ClientError::Service(err)) = parse_body(body) else {
        panic!("expected a service error");
    };
    assert_eq!(err.status(), StatusCode::OK);
    assert_eq!(err.body(), body);
    assert_eq!(err.number(), Some("80040B1A"));
    assert_eq!(err.origin(), Some("USPSCOM::DoAuth"));
    assert_eq!(
        err.message(),
        "Authorization failure.  Perhaps username and/or password is incorrect."
    );
}

#[test]
fn bare_error_root_keeps_body() {
    let Err(ClientError::Service(err)) = parse_body("<Error>Invalid request</Error>") else {
        panic!("expected a service error");
    };
    assert_eq!(err.description(), None);
    assert_eq!(err.message(), "<Error>Invalid request</Error>");
}

#[test]
fn malformed_bodies() {
    for body in [
        "",
        "Internal Server Error",
        "<AddressValidateResponse><Address ID=\"0\"></AddressValidateResponse>",
        "<AddressValidateResponse>",
        "<A/><B/>",
        "<A/>trailing",
        "<AddressValidateResponse><Address><City>X</City></Address></AddressValidateResponse>",
    ] {
        assert!(
            matches!(parse_body(body), Err(ClientError::Parse(_))),
            "{body:?} should fail to parse"
        );
    }
}

#[test]
fn decodes_own_request_unchanged() {
    let inputs = [
        AddressInput::new()
            .with(Field::FirmName, "Smith & Sons <Ltd>")
            .with(Field::Address1, "  Suite 5 ")
            .with(Field::Address2, "6406 Ivy Lane")
            .with(Field::City, " ")
            .with(Field::State, "MD")
            .with(Field::Zip5, "20770")
            .with(Field::Zip4, "1441"),
        AddressInput::new()
            .with(Field::FirmName, "A&B")
            .with(Field::Address1, "Apt <2>")
            .with(Field::Address2, "8 Wildwood Drive ")
            .with(Field::City, "Old Lyme")
            .with(Field::State, "CT")
            .with(Field::Zip5, "06371")
            .with(Field::Zip4, "\t1844"),
    ];

    let xml = Payload::build(Operation::Verify, "USER", &inputs);
    let results = parse_body(&xml).unwrap();

    assert_eq!(results.len(), inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        let record = results.get(&i.to_string()).unwrap();
        for field in Field::iter() {
            assert_eq!(record.field(field), input.get(field), "{field:?} of address {i}");
        }
    }
}

#[test]
fn nested_address_is_its_own_record() {
    let results = parse_body(
        r#"<R><Address ID="0"><City>OUTER</City><Address ID="1"><City>X</City></Address><State>MD</State></Address></R>"#,
    )
    .unwrap();

    let ids: Vec<_> = results.iter().map(|a| a.id()).collect();
    assert_eq!(ids, ["0", "1"]);
    assert_eq!(results.get("1").unwrap().city(), "X");
    assert_eq!(results.get("1").unwrap().field(Field::State), None);
    assert_eq!(results.get("0").unwrap().citystate(), "OUTER, MD");
}

#[test]
fn whitespace_and_cdata() {
    let results = parse_body(
        "\n  <R>\n  <Address ID=\"0\">\n    <FirmName><![CDATA[Smith & Sons]]></FirmName>\n  </Address>\n</R>\n",
    )
    .unwrap();

    let address = results.get("0").unwrap();
    assert_eq!(address.firmname(), "Smith & Sons");
    assert_eq!(address.field(Field::City), None);
}
