use flatjson::{measure, parse, Error};
use rstest::rstest;

/// Inputs that committed to a container or member shape and broke it.
/// These must report a located syntax error, not a bare no-match.
#[rstest]
#[case("{")]
#[case("[")]
#[case(r#"{"a""#)]
#[case(r#"{"a":"#)]
#[case(r#"{"a":1"#)]
#[case("[1,]")]
#[case("[1, 2")]
#[case("{,}")]
fn hard_failures_are_syntax_errors(#[case] input: &str) {
    match parse(input) {
        Err(Error::Syntax { .. }) => {}
        other => panic!("{input:?}: expected Syntax, got {other:?}"),
    }
}

/// Inputs that are not JSON at all, whether nothing matches or the wrong
/// token sits where a production expected another.
#[rstest]
#[case("")]
#[case("tru")]
#[case("nul")]
#[case("+1")]
#[case("'single'")]
#[case("{1: 2}")]
fn non_json_inputs_fail(#[case] input: &str) {
    match parse(input) {
        Err(Error::NoMatch) | Err(Error::Syntax { .. }) => {}
        other => panic!("{input:?}: expected an error, got {other:?}"),
    }
}

#[test]
fn bare_words_report_no_match() {
    assert!(matches!(parse("tru"), Err(Error::NoMatch)));
    assert!(matches!(parse(""), Err(Error::NoMatch)));
}

#[rstest]
#[case("[1 2]")]
#[case(r#"{"a" 1}"#)]
#[case("[,]")]
fn broken_separators_fail(#[case] input: &str) {
    assert!(parse(input).is_err(), "accepted {input:?}");
}

#[test]
fn dangling_comma_location() {
    // the comma at offset 2 starts an element that never arrives
    match parse("[1,]") {
        Err(Error::Syntax { location, .. }) => assert_eq!(location.offset, 2),
        other => panic!("expected Syntax, got {other:?}"),
    }
}

#[test]
fn locations_track_lines() {
    let input = "[1,\n2,\n]";
    match parse(input) {
        Err(Error::Syntax { location, .. }) => {
            assert_eq!(location.line, 2);
        }
        other => panic!("expected Syntax, got {other:?}"),
    }
}

#[rstest]
#[case("null null")]
#[case("1 2")]
#[case("{} x")]
fn trailing_characters_are_rejected(#[case] input: &str) {
    assert!(matches!(
        parse(input),
        Err(Error::TrailingCharacters { .. })
    ));
}

/// Both passes see the same grammar, so they must reject the same inputs
/// with the same error.
#[rstest]
#[case("{")]
#[case("[1,]")]
#[case(r#"{"a":}"#)]
#[case("tru")]
#[case("[1 2]")]
fn passes_fail_identically(#[case] input: &str) {
    let measured = measure(input).unwrap_err();
    let parsed = parse(input).unwrap_err();
    assert_eq!(measured, parsed, "{input:?}");
}
