use flatjson::{parse, Error};
use rstest::rstest;

fn number_of(input: &str) -> f64 {
    parse(input).unwrap().root().as_f64().unwrap()
}

#[rstest]
#[case("0", 0.0)]
#[case("-0", 0.0)]
#[case("1", 1.0)]
#[case("-1", -1.0)]
#[case("42", 42.0)]
#[case("123456789", 123456789.0)]
#[case("9007199254740992", 9007199254740992.0)] // 2^53
#[case("-9007199254740992", -9007199254740992.0)]
fn integers_reconstruct_exactly(#[case] input: &str, #[case] expected: f64) {
    assert_eq!(number_of(input), expected);
}

#[rstest]
#[case("0.5", 0.5)]
#[case("-2.25", -2.25)]
#[case("3.5", 3.5)]
#[case("1e3", 1000.0)]
#[case("2E+2", 200.0)]
#[case("5e-1", 0.5)]
#[case("-1.5e2", -150.0)]
#[case("10e0", 10.0)]
fn binary_exact_values(#[case] input: &str, #[case] expected: f64) {
    assert_eq!(number_of(input), expected);
}

#[rstest]
#[case("3.141592653589793")]
#[case("0.1")]
#[case("-123.456e2")]
#[case("2.718281828459045")]
#[case("6.022e23")]
fn agrees_with_the_reference_parser(#[case] input: &str) {
    let ours = number_of(input);
    let reference: f64 = serde_json::from_str(input).unwrap();
    let tolerance = reference.abs().max(1.0) * 1e-12;
    assert!(
        (ours - reference).abs() <= tolerance,
        "{input}: got {ours}, reference {reference}"
    );
}

#[rstest]
#[case("01")]
#[case("+5")]
#[case("-")]
#[case("1.")]
#[case(".5")]
#[case("1e")]
#[case("0x10")]
fn malformed_numbers_fail(#[case] input: &str) {
    assert!(parse(input).is_err(), "accepted {input:?}");
}

#[test]
fn number_accessor_rejects_other_kinds() {
    let doc = parse("true").unwrap();
    assert!(matches!(
        doc.root().as_f64(),
        Err(Error::TypeMismatch { .. })
    ));
}
