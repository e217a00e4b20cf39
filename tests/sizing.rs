use flatjson::{measure, measure_with_options, parse, parse_with_options, ParseOptions, Sizes};
use rstest::rstest;

#[rstest]
#[case("null", 1, 0)]
#[case("true", 1, 0)]
#[case("42", 1, 0)]
#[case(r#""hello""#, 1, 5)]
#[case("[]", 1, 0)]
#[case("{}", 1, 0)]
#[case("[1, 2, 3]", 4, 0)]
#[case(r#"{"a":1, "b":true, "c":["hello"]}"#, 8, 8)]
fn exact_requirements(#[case] input: &str, #[case] nodes: usize, #[case] bytes: usize) {
    assert_eq!(
        measure(input).unwrap(),
        Sizes {
            node_count: nodes,
            string_bytes: bytes
        }
    );
}

#[rstest]
#[case("null")]
#[case(r#""escapes \n and ☃ shrink""#)]
#[case("[1, [2, [3, [4]]], 5]")]
#[case(r#"{"outer": {"inner": [true, false, null]}, "tail": "x"}"#)]
#[case(r#"[{"a": [1.5e2, "two"]}, {}, []]"#)]
fn build_consumes_what_sizing_promised(#[case] input: &str) {
    let sizes = measure(input).unwrap();
    let doc = parse(input).unwrap();
    assert_eq!(doc.node_count(), sizes.node_count, "{input}");
    assert_eq!(doc.string_bytes(), sizes.string_bytes, "{input}");
}

#[test]
fn deep_nesting_within_the_limit() {
    let depth = 12;
    let input = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
    let doc = parse(&input).unwrap();
    assert_eq!(doc.node_count(), depth + 1);

    let mut value = doc.root();
    for _ in 0..depth {
        value = value.get(0).unwrap();
    }
    assert_eq!(value.as_f64().unwrap(), 1.0);
}

#[test]
fn wide_containers() {
    let elements: Vec<String> = (0..32).map(|i| i.to_string()).collect();
    let array = format!("[{}]", elements.join(","));
    let doc = parse(&array).unwrap();
    assert_eq!(doc.root().array_len().unwrap(), 32);
    for i in 0..32 {
        assert_eq!(doc.root().get(i).unwrap().as_f64().unwrap(), i as f64);
    }

    let members: Vec<String> = (0..16).map(|i| format!(r#""k{i}": {i}"#)).collect();
    let object = format!("{{{}}}", members.join(","));
    let doc = parse(&object).unwrap();
    assert_eq!(doc.root().object_len().unwrap(), 16);
    assert_eq!(doc.root().member("k7").unwrap().as_f64().unwrap(), 7.0);
}

#[test]
fn depth_limit_applies_to_both_passes() {
    let options = ParseOptions::new().with_max_depth(4);
    let shallow = "[[[[1]]]]";
    let deep = "[[[[[1]]]]]";

    assert!(measure_with_options(shallow, &options).is_ok());
    assert!(parse_with_options(shallow, &options).is_ok());

    let measured = measure_with_options(deep, &options);
    let parsed = parse_with_options(deep, &options);
    assert!(measured.is_err());
    assert!(parsed.is_err());
    assert_eq!(
        measured.unwrap_err().to_string(),
        parsed.unwrap_err().to_string()
    );
}
