//! JSON token grammar, shared verbatim by the sizing pass and the build
//! pass so both accept exactly the same inputs.

use memchr::memchr2;
use smallvec::SmallVec;

use crate::combinator::{
    alt, bind, byte, combine, exactly_n, many, many1, map, one_of, option, preceded, tag, Cursor,
    Failure, PResult,
};

const DIGITS: &[u8] = b"0123456789";
const NONZERO: &[u8] = b"123456789";
const HEX: &[u8] = b"0123456789abcdefABCDEF";

// ---------------------------------------------------------------------------
// literals

pub(crate) fn boolean(c: Cursor<'_>) -> PResult<'_, bool> {
    alt(map(tag("true"), |_| true), map(tag("false"), |_| false))(c)
}

pub(crate) fn null(c: Cursor<'_>) -> PResult<'_, ()> {
    map(tag("null"), |_| ())(c)
}

// ---------------------------------------------------------------------------
// numbers
//
// Optional sign, integer part with no leading zero unless the value is
// exactly zero, optional fraction, optional signed exponent. The value is
// mantissa * 10^exponent, accumulated in f64.

pub(crate) fn number(c: Cursor<'_>) -> PResult<'_, f64> {
    // integer part: a lone `0`, or a nonzero digit followed by any digits
    let int1 = bind(one_of(NONZERO), |digit, rest| {
        many(one_of(DIGITS), f64::from(digit - b'0'), |acc, d| {
            acc * 10.0 + f64::from(d - b'0')
        })(rest)
    });
    let integer = alt(map(byte(b'0'), |_| 0.0), int1);

    // fraction: `.` then one-or-more digits, scaled below 1
    let frac = preceded(
        byte(b'.'),
        map(
            many1(one_of(DIGITS), (0.0f64, 1.0f64), |(acc, scale), d| {
                (acc * 10.0 + f64::from(d - b'0'), scale * 10.0)
            }),
            |(acc, scale)| acc / scale,
        ),
    );
    let magnitude = combine(integer, option(0.0, frac), |i, f| i + f);

    // exponent: e|E, optional sign, one-or-more digits (leading zeros fine)
    let exp_digits = many1(one_of(DIGITS), 0i32, |acc, d| {
        acc.saturating_mul(10).saturating_add(i32::from(d - b'0'))
    });
    let exp_sign = alt(byte(b'+'), option(b'+', byte(b'-')));
    let exponent = bind(
        preceded(alt(byte(b'e'), byte(b'E')), exp_sign),
        move |sign, rest| {
            let (value, rest) = exp_digits(rest)?;
            Ok((if sign == b'-' { -value } else { value }, rest))
        },
    );

    combine(
        option(b'+', byte(b'-')),
        combine(magnitude, option(0i32, exponent), apply_exponent),
        |sign, value| if sign == b'-' { -value } else { value },
    )(c)
}

fn apply_exponent(mut mantissa: f64, exponent: i32) -> f64 {
    // repeated multiply, matching how the mantissa itself was accumulated
    if exponent > 0 {
        for _ in 0..exponent {
            mantissa *= 10.0;
        }
    } else {
        for _ in exponent..0 {
            mantissa /= 10.0;
        }
    }
    mantissa
}

// ---------------------------------------------------------------------------
// strings
//
// String content cannot be returned as a sub-slice of the input in
// general: escapes and \uXXXX code points decode to different bytes than
// they occupy. Content is therefore parsed as a sequence of pieces, each
// knowing its decoded length; the sizing pass sums lengths and the build
// pass appends bytes, over the identical piece sequence.

/// One decoded unit of string content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StringPiece<'a> {
    /// Maximal run of bytes containing no quote and no backslash.
    Plain(&'a [u8]),
    /// A single escape-decoded byte.
    Byte(u8),
    /// A \uXXXX code point re-encoded as UTF-8.
    Utf8(SmallVec<[u8; 4]>),
}

impl StringPiece<'_> {
    pub(crate) fn encoded_len(&self) -> usize {
        match self {
            StringPiece::Plain(run) => run.len(),
            StringPiece::Byte(_) => 1,
            StringPiece::Utf8(bytes) => bytes.len(),
        }
    }
}

fn plain_run<'a>(c: Cursor<'a>) -> PResult<'a, &'a [u8]> {
    let rest = c.rest();
    let end = memchr2(b'"', b'\\', rest).unwrap_or(rest.len());
    if end == 0 {
        return Err(Failure::Soft);
    }
    Ok((&rest[..end], c.advance(end)))
}

fn unescape(b: u8) -> u8 {
    match b {
        b'b' => 0x08,
        b'f' => 0x0C,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        other => other,
    }
}

fn escaped_byte(c: Cursor<'_>) -> PResult<'_, u8> {
    map(
        preceded(byte(b'\\'), one_of(br#""\/bfnrt"#)),
        unescape,
    )(c)
}

fn hex_value(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => u32::from(b - b'0'),
        b'a'..=b'f' => u32::from(b - b'a' + 10),
        _ => u32::from(b - b'A' + 10),
    }
}

fn unicode_escape(c: Cursor<'_>) -> PResult<'_, SmallVec<[u8; 4]>> {
    let hex4 = exactly_n(one_of(HEX), 4, 0u32, |acc, b| (acc << 4) | hex_value(b));
    map(
        preceded(byte(b'\\'), preceded(byte(b'u'), hex4)),
        encode_utf8,
    )(c)
}

/// Re-encode a code point as 1-4 UTF-8 bytes. Surrogate halves are encoded
/// independently; pairing them is the caller's problem, not the grammar's.
pub(crate) fn encode_utf8(code: u32) -> SmallVec<[u8; 4]> {
    let mut out = SmallVec::new();
    if code <= 0x7F {
        out.push(code as u8);
    } else if code <= 0x7FF {
        out.push(0xC0 | (code >> 6) as u8);
        out.push(0x80 | (code & 0x3F) as u8);
    } else if code <= 0xFFFF {
        out.push(0xE0 | (code >> 12) as u8);
        out.push(0x80 | ((code >> 6) & 0x3F) as u8);
        out.push(0x80 | (code & 0x3F) as u8);
    } else {
        out.push(0xF0 | (code >> 18) as u8);
        out.push(0x80 | ((code >> 12) & 0x3F) as u8);
        out.push(0x80 | ((code >> 6) & 0x3F) as u8);
        out.push(0x80 | (code & 0x3F) as u8);
    }
    out
}

pub(crate) fn string_piece(c: Cursor<'_>) -> PResult<'_, StringPiece<'_>> {
    alt(
        map(escaped_byte, StringPiece::Byte),
        alt(
            map(unicode_escape, StringPiece::Utf8),
            map(plain_run, StringPiece::Plain),
        ),
    )(c)
}

/// Decoded length of a string without building it: quote, summed piece
/// lengths, quote.
pub(crate) fn string_size(c: Cursor<'_>) -> PResult<'_, usize> {
    let (_, c) = byte(b'"')(c)?;
    let (len, c) = many(string_piece, 0usize, |n, piece| n + piece.encoded_len())(c)?;
    let (_, c) = byte(b'"')(c)?;
    Ok((len, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(s: &str) -> Cursor<'_> {
        Cursor::new(s.as_bytes())
    }

    fn parse_number(s: &str) -> f64 {
        let (value, rest) = number(cursor(s)).unwrap();
        assert!(rest.is_empty(), "number left input behind: {s}");
        value
    }

    #[test]
    fn literal_parsers() {
        assert_eq!(boolean(cursor("true")).unwrap().0, true);
        assert_eq!(boolean(cursor("false")).unwrap().0, false);
        assert!(null(cursor("null")).is_ok());
        assert_eq!(boolean(cursor("tru")), Err(Failure::Soft));
    }

    #[test]
    fn integers() {
        assert_eq!(parse_number("0"), 0.0);
        assert_eq!(parse_number("7"), 7.0);
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number("-42"), -42.0);
        assert_eq!(parse_number("9007199254740992"), 9007199254740992.0);
    }

    #[test]
    fn fractions_and_exponents() {
        assert_eq!(parse_number("0.5"), 0.5);
        assert_eq!(parse_number("-2.25"), -2.25);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("1E+2"), 100.0);
        assert_eq!(parse_number("5e-1"), 0.5);
        assert_eq!(parse_number("-1.5e2"), -150.0);
    }

    #[test]
    fn leading_zero_stops_the_integer_part() {
        let (value, rest) = number(cursor("0123")).unwrap();
        assert_eq!(value, 0.0);
        assert_eq!(rest.rest(), b"123");
    }

    #[test]
    fn sign_applies_to_the_whole_mantissa() {
        assert_eq!(parse_number("-3.5"), -3.5);
    }

    #[test]
    fn number_rejects_non_numbers() {
        assert_eq!(number(cursor("-")), Err(Failure::Soft));
        assert_eq!(number(cursor(".5")), Err(Failure::Soft));
        assert_eq!(number(cursor("x")), Err(Failure::Soft));
    }

    #[test]
    fn string_size_counts_decoded_bytes() {
        assert_eq!(string_size(cursor(r#""""#)).unwrap().0, 0);
        assert_eq!(string_size(cursor(r#""hello""#)).unwrap().0, 5);
        assert_eq!(string_size(cursor(r#""a\nb""#)).unwrap().0, 3);
        // \u2603 decodes to three bytes while occupying six input bytes
        assert_eq!(string_size(cursor(r#""\u2603""#)).unwrap().0, 3);
        assert_eq!(string_size(cursor(r#""\u0041""#)).unwrap().0, 1);
        assert_eq!(string_size(cursor(r#""\u00e9""#)).unwrap().0, 2);
        // raw multibyte input passes through as a plain run
        assert_eq!(string_size(cursor("\"☃\"")).unwrap().0, 3);
    }

    #[test]
    fn string_size_rejects_unterminated_and_bad_escapes() {
        assert_eq!(string_size(cursor(r#""abc"#)), Err(Failure::Soft));
        assert_eq!(string_size(cursor(r#""\x""#)), Err(Failure::Soft));
        assert_eq!(string_size(cursor(r#""\u12""#)), Err(Failure::Soft));
    }

    #[test]
    fn utf8_encoding_ranges() {
        assert_eq!(encode_utf8(0x41).as_slice(), b"A");
        assert_eq!(encode_utf8(0xE9).as_slice(), &[0xC3, 0xA9]);
        assert_eq!(encode_utf8(0x2603).as_slice(), &[0xE2, 0x98, 0x83]);
        assert_eq!(
            encode_utf8(0x1F600).as_slice(),
            &[0xF0, 0x9F, 0x98, 0x80]
        );
    }

    #[test]
    fn pieces_split_on_escapes() {
        let (piece, rest) = string_piece(cursor(r#"ab\n"#)).unwrap();
        assert_eq!(piece, StringPiece::Plain(b"ab"));
        let (piece, _) = string_piece(rest).unwrap();
        assert_eq!(piece, StringPiece::Byte(b'\n'));
    }
}
