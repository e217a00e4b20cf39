//! Parser-combinator core.
//!
//! A parser is any `Fn(Cursor) -> PResult<T>`: on success it returns the
//! parsed value plus the residual cursor, on failure the caller's cursor is
//! untouched (cursors are `Copy`). A [`Failure::Soft`] result is the only
//! backtracking mechanism; [`Failure::Hard`] aborts the whole parse and
//! carries the byte offset where the input stopped making sense.

/// Byte-range cursor over the input: the remaining bytes plus the absolute
/// offset of their first byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// A cursor over a sub-slice that keeps reporting absolute offsets.
    pub fn with_offset(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn rest(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    pub fn advance(self, n: usize) -> Self {
        Self {
            bytes: &self.bytes[n..],
            offset: self.offset + n,
        }
    }
}

/// Soft failures drive alternation and repetition; hard failures abort the
/// parse once the grammar has committed to a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Failure {
    Soft,
    Hard {
        offset: usize,
        message: &'static str,
    },
}

pub type PResult<'a, T> = Result<(T, Cursor<'a>), Failure>;

// ---------------------------------------------------------------------------
// primitive parsers

/// Match one given byte.
pub fn byte<'a>(expected: u8) -> impl Fn(Cursor<'a>) -> PResult<'a, u8> + Copy {
    move |c| match c.first() {
        Some(b) if b == expected => Ok((b, c.advance(1))),
        _ => Err(Failure::Soft),
    }
}

/// Match a literal string.
pub fn tag<'a>(expected: &'static str) -> impl Fn(Cursor<'a>) -> PResult<'a, &'static str> + Copy {
    move |c| {
        if c.rest().starts_with(expected.as_bytes()) {
            Ok((expected, c.advance(expected.len())))
        } else {
            Err(Failure::Soft)
        }
    }
}

/// Match one byte from a set.
pub fn one_of<'a>(set: &'static [u8]) -> impl Fn(Cursor<'a>) -> PResult<'a, u8> + Copy {
    move |c| match c.first() {
        Some(b) if set.contains(&b) => Ok((b, c.advance(1))),
        _ => Err(Failure::Soft),
    }
}

/// Match one byte not in a set.
pub fn none_of<'a>(set: &'static [u8]) -> impl Fn(Cursor<'a>) -> PResult<'a, u8> + Copy {
    move |c| match c.first() {
        Some(b) if !set.contains(&b) => Ok((b, c.advance(1))),
        _ => Err(Failure::Soft),
    }
}

// ---------------------------------------------------------------------------
// combinators

/// Transform a successful result through `f`; failure propagates unchanged.
pub fn map<'a, P, F, T, U>(p: P, f: F) -> impl Fn(Cursor<'a>) -> PResult<'a, U>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
    F: Fn(T) -> U,
{
    move |c| {
        let (value, rest) = p(c)?;
        Ok((f(value), rest))
    }
}

/// Run `p`, then continue with `f(value, residual)`. Enables
/// context-sensitive continuation ("parse N more of X where N was just
/// parsed").
pub fn bind<'a, P, F, T, U>(p: P, f: F) -> impl Fn(Cursor<'a>) -> PResult<'a, U>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
    F: Fn(T, Cursor<'a>) -> PResult<'a, U>,
{
    move |c| {
        let (value, rest) = p(c)?;
        f(value, rest)
    }
}

/// Try `p1`; on a soft failure try `p2` on the original cursor. Leftmost
/// success wins; hard failures propagate without retrying `p2`.
pub fn alt<'a, P1, P2, T>(p1: P1, p2: P2) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    P1: Fn(Cursor<'a>) -> PResult<'a, T>,
    P2: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |c| match p1(c) {
        Err(Failure::Soft) => p2(c),
        other => other,
    }
}

/// Run two parsers in sequence and combine both results with `f`.
pub fn combine<'a, P1, P2, F, T1, T2, R>(
    p1: P1,
    p2: P2,
    f: F,
) -> impl Fn(Cursor<'a>) -> PResult<'a, R>
where
    P1: Fn(Cursor<'a>) -> PResult<'a, T1>,
    P2: Fn(Cursor<'a>) -> PResult<'a, T2>,
    F: Fn(T1, T2) -> R,
{
    move |c| {
        let (first, rest) = p1(c)?;
        let (second, rest) = p2(rest)?;
        Ok((f(first, second), rest))
    }
}

/// Sequence two parsers, keeping the second result.
pub fn preceded<'a, P1, P2, T1, T2>(p1: P1, p2: P2) -> impl Fn(Cursor<'a>) -> PResult<'a, T2>
where
    P1: Fn(Cursor<'a>) -> PResult<'a, T1>,
    P2: Fn(Cursor<'a>) -> PResult<'a, T2>,
{
    move |c| {
        let (_, rest) = p1(c)?;
        p2(rest)
    }
}

/// Sequence two parsers, keeping the first result.
pub fn terminated<'a, P1, P2, T1, T2>(p1: P1, p2: P2) -> impl Fn(Cursor<'a>) -> PResult<'a, T1>
where
    P1: Fn(Cursor<'a>) -> PResult<'a, T1>,
    P2: Fn(Cursor<'a>) -> PResult<'a, T2>,
{
    move |c| {
        let (value, rest) = p1(c)?;
        let (_, rest) = p2(rest)?;
        Ok((value, rest))
    }
}

/// Succeed with `default` when `p` soft-fails.
pub fn option<'a, P, T>(default: T, p: P) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    T: Clone,
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |c| match p(c) {
        Err(Failure::Soft) => Ok((default.clone(), c)),
        other => other,
    }
}

fn accumulate<'a, P, F, T, U>(p: &P, fold: &F, mut acc: T, mut c: Cursor<'a>) -> PResult<'a, T>
where
    P: Fn(Cursor<'a>) -> PResult<'a, U>,
    F: Fn(T, U) -> T,
{
    while !c.is_empty() {
        match p(c) {
            Ok((value, rest)) => {
                acc = fold(acc, value);
                c = rest;
            }
            Err(Failure::Soft) => break,
            Err(hard) => return Err(hard),
        }
    }
    Ok((acc, c))
}

/// Zero-or-more `p`, folding each result into the accumulator. Never
/// soft-fails: stops at the first element-level soft failure, returning
/// everything accumulated plus the unconsumed remainder.
pub fn many<'a, P, F, T, U>(p: P, init: T, fold: F) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    T: Clone,
    P: Fn(Cursor<'a>) -> PResult<'a, U>,
    F: Fn(T, U) -> T,
{
    move |c| accumulate(&p, &fold, init.clone(), c)
}

/// One-or-more `p`; soft-fails if the first application fails.
pub fn many1<'a, P, F, T, U>(p: P, init: T, fold: F) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    T: Clone,
    P: Fn(Cursor<'a>) -> PResult<'a, U>,
    F: Fn(T, U) -> T,
{
    move |c| {
        let (first, rest) = p(c)?;
        accumulate(&p, &fold, fold(init.clone(), first), rest)
    }
}

/// Exactly `n` repetitions of `p`; soft-fails if fewer match.
pub fn exactly_n<'a, P, F, T, U>(
    p: P,
    n: usize,
    init: T,
    fold: F,
) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    T: Clone,
    P: Fn(Cursor<'a>) -> PResult<'a, U>,
    F: Fn(T, U) -> T,
{
    move |c| {
        let mut acc = init.clone();
        let mut cur = c;
        for _ in 0..n {
            let (value, rest) = p(cur)?;
            acc = fold(acc, value);
            cur = rest;
        }
        Ok((acc, cur))
    }
}

/// One-or-more `p` separated by `sep`, folded from the first result.
pub fn separated_by1<'a, P, S, F, T, U>(
    p: P,
    sep: S,
    fold: F,
) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
    S: Fn(Cursor<'a>) -> PResult<'a, U>,
    F: Fn(T, T) -> T,
{
    move |c| {
        let (first, rest) = p(c)?;
        let sep_then = |c: Cursor<'a>| {
            let (_, rest) = sep(c)?;
            p(rest)
        };
        accumulate(&sep_then, &fold, first, rest)
    }
}

/// Zero-or-more `p` separated by `sep`, folded into `init`. Zero matches
/// yield `init` without consuming input.
pub fn separated_by<'a, P, S, F, T, U, V>(
    p: P,
    sep: S,
    init: T,
    fold: F,
) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    T: Clone,
    P: Fn(Cursor<'a>) -> PResult<'a, U>,
    S: Fn(Cursor<'a>) -> PResult<'a, V>,
    F: Fn(T, U) -> T,
{
    move |c| {
        let (first, rest) = match p(c) {
            Ok(ok) => ok,
            Err(Failure::Soft) => return Ok((init.clone(), c)),
            Err(hard) => return Err(hard),
        };
        let sep_then = |c: Cursor<'a>| {
            let (_, rest) = sep(c)?;
            p(rest)
        };
        accumulate(&sep_then, &fold, fold(init.clone(), first), rest)
    }
}

/// Escalate a soft failure of `p` to a hard failure at the current offset.
/// The single conversion point between "try this production" and "this
/// production is now required".
pub fn require<'a, P, T>(p: P, message: &'static str) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |c| match p(c) {
        Err(Failure::Soft) => Err(Failure::Hard {
            offset: c.offset(),
            message,
        }),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// whitespace

/// Consume insignificant JSON whitespace: space, tab, CR, LF.
pub fn eat_ws(c: Cursor<'_>) -> Cursor<'_> {
    let mut n = 0;
    for &b in c.rest() {
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => n += 1,
            _ => break,
        }
    }
    c.advance(n)
}

/// `eat_ws` as a parser; never fails.
pub fn skip_ws(c: Cursor<'_>) -> PResult<'_, ()> {
    Ok(((), eat_ws(c)))
}
