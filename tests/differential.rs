//! Differential tests: for patterns expressible in this engine's grammar
//! (no classes, back-references, or counted repetition), the leftmost
//! match must agree with the `regex` crate on the same pattern/input pairs.

use regex::Regex;

const CASES: &[(&str, &[&str])] = &[
    ("Z(A|B)CC*", &["ZACCC", "xZBC", "ZC", "nope"]),
    ("(a*b|ac)d", &["acd", "aaabd", "bd", "d"]),
    ("z(a.*|b)z", &["zbbz", "zzaaaaaaaaaaaz", "zaz", "zz"]),
    ("^abc$", &["abc", "xabc", "abcx", ""]),
    ("a.*z", &["axz", "az", "aXXXz", "zzzz"]),
    ("a*", &["", "aaa", "baaab"]),
    ("a|b|c", &["a", "b", "c", "d", "xbx"]),
    ("(ab)*c", &["c", "ababc", "abc", "abab"]),
    (".", &["x", " ", ""]),
    ("a$", &["a", "ba", "ab"]),
    // `^` nested in an alternate reached after already-consumed input: the
    // anchor is checked against the current scan position, not the start
    // of this match attempt.
    ("a(b|^c)", &["ac", "ab", "c"]),
    ("(^a|b)", &["ba", "ab", "a"]),
];

#[test]
fn leftmost_match_agrees_with_regex_crate() {
    for (pattern, inputs) in CASES {
        let ours = ret::compile(pattern, true).unwrap();
        let theirs = Regex::new(pattern).unwrap();

        for input in *inputs {
            let ours_result = ours.find(input).unwrap().map(|m| (m.start(), m.end()));
            let theirs_result = theirs.find(input).map(|m| (m.start(), m.end()));
            assert_eq!(
                ours_result, theirs_result,
                "pattern {pattern:?} input {input:?} diverged from the regex crate"
            );
        }
    }
}

#[test]
fn optimised_and_unoptimised_agree_with_regex_crate_too() {
    for (pattern, inputs) in CASES {
        let unoptimised = ret::compile(pattern, false).unwrap();
        let theirs = Regex::new(pattern).unwrap();

        for input in *inputs {
            let ours_result = unoptimised.find(input).unwrap().map(|m| (m.start(), m.end()));
            let theirs_result = theirs.find(input).map(|m| (m.start(), m.end()));
            assert_eq!(
                ours_result, theirs_result,
                "unoptimised pattern {pattern:?} input {input:?} diverged from the regex crate"
            );
        }
    }
}
