//! Table tests for name normalisation and the duration grammar.
//!
//! Each `#[case]` runs in isolation.

use rstest::rstest;
use tubemirror_core::naming::{normalize_name, parse_duration, MAX_NAME_LEN};

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

#[rstest]
#[case("Video (something)", "video-something")]
#[case("cat and/or dog", "cat-and-or-dog")]
#[case("Awesome Movie", "awesome-movie")]
#[case("Watch Later: 2014/2015", "watch-later--2014-2015")]
#[case("Café", "caf--xe9")]
#[case("", "")]
fn normalize_examples(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_name(input), expected);
}

#[rstest]
#[case("MiXeD CaSe (With) Parens: and/slashes")]
#[case("日本語のタイトル (公式)")]
#[case("((((()))))")]
#[case("Ünïcödé/ÅÄÖ: ")]
fn normalized_output_is_path_safe(#[case] input: &str) {
    let name = normalize_name(&input.repeat(20));
    assert!(name.len() <= MAX_NAME_LEN, "too long: {}", name.len());
    assert_eq!(name, name.to_lowercase(), "must be lowercase: {name}");
    for forbidden in ['/', ':', ' ', '(', ')'] {
        assert!(!name.contains(forbidden), "contains {forbidden:?}: {name}");
    }
    assert!(name.is_ascii(), "must be ascii: {name}");
}

// ---------------------------------------------------------------------------
// Duration grammar
// ---------------------------------------------------------------------------

#[rstest]
#[case("PT1H45M29S", 6329)]
#[case("PT3M17S", 197)]
#[case("PT20S", 20)]
#[case("PT4M", 240)]
#[case("PT10H", 36_000)]
#[case("PT1H5S", 3605)]
#[case("PT", 0)]
#[case("P0D", 0)]
#[case("PT1M30.5S", 0)]
#[case("pt4m", 0)]
#[case(" PT4M", 0)]
#[case("PT123M", 0)]
#[case("PT01H02M03S", 3723)]
#[case("PT1H2H", 0)]
#[case("PT5", 0)]
#[case("PT１M", 0)]
fn duration_cases(#[case] text: &str, #[case] seconds: u64) {
    assert_eq!(parse_duration(text), seconds, "input: {text:?}");
}
