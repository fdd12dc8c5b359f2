use proptest::prelude::*;
use submorph_dfa::{fallback, Dfa};

fn bounded_pattern() -> impl Strategy<Value = String> {
    let word = prop::sample::select(vec!["dev", "prod", "staging", "qa", "beta"]);
    let group = prop::collection::vec(word, 1..4)
        .prop_map(|words| format!("({})", words.join("|")));
    prop::collection::vec(group, 1..3).prop_map(|groups| groups.join("-"))
}

proptest! {
    #[test]
    fn fallback_agrees_with_dfa_on_bounded_patterns(pattern in bounded_pattern()) {
        let expected = Dfa::build(&pattern).unwrap().count_range_saturating(0, 64);
        let got = fallback::estimate(&pattern).unwrap().expect("no repetition in bounded_pattern");
        prop_assert_eq!(got, expected);
    }
}
