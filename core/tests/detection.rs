use slng_core::{
    detect_slang, load_grouped_json, Detection, Detector, DetectorConfig, ElongationPolicy,
    Sentiment, SlangEntry,
};

fn entry(canonical: &str, slang: &str, sentiment: Sentiment) -> SlangEntry {
    SlangEntry::new(canonical, slang, sentiment)
}

fn neutral(slang: &str) -> SlangEntry {
    entry(slang, slang, Sentiment::Neutral)
}

fn detect(dict: Vec<SlangEntry>, text: &str, hint: Option<Sentiment>) -> Detection {
    Detector::new(dict, DetectorConfig::default()).detect(text, hint)
}

fn slangs(entries: &[SlangEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.slang.as_str()).collect()
}

fn assert_no_overlap(detection: &Detection) {
    let mut spans: Vec<_> = detection.raw_matches.iter().map(|m| m.span.clone()).collect();
    spans.sort_by_key(|s| s.start);
    for pair in spans.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "overlapping matches {:?} and {:?} in {:#?}",
            pair[0],
            pair[1],
            detection.raw_matches
        );
    }
}

#[test]
fn word_boundary_blocks_partial_words() {
    let detection = detect(vec![neutral("gas")], "gasing terus", None);
    assert!(detection.entries.is_empty());
    assert!(detection.raw_matches.is_empty());
}

#[test]
fn longest_spelling_wins() {
    let dict = vec![neutral("gas"), entry("gas pol", "gas pol", Sentiment::Positive)];
    let detection = detect(dict, "ayo gas pol rem blong", None);
    assert_eq!(slangs(&detection.entries), vec!["gas pol"]);
    let span = detection.raw_matches[0].span.clone();
    assert_eq!(&detection.searched_text[span], "gas pol");
}

#[test]
fn canonical_spellings_come_back_in_order() {
    let dict = vec![neutral("gak"), neutral("woi"), neutral("mantap")];
    let found = detect_slang("mantap woi gak", &dict, None);
    assert_eq!(slangs(&found), vec!["mantap", "woi", "gak"]);
}

#[test]
fn elongated_spelling_falls_back_to_base_entry() {
    let detection = detect(vec![neutral("woi")], "woooi", None);
    assert_eq!(slangs(&detection.entries), vec!["woi"]);
    assert!(!detection.normalized_retry);
}

#[test]
fn sentiment_hint_picks_matching_variant() {
    let dict = vec![
        entry("gas", "gas", Sentiment::Negative).with_translation("kentut", "fart"),
        entry("gas", "gas", Sentiment::Positive).with_translation("ayo", "let's go"),
    ];
    let found = detect_slang("gas", &dict, Some(Sentiment::Positive));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sentiment, Sentiment::Positive);
    assert_eq!(found[0].translation_target, "let's go");

    let found = detect_slang("gas", &dict, Some(Sentiment::Negative));
    assert_eq!(found[0].translation_target, "fart");
}

#[test]
fn sentiment_hint_applies_to_elongated_token() {
    let dict = vec![
        entry("gas", "gas", Sentiment::Negative),
        entry("gas", "gas", Sentiment::Positive),
    ];
    let detection = detect(dict, "gaaas", Some(Sentiment::Positive));
    assert_eq!(detection.entries[0].sentiment, Sentiment::Positive);
}

#[test]
fn closer_repeat_run_wins_for_elongated_token() {
    let dict = vec![
        entry("gas", "gas", Sentiment::Negative),
        entry("gas", "gass", Sentiment::Positive),
    ];
    // both spellings fit "gasss"; "gass" sits one repeat away instead of two
    let found = detect_slang("gasss", &dict, Some(Sentiment::Negative));
    assert_eq!(slangs(&found), vec!["gass"]);

    // "gass" cannot produce "gaaas", so only "gas" competes
    let found = detect_slang("gaaas", &dict, Some(Sentiment::Positive));
    assert_eq!(slangs(&found), vec!["gas"]);
}

#[test]
fn variant_absent_from_text_is_never_chosen() {
    let dict = vec![
        entry("gas", "gas", Sentiment::Positive),
        entry("gas", "gaskeun", Sentiment::Positive),
    ];
    let found = detect_slang("gasss dulu", &dict, None);
    assert_eq!(slangs(&found), vec!["gas"]);
}

#[test]
fn combining_marks_extend_the_word() {
    let dict = vec![neutral("gas")];
    assert!(detect_slang("gas\u{301}", &dict, None).is_empty());
    assert!(detect_slang("gas\u{301}ing", &dict, None).is_empty());
    assert_eq!(slangs(&detect_slang("gas\u{301} gas", &dict, None)), vec!["gas"]);
}

#[test]
fn repeated_word_is_reported_once() {
    let found = detect_slang("santuy aja, santuy aja", &[neutral("santuy")], None);
    assert_eq!(slangs(&found), vec!["santuy"]);
}

#[test]
fn repeated_variants_collapse_by_canonical_form() {
    let dict = vec![neutral("gak"), entry("gak", "ga", Sentiment::Neutral)];
    let detection = detect(dict, "ga mau, gak bisa", None);
    assert_eq!(detection.entries.len(), 1);
    assert_eq!(detection.entries[0].slang, "ga");
    assert_eq!(detection.detected[0].occurrences, 2);
}

#[test]
fn matching_is_case_insensitive() {
    let found = detect_slang("GAK MAU", &[neutral("gak")], None);
    assert_eq!(slangs(&found), vec!["gak"]);
}

#[test]
fn exact_matches_take_precedence_over_elongation() {
    let dict = vec![neutral("woi"), neutral("wooi")];
    let detection = detect(dict, "wooi", None);
    assert_eq!(detection.raw_matches.len(), 1);
    assert_eq!(slangs(&detection.entries), vec!["wooi"]);
}

#[test]
fn no_overlap_across_passes() {
    let dict = vec![
        neutral("gas"),
        neutral("gas pol"),
        neutral("pol"),
        neutral("woi"),
        neutral("anjay"),
    ];
    let detection = detect(
        dict,
        "woooi gas pol, gaaas poool anjaaay gas woi pol",
        Some(Sentiment::Neutral),
    );
    assert_no_overlap(&detection);
    assert_eq!(
        slangs(&detection.entries),
        vec!["woi", "gas pol", "anjay", "gas", "pol"]
    );
}

#[test]
fn detection_is_deterministic() {
    let dict = vec![
        entry("gas", "gas", Sentiment::Negative),
        entry("gas", "gas", Sentiment::Positive),
        entry("gas", "gass", Sentiment::Neutral),
        neutral("woi"),
        neutral("mantap"),
    ];
    let detector = Detector::new(dict, DetectorConfig::default());
    let text = "woooi mantaaap gasss, gas woi";
    let first = detector.detect(text, Some(Sentiment::Positive));
    for _ in 0..10 {
        let again = detector.detect(text, Some(Sentiment::Positive));
        assert_eq!(again.entries, first.entries);
        assert_eq!(again.raw_matches, first.raw_matches);
        assert_eq!(again.resolutions, first.resolutions);
    }
}

#[test]
fn empty_inputs_return_empty() {
    assert!(detect_slang("", &[neutral("gas")], None).is_empty());
    assert!(detect_slang("gas", &[], None).is_empty());
}

#[test]
fn blank_spellings_are_skipped() {
    let dict = vec![neutral(""), neutral("   "), neutral("woi")];
    assert_eq!(slangs(&detect_slang("woi  ", &dict, None)), vec!["woi"]);
}

#[test]
fn fallback_only_policy_differs_on_mixed_sentences() {
    let dict = vec![neutral("gak"), neutral("woi")];
    let cfg = DetectorConfig {
        elongation: ElongationPolicy::FallbackOnly,
        normalized_retry: false,
    };
    let fallback = Detector::new(dict.clone(), cfg).detect_entries("woooi gak mau", None);
    let always =
        Detector::new(dict, DetectorConfig::default()).detect_entries("woooi gak mau", None);
    assert_eq!(slangs(&fallback), vec!["gak"]);
    assert_eq!(slangs(&always), vec!["woi", "gak"]);
}

#[test]
fn grouped_dictionary_feeds_detection() {
    let json = r#"[
        {"canonicalForm": "anjay", "canonicalPronunciation": "an-jay", "variants": [
            {"slang": "anjay", "pronunciation": "an-jay", "translationID": "wah",
             "translationEN": "wow", "contextID": "", "contextEN": "",
             "exampleID": "", "exampleEN": "", "sentiment": "positive"},
            {"slang": "anjir", "pronunciation": "an-jir", "translationID": "wah",
             "translationEN": "damn", "contextID": "", "contextEN": "",
             "exampleID": "", "exampleEN": "", "sentiment": "negative"}
        ]}
    ]"#;
    let dict = load_grouped_json(json).unwrap();
    let found = detect_slang("Anjiiir, anjay banget", &dict, Some(Sentiment::Positive));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].canonical_form, "anjay");
    // the earliest occurrence is the elongated "anjiiir", which only "anjir"
    // can produce, so the positive hint does not pull in "anjay"
    assert_eq!(found[0].slang, "anjir");
    assert_eq!(found[0].sentiment, Sentiment::Negative);
}
