//! Integration tests for literal name redaction over large name lists

use medredact::anonymization::models::{NameList, ProtectedTermSet};
use medredact::anonymization::names::{LiteralNameRedactor, FALLBACK_BATCH_SIZE};
use regex::Regex;
use test_case::test_case;

const TOKEN: &str = "[Name_Anonymized]";

fn patient_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Patient{i:04}")).collect()
}

/// One case-insensitive whole-word alternation over every name
fn reference_redact(text: &str, names: &[String]) -> String {
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort_by_key(|name| std::cmp::Reverse(name.len()));
    let alternation = sorted
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap();
    pattern.replace_all(text, TOKEN).into_owned()
}

fn sample_text() -> String {
    [
        "Patient0000 was seen with PATIENT0599 and patient1199.",
        "Patient12000 is not on the list, nor is xPatient0001 or Patient0001x.",
        "Follow-up: Patient0500/Patient0501; Patient0042's chart was updated.",
        "Unrelated words stay: Patients, Patient, 0042.",
    ]
    .join("\n")
}

#[test]
fn test_large_list_matches_single_regex_pass() {
    let names = patient_names(1200);
    let text = sample_text();

    let result = LiteralNameRedactor::default().redact(
        &text,
        &NameList::from(names.clone()),
        &ProtectedTermSet::new(),
        TOKEN,
    );

    assert_eq!(result.text, reference_redact(&text, &names));
    assert_eq!(result.redacted, 6);
    assert_eq!(result.skipped, 0);
}

#[test]
fn test_batches_agree_with_single_pass() {
    let names = patient_names(1200);
    let text = sample_text();
    let redactor = LiteralNameRedactor::default();

    let single = redactor.redact(
        &text,
        &NameList::from(names.clone()),
        &ProtectedTermSet::new(),
        TOKEN,
    );

    let borrowed: Vec<&str> = names.iter().map(String::as_str).collect();
    let batched = redactor.redact_in_batches(&text, &borrowed, TOKEN, FALLBACK_BATCH_SIZE);

    assert_eq!(batched.text, single.text);
    assert_eq!(batched.redacted, single.redacted);
}

#[test_case("Ann", "Ann and Anna met ANN", "[Name_Anonymized] and Anna met [Name_Anonymized]" ; "whole word only")]
#[test_case("o'brien", "Seen by O'Brien today", "Seen by [Name_Anonymized] today" ; "apostrophe")]
#[test_case("J. Smith", "J. Smith and J Smith", "[Name_Anonymized] and J Smith" ; "dot is literal")]
#[test_case("Zoë", "ZOË and zoë and Zoey", "[Name_Anonymized] and [Name_Anonymized] and Zoey" ; "unicode case folding")]
fn test_single_name(name: &str, text: &str, expected: &str) {
    let result = LiteralNameRedactor::default().redact(
        text,
        &NameList::from(vec![name]),
        &ProtectedTermSet::new(),
        TOKEN,
    );
    assert_eq!(result.text, expected);
}

#[test]
fn test_protected_names_are_dropped_from_large_list() {
    let mut names = patient_names(600);
    names.push("Warfarin".to_string());
    let protected: ProtectedTermSet = ["Warfarin"].into_iter().collect();

    let result = LiteralNameRedactor::default().redact(
        "Patient0001 takes Warfarin",
        &NameList::from(names),
        &protected,
        TOKEN,
    );
    assert_eq!(result.text, "[Name_Anonymized] takes Warfarin");
}

#[test]
fn test_long_names_are_redacted_and_blank_symbols_skipped() {
    let long_name = "x".repeat(1000);
    let text = format!("Jane --- {long_name} done");
    let names = NameList::from(vec![long_name.as_str(), "---", "Jane"]);

    let result = LiteralNameRedactor::default().redact(
        &text,
        &names,
        &ProtectedTermSet::new(),
        TOKEN,
    );
    assert_eq!(result.text, "[Name_Anonymized] --- [Name_Anonymized] done");
    assert_eq!(result.redacted, 2);
    assert_eq!(result.skipped, 1);
}

#[test_case("Seen by Jose\u{301} today; Jose alone; Ann\u{308}a and Ann." ; "decomposed accents")]
#[test_case("Ann\u{203f}Lee met Ann_Lee and Ann" ; "connector punctuation")]
#[test_case("ΟΔΥΣΣΕΑΣ and Οδυσσεας and οδυσσεασ" ; "greek sigma forms")]
#[test_case("ſam and SAM and Sam" ; "long s")]
fn test_unicode_text_agrees_with_regex(text: &str) {
    let names: Vec<String> = ["Jose", "Jose\u{301}", "Ann", "Οδυσσεας", "sam"]
        .into_iter()
        .map(str::to_string)
        .collect();

    let result = LiteralNameRedactor::default().redact(
        text,
        &NameList::from(names.clone()),
        &ProtectedTermSet::new(),
        TOKEN,
    );
    assert_eq!(result.text, reference_redact(text, &names));
}

#[test]
fn test_decomposed_name_inside_word_is_kept() {
    let result = LiteralNameRedactor::default().redact(
        "Seen by Jose\u{301} today",
        &NameList::from(vec!["Jose"]),
        &ProtectedTermSet::new(),
        TOKEN,
    );
    assert_eq!(result.text, "Seen by Jose\u{301} today");
    assert_eq!(result.redacted, 0);
}
