// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Reply coercion tests against reply shapes seen from generative models

use aksara_lontara::translation::{clean_json_text, coerce, parse_record};
use aksara_lontara::TranslationRecord;

const REPLY: &str = r#"{
"aksara": "ᨕᨁ ᨊᨚ",
"latin": "aga jo",
"indonesia": "apa itu"
}"#;

#[test]
fn test_plain_and_fenced_replies_agree() {
    let expected = TranslationRecord::new("ᨕᨁ ᨊᨚ", "aga jo", "apa itu");
    let variants = [
        REPLY.to_string(),
        format!("```json\n{}\n```", REPLY),
        format!("```\n{}\n```", REPLY),
        format!("\n\n   ```json\n{}\n```   \n", REPLY),
    ];
    for variant in &variants {
        assert_eq!(coerce(variant), expected, "reply: {:?}", variant);
    }
}

#[test]
fn test_clean_is_idempotent() {
    let fenced = format!("```json\n{}\n```", REPLY);
    let once = clean_json_text(&fenced);
    assert_eq!(clean_json_text(&once), once);
}

#[test]
fn test_prose_reply_is_empty_record() {
    let reply = "Maaf, saya tidak dapat membaca teks ini.";
    assert!(parse_record(&clean_json_text(reply)).is_err());
    assert_eq!(coerce(reply), TranslationRecord::empty());
}

#[test]
fn test_truncated_reply_is_empty_record() {
    let cut = REPLY.find("\"latin\"").unwrap();
    let truncated = &REPLY[..cut];
    assert_eq!(coerce(truncated), TranslationRecord::empty());
}

#[test]
fn test_unclosed_fence_still_parses() {
    let reply = format!("```json\n{}", REPLY);
    assert_eq!(coerce(&reply).latin, "aga jo");
}

#[test]
fn test_partial_reply_fills_missing_fields() {
    let record = coerce(r#"{"aksara": "ᨕᨁ", "indonesia": null}"#);
    assert_eq!(record, TranslationRecord::new("ᨕᨁ", "", ""));
}
