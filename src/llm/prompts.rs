// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt construction for Lontara transliteration and translation

/// Glyph reference shared with the model: base consonants, vowel marks and
/// how the inherent vowel combines with them.
const LONTARA_GLYPH_REFERENCE: &str = "\
Base consonants (23):
ᨀ (ka), ᨁ (ga), ᨂ (nga), ᨃ (pa), ᨄ (ba), ᨅ (ma),
ᨆ (ta), ᨇ (da), ᨈ (na), ᨉ (ca), ᨊ (ja), ᨋ (nya),
ᨌ (ya), ᨍ (ra), ᨎ (la), ᨏ (wa), ᨐ (sa), ᨑ (a),
ᨒ (ha), ᨓ (fa), ᨔ (kha), ᨕ (sya), ᨖ (za)

Vowel diacritics:
ᨗ (i), ᨘ (u), ᨙ (e/ə), ᨚ (o), ᨛ (é)

A consonant without a diacritic carries the vowel \"a\".
  ᨀ + ᨗ = ki
  ᨀ + ᨘ = ku
  ᨅ + ᨙ = me
  ᨊ + ᨚ = no
  ᨄ + ᨛ = bé";

/// Build the prompt that turns recognized Lontara text into the
/// `aksara` / `latin` / `indonesia` JSON record
///
/// The recognized text is embedded twice: once as the input to work on and
/// once as the expected `aksara` value, so the model echoes it back as-is.
pub fn translate_text_prompt(text: &str) -> String {
    format!(
        r#"
You are a linguist who transliterates and translates Aksara Lontara (Bugis-Makassar script).
The input below has already been read by OCR and is Lontara text. Do only the following:

1. Transliterate the Lontara literally into Latin, character by character.
2. Reconstruct the intended Bugis/Makassar words by matching the literal transliteration
   to the closest valid dictionary words. Lontara does not write doubled consonants,
   final consonants (p, k, ng) or nasal clusters, so restore them where needed.
   For example: tapecoro -> tappecoro, takalupa -> takkaluppa,
   baturatamaribul -> baturatemaribala.
3. Translate the reconstructed phrase into natural Bahasa Indonesia.

{reference}

Answer with a single JSON object and nothing else: no markdown, no commentary.
Use "" for any field you cannot determine.

Input Lontara text:
{text}

Output JSON format:
{{
"aksara": "{text}",
"latin": "<latin transliteration>",
"indonesia": "<Bahasa Indonesia translation>"
}}
"#,
        reference = LONTARA_GLYPH_REFERENCE,
        text = text,
    )
}
