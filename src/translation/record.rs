// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Deserializer, Serialize};

/// Result of one transliteration and translation
///
/// All three fields are always present; an undetermined field is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Lontara text as recognized or supplied
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aksara: String,
    /// Latin transliteration
    #[serde(default, deserialize_with = "null_as_empty")]
    pub latin: String,
    /// Bahasa Indonesia translation
    #[serde(default, deserialize_with = "null_as_empty")]
    pub indonesia: String,
}

impl TranslationRecord {
    pub fn new(
        aksara: impl Into<String>,
        latin: impl Into<String>,
        indonesia: impl Into<String>,
    ) -> Self {
        Self {
            aksara: aksara.into(),
            latin: latin.into(),
            indonesia: indonesia.into(),
        }
    }

    /// The record returned when nothing could be determined
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.aksara.is_empty() && self.latin.is_empty() && self.indonesia.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
