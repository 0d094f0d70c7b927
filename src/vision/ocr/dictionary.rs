// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Character dictionary for CTC decoding

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::errors::{ensure_exists, LontaraError};

/// Class index reserved for the CTC blank
pub const BLANK_INDEX: usize = 0;

/// Immutable mapping from model class index to glyph
///
/// Index 0 is the blank (empty string); indices 1..=N are the dictionary
/// lines in file order. The table must match the class count the
/// recognition model was trained with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterTable {
    glyphs: Vec<String>,
}

impl CharacterTable {
    /// Load a dictionary file with one glyph per line
    ///
    /// Lines are taken verbatim apart from their line terminator, so a
    /// glyph made of a base letter plus combining mark stays intact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LontaraError> {
        let path = path.as_ref();
        ensure_exists("OCR character dictionary", path)?;

        let reader = BufReader::new(File::open(path)?);
        let mut glyphs = vec![String::new()];
        for line in reader.lines() {
            glyphs.push(line?);
        }

        debug!(
            "Loaded character dictionary from {} ({} glyphs)",
            path.display(),
            glyphs.len() - 1
        );
        Ok(Self { glyphs })
    }

    /// Build a table in memory; the blank is prepended automatically
    pub fn from_glyphs<I, S>(glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let glyphs = std::iter::once(String::new())
            .chain(glyphs.into_iter().map(Into::into))
            .collect();
        Self { glyphs }
    }

    /// Glyph for a class index
    pub fn glyph(&self, index: usize) -> Result<&str, LontaraError> {
        self.glyphs
            .get(index)
            .map(String::as_str)
            .ok_or(LontaraError::IndexOutOfRange {
                index,
                len: self.glyphs.len(),
            })
    }

    /// Number of classes including the blank
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: the blank entry is present in every table
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
