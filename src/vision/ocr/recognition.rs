// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lontara text recognition model
//!
//! Runs a PaddleOCR-style recognition network over a single text image and
//! collapses its per-timestep class scores into a string.

use ndarray::{Array3, Array4, ArrayView1, ArrayView3, Axis, Ix3};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::dictionary::{CharacterTable, BLANK_INDEX};
use super::preprocessing::{ImageNormalizer, NormalizerConfig};
use crate::errors::{ensure_exists, LontaraError};
use crate::vision::image_utils::ImageInput;

/// Anything that can turn an image of Lontara glyphs into text
pub trait Recognizer: Send + Sync {
    fn recognize(&self, input: &ImageInput) -> Result<String, LontaraError>;
}

/// Options for building an [`OnnxRecognizer`]
#[derive(Debug, Clone, Copy)]
pub struct RecognizerConfig {
    pub normalizer: NormalizerConfig,
    /// Try the CUDA execution provider before falling back to CPU
    pub use_gpu: bool,
    pub intra_threads: usize,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            use_gpu: false,
            intra_threads: 4,
        }
    }
}

/// ONNX Runtime recognizer
///
/// Holds one session for its whole lifetime. The session is not assumed to
/// be re-entrant, so concurrent `recognize` calls are serialized on a mutex.
#[derive(Clone)]
pub struct OnnxRecognizer {
    session: Arc<Mutex<Session>>,
    table: Arc<CharacterTable>,
    normalizer: ImageNormalizer,
    /// Model input name, resolved once at load time
    input_name: String,
    /// Model output name, resolved once at load time
    output_name: String,
}

impl std::fmt::Debug for OnnxRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxRecognizer")
            .field("dictionary_size", &self.table.len())
            .field("normalizer", &self.normalizer)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

fn ort_failure(context: &str) -> impl FnOnce(ort::Error) -> LontaraError + '_ {
    move |e| LontaraError::InferenceFailure(format!("{}: {}", context, e))
}

fn session_builder(intra_threads: usize) -> Result<SessionBuilder, LontaraError> {
    Session::builder()
        .map_err(ort_failure("Failed to create session builder"))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(ort_failure("Failed to set optimization level"))?
        .with_intra_threads(intra_threads)
        .map_err(ort_failure("Failed to set intra threads"))
}

impl OnnxRecognizer {
    /// Load the recognition model and its character dictionary
    ///
    /// # Errors
    /// - `ResourceNotFound` if the model or dictionary file is missing
    /// - `InferenceFailure` if ONNX Runtime cannot load the model
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        dict_path: P,
        config: RecognizerConfig,
    ) -> Result<Self, LontaraError> {
        let model_path = model_path.as_ref();
        let dict_path = dict_path.as_ref();

        ensure_exists("OCR recognition model", model_path)?;
        ensure_exists("OCR character dictionary", dict_path)?;

        info!(
            "Loading OCR recognition model from {}",
            model_path.display()
        );

        let table = CharacterTable::load(dict_path)?;
        info!(
            "Loaded character dictionary with {} classes (blank included)",
            table.len()
        );

        let session = if config.use_gpu {
            let cuda = session_builder(config.intra_threads)?
                .with_execution_providers([CUDAExecutionProvider::default().build()])
                .map_err(ort_failure("Failed to set CUDA execution provider"))?
                .commit_from_file(model_path);
            match cuda {
                Ok(session) => {
                    info!("CUDA execution provider initialized");
                    Some(session)
                }
                Err(e) => {
                    warn!("CUDA execution provider failed, falling back to CPU: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let session = match session {
            Some(session) => session,
            None => session_builder(config.intra_threads)?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .map_err(ort_failure("Failed to set CPU execution provider"))?
                .commit_from_file(model_path)
                .map_err(|e| {
                    LontaraError::InferenceFailure(format!(
                        "Failed to load OCR recognition model from {}: {}",
                        model_path.display(),
                        e
                    ))
                })?,
        };

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| {
                LontaraError::InferenceFailure("recognition model declares no inputs".into())
            })?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                LontaraError::InferenceFailure("recognition model declares no outputs".into())
            })?;

        debug!(
            "Recognition model loaded - input: {}, output: {}",
            input_name, output_name
        );
        info!("✅ OCR recognition model loaded successfully");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            table: Arc::new(table),
            normalizer: ImageNormalizer::new(config.normalizer),
            input_name,
            output_name,
        })
    }

    /// Get the dictionary size (blank included)
    pub fn dictionary_size(&self) -> usize {
        self.table.len()
    }
}

impl OnnxRecognizer {
    /// One forward pass over a normalized `[1, 3, H, W]` tensor
    fn infer(&self, tensor: Array4<f32>) -> Result<Array3<f32>, LontaraError> {
        let input_value =
            Value::from_array(tensor).map_err(ort_failure("Failed to create input tensor"))?;

        let mut session = self.session.lock().map_err(|_| {
            LontaraError::InferenceFailure("recognition session lock poisoned".into())
        })?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .map_err(ort_failure("Recognition inference failed"))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            LontaraError::InferenceFailure(format!("missing model output '{}'", self.output_name))
        })?;
        let logits = output
            .try_extract_array::<f32>()
            .map_err(ort_failure("Failed to extract output tensor"))?;
        let logits = logits.into_dimensionality::<Ix3>().map_err(|e| {
            LontaraError::InferenceFailure(format!("expected [batch, time, classes] output: {}", e))
        })?;

        Ok(logits.to_owned())
    }
}

impl Recognizer for OnnxRecognizer {
    fn recognize(&self, input: &ImageInput) -> Result<String, LontaraError> {
        run_recognition(&self.normalizer, &self.table, input, |tensor| {
            self.infer(tensor)
        })
    }
}

/// Normalize, run `infer`, then decode
///
/// `infer` is only called once the input has been normalized, so an
/// unusable image never reaches the session.
fn run_recognition<F>(
    normalizer: &ImageNormalizer,
    table: &CharacterTable,
    input: &ImageInput,
    infer: F,
) -> Result<String, LontaraError>
where
    F: FnOnce(Array4<f32>) -> Result<Array3<f32>, LontaraError>,
{
    let tensor = normalizer.normalize(input)?;
    debug!(
        "Recognizing {} input, tensor shape {:?}",
        input.kind(),
        tensor.shape()
    );

    let logits = infer(tensor)?;
    if logits.len_of(Axis(2)) != table.len() {
        debug!(
            "Model emits {} classes but dictionary has {}",
            logits.len_of(Axis(2)),
            table.len()
        );
    }

    let text = greedy_ctc_decode(logits.view(), table)?;
    debug!("Recognized {} chars", text.chars().count());
    Ok(text)
}

/// Index of the highest score; the first one wins on ties
fn argmax(scores: ArrayView1<'_, f32>) -> usize {
    let mut best_index = BLANK_INDEX;
    let mut best_score = f32::NEG_INFINITY;
    for (index, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }
    best_index
}

/// CTC (Connectionist Temporal Classification) greedy decoding
///
/// Takes the best class at every timestep of the first batch item, then
/// drops blanks and adjacent repeats. A doubled glyph therefore needs a
/// blank timestep between its two occurrences.
pub fn greedy_ctc_decode(
    logits: ArrayView3<'_, f32>,
    table: &CharacterTable,
) -> Result<String, LontaraError> {
    if logits.len_of(Axis(0)) == 0 {
        return Err(LontaraError::InferenceFailure(
            "recognition output has an empty batch".into(),
        ));
    }

    let indices: Vec<usize> = logits
        .index_axis(Axis(0), 0)
        .outer_iter()
        .map(argmax)
        .collect();

    collapse_indices(&indices, table)
}

/// Collapse a per-timestep best-path into text
pub fn collapse_indices(indices: &[usize], table: &CharacterTable) -> Result<String, LontaraError> {
    let mut text = String::new();
    let mut previous: Option<usize> = None;

    for &index in indices {
        if index != BLANK_INDEX && Some(index) != previous {
            text.push_str(table.glyph(index)?);
        }
        previous = Some(index);
    }

    Ok(text)
}
