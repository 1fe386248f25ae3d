/*!
 * # bookwai - Book-length document translation with AI
 *
 * A Rust library for translating long PDF documents with LLM providers.
 *
 * ## Features
 *
 * - Extract ordered pages from PDF or plain-text sources
 * - Segment pages into sentence-safe translation batches
 * - Keep terminology consistent with a growing glossary
 * - Detect paragraph-count divergence per batch
 * - Re-translate only the damaged batches and reassemble
 * - Resume interrupted runs from persisted artifacts
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `extraction`: Page store and page extractors
 * - `segmenter`: Sentence-safe batch segmentation
 * - `titles`: Chapter/section title heuristics
 * - `glossary`: Terminology store
 * - `translation`: AI-powered translation:
 *   - `translation::prompt`: Tagging, prompts and response parsing
 *   - `translation::driver`: Provider calls with bounded retry
 *   - `translation::style`: Rolling style context
 *   - `translation::usage`: Token usage side-counter
 * - `quality`: Paragraph-count divergence checks
 * - `reconcile`: Retry selection over persisted artifacts
 * - `assembler`: Deterministic document assembly
 * - `workspace`: On-disk artifact layout
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openai`: OpenAI-compatible chat completions client
 *   - `providers::anthropic`: Anthropic messages client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod assembler;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod glossary;
pub mod providers;
pub mod quality;
pub mod reconcile;
pub mod segmenter;
pub mod titles;
pub mod translation;
pub mod workspace;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{AppError, ExtractionError, PipelineError, ProviderError};
pub use quality::{BatchStatus, DivergencePolicy};
pub use reconcile::RetrySelection;
