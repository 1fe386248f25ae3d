/*!
 * AI-powered batch translation.
 *
 * - `prompt`: paragraph tagging, prompt construction and response parsing
 * - `driver`: provider calls with bounded retry and backoff
 * - `style`: rolling style context carried between batches
 * - `usage`: token usage side-counter
 */

pub mod driver;
pub mod prompt;
pub mod style;
pub mod usage;

pub use driver::{BatchTranslation, TranslationDriver, DriverSettings};
pub use style::StyleContext;
pub use usage::TokenUsageStats;
