//! Lexicon Moderation - staged content moderation for submissions
//!
//! Provides a moderation pipeline that:
//! - Applies cheap local heuristics first (spam, length)
//! - Escalates surviving content to an external classifier
//! - Fails closed: classifier outages become manual-review rejections
//!
//! The pipeline produces a typed verdict; the note encoding
//! (`"[KIND] message"`) is the contract the moderation dashboard reads.

pub mod classifier;
pub mod fakes;
pub mod note;
pub mod openai;
pub mod pipeline;

// Re-export key types
pub use classifier::{Classification, ClassifierError, ContentClassifier, ProfanityReport};
pub use note::{ModerationNote, NoteKind};
pub use openai::OpenAiClassifier;
pub use pipeline::{ModerationPipeline, SubmissionContent, Verdict};
