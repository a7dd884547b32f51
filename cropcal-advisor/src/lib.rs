//! cropcal-advisor: Gemini-backed schedule generation and daily tips

pub mod gemini;
pub mod parse;
pub mod prompt;
pub mod tips;

pub use gemini::GeminiClient;
pub use parse::{decode_generated_schedule, decode_tips, DecodeError, GeneratedSchedule};
pub use tips::{daily_tips, fallback_tips, DailyTip};
