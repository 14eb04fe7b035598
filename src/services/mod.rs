pub mod ai_service;
pub mod catalog; // Static fabric/brand reference data
pub mod gemini; // Gemini grading client
pub mod history;

pub use ai_service::{GradingError, GradingService};
pub use gemini::GeminiService;
pub use history::HistoryLog;
