pub mod gemini;
pub mod traits;

pub use gemini::Gemini;
pub use traits::{Message, MessageRole, TextGenerator};
