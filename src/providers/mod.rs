pub mod gemini;
pub mod mock;
pub mod util;
