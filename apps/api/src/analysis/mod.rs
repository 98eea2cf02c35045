// Resume analysis: the canonical result shape, the prompt sent to the live
// model, and the parser that turns model output into a result.

pub mod parser;
pub mod prompts;
pub mod result;

pub use parser::parse_analysis_response;
pub use result::AnalysisResult;
