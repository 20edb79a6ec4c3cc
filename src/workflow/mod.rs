pub mod survey_ctx;
pub mod survey_flow;

pub use survey_ctx::SurveyCtx;
pub use survey_flow::{SubmitOutcome, SurveyFlow};
