pub mod identity;
pub mod loaders;
pub mod question;
pub mod response;

pub use identity::Identity;
pub use loaders::parse_question_bank;
pub use question::{AnswerChoice, QuestionRecord, CHOICE_LETTERS};
pub use response::{answer_key, AnswerEntry, ResponseSession, ResultSummary};
