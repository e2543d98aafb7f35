pub mod analysis;
pub mod chatbot;
pub mod hotel;
pub mod loaders;
pub mod question;

pub use analysis::{AnalysisResponse, AnalysisResult, AnalysisStatus, BatchProgress, StatusSummary};
pub use chatbot::{find_chatbot, Chatbot, CHATBOTS};
pub use hotel::{Hotel, HotelForm, HotelList};
pub use loaders::{load_run_plan, RunPlan};
pub use question::{Question, QuestionList};
