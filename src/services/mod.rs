pub mod hotel_service;
pub mod question_service;
pub mod report_service;
pub mod transcript_writer;

pub use hotel_service::HotelService;
pub use question_service::QuestionService;
pub use report_service::{load_results, ReportService};
pub use transcript_writer::TranscriptWriter;
