pub mod catalog;
pub mod llm_service;
pub mod path_mapper;
pub mod record_pager;
pub mod result_publisher;
pub mod text_extractor;

pub use catalog::CatalogService;
pub use llm_service::{LlmService, Synthesis, Synthesizer};
pub use path_mapper::PathMapper;
pub use record_pager::RecordPager;
pub use result_publisher::{PublishStatus, ResultPublisher};
pub use text_extractor::{PdfTextExtractor, TextExtractor};
