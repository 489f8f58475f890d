pub mod catalog;
pub mod payload;
pub mod record;
pub mod resource;
pub mod run_result;

pub use catalog::{Authority, District};
pub use payload::{AnalysisPayload, RagUpdate, SynthesisPayload};
pub use record::{DateRange, Envelope, Page, RagAnalysis, Record, RecordDetail};
pub use resource::Resource;
pub use run_result::RunResult;
