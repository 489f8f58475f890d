//! 基础设施层
//!
//! 持有稀缺资源（HTTP 客户端与 bearer token），只暴露能力，不认识业务流程。

pub mod api_executor;
pub mod auth;
pub mod record_api;

pub use api_executor::ApiExecutor;
pub use auth::get_token;
pub use record_api::RecordApi;
