use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::planner::Planner;
use crate::services::ai::LlmProvider;

pub struct AppState {
    /// Single-writer working set; planner methods await the repository, so
    /// this is an async mutex.
    pub planner: Mutex<Planner>,
    pub llm: Box<dyn LlmProvider>,
    pub config: AppConfig,
}
