pub mod api;

use crate::agent::AnswerAgent;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    agent: Arc<AnswerAgent>,
}

impl Server {
    pub fn new(addr: String, agent: Arc<AnswerAgent>) -> Self {
        Self { addr, agent }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(&self.addr, self.agent.clone()).await
    }
}
