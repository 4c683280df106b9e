use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::{FivetranApi, FivetranError, FivetranResult};

type Call = (String, Vec<(String, String)>);

/// `FivetranApi` double that replays scripted responses in order and records
/// every request it receives.
pub struct ScriptedApi {
    responses: Mutex<VecDeque<FivetranResult<Value>>>,
    repeat: Option<Value>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub fn new(responses: Vec<Value>) -> Self {
        Self::from_results(responses.into_iter().map(Ok).collect())
    }

    pub fn from_results(responses: Vec<FivetranResult<Value>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            repeat: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with the same body.
    pub fn repeating(response: Value) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            repeat: Some(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls().into_iter().map(|(endpoint, _)| endpoint).collect()
    }
}

#[async_trait]
impl FivetranApi for ScriptedApi {
    async fn get(&self, endpoint: &str, query: &[(String, String)]) -> FivetranResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), query.to_vec()));

        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return response;
        }
        match &self.repeat {
            Some(response) => Ok(response.clone()),
            None => Err(FivetranError::Unexpected(format!(
                "no scripted response for {}",
                endpoint
            ))),
        }
    }
}
