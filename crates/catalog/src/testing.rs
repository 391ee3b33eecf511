use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::UpstreamFailure;
use crate::provider::CatalogSource;

/// Scripted catalog: answers by path and records every call.
#[derive(Default)]
pub struct StubCatalog {
    responses: HashMap<String, Result<Value, UpstreamFailure>>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Ok(body));
        self
    }

    pub fn fail(mut self, path: &str, failure: UpstreamFailure) -> Self {
        self.responses.insert(path.to_string(), Err(failure));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn params_for(&self, path: &str) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .find(|(p, _)| p == path)
            .map(|(_, params)| params)
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CatalogSource for StubCatalog {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_resource(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, UpstreamFailure> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), params.to_vec()));
        self.responses
            .get(path)
            .cloned()
            .unwrap_or(Err(UpstreamFailure::NotFound))
    }
}
