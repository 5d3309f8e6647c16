//! Shared test helpers for agent tests.

use pblforge_core::backend::{GenerationBackend, GenerationRequest, Part};
use pblforge_core::error::BackendError;
use std::sync::Mutex;

/// A mock backend that returns a sequence of scripted results.
///
/// Each call to `generate` returns the next result in the queue.
/// Panics if more calls are made than results provided.
pub struct SequentialMockBackend {
    results: Mutex<Vec<Result<String, BackendError>>>,
    call_count: Mutex<usize>,
}

impl SequentialMockBackend {
    pub fn new(results: Vec<Result<String, BackendError>>) -> Self {
        Self {
            results: Mutex::new(results),
            call_count: Mutex::new(0),
        }
    }

    /// A backend that returns a single text response.
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// A backend whose single call fails with the given error.
    pub fn failing(error: BackendError) -> Self {
        Self::new(vec![Err(error)])
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl GenerationBackend for SequentialMockBackend {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<String, BackendError> {
        let mut count = self.call_count.lock().unwrap();
        let results = self.results.lock().unwrap();

        if *count >= results.len() {
            panic!(
                "SequentialMockBackend: no more results (call #{}, have {})",
                *count,
                results.len()
            );
        }

        let result = results[*count].clone();
        *count += 1;
        result
    }
}

/// A mock backend that records the request it received.
pub struct RecordingBackend {
    response: String,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl RecordingBackend {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            last_request: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GenerationBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording_mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError> {
        *self.last_request.lock().unwrap() = Some(request);
        Ok(self.response.clone())
    }
}

/// Assertion sugar for inspecting recorded requests.
pub trait RequestTextExt {
    /// The text of the first part; panics if it is not a text part.
    fn text_of_first_part(&self) -> String;
}

impl RequestTextExt for GenerationRequest {
    fn text_of_first_part(&self) -> String {
        match self.parts.first() {
            Some(Part::Text { text }) => text.clone(),
            other => panic!("expected a leading text part, got {other:?}"),
        }
    }
}
