//! Scripted remote-query boundary.
//!
//! Each call to `query(method, ..)` pops the next scripted response for that
//! method. Unscripted calls fail with a venue error naming the method, so a
//! test notices an unexpected request instead of hanging on a default.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::port::{QueryParams, RemoteQuery};

type Scripted = std::result::Result<Value, String>;

#[derive(Default)]
pub struct ScriptedQuery {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(String, QueryParams)>>,
}

impl ScriptedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful payload for `method`.
    pub fn with_response(self, method: &str, payload: Value) -> Self {
        self.push(method, Ok(payload));
        self
    }

    /// Queue a venue error carrying `message` for `method`.
    pub fn with_error(self, method: &str, message: &str) -> Self {
        self.push(method, Err(message.to_string()));
        self
    }

    /// Queue a response after construction, e.g. behind an `Arc`.
    pub fn push(&self, method: &str, response: Scripted) {
        self.responses
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<(String, QueryParams)> {
        self.calls.lock().clone()
    }

    /// Parameters of every call to `method`, in order.
    pub fn calls_to(&self, method: &str) -> Vec<QueryParams> {
        self.calls
            .lock()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|(m, _)| m == method).count()
    }
}

#[async_trait]
impl RemoteQuery for ScriptedQuery {
    async fn query(&self, method: &str, params: &QueryParams) -> Result<Value> {
        self.calls.lock().push((method.to_string(), params.clone()));
        let next = self
            .responses
            .lock()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(message)) => Err(Error::Venue(message)),
            None => Err(Error::Venue(format!("no scripted response for {method}"))),
        }
    }
}
