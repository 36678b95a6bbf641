//! Scripted executors shared by unit tests

use crate::error::{Error, Result};
use crate::http::Executor;
use crate::page::{ApiProblem, Envelope, Meta};
use crate::request::Request;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Returns scripted results in order and records every request it sees
#[derive(Default)]
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<Result<Envelope>>>,
    seen: Mutex<Vec<Request>>,
}

impl ScriptedExecutor {
    pub fn new(script: Vec<Result<Envelope>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<Request> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Executor<Envelope> for ScriptedExecutor {
    async fn execute(&self, request: &Request) -> Result<Envelope> {
        self.seen.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::decode("script exhausted")))
    }
}

/// Executor that always panics
pub struct PanickingExecutor;

#[async_trait]
impl Executor<Envelope> for PanickingExecutor {
    async fn execute(&self, _request: &Request) -> Result<Envelope> {
        panic!("executor exploded");
    }
}

/// A page with `count` items and an optional next token
pub fn page(count: usize, next_token: Option<&str>) -> Envelope {
    let items: Vec<_> = (0..count)
        .map(|i| serde_json::json!({"id": i.to_string()}))
        .collect();
    Envelope {
        data: Some(serde_json::Value::Array(items)),
        meta: Some(Meta {
            result_count: Some(count as u64),
            next_token: next_token.map(str::to_string),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// A page that decoded fine but also reports a problem
pub fn page_with_problem(next_token: Option<&str>, title: &str) -> Envelope {
    let mut envelope = page(1, next_token);
    envelope.errors.push(ApiProblem {
        title: Some(title.to_string()),
        ..Default::default()
    });
    envelope
}

pub fn seed() -> Request {
    Request::get("https://api.example.com/2/users/42/tweets")
        .unwrap()
        .with_query_pair("max_results", "10")
        .with_query_pair("tweet.fields", "created_at")
}
