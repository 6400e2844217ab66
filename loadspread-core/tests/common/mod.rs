//! Balancer doubles shared by the integration tests

#![allow(dead_code)]

use loadspread_http::{HttpConfig, HttpManager};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{Request, Respond, ResponseTemplate};

pub fn hello(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "message": format!("Hello from Server: {}", id) }))
}

/// Answers as servers `1..=count` in strict rotation
pub struct RotatingServers {
    count: usize,
    next: AtomicUsize,
}

impl RotatingServers {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            next: AtomicUsize::new(0),
        }
    }
}

impl Respond for RotatingServers {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let turn = self.next.fetch_add(1, Ordering::SeqCst);
        hello(&(turn % self.count + 1).to_string())
    }
}

/// A pool that grows when `/add` is called and rotates over its members on `/home`
#[derive(Clone)]
pub struct GrowingPool {
    members: Arc<Mutex<Vec<String>>>,
    next: Arc<AtomicUsize>,
}

impl GrowingPool {
    pub fn new(initial: &[&str]) -> Self {
        Self {
            members: Arc::new(Mutex::new(initial.iter().map(|s| s.to_string()).collect())),
            next: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn members(&self) -> Vec<String> {
        self.members.lock().unwrap().clone()
    }

    pub fn add_endpoint(&self) -> PoolAdd {
        PoolAdd(self.clone())
    }

    pub fn home_endpoint(&self) -> PoolHome {
        PoolHome(self.clone())
    }
}

pub struct PoolAdd(GrowingPool);

impl Respond for PoolAdd {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let payload: serde_json::Value = match serde_json::from_slice(&request.body) {
            Ok(payload) => payload,
            Err(_) => return ResponseTemplate::new(400),
        };
        let mut members = self.0.members.lock().unwrap();
        if let Some(hostnames) = payload["hostnames"].as_array() {
            members.extend(hostnames.iter().filter_map(|h| h.as_str()).map(String::from));
        }
        ResponseTemplate::new(200).set_body_json(json!({
            "message": { "N": members.len(), "replicas": *members },
            "status": "successful"
        }))
    }
}

pub struct PoolHome(GrowingPool);

impl Respond for PoolHome {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let members = self.0.members.lock().unwrap();
        let turn = self.0.next.fetch_add(1, Ordering::SeqCst);
        hello(&members[turn % members.len()])
    }
}

pub fn client() -> Arc<HttpManager> {
    let config = HttpConfig {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        ..HttpConfig::default()
    };
    Arc::new(HttpManager::with_config(config).unwrap())
}
