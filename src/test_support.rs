//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::catalog::{
    CatalogItem, CatalogPayload, CatalogRepository, DetailRecord, ErrorInfo, Fetched,
};

type Gate<T> = oneshot::Receiver<Fetched<T>>;

/// A repository whose answers are handed over by the test, one gate per call,
/// so tests decide exactly when (and in which order) each request completes.
#[derive(Default)]
pub struct ScriptedRepository {
    searches: Mutex<HashMap<String, Gate<CatalogPayload>>>,
    details: Mutex<HashMap<String, Gate<DetailRecord>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a search for `query`; the call completes when the returned sender fires.
    pub fn expect_search(&self, query: &str) -> oneshot::Sender<Fetched<CatalogPayload>> {
        let (tx, rx) = oneshot::channel();
        self.searches.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    /// Registers a detail lookup for `id`; the call completes when the returned sender fires.
    pub fn expect_detail(&self, id: &str) -> oneshot::Sender<Fetched<DetailRecord>> {
        let (tx, rx) = oneshot::channel();
        self.details.lock().unwrap().insert(id.to_string(), rx);
        tx
    }

    /// Calls received so far, as `search:<query>` / `detail:<id>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

async fn wait_on<T>(gate: Option<Gate<T>>, what: String) -> Fetched<T> {
    match gate {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(ErrorInfo::new(format!("{what}: gate dropped")))),
        None => Err(ErrorInfo::new(format!("unexpected {what}"))),
    }
}

#[async_trait]
impl CatalogRepository for ScriptedRepository {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search_catalog(&self, _api_key: &str, query: &str) -> Fetched<CatalogPayload> {
        let what = format!("search:{query}");
        self.calls.lock().unwrap().push(what.clone());
        let gate = self.searches.lock().unwrap().remove(query);
        wait_on(gate, what).await
    }

    async fn fetch_detail(&self, _api_key: &str, id: &str) -> Fetched<DetailRecord> {
        let what = format!("detail:{id}");
        self.calls.lock().unwrap().push(what.clone());
        let gate = self.details.lock().unwrap().remove(id);
        wait_on(gate, what).await
    }
}

/// A catalog item with placeholder year and no poster.
pub fn item(id: &str, title: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        kind: "movie".to_string(),
        poster_url: None,
    }
}

pub fn payload(items: &[CatalogItem]) -> CatalogPayload {
    CatalogPayload {
        items: items.to_vec(),
        total_results: items.len(),
    }
}

pub fn detail(id: &str, title: &str) -> DetailRecord {
    DetailRecord {
        id: id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        plot: format!("The plot of {title}."),
        ..Default::default()
    }
}
