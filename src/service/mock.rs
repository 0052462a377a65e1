//! # Mock Product API
//!
//! [`MockProductApi`] implements [`ProductApi`] entirely in memory. Tests queue up the
//! calls they expect, in order, together with the response each call should get:
//!
//! ```rust
//! use product_catalog::model::Product;
//! use product_catalog::service::mock::MockProductApi;
//! use product_catalog::service::{ProductApi, ServiceError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockProductApi::new();
//!     mock.expect_list().return_ok(vec![Product::builder().id("1").build()]);
//!     mock.expect_delete("1").return_err(ServiceError::Transport("offline".into()));
//!
//!     assert_eq!(mock.list().await.unwrap().len(), 1);
//!     assert!(mock.delete("1").await.is_err());
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Holding a response back
//!
//! `return_ok_gated` / `return_err_gated` hand back a [`Gate`]. The call blocks until
//! the gate is opened (or dropped), which lets a test decide the order in which
//! overlapping requests complete.
//!
//! ## Mismatches
//!
//! A call that doesn't match the next expectation fails with a
//! [`ServiceError::Transport`] instead of panicking, because the caller usually runs
//! on a spawned task where a panic would only show up as a hang. The mismatch is
//! recorded and [`MockProductApi::verify`] reports it.

use crate::model::Product;
use crate::service::{ImageUpload, ProductApi, ServiceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    GetById(String),
    Create(Product),
    Update(Product),
    Delete(String),
    Search(String),
    Upload { draft: Product, file_name: String },
}

struct Reply<T> {
    response: Result<T, ServiceError>,
    gate: Option<oneshot::Receiver<()>>,
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, ServiceError> {
        if let Some(gate) = self.gate {
            // Opened or dropped, either way the response is released.
            let _ = gate.await;
        }
        self.response
    }
}

enum Expectation {
    List(Reply<Vec<Product>>),
    GetById { id: String, reply: Reply<Product> },
    Create(Reply<Product>),
    Update { id: String, reply: Reply<Product> },
    Delete { id: String, reply: Reply<()> },
    Search { term: String, reply: Reply<Vec<Product>> },
    Upload(Reply<Product>),
}

impl Expectation {
    fn describe(&self) -> String {
        match self {
            Expectation::List(_) => "list".to_string(),
            Expectation::GetById { id, .. } => format!("get_by_id({id})"),
            Expectation::Create(_) => "create".to_string(),
            Expectation::Update { id, .. } => format!("update({id})"),
            Expectation::Delete { id, .. } => format!("delete({id})"),
            Expectation::Search { term, .. } => format!("search({term})"),
            Expectation::Upload(_) => "upload".to_string(),
        }
    }
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<Call>,
    mismatches: Vec<String>,
}

/// Releases a gated response.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

/// Builder that attaches a response to a queued expectation.
pub struct ReplyBuilder<T> {
    state: Arc<Mutex<MockState>>,
    wrap: Box<dyn FnOnce(Reply<T>) -> Expectation + Send>,
}

impl<T> ReplyBuilder<T> {
    fn push(self, response: Result<T, ServiceError>, gate: Option<oneshot::Receiver<()>>) {
        let expectation = (self.wrap)(Reply { response, gate });
        self.state.lock().unwrap().expectations.push_back(expectation);
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value), None);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ServiceError) {
        self.push(Err(error), None);
    }

    /// Like [`return_ok`](Self::return_ok), but the call waits for the returned gate.
    pub fn return_ok_gated(self, value: T) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(Ok(value), Some(rx));
        Gate(tx)
    }

    /// Like [`return_err`](Self::return_err), but the call waits for the returned gate.
    pub fn return_err_gated(self, error: ServiceError) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(Err(error), Some(rx));
        Gate(tx)
    }
}

/// In-memory [`ProductApi`] driven by a FIFO of expectations.
#[derive(Clone, Default)]
pub struct MockProductApi {
    state: Arc<Mutex<MockState>>,
}

impl MockProductApi {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    fn builder<T>(
        &self,
        wrap: impl FnOnce(Reply<T>) -> Expectation + Send + 'static,
    ) -> ReplyBuilder<T> {
        ReplyBuilder {
            state: self.state.clone(),
            wrap: Box::new(wrap),
        }
    }

    pub fn expect_list(&self) -> ReplyBuilder<Vec<Product>> {
        self.builder(Expectation::List)
    }

    pub fn expect_get_by_id(&self, id: impl Into<String>) -> ReplyBuilder<Product> {
        let id = id.into();
        self.builder(move |reply| Expectation::GetById { id, reply })
    }

    pub fn expect_create(&self) -> ReplyBuilder<Product> {
        self.builder(Expectation::Create)
    }

    pub fn expect_update(&self, id: impl Into<String>) -> ReplyBuilder<Product> {
        let id = id.into();
        self.builder(move |reply| Expectation::Update { id, reply })
    }

    pub fn expect_delete(&self, id: impl Into<String>) -> ReplyBuilder<()> {
        let id = id.into();
        self.builder(move |reply| Expectation::Delete { id, reply })
    }

    pub fn expect_search(&self, term: impl Into<String>) -> ReplyBuilder<Vec<Product>> {
        let term = term.into();
        self.builder(move |reply| Expectation::Search { term, reply })
    }

    pub fn expect_upload(&self) -> ReplyBuilder<Product> {
        self.builder(Expectation::Upload)
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Panics unless every expectation was consumed and no call mismatched.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.mismatches.is_empty() {
            panic!("Unexpected calls: {:?}", state.mismatches);
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state.expectations.iter().map(Expectation::describe).collect();
            panic!("Not all expectations were met. Remaining: {:?}", remaining);
        }
    }

    /// Records `call` and pops the next expectation if `pick` accepts it.
    fn next<T>(
        &self,
        call: Call,
        pick: impl FnOnce(Expectation) -> Result<Reply<T>, Expectation>,
    ) -> Result<Reply<T>, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let description = format!("{call:?}");
        state.calls.push(call);

        let Some(expectation) = state.expectations.pop_front() else {
            state.mismatches.push(format!("{description} with no expectation left"));
            return Err(ServiceError::Transport(format!("unexpected call: {description}")));
        };
        match pick(expectation) {
            Ok(reply) => Ok(reply),
            Err(expectation) => {
                state
                    .mismatches
                    .push(format!("{description}, expected {}", expectation.describe()));
                state.expectations.push_front(expectation);
                Err(ServiceError::Transport(format!("unexpected call: {description}")))
            }
        }
    }
}

#[async_trait]
impl ProductApi for MockProductApi {
    async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let reply = self.next(Call::List, |exp| match exp {
            Expectation::List(reply) => Ok(reply),
            other => Err(other),
        })?;
        reply.resolve().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Product, ServiceError> {
        let reply = self.next(Call::GetById(id.to_string()), |exp| match exp {
            Expectation::GetById { id: expected, reply } if expected == id => Ok(reply),
            other => Err(other),
        })?;
        reply.resolve().await
    }

    async fn create(&self, draft: &Product) -> Result<Product, ServiceError> {
        let reply = self.next(Call::Create(draft.clone()), |exp| match exp {
            Expectation::Create(reply) => Ok(reply),
            other => Err(other),
        })?;
        reply.resolve().await
    }

    async fn update(&self, product: &Product) -> Result<Product, ServiceError> {
        let reply = self.next(Call::Update(product.clone()), |exp| match exp {
            Expectation::Update { id, reply } if id == product.id => Ok(reply),
            other => Err(other),
        })?;
        reply.resolve().await
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let reply = self.next(Call::Delete(id.to_string()), |exp| match exp {
            Expectation::Delete { id: expected, reply } if expected == id => Ok(reply),
            other => Err(other),
        })?;
        reply.resolve().await
    }

    async fn search(&self, term: &str) -> Result<Vec<Product>, ServiceError> {
        let reply = self.next(Call::Search(term.to_string()), |exp| match exp {
            Expectation::Search { term: expected, reply } if expected == term => Ok(reply),
            other => Err(other),
        })?;
        reply.resolve().await
    }

    async fn upload(&self, draft: &Product, image: &ImageUpload) -> Result<Product, ServiceError> {
        let call = Call::Upload {
            draft: draft.clone(),
            file_name: image.file_name.clone(),
        };
        let reply = self.next(call, |exp| match exp {
            Expectation::Upload(reply) => Ok(reply),
            other => Err(other),
        })?;
        reply.resolve().await
    }
}
