//! Test doubles for the sheet source.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::SheetSource;
use crate::error::{Error, Result};

/// In-memory sheet that counts fetches and can be switched to failing.
#[derive(Debug)]
pub(crate) struct FakeSheet {
    body: Mutex<String>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl FakeSheet {
    pub(crate) fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Mutex::new(body.to_string()),
            fetches: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        })
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn set_body(&self, body: &str) {
        *self.body.lock().unwrap() = body.to_string();
    }
}

#[async_trait]
impl SheetSource for FakeSheet {
    async fn fetch(&self) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::UpstreamStatus {
                url: "memory://sheet".to_string(),
                status: 504,
            });
        }
        Ok(self.body.lock().unwrap().clone())
    }

    fn describe(&self) -> String {
        "memory://sheet".to_string()
    }
}

