/// Hand-written fakes for the ports that need scripted behaviour
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;
use urbis_lib::modules::city::domain::{CoordinatesDetails, GovernorDetails};
use urbis_lib::modules::city::ReferenceLookup;
use urbis_lib::modules::data_import::HistoryRefresh;
use urbis_lib::modules::jobs::{ImportHistorySource, ImportOperation};
use urbis_lib::shared::application::pagination::{Page, PageRequest};
use urbis_lib::shared::{AppError, AppResult};

/// In-memory history that pages a list of operations like the service does
#[derive(Default)]
pub struct FakeHistory {
    operations: Mutex<Vec<ImportOperation>>,
    calls: Mutex<Vec<PageRequest>>,
    failing: AtomicBool,
    gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
}

impl FakeHistory {
    pub fn with_operations(operations: Vec<ImportOperation>) -> Self {
        Self {
            operations: Mutex::new(operations),
            ..Default::default()
        }
    }

    pub fn set_operations(&self, operations: Vec<ImportOperation>) {
        *self.operations.lock().unwrap() = operations;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls().iter().map(|r| r.page).collect()
    }

    /// The next fetch of `page` waits until the returned sender fires
    pub fn hold_page(&self, page: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(page, rx);
        tx
    }

    fn page_of(&self, request: PageRequest) -> Page<ImportOperation> {
        let operations = self.operations.lock().unwrap();
        let size = request.size.max(1) as usize;
        let total = operations.len();
        let total_pages = total.div_ceil(size) as u32;
        let start = request.page as usize * size;
        let content = if start < total {
            operations[start..(start + size).min(total)].to_vec()
        } else {
            Vec::new()
        };
        Page::new(content, total_pages, total as u64)
    }
}

#[async_trait]
impl ImportHistorySource for FakeHistory {
    async fn fetch_page(&self, request: PageRequest) -> AppResult<Page<ImportOperation>> {
        self.calls.lock().unwrap().push(request);
        let gate = self.gates.lock().unwrap().remove(&request.page);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError("history unavailable".to_string()));
        }
        Ok(self.page_of(request))
    }
}

/// History that loses a page between every request, so any page past the
/// first always comes back out of range
#[derive(Default)]
pub struct ShrinkingHistory {
    calls: Mutex<Vec<u32>>,
}

impl ShrinkingHistory {
    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImportHistorySource for ShrinkingHistory {
    async fn fetch_page(&self, request: PageRequest) -> AppResult<Page<ImportOperation>> {
        self.calls.lock().unwrap().push(request.page);
        let total_pages = request.page;
        Ok(Page::new(
            Vec::new(),
            total_pages,
            total_pages as u64 * request.size as u64,
        ))
    }
}

/// Counts history refresh requests
#[derive(Default)]
pub struct CountingRefresh {
    count: AtomicUsize,
}

impl CountingRefresh {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryRefresh for CountingRefresh {
    async fn refresh_history(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Lookup that only knows the given ids
#[derive(Default)]
pub struct FakeLookup {
    coordinates: HashSet<i64>,
    governors: HashSet<i64>,
}

impl FakeLookup {
    pub fn knowing(coordinates: &[i64], governors: &[i64]) -> Self {
        Self {
            coordinates: coordinates.iter().copied().collect(),
            governors: governors.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl ReferenceLookup for FakeLookup {
    async fn find_coordinates(&self, id: i64) -> Option<CoordinatesDetails> {
        self.coordinates
            .contains(&id)
            .then_some(CoordinatesDetails { id, x: 1.0, y: 2.0 })
    }

    async fn find_governor(&self, id: i64) -> Option<GovernorDetails> {
        self.governors
            .contains(&id)
            .then_some(GovernorDetails { id, height: 170.0 })
    }
}
