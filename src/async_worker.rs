//! Background suggestion computation.
//!
//! One worker thread per session. Every submitted request bumps a
//! generation counter; the worker drains its queue to the newest item and
//! checks the counter before and after computing, so superseded work is
//! dropped as early as possible. The polling side re-checks the generation,
//! which keeps exactly the latest result visible and delivers results in
//! request order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use crate::suggest::{LexiconTables, Suggestion, SuggestionEngine, SuggestionRequest};

pub(crate) struct SuggestWork {
    pub request: SuggestionRequest,
    pub generation: u64,
}

pub(crate) struct SuggestResult {
    pub generation: u64,
    pub suggestions: Vec<Suggestion>,
}

pub(crate) struct AsyncWorker {
    tx: mpsc::Sender<SuggestWork>,
    rx: Mutex<mpsc::Receiver<SuggestResult>>,
    generation: Arc<AtomicU64>,
}

impl AsyncWorker {
    pub fn new(tables: Arc<LexiconTables>) -> Self {
        let generation = Arc::new(AtomicU64::new(0));
        let (work_tx, work_rx) = mpsc::channel::<SuggestWork>();
        let (result_tx, result_rx) = mpsc::channel::<SuggestResult>();
        {
            let generation = Arc::clone(&generation);
            thread::Builder::new()
                .name("glidekey-suggest".into())
                .spawn(move || suggest_worker(work_rx, result_tx, generation, tables))
                .expect("failed to spawn suggestion worker");
        }
        Self {
            tx: work_tx,
            rx: Mutex::new(result_rx),
            generation,
        }
    }

    /// Enqueue one computation. Logically supersedes every earlier request.
    pub fn submit(&self, request: SuggestionRequest) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.tx.send(SuggestWork {
            request,
            generation,
        });
    }

    /// Drop any not-yet-delivered work without queueing a replacement.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// The newest finished result, if it is still current. Stale results
    /// are consumed and dropped here, never returned.
    pub fn try_recv(&self) -> Option<SuggestResult> {
        let rx = self.rx.lock().ok()?;
        while let Ok(result) = rx.try_recv() {
            if result.generation == self.generation.load(Ordering::SeqCst) {
                return Some(result);
            }
        }
        None
    }
}

fn suggest_worker(
    rx: mpsc::Receiver<SuggestWork>,
    tx: mpsc::Sender<SuggestResult>,
    generation: Arc<AtomicU64>,
    tables: Arc<LexiconTables>,
) {
    let engine = SuggestionEngine::new(tables);
    while let Ok(work) = rx.recv() {
        // Skip to the newest queued request.
        let mut latest = work;
        while let Ok(newer) = rx.try_recv() {
            latest = newer;
        }

        if latest.generation != generation.load(Ordering::SeqCst) {
            continue;
        }
        let suggestions = engine.suggest(&latest.request);
        if latest.generation != generation.load(Ordering::SeqCst) {
            continue;
        }
        let _ = tx.send(SuggestResult {
            generation: latest.generation,
            suggestions,
        });
    }
}
