use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::events::EngineMsg;

/// Periodic timer driving scheduler ticks from a dedicated thread.
///
/// The thread never touches engine state: it only posts `EngineMsg::Tick`
/// onto the intent queue, which the engine's owning thread drains. Interval
/// changes are done by stopping the worker and spawning a fresh one, never
/// by mutating a live period.
pub struct TickWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    interval_ms: f64,
}

pub fn spawn_tick_worker(interval_ms: f64, tx: Sender<EngineMsg>) -> TickWorker {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let period = Duration::from_secs_f64(interval_ms.max(1.0) / 1000.0);

    let handle = thread::spawn(move || loop {
        thread::sleep(period);
        if flag.load(Ordering::Relaxed) {
            break;
        }
        if tx.send(EngineMsg::Tick).is_err() {
            break;
        }
    });

    TickWorker {
        stop,
        handle: Some(handle),
        interval_ms,
    }
}

impl TickWorker {
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Stops the ticks and joins the thread. Effective within one period.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TickWorker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
