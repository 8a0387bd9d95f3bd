//! The single entry point for front ends: find buttons on the diagram,
//! receive infrared signals and manage the bindings between them.

use crate::{
    bindings::{BindingStore, BindingTable},
    buttons::{ButtonGeometry, ButtonId},
    config::Config,
    dedup::SignalDeduplicator,
    input::DeviceEventReader,
    signal::{Signal, SignalSample},
    Error,
};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
    time::Duration,
};

/// Everything a front end may do. Button names and signals arrive as text
/// and are validated here, before anything is changed.
///
/// Only one acquisition runs at a time; a second caller waits for the first
/// to finish. Changes to the bindings are serialized separately, so they are
/// not held up by a pending acquisition.
#[derive(Debug)]
pub struct Analyzer {
    geometry: ButtonGeometry,
    reader: Mutex<DeviceEventReader>,
    store: Mutex<BindingStore>,
}

// the state behind both locks is consistent between calls, so a panic in
// another thread does not leave anything half done
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Analyzer {
    pub fn new(reader: DeviceEventReader, store: BindingStore) -> Self {
        Analyzer {
            geometry: ButtonGeometry::new(),
            reader: Mutex::new(reader),
            store: Mutex::new(store),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let dedup = SignalDeduplicator::new(config.debounce());

        Analyzer::new(
            DeviceEventReader::new(&config.device, dedup),
            BindingStore::open(&config.bindings),
        )
    }

    /// Which button, if any, is at this point on the diagram
    pub fn locate_button(&self, x: f64, y: f64) -> Option<ButtonId> {
        self.geometry.hit_test(x, y)
    }

    /// Block until an infrared signal arrives, or the timeout expires
    pub fn acquire_signal(&self, timeout: Duration) -> Result<SignalSample, Error> {
        lock(&self.reader).wait_for_signal(timeout)
    }

    /// Bind a signal like `0x20DF02FD` to a button like `up`
    pub fn bind(&self, button: &str, signal: &str) -> Result<(), Error> {
        let button: ButtonId = button.parse()?;
        let signal: Signal = signal.parse()?;

        lock(&self.store).bind(button, signal)
    }

    /// Returns false if the button was not bound
    pub fn unbind(&self, button: &str) -> Result<bool, Error> {
        let button: ButtonId = button.parse()?;

        lock(&self.store).unbind(button)
    }

    pub fn is_bound(&self, button: &str) -> Result<bool, Error> {
        let button: ButtonId = button.parse()?;

        Ok(lock(&self.store).is_bound(button))
    }

    pub fn all_bindings(&self) -> BindingTable {
        lock(&self.store).all_bindings()
    }
}

/// Run [`Analyzer::acquire_signal`] on its own thread
pub fn spawn_acquire(
    analyzer: Arc<Analyzer>,
    timeout: Duration,
) -> JoinHandle<Result<SignalSample, Error>> {
    thread::spawn(move || analyzer.acquire_signal(timeout))
}
