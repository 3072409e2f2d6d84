//! Single-threaded library worker
//!
//! The worker owns its state on a dedicated thread. Jobs are closures sent
//! over a channel and run strictly one after another in submission order;
//! [`LibraryWorker::run`] blocks until its job has finished.

use super::error::StoreError;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Serializes all access to `S` onto one thread
pub struct LibraryWorker<S> {
    sender: Option<Sender<Job<S>>>,
    handle: Option<JoinHandle<()>>,
}

impl<S: Send + 'static> LibraryWorker<S> {
    /// Move `state` onto a new worker thread
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IoError` if the thread cannot be spawned.
    pub fn spawn(mut state: S) -> Result<Self, StoreError> {
        let (sender, receiver) = mpsc::channel::<Job<S>>();
        let handle = thread::Builder::new()
            .name("mapsel-library".into())
            .spawn(move || {
                for job in receiver {
                    job(&mut state);
                }
                log::debug!("Library worker stopped");
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Run a job on the worker thread and wait for its result
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WorkerGone` if the worker has stopped, including
    /// when this job or an earlier one panicked.
    pub fn run<R, F>(&self, job: F) -> Result<R, StoreError>
    where
        R: Send + 'static,
        F: FnOnce(&mut S) -> R + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(StoreError::WorkerGone)?;
        let (reply, result) = mpsc::sync_channel(1);
        sender
            .send(Box::new(move |state: &mut S| {
                // The caller may have given up waiting
                let _ = reply.send(job(state));
            }))
            .map_err(|_| StoreError::WorkerGone)?;
        result.recv().map_err(|_| StoreError::WorkerGone)
    }
}

impl<S> Drop for LibraryWorker<S> {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.sender.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("Library worker exited with a panic");
        }
    }
}
