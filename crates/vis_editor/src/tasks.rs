//! Background tasks
//!
//! Long running work such as asset reloads or exports runs on a worker
//! thread. The frame loop polls the [`AsyncTask`] handle every frame; the
//! worker reports through a [`TaskReporter`] and checks it for cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Progress report sent by a running task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskUpdate {
    /// Completion in percent, 0 to 100
    Progress(u8),
    /// Line of text for the user
    Message(String),
    /// The task ran to completion
    Finished,
    /// The task stopped with an error
    Failed(String),
}

/// Worker side of a task
pub struct TaskReporter {
    sender: Sender<TaskUpdate>,
    cancelled: Arc<AtomicBool>,
}

impl TaskReporter {
    /// Report completion in percent, clamped to 100
    pub fn progress(&self, percent: u8) {
        self.send(TaskUpdate::Progress(percent.min(100)));
    }

    /// Report a message
    pub fn message(&self, text: impl Into<String>) {
        self.send(TaskUpdate::Message(text.into()));
    }

    /// Check whether the frame loop asked the task to stop
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn send(&self, update: TaskUpdate) {
        // the handle may be gone already
        let _ = self.sender.send(update);
    }
}

/// Handle to a task running on a worker thread
pub struct AsyncTask {
    name: String,
    receiver: Receiver<TaskUpdate>,
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    done: bool,
}

impl AsyncTask {
    /// Run `work` on a new thread
    ///
    /// Returning `Ok` reports [`TaskUpdate::Finished`], returning `Err`
    /// reports [`TaskUpdate::Failed`] with the error text.
    pub fn spawn<F, E>(name: impl Into<String>, work: F) -> Self
    where
        F: FnOnce(&TaskReporter) -> Result<(), E> + Send + 'static,
        E: std::fmt::Display,
    {
        let name = name.into();
        let (sender, receiver) = channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let reporter = TaskReporter { sender, cancelled: Arc::clone(&cancelled) };

        let task_name = name.clone();
        let worker = thread::spawn(move || {
            log::debug!("Task '{task_name}' started");
            match work(&reporter) {
                Ok(()) => reporter.send(TaskUpdate::Finished),
                Err(error) => {
                    log::error!("Task '{task_name}' failed: {error}");
                    reporter.send(TaskUpdate::Failed(error.to_string()));
                }
            }
        });

        Self { name, receiver, cancelled, worker: Some(worker), done: false }
    }

    /// Task name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the task to stop at its next cancellation check
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check whether the task reported its end
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Updates received since the last poll, oldest first
    pub fn poll(&mut self) -> Vec<TaskUpdate> {
        let mut updates = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(update) => {
                    if matches!(update, TaskUpdate::Finished | TaskUpdate::Failed(_)) {
                        self.done = true;
                    }
                    updates.push(update);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.done {
                        // worker panicked
                        self.done = true;
                        updates.push(TaskUpdate::Failed(format!("Task '{}' stopped unexpectedly", self.name)));
                    }
                    break;
                }
            }
        }
        updates
    }

    /// Block until the worker ends and return the remaining updates
    pub fn wait(mut self) -> Vec<TaskUpdate> {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Task '{}' panicked", self.name);
            }
        }
        self.poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_updates_arrive_in_order() {
        let task = AsyncTask::spawn("export", |reporter: &TaskReporter| -> Result<(), String> {
            reporter.message("Exporting scene");
            reporter.progress(50);
            reporter.progress(150);
            Ok(())
        });

        let updates = task.wait();
        assert_eq!(
            updates,
            vec![
                TaskUpdate::Message("Exporting scene".into()),
                TaskUpdate::Progress(50),
                TaskUpdate::Progress(100),
                TaskUpdate::Finished,
            ]
        );
    }

    #[test]
    fn test_failure_is_reported() {
        let task = AsyncTask::spawn("reload", |_: &TaskReporter| Err("texture atlas missing"));
        assert_eq!(task.wait(), vec![TaskUpdate::Failed("texture atlas missing".into())]);
    }

    #[test]
    fn test_cancel() {
        let mut task = AsyncTask::spawn("spin", |reporter: &TaskReporter| -> Result<(), String> {
            while !reporter.is_cancelled() {
                thread::sleep(Duration::from_millis(1));
            }
            Err("cancelled".into())
        });

        assert!(!task.is_done());
        task.cancel();
        let mut updates = Vec::new();
        while !task.is_done() {
            updates.extend(task.poll());
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(updates, vec![TaskUpdate::Failed("cancelled".into())]);
    }
}
