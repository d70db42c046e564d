//! Core station abstraction and runner for the audio pipeline.

use crate::pipeline::error::{ErrorReporter, StationError};
use crossbeam_channel::{Receiver, Sender};
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A processing station in the pipeline.
///
/// Each station receives input, processes it, and produces output.
/// Stations run in their own threads and are connected by channels.
pub trait Station: Send + 'static {
    /// The input type this station receives.
    type Input: Send + 'static;
    /// The output type this station produces.
    type Output: Send + 'static;

    /// Processes a single input item.
    ///
    /// Returns:
    /// - `Ok(Some(output))` - Successfully processed and produced output
    /// - `Ok(None)` - Successfully processed but no output (e.g., filtered)
    /// - `Err(StationError)` - Processing failed
    fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, StationError>;

    /// Returns the name of this station for logging and error reporting.
    fn name(&self) -> &'static str;

    /// Called once before the first input is processed.
    ///
    /// A fatal error here stops the station without processing anything.
    fn start(&mut self) -> Result<(), StationError> {
        Ok(())
    }

    /// Called when the station is shutting down.
    ///
    /// Override this to perform cleanup operations.
    fn shutdown(&mut self) {}
}

/// Runs a station in a dedicated thread.
pub struct StationRunner<S: Station> {
    /// Handle to the spawned thread.
    handle: Option<JoinHandle<()>>,
    /// Name of the station (cached for error reporting).
    station_name: &'static str,
    /// Phantom data to mark the station type.
    _phantom: PhantomData<S>,
}

impl<S: Station> StationRunner<S> {
    /// Spawns a new station in a dedicated thread.
    ///
    /// # Arguments
    /// * `station` - The station implementation to run
    /// * `input_rx` - Channel to receive inputs from
    /// * `output_tx` - Channel to send outputs to
    /// * `error_reporter` - Reporter for handling errors
    pub fn spawn(
        mut station: S,
        input_rx: Receiver<S::Input>,
        output_tx: Sender<S::Output>,
        error_reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let station_name = station.name();

        let handle = thread::spawn(move || {
            Self::run_station(&mut station, input_rx, output_tx, error_reporter);
        });

        Self {
            handle: Some(handle),
            station_name,
            _phantom: PhantomData,
        }
    }

    /// Main processing loop for the station.
    fn run_station(
        station: &mut S,
        input_rx: Receiver<S::Input>,
        output_tx: Sender<S::Output>,
        error_reporter: Arc<dyn ErrorReporter>,
    ) {
        let station_name = station.name();

        if let Err(error) = station.start() {
            error_reporter.report(station_name, &error);
            if matches!(error, StationError::Fatal(_)) {
                station.shutdown();
                return;
            }
        }

        while let Ok(input) = input_rx.recv() {
            match station.process(input) {
                Ok(Some(output)) => {
                    // Send output to next station
                    if output_tx.send(output).is_err() {
                        // Output channel closed, shutdown
                        break;
                    }
                }
                Ok(None) => {}
                Err(StationError::Recoverable(msg)) => {
                    // Report but continue processing
                    error_reporter.report(station_name, &StationError::Recoverable(msg));
                }
                Err(StationError::Fatal(msg)) => {
                    // Report and shutdown
                    error_reporter.report(station_name, &StationError::Fatal(msg));
                    break;
                }
            }
        }

        // Cleanup on shutdown
        station.shutdown();
    }

    /// Waits for the station thread to complete.
    pub fn join(mut self) -> Result<(), String> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| format!("Station '{}' thread panicked", self.station_name))
        } else {
            Ok(())
        }
    }

    /// Returns the name of the station.
    pub fn name(&self) -> &'static str {
        self.station_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    // Mock station that doubles integers
    struct DoublerStation {
        started: Arc<AtomicBool>,
        shutdown_called: Arc<AtomicBool>,
    }

    impl Station for DoublerStation {
        type Input = i32;
        type Output = i32;

        fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, StationError> {
            Ok(Some(input * 2))
        }

        fn name(&self) -> &'static str {
            "Doubler"
        }

        fn start(&mut self) -> Result<(), StationError> {
            self.started.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn shutdown(&mut self) {
            self.shutdown_called.store(true, Ordering::SeqCst);
        }
    }

    // Mock station that fails on certain inputs
    struct FailingStation {
        fail_on: i32,
        fatal: bool,
    }

    impl Station for FailingStation {
        type Input = i32;
        type Output = i32;

        fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, StationError> {
            if input != self.fail_on {
                Ok(Some(input))
            } else if self.fatal {
                Err(StationError::Fatal(format!("Failed on {}", input)))
            } else {
                Err(StationError::Recoverable(format!("Failed on {}", input)))
            }
        }

        fn name(&self) -> &'static str {
            "Failing"
        }
    }

    // Station whose start hook refuses to run
    struct RefusingStation;

    impl Station for RefusingStation {
        type Input = i32;
        type Output = i32;

        fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, StationError> {
            Ok(Some(input))
        }

        fn name(&self) -> &'static str {
            "Refusing"
        }

        fn start(&mut self) -> Result<(), StationError> {
            Err(StationError::Fatal("not ready".to_string()))
        }
    }

    // Mock error reporter that collects errors
    #[derive(Default)]
    struct MockReporter {
        errors: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl ErrorReporter for MockReporter {
        fn report(&self, station: &str, error: &StationError) {
            let mut errors = self.errors.lock().unwrap();
            errors.push((station.to_string(), error.to_string()));
        }
    }

    #[test]
    fn test_station_runner_basic_processing() {
        let (input_tx, input_rx) = bounded(10);
        let (output_tx, output_rx) = bounded(10);
        let error_reporter = Arc::new(MockReporter::default());
        let started = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::new(AtomicBool::new(false));

        let station = DoublerStation {
            started: started.clone(),
            shutdown_called: shutdown_flag.clone(),
        };

        let runner = StationRunner::spawn(station, input_rx, output_tx, error_reporter);

        assert_eq!(runner.name(), "Doubler");

        input_tx.send(1).unwrap();
        input_tx.send(2).unwrap();
        input_tx.send(3).unwrap();
        drop(input_tx); // Close channel to trigger shutdown

        let outputs: Vec<i32> = output_rx.iter().collect();
        assert_eq!(outputs, vec![2, 4, 6]);

        runner.join().unwrap();
        assert!(started.load(Ordering::SeqCst));
        assert!(shutdown_flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_station_runner_recoverable_error_continues() {
        let (input_tx, input_rx) = bounded(10);
        let (output_tx, output_rx) = bounded(10);
        let error_reporter = Arc::new(MockReporter::default());
        let errors = error_reporter.errors.clone();

        let station = FailingStation {
            fail_on: 2,
            fatal: false,
        };
        let runner = StationRunner::spawn(station, input_rx, output_tx, error_reporter);

        for i in 1..=3 {
            input_tx.send(i).unwrap();
        }
        drop(input_tx);

        let outputs: Vec<i32> = output_rx.iter().collect();
        assert_eq!(outputs, vec![1, 3]);

        let reported = errors.lock().unwrap();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].0, "Failing");
        assert!(reported[0].1.contains("Failed on 2"));

        runner.join().unwrap();
    }

    #[test]
    fn test_station_runner_fatal_error_stops() {
        let (input_tx, input_rx) = bounded(10);
        let (output_tx, output_rx) = bounded(10);
        let error_reporter = Arc::new(MockReporter::default());
        let errors = error_reporter.errors.clone();

        let station = FailingStation {
            fail_on: 2,
            fatal: true,
        };
        let runner = StationRunner::spawn(station, input_rx, output_tx, error_reporter);

        for i in 1..=3 {
            input_tx.send(i).unwrap();
        }
        drop(input_tx);

        let outputs: Vec<i32> = output_rx.iter().collect();
        assert_eq!(outputs, vec![1]);

        let reported = errors.lock().unwrap();
        assert_eq!(reported.len(), 1);
        assert!(reported[0].1.starts_with("Fatal error"));

        runner.join().unwrap();
    }

    #[test]
    fn test_station_runner_fatal_start_skips_processing() {
        let (input_tx, input_rx) = bounded(10);
        let (output_tx, output_rx) = bounded(10);
        let error_reporter = Arc::new(MockReporter::default());
        let errors = error_reporter.errors.clone();

        let runner = StationRunner::spawn(RefusingStation, input_rx, output_tx, error_reporter);
        runner.join().unwrap();

        // Receiver side is gone once the thread exits
        assert!(input_tx.send(1).is_err());
        assert!(output_rx.iter().next().is_none());
        assert_eq!(errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_station_runner_output_channel_closed() {
        let (input_tx, input_rx) = bounded(10);
        let (output_tx, output_rx) = bounded(10);
        let error_reporter = Arc::new(MockReporter::default());
        let shutdown_flag = Arc::new(AtomicBool::new(false));

        let station = DoublerStation {
            started: Arc::new(AtomicBool::new(false)),
            shutdown_called: shutdown_flag.clone(),
        };

        let runner = StationRunner::spawn(station, input_rx, output_tx, error_reporter);

        drop(output_rx);
        input_tx.send(1).unwrap();
        drop(input_tx);

        runner.join().unwrap();
        assert!(shutdown_flag.load(Ordering::SeqCst));
    }
}
