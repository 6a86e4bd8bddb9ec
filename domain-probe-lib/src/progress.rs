//! Spinner shown while a lookup is outstanding.
//!
//! The spinner runs as its own tokio task and redraws a single line with
//! `\r` until its cancellation flag is set. Cancellation is cooperative: the
//! task checks the flag once per interval, so it can lag by up to one tick.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const SPINNER_FRAMES: &[char] = &['|', '/', '-', '\\'];

/// Shortest redraw interval; anything smaller is raised to this.
pub const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(10);

/// Where and what a spinner draws.
pub struct ProgressSink {
    pub writer: Box<dyn Write + Send>,
    /// Text drawn before the spinning glyph
    pub message: String,
    /// Line written once after cancellation
    pub done: String,
}

impl ProgressSink {
    /// Plain-text sink with the default wording.
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer,
            message: "Please wait...".to_string(),
            done: "Done!".to_string(),
        }
    }
}

/// Handle to a running spinner.
///
/// Dropping the handle cancels the spinner without waiting for it.
pub struct Spinner {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Spawn a spinner that redraws every `interval` (at least [`MIN_PROGRESS_INTERVAL`]).
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(sink: ProgressSink, interval: Duration) -> Self {
        let interval = interval.max(MIN_PROGRESS_INTERVAL);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let handle = tokio::spawn(async move {
            let ProgressSink {
                mut writer,
                message,
                done,
            } = sink;
            let mut idx = 0usize;

            while !flag.load(Ordering::Acquire) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = write!(writer, "\r{} {}", message, frame);
                let _ = writer.flush();
                idx += 1;
                tokio::time::sleep(interval).await;
            }

            // Pad so a shorter "done" text fully covers the spinner line.
            let width = message.chars().count() + 2;
            let _ = writeln!(writer, "\r{:<width$}", done, width = width);
            let _ = writer.flush();
        });

        Self {
            cancelled,
            handle: Some(handle),
        }
    }

    /// Request the spinner to stop. Idempotent, never blocks.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Cancel and wait until the spinner has written its final line.
    pub async fn finish(mut self) {
        self.cancel();
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// `Write` impl that appends into a shared buffer.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinner_cycles_frames_until_finished() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start(
            ProgressSink::new(Box::new(buf.clone())),
            Duration::from_millis(100),
        );

        tokio::time::sleep(Duration::from_millis(450)).await;
        spinner.finish().await;

        let out = buf.contents();
        for frame in ["Please wait... |", "Please wait... /", "Please wait... -", "Please wait... \\"] {
            assert!(out.contains(frame), "missing frame {:?} in {:?}", frame, out);
        }
        assert!(out.trim_end().ends_with("Done!"));
        assert_eq!(out.matches("Done!").count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_output_after_finish() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start(
            ProgressSink::new(Box::new(buf.clone())),
            Duration::from_millis(100),
        );
        tokio::time::sleep(Duration::from_millis(250)).await;
        spinner.finish().await;

        let after_finish = buf.contents();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(buf.contents(), after_finish);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_raised_to_minimum() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start(ProgressSink::new(Box::new(buf.clone())), Duration::ZERO);

        tokio::time::sleep(Duration::from_millis(200)).await;
        spinner.finish().await;

        // One frame per 10ms tick, plus the first draw and the final line.
        let frames = buf.contents().matches("Please wait...").count();
        assert!(frames <= 22, "drew {} frames in 200ms", frames);
        assert!(frames >= 10);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start(
            ProgressSink::new(Box::new(buf.clone())),
            Duration::from_millis(10),
        );
        spinner.cancel();
        spinner.cancel();
        assert!(spinner.is_cancelled());
        spinner.finish().await;
        assert_eq!(buf.contents().matches("Done!").count(), 1);
    }

    #[tokio::test]
    async fn test_custom_text() {
        let buf = SharedBuf::default();
        let sink = ProgressSink {
            writer: Box::new(buf.clone()),
            message: "Working".to_string(),
            done: "Finished".to_string(),
        };
        let spinner = Spinner::start(sink, Duration::from_millis(10));
        spinner.finish().await;

        let out = buf.contents();
        assert!(out.contains("Finished"));
        assert!(!out.contains("Please wait"));
    }
}
