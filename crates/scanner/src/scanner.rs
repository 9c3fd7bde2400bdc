//! The capture -> decode -> print loop.

use std::time::{Duration, Instant};

use tokenprint_core::qr::decode_frame;
use tokenprint_core::token::is_well_formed;
use tokio_util::sync::CancellationToken;

use crate::camera::FrameSource;
use crate::client::{PrintReply, PrintTrigger};

/// Remembers the last token the server answered for, so a QR code held in
/// front of the camera is not submitted on every frame.
#[derive(Debug)]
pub struct Cooldown {
    window: Duration,
    last: Option<(String, Instant)>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether `token` was handled less than `window` before `now`.
    pub fn is_cooling(&self, token: &str, now: Instant) -> bool {
        matches!(
            &self.last,
            Some((last, at)) if last == token && now.saturating_duration_since(*at) < self.window
        )
    }

    pub fn record(&mut self, token: &str, now: Instant) {
        self.last = Some((token.to_string(), now));
    }
}

/// What one scan cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The frame could not be captured or decoded.
    FrameError,
    /// No QR code in the frame.
    NoCode,
    /// A QR code that is not one of our tokens.
    Foreign,
    /// The token is still in its cooldown window.
    CoolingDown,
    /// The server was asked to print the token.
    Submitted { token: String, reply: PrintReply },
    /// The server could not be reached.
    Unreachable { token: String },
}

/// Runs the scan loop over a frame source and a print trigger.
pub struct Scanner<S, P> {
    source: S,
    trigger: P,
    cooldown: Cooldown,
    interval: Duration,
}

impl<S: FrameSource, P: PrintTrigger> Scanner<S, P> {
    pub fn new(source: S, trigger: P, interval: Duration, cooldown: Duration) -> Self {
        Self {
            source,
            trigger,
            cooldown: Cooldown::new(cooldown),
            interval,
        }
    }

    /// Scan until the cancellation token is triggered.
    ///
    /// Errors are logged and the loop continues with the next frame.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Scanner started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Scanner shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.scan_once().await;
                }
            }
        }
    }

    /// Capture and process a single frame.
    pub async fn scan_once(&mut self) -> ScanOutcome {
        let frame = match self.source.capture().await {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "Frame capture failed");
                return ScanOutcome::FrameError;
            }
        };

        let token = match decode_frame(&frame) {
            Ok(Some(token)) => token,
            Ok(None) => return ScanOutcome::NoCode,
            Err(e) => {
                tracing::warn!(error = %e, "Frame could not be decoded");
                return ScanOutcome::FrameError;
            }
        };

        if !is_well_formed(&token) {
            tracing::debug!(payload = %token, "Ignoring foreign QR code");
            return ScanOutcome::Foreign;
        }

        if self.cooldown.is_cooling(&token, Instant::now()) {
            return ScanOutcome::CoolingDown;
        }

        match self.trigger.request_print(&token).await {
            Ok(reply) => {
                match &reply {
                    PrintReply::Printed => tracing::info!(token = %token, "Printed"),
                    PrintReply::Rejected {
                        status,
                        code,
                        message,
                    } => tracing::warn!(token = %token, status, code = %code, %message, "Print refused"),
                }
                self.cooldown.record(&token, Instant::now());
                ScanOutcome::Submitted { token, reply }
            }
            Err(e) => {
                tracing::error!(token = %token, error = %e, "Print request failed");
                ScanOutcome::Unreachable { token }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokenprint_core::qr::encode_png;
    use tokenprint_core::token::generate_token;

    use super::*;
    use crate::camera::CaptureError;
    use crate::client::{ClientError, PrintClient};

    struct StaticFrame(Option<Vec<u8>>);

    #[async_trait]
    impl FrameSource for StaticFrame {
        async fn capture(&self) -> Result<Vec<u8>, CaptureError> {
            self.0.clone().ok_or(CaptureError::EmptyFrame)
        }
    }

    #[derive(Clone)]
    struct RecordingTrigger {
        tokens: Arc<Mutex<Vec<String>>>,
        reply: PrintReply,
    }

    impl Default for RecordingTrigger {
        fn default() -> Self {
            Self::replying(PrintReply::Printed)
        }
    }

    impl RecordingTrigger {
        fn replying(reply: PrintReply) -> Self {
            Self {
                tokens: Arc::default(),
                reply,
            }
        }

        fn tokens(&self) -> Vec<String> {
            self.tokens.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl PrintTrigger for RecordingTrigger {
        async fn request_print(&self, token: &str) -> Result<PrintReply, ClientError> {
            self.tokens.lock().expect("lock").push(token.to_string());
            Ok(self.reply.clone())
        }
    }

    fn scanner_for(
        frame: Option<Vec<u8>>,
        trigger: &RecordingTrigger,
    ) -> Scanner<StaticFrame, RecordingTrigger> {
        Scanner::new(
            StaticFrame(frame),
            trigger.clone(),
            Duration::from_millis(10),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn cooldown_only_blocks_same_token_within_window() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(Duration::from_secs(3));
        assert!(!cooldown.is_cooling("A", start));

        cooldown.record("A", start);
        assert!(cooldown.is_cooling("A", start + Duration::from_secs(1)));
        assert!(!cooldown.is_cooling("B", start + Duration::from_secs(1)));
        assert!(!cooldown.is_cooling("A", start + Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn token_is_submitted_once_per_cooldown() {
        let token = generate_token();
        let trigger = RecordingTrigger::default();
        let mut scanner = scanner_for(Some(encode_png(&token).unwrap()), &trigger);

        let first = scanner.scan_once().await;
        assert_eq!(
            first,
            ScanOutcome::Submitted {
                token: token.clone(),
                reply: PrintReply::Printed
            }
        );
        assert_eq!(scanner.scan_once().await, ScanOutcome::CoolingDown);
        assert_eq!(trigger.tokens(), vec![token]);
    }

    #[tokio::test]
    async fn refused_token_also_cools_down() {
        let token = generate_token();
        let refusal = PrintReply::Rejected {
            status: 402,
            code: "NOT_PAID".into(),
            message: format!("Job {token} has not been paid"),
        };
        let trigger = RecordingTrigger::replying(refusal.clone());
        let mut scanner = scanner_for(Some(encode_png(&token).unwrap()), &trigger);

        assert_eq!(
            scanner.scan_once().await,
            ScanOutcome::Submitted {
                token: token.clone(),
                reply: refusal
            }
        );
        assert_eq!(scanner.scan_once().await, ScanOutcome::CoolingDown);
        assert_eq!(trigger.tokens().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_server_does_not_start_cooldown() {
        // Bind then drop a listener so the port refuses connections.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let token = generate_token();
        let mut scanner = Scanner::new(
            StaticFrame(Some(encode_png(&token).unwrap())),
            PrintClient::new(format!("http://{addr}")),
            Duration::from_millis(10),
            Duration::from_secs(60),
        );

        let unreachable = ScanOutcome::Unreachable {
            token: token.clone(),
        };
        assert_eq!(scanner.scan_once().await, unreachable);
        assert_eq!(scanner.scan_once().await, unreachable);
    }

    #[tokio::test]
    async fn foreign_codes_are_ignored() {
        let trigger = RecordingTrigger::default();
        let mut scanner = scanner_for(Some(encode_png("https://example.com").unwrap()), &trigger);

        assert_eq!(scanner.scan_once().await, ScanOutcome::Foreign);
        assert!(trigger.tokens().is_empty());
    }

    #[tokio::test]
    async fn capture_errors_are_not_fatal() {
        let trigger = RecordingTrigger::default();
        let mut scanner = scanner_for(None, &trigger);
        assert_eq!(scanner.scan_once().await, ScanOutcome::FrameError);

        let mut garbage = scanner_for(Some(b"not an image".to_vec()), &trigger);
        assert_eq!(garbage.scan_once().await, ScanOutcome::FrameError);
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let trigger = RecordingTrigger::default();
        let mut scanner = scanner_for(None, &trigger);
        let cancel = CancellationToken::new();
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), scanner.run(cancel))
            .await
            .expect("run returns after cancellation");
    }
}
