//! Fakes shared by the controller integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use exchange_relay::{ExchangeOutcome, ExchangeRelay, Navigator};
use session_controller::{
    Avatar, Popup, SendRejection, SessionController, SessionHandle, SessionSettings,
    SessionView, SubmissionTarget, TranscriptEntry,
};
use session_core::{Countdown, ManualWallClock, MemoryClockStorage, SessionClock};
use tokio::sync::Semaphore;

pub const START_MS: i64 = 1_700_000_000_000;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Entry(TranscriptEntry),
    Loading(bool),
    Countdown(Countdown),
    SubmissionUnlocked,
    PopupShown(Popup),
    PopupClosed,
    InputFocused,
    Rejected(SendRejection),
}

#[derive(Clone, Default)]
pub struct RecordingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Entry(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub fn last_popup(&self) -> Option<Popup> {
        self.events().into_iter().rev().find_map(|event| match event {
            ViewEvent::PopupShown(popup) => Some(popup),
            _ => None,
        })
    }

    pub fn last_countdown(&self) -> Option<Countdown> {
        self.events().into_iter().rev().find_map(|event| match event {
            ViewEvent::Countdown(countdown) => Some(countdown),
            _ => None,
        })
    }

    pub fn count(&self, wanted: &ViewEvent) -> usize {
        self.events().iter().filter(|event| *event == wanted).count()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl SessionView for RecordingView {
    fn append_entry(&mut self, entry: &TranscriptEntry) {
        self.push(ViewEvent::Entry(entry.clone()));
    }

    fn set_loading(&mut self, loading: bool) {
        self.push(ViewEvent::Loading(loading));
    }

    fn render_countdown(&mut self, countdown: &Countdown) {
        self.push(ViewEvent::Countdown(countdown.clone()));
    }

    fn unlock_submission(&mut self) {
        self.push(ViewEvent::SubmissionUnlocked);
    }

    fn show_popup(&mut self, popup: &Popup) {
        self.push(ViewEvent::PopupShown(popup.clone()));
    }

    fn close_popup(&mut self) {
        self.push(ViewEvent::PopupClosed);
    }

    fn focus_input(&mut self) {
        self.push(ViewEvent::InputFocused);
    }

    fn message_rejected(&mut self, reason: &SendRejection) {
        self.push(ViewEvent::Rejected(reason.clone()));
    }
}

/// Relay answering from a script; can hold exchanges in flight.
pub struct FakeRelay {
    outcomes: Mutex<VecDeque<ExchangeOutcome>>,
    user_messages: Mutex<Vec<String>>,
    nudges: AtomicUsize,
    hold: bool,
    user_release: Semaphore,
    nudge_release: Semaphore,
}

impl FakeRelay {
    fn new(outcomes: Vec<ExchangeOutcome>, hold: bool) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            user_messages: Mutex::new(Vec::new()),
            nudges: AtomicUsize::new(0),
            hold,
            user_release: Semaphore::new(0),
            nudge_release: Semaphore::new(0),
        })
    }

    pub fn answering(outcomes: Vec<ExchangeOutcome>) -> Arc<Self> {
        Self::new(outcomes, false)
    }

    /// Exchanges stay in flight until released. Outcomes are handed out in
    /// release order.
    pub fn holding(outcomes: Vec<ExchangeOutcome>) -> Arc<Self> {
        Self::new(outcomes, true)
    }

    pub fn release_user_messages(&self, count: usize) {
        self.user_release.add_permits(count);
    }

    pub fn release_nudges(&self, count: usize) {
        self.nudge_release.add_permits(count);
    }

    pub fn user_messages(&self) -> Vec<String> {
        self.user_messages.lock().unwrap().clone()
    }

    pub fn nudges(&self) -> usize {
        self.nudges.load(Ordering::SeqCst)
    }

    async fn answer(&self, release: &Semaphore) -> ExchangeOutcome {
        if self.hold {
            release.acquire().await.unwrap().forget();
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ExchangeOutcome::Response("ok".to_string()))
    }
}

#[async_trait]
impl ExchangeRelay for FakeRelay {
    async fn send_user_message(&self, text: &str) -> ExchangeOutcome {
        self.user_messages.lock().unwrap().push(text.to_string());
        self.answer(&self.user_release).await
    }

    async fn send_inactivity_nudge(&self) -> ExchangeOutcome {
        self.nudges.fetch_add(1, Ordering::SeqCst);
        self.answer(&self.nudge_release).await
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<String>>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open_in_new_context(&self, url: &str) -> exchange_relay::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn redirect(&self, url: &str) -> exchange_relay::Result<()> {
        self.redirects.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn settings() -> SessionSettings {
    SessionSettings {
        inactivity_threshold: Duration::from_millis(300_000),
        send_cooldown: Duration::ZERO,
        tick_interval: Duration::from_secs(1),
        submission: SubmissionTarget {
            url: "https://drive.example.org/folder".to_string(),
            redirect: None,
            redirect_delay: Duration::from_millis(1000),
        },
        avatar: Avatar {
            url: "/static/images/peer_avatar.webp".to_string(),
            fallback_url: "/static/images/placeholder.png".to_string(),
        },
    }
}

pub struct Harness {
    pub handle: SessionHandle,
    pub view: RecordingView,
    pub wall: Arc<ManualWallClock>,
    pub relay: Arc<FakeRelay>,
    pub navigator: Arc<RecordingNavigator>,
    pub task: tokio::task::JoinHandle<RecordingView>,
}

impl Harness {
    pub async fn start(
        settings: SessionSettings,
        budget_seconds: u64,
        relay: Arc<FakeRelay>,
    ) -> Self {
        let storage = MemoryClockStorage::new();
        let clock = SessionClock::initialize(&storage, "chatStartTime_test", budget_seconds, START_MS)
            .await
            .unwrap();
        let wall = Arc::new(ManualWallClock::new(START_MS));
        let navigator = Arc::new(RecordingNavigator::default());
        let view = RecordingView::default();

        let controller = SessionController::new(
            settings,
            clock,
            wall.clone(),
            relay.clone(),
            navigator.clone(),
            view.clone(),
        );
        let handle = controller.handle();
        let task = tokio::spawn(controller.run());
        settle().await;

        Self {
            handle,
            view,
            wall,
            relay,
            navigator,
            task,
        }
    }

    pub async fn stop(self) -> RecordingView {
        self.handle.shutdown();
        self.task.await.unwrap()
    }
}

/// Let spawned tasks and the controller drain their queues.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

pub async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}
