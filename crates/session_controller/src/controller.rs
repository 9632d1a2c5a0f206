//! Session controller
//!
//! Owns the session clock, the inactivity watchdog, the loading indicator and
//! the popup, and reacts to [`SessionEvent`]s one at a time. Exchanges and
//! timers run as spawned tasks that report back through the same queue.

use std::sync::Arc;

use exchange_relay::{ExchangeKind, ExchangeOutcome, ExchangeRelay, Navigator};
use log::{debug, error, info, warn};
use session_core::{Countdown, CountdownPhase, GateState, SessionClock, SubmissionGate, WallClock};
use session_watchdog::{ActivitySignal, InactivityWatchdog, WatchdogExpiry};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::events::{SendRejection, SessionEvent};
use crate::loading::LoadingIndicator;
use crate::popup::{Popup, PopupAction};
use crate::settings::SessionSettings;
use crate::transcript::TranscriptEntry;
use crate::view::SessionView;

/// Cloneable sender for session events.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Queue an event. Returns false once the controller has stopped.
    pub fn send(&self, event: SessionEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn activity(&self, signal: ActivitySignal) -> bool {
        self.send(SessionEvent::Activity(signal))
    }

    pub fn submit_message(&self, text: impl Into<String>) -> bool {
        self.send(SessionEvent::SubmitMessage(text.into()))
    }

    pub fn request_submission(&self) -> bool {
        self.send(SessionEvent::RequestSubmission)
    }

    pub fn choose(&self, action: PopupAction) -> bool {
        self.send(SessionEvent::ChoosePopupAction(action))
    }

    pub fn shutdown(&self) -> bool {
        self.send(SessionEvent::Shutdown)
    }
}

enum ExchangeRequest {
    UserMessage(String),
    InactivityNudge,
}

impl ExchangeRequest {
    fn kind(&self) -> ExchangeKind {
        match self {
            Self::UserMessage(_) => ExchangeKind::UserMessage,
            Self::InactivityNudge => ExchangeKind::InactivityNudge,
        }
    }

    async fn send(self, relay: &dyn ExchangeRelay) -> ExchangeOutcome {
        match self {
            Self::UserMessage(text) => relay.send_user_message(&text).await,
            Self::InactivityNudge => relay.send_inactivity_nudge().await,
        }
    }
}

pub struct SessionController<V: SessionView> {
    settings: SessionSettings,
    clock: SessionClock,
    wall: Arc<dyn WallClock>,
    relay: Arc<dyn ExchangeRelay>,
    navigator: Arc<dyn Navigator>,
    view: V,
    watchdog: InactivityWatchdog,
    loading: LoadingIndicator,
    popup: Option<Popup>,
    last_phase: Option<CountdownPhase>,
    submission_unlocked: bool,
    cooldown_until: Option<Instant>,
    submissions: Vec<JoinHandle<()>>,
    started: bool,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    shutdown: CancellationToken,
}

impl<V: SessionView> SessionController<V> {
    pub fn new(
        settings: SessionSettings,
        clock: SessionClock,
        wall: Arc<dyn WallClock>,
        relay: Arc<dyn ExchangeRelay>,
        navigator: Arc<dyn Navigator>,
        view: V,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let expiry_tx = events_tx.clone();
        let watchdog = InactivityWatchdog::new(
            settings.inactivity_threshold,
            Arc::new(move |expiry: WatchdogExpiry| {
                let _ = expiry_tx.send(SessionEvent::WatchdogExpired(expiry));
            }),
        );

        Self {
            settings,
            clock,
            wall,
            relay,
            navigator,
            view,
            watchdog,
            loading: LoadingIndicator::new(),
            popup: None,
            last_phase: None,
            submission_unlocked: false,
            cooldown_until: None,
            submissions: Vec::new(),
            started: false,
            events_tx,
            events_rx,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// Gate state evaluated against the current wall clock
    pub fn gate(&self) -> GateState {
        SubmissionGate::evaluate(&self.clock, self.wall.now_ms())
    }

    /// Arm the watchdog, render the first countdown and start the ticker.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(
            "Session {} started (budget {}s, inactivity {:?})",
            self.clock.session_key(),
            self.clock.budget_seconds(),
            self.settings.inactivity_threshold
        );

        self.watchdog.arm();
        self.on_tick();
        self.spawn_ticker();
    }

    /// Drive the session until a [`SessionEvent::Shutdown`] arrives, then
    /// hand back the view.
    pub async fn run(mut self) -> V {
        self.start();

        while let Some(event) = self.events_rx.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }

        self.stop();
        for submission in self.submissions.drain(..) {
            if let Err(e) = submission.await {
                error!("Submission task failed: {}", e);
            }
        }
        self.view
    }

    /// Handle one event. Returns false when the controller should stop.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Activity(signal) => self.watchdog.record_activity(signal),
            SessionEvent::SubmitMessage(text) => {
                if let Err(reason) = self.submit_message(&text) {
                    debug!("Message not sent: {}", reason);
                    self.view.message_rejected(&reason);
                }
            }
            SessionEvent::RequestSubmission => self.present_submission_popup(),
            SessionEvent::ChoosePopupAction(action) => self.choose_popup_action(action),
            SessionEvent::Tick => self.on_tick(),
            SessionEvent::WatchdogExpired(expiry) => self.on_watchdog_expired(expiry),
            SessionEvent::ExchangeSettled { kind, outcome } => {
                self.on_exchange_settled(kind, outcome)
            }
            SessionEvent::Shutdown => {
                info!("Session {} shutting down", self.clock.session_key());
                return false;
            }
        }
        true
    }

    fn stop(&mut self) {
        self.watchdog.disarm();
        self.shutdown.cancel();
    }

    fn spawn_ticker(&self) {
        let tx = self.events_tx.clone();
        let token = self.shutdown.clone();
        let period = self.settings.tick_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(SessionEvent::Tick).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }

    fn on_tick(&mut self) {
        let countdown = Countdown::at(&self.clock, self.wall.now_ms());

        if self.last_phase != Some(countdown.phase) {
            debug!("Countdown phase {:?} ({})", countdown.phase, countdown.label);
            self.last_phase = Some(countdown.phase);
        }
        self.view.render_countdown(&countdown);

        if countdown.phase == CountdownPhase::Expired && !self.submission_unlocked {
            self.submission_unlocked = true;
            info!("Session budget used up, submission unlocked");
            self.view.unlock_submission();
        }
    }

    fn submit_message(&mut self, raw: &str) -> Result<(), SendRejection> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(SendRejection::Empty);
        }
        if self.loading.is_active() {
            return Err(SendRejection::ExchangeInFlight);
        }
        if let Some(until) = self.cooldown_until {
            if Instant::now() < until {
                return Err(SendRejection::CoolingDown);
            }
        }

        self.watchdog.record_activity(ActivitySignal::MessageSent);
        self.view.append_entry(&TranscriptEntry::user(text));
        if !self.settings.send_cooldown.is_zero() {
            self.cooldown_until = Some(Instant::now() + self.settings.send_cooldown);
        }
        self.begin_exchange(ExchangeRequest::UserMessage(text.to_string()));
        Ok(())
    }

    fn on_watchdog_expired(&mut self, expiry: WatchdogExpiry) {
        if !self.watchdog.is_current(&expiry) {
            debug!("Ignoring stale watchdog expiry {}", expiry.generation);
            return;
        }
        self.watchdog.mark_fired(&expiry);
        info!(
            "No activity for {:?}, sending inactivity nudge",
            self.watchdog.threshold()
        );
        self.begin_exchange(ExchangeRequest::InactivityNudge);
    }

    fn begin_exchange(&mut self, request: ExchangeRequest) {
        let kind = request.kind();
        if self.loading.begin() {
            self.view.set_loading(true);
        }
        info!("Starting {} exchange", kind.as_str());

        let relay = Arc::clone(&self.relay);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let exchange = tokio::spawn(async move { request.send(relay.as_ref()).await });
            let outcome = match exchange.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("{} exchange task failed: {}", kind.as_str(), e);
                    ExchangeOutcome::TransportError(e.to_string())
                }
            };
            let _ = tx.send(SessionEvent::ExchangeSettled { kind, outcome });
        });
    }

    fn on_exchange_settled(&mut self, kind: ExchangeKind, outcome: ExchangeOutcome) {
        match &outcome {
            ExchangeOutcome::Response(_) => debug!("{} exchange settled", kind.as_str()),
            ExchangeOutcome::ApplicationError(e) => {
                warn!("{} exchange application error: {}", kind.as_str(), e)
            }
            ExchangeOutcome::TransportError(e) => {
                error!("{} exchange transport error: {}", kind.as_str(), e)
            }
        }
        self.view
            .append_entry(&TranscriptEntry::from_outcome(&outcome, &self.settings.avatar));

        let refocused = self.loading.end();
        if refocused {
            self.view.set_loading(false);
            self.view.focus_input();
            self.watchdog.record_activity(ActivitySignal::InputFocused);
        }
        if kind == ExchangeKind::InactivityNudge && !refocused {
            self.watchdog.rearm();
        }
    }

    fn present_submission_popup(&mut self) {
        let gate = self.gate();
        let popup = Popup::for_gate(gate, self.clock.budget_seconds());
        info!("Presenting {:?} popup", popup.kind);
        self.view.show_popup(&popup);
        self.popup = Some(popup);
    }

    fn choose_popup_action(&mut self, action: PopupAction) {
        let Some(popup) = self.popup.as_ref() else {
            warn!("Popup action {:?} chosen with no popup open", action);
            return;
        };
        if !popup.offers(action) {
            warn!("Popup {:?} does not offer {:?}", popup.kind, action);
            return;
        }

        if action == PopupAction::Confirm {
            self.spawn_submission();
        }
        self.popup = None;
        self.view.close_popup();
    }

    // Runs on its own task; closing the popup does not cancel it.
    fn spawn_submission(&mut self) {
        let navigator = Arc::clone(&self.navigator);
        let target = self.settings.submission.clone();

        self.submissions.retain(|handle| !handle.is_finished());
        self.submissions.push(tokio::spawn(async move {
            if let Err(e) = navigator.open_in_new_context(&target.url) {
                error!("Failed to open submission resource: {}", e);
            }
            if let Some(redirect) = target.redirect {
                tokio::time::sleep(target.redirect_delay).await;
                if let Err(e) = navigator.redirect(&redirect) {
                    error!("Failed to redirect after submission: {}", e);
                }
            }
        }));
    }
}
