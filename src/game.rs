//! Game state machine
//!
//! Owns the session, the scheduler and the handles of the four periodic timers
//! (simulation clock, enemy producer, player-bullet producer, monster-bullet
//! producer). Every transition out of Running cancels all of them together.
//!
//! ```text
//! Idle ──Play──▶ Running ──Pause──▶ Paused
//!                 ▲   │ ◀──Resume──┘
//!                 │   └─terminal hit──▶ GameOver ──Play──▶ Running
//! any ──Exit──▶ Exited
//! ```

use std::time::Duration;

use crate::consts::PLAYER_SPEED;
use crate::platform::{Command, UiCommand};
use crate::renderer::{Renderer, draw_frame};
use crate::scheduler::{Scheduler, TimerHandle, VirtualScheduler};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameSession, Producer, Snapshot, spawn_player_bullet, tick};

/// Longest stretch of time processed per `advance` call; the rest is dropped
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

/// Work items driven by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// One simulation step
    Tick,
    /// One entity from a producer
    Produce(Producer),
}

/// A running periodic timer and its period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTimer {
    pub handle: TimerHandle,
    pub period_ms: u64,
}

#[derive(Debug, Default)]
struct Timers {
    clock: Option<TimerHandle>,
    enemies: Option<TimerHandle>,
    player_bullets: Option<ActiveTimer>,
    monster_bullets: Option<ActiveTimer>,
}

/// The game: session + timers + state machine
pub struct Game<S: Scheduler<Task> = VirtualScheduler<Task>> {
    settings: Settings,
    session: GameSession,
    scheduler: S,
    timers: Timers,
    /// Events since the last `drain_events`
    events: Vec<GameEvent>,
}

impl Game<VirtualScheduler<Task>> {
    pub fn new(settings: Settings) -> Self {
        Self::with_scheduler(settings, VirtualScheduler::new())
    }
}

impl<S: Scheduler<Task>> Game<S> {
    pub fn with_scheduler(settings: Settings, scheduler: S) -> Self {
        let session = GameSession::new(&settings);
        Self {
            settings,
            session,
            scheduler,
            timers: Timers::default(),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Player-bullet producer, if running
    pub fn player_fire_timer(&self) -> Option<ActiveTimer> {
        self.timers.player_bullets
    }

    /// Monster-bullet producer, if running
    pub fn monster_fire_timer(&self) -> Option<ActiveTimer> {
        self.timers.monster_bullets
    }

    /// Number of timers currently scheduled
    pub fn active_timers(&self) -> usize {
        self.scheduler.active_count()
    }

    /// Take the events collected since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Draw the current state
    pub fn render(&self, renderer: &mut impl Renderer) {
        draw_frame(&self.snapshot(), renderer);
    }

    // === Commands ===

    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::MoveLeft => self.move_player(-PLAYER_SPEED),
            Command::MoveRight => self.move_player(PLAYER_SPEED),
            Command::Fire => self.fire(),
        }
    }

    pub fn handle_ui(&mut self, command: UiCommand) {
        match command {
            UiCommand::Play => self.play(),
            UiCommand::PauseResume => self.toggle_pause(),
            UiCommand::Exit => self.exit(),
        }
    }

    fn move_player(&mut self, dx: f32) {
        if self.session.phase != GamePhase::Running {
            log::debug!("Move ignored in {:?}", self.session.phase);
            return;
        }
        self.session.player.move_by(dx);
    }

    /// Fire one bullet from the ship
    pub fn fire(&mut self) {
        if self.session.phase != GamePhase::Running {
            log::debug!("Fire ignored in {:?}", self.session.phase);
            return;
        }
        spawn_player_bullet(&mut self.session);
    }

    /// Start a fresh run (from Idle or GameOver)
    pub fn play(&mut self) {
        match self.session.phase {
            GamePhase::Idle | GamePhase::GameOver => {
                self.stop_all();
                self.session.reset();
                self.session.phase = GamePhase::Running;
                self.start_all();
                log::info!("Game started (seed {})", self.session.seed);
            }
            phase => log::debug!("Play ignored in {:?}", phase),
        }
    }

    pub fn pause(&mut self) {
        if self.session.phase != GamePhase::Running {
            log::debug!("Pause ignored in {:?}", self.session.phase);
            return;
        }
        self.stop_all();
        self.session.phase = GamePhase::Paused;
        log::info!("Game paused at score {}", self.session.score);
    }

    /// Continue a paused run where it left off
    pub fn resume(&mut self) {
        if self.session.phase != GamePhase::Paused {
            log::debug!("Resume ignored in {:?}", self.session.phase);
            return;
        }
        self.session.phase = GamePhase::Running;
        self.start_all();
        log::info!("Game resumed");
    }

    pub fn toggle_pause(&mut self) {
        match self.session.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            phase => log::debug!("Pause/Resume ignored in {:?}", phase),
        }
    }

    /// Terminal: nothing is accepted afterwards
    pub fn exit(&mut self) {
        if self.session.phase == GamePhase::Exited {
            return;
        }
        self.stop_all();
        self.session.phase = GamePhase::Exited;
        log::info!("Game exited with score {}", self.session.score);
    }

    // === Clock ===

    /// Run every timer firing due within the next `elapsed` of clock time.
    ///
    /// Time beyond `MAX_FRAME_TIME` is dropped, not replayed.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.scheduler.now() + elapsed.min(MAX_FRAME_TIME);
        while let Some((handle, task)) = self.scheduler.next_due(deadline) {
            self.run_task(handle, task);
        }
        self.scheduler.advance_to(deadline);
    }

    fn run_task(&mut self, handle: TimerHandle, task: Task) {
        if self.session.phase != GamePhase::Running {
            // Timers are cancelled on every exit from Running; a firing here is stale
            log::warn!("Dropping {:?} from timer {:?} in {:?}", task, handle, self.session.phase);
            self.scheduler.cancel(handle);
            return;
        }

        match task {
            Task::Tick => {
                let events = tick(&mut self.session);
                for event in &events {
                    log::debug!("{:?}", event);
                }
                self.events.extend(events);

                if self.session.phase == GamePhase::GameOver {
                    self.stop_all();
                } else {
                    self.sync_producers();
                }
            }
            Task::Produce(producer) => {
                producer.produce(&mut self.session);
            }
        }
    }

    /// Start the clock and every producer the current difficulty calls for
    fn start_all(&mut self) {
        debug_assert!(self.timers.clock.is_none());
        let tick_interval = self.settings.tick_interval();
        self.timers.clock = Some(self.scheduler.schedule(tick_interval, Task::Tick));
        self.timers.enemies = Some(self.scheduler.schedule(
            self.settings.enemy_spawn_interval(),
            Task::Produce(Producer::Enemy),
        ));
        self.sync_producers();
    }

    /// Reconcile bullet producers with the session's fire rates. Only differences
    /// cause a reschedule, so this is safe to call every tick.
    fn sync_producers(&mut self) {
        let player_rate = self
            .settings
            .auto_fire
            .then_some(self.session.fire_rate_ms);
        reconcile(
            &mut self.scheduler,
            &mut self.timers.player_bullets,
            player_rate,
            Producer::PlayerBullet,
        );
        reconcile(
            &mut self.scheduler,
            &mut self.timers.monster_bullets,
            self.session.monster_fire_rate_ms,
            Producer::MonsterBullet,
        );
    }

    /// Cancel all four timers together
    fn stop_all(&mut self) {
        let timers = std::mem::take(&mut self.timers);
        let handles = [
            timers.clock,
            timers.enemies,
            timers.player_bullets.map(|t| t.handle),
            timers.monster_bullets.map(|t| t.handle),
        ];
        for handle in handles.into_iter().flatten() {
            self.scheduler.cancel(handle);
        }
    }
}

fn reconcile<S: Scheduler<Task>>(
    scheduler: &mut S,
    slot: &mut Option<ActiveTimer>,
    desired_ms: Option<u64>,
    producer: Producer,
) {
    if slot.map(|t| t.period_ms) == desired_ms {
        return;
    }
    if let Some(old) = slot.take() {
        scheduler.cancel(old.handle);
    }
    if let Some(period_ms) = desired_ms {
        let handle = scheduler.schedule(Duration::from_millis(period_ms), Task::Produce(producer));
        log::debug!("{:?} producer every {}ms", producer, period_ms);
        *slot = Some(ActiveTimer { handle, period_ms });
    } else {
        log::debug!("{:?} producer stopped", producer);
    }
}
