//! Headless demo host
//!
//! Runs a sheet on a calloop event loop: a 16ms frame timer advances the
//! tween animator and drains deferred tasks, while a script thread plays
//! touch samples over a channel (marshalled onto the loop thread before they
//! reach the sheet).

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use bottom_sheet::animation::{AnimatedProps, Property, TweenAnimator};
use bottom_sheet::primitives::easing::Easing;
use bottom_sheet::primitives::{Color, Point, Rect};
use bottom_sheet::{
    AnimationTargets, AnimationTicket, SheetAppearance, Sheet, SheetGesture,
    SheetGestureRecognizer, SheetHost, SheetState, SheetTask,
};
use calloop::channel::{self, Sender};
use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, info, warn};

const FRAME: Duration = Duration::from_millis(16);
const SCENARIO_TIMEOUT: Duration = Duration::from_secs(5);
/// Panel height when no fixed height is configured: one row per item plus padding
const ROW_HEIGHT: f64 = 48.0;
const PANEL_PADDING: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Slow drag past the halfway line, then let go
    Drag,
    /// Short, fast flick downward
    Flick,
    /// Small nudge that springs back
    Restore,
    /// Tap on the scrim
    Tap,
    /// Every scenario in turn
    All,
}

impl Scenario {
    pub fn name(self) -> &'static str {
        match self {
            Scenario::Drag => "drag",
            Scenario::Flick => "flick",
            Scenario::Restore => "restore",
            Scenario::Tap => "tap",
            Scenario::All => "all",
        }
    }

    pub fn expand(self) -> Vec<Scenario> {
        match self {
            Scenario::All => vec![Scenario::Drag, Scenario::Flick, Scenario::Restore, Scenario::Tap],
            other => vec![other],
        }
    }
}

/// Raw touch sample from the script thread
#[derive(Debug, Clone, Copy)]
enum TouchSample {
    Down { id: i32, pos: Point },
    Motion { id: i32, pos: Point },
    Up { id: i32 },
}

/// One step of a touch script: wait, then send
type ScriptStep = (Duration, TouchSample);

#[derive(Debug, Serialize)]
struct FrameRecord {
    scenario: &'static str,
    frame: u64,
    t_ms: f64,
    state: String,
    panel_center_y: f64,
    scrim_alpha: f64,
}

/// Screen, panel and scrim of the demo
pub struct DemoHost {
    screen: Rect,
    panel: Option<Rect>,
    fixed_height: Option<f64>,
    props: AnimatedProps,
    animator: TweenAnimator,
    tasks: VecDeque<SheetTask>,
    scrim_color: Color,
    panel_color: Color,
    corner_radius: f64,
    content: Vec<String>,
    dismissed: bool,
    now: Instant,
}

impl DemoHost {
    pub fn new(screen: Rect) -> Self {
        Self {
            screen,
            panel: None,
            fixed_height: None,
            props: AnimatedProps::default(),
            animator: TweenAnimator::new(Easing::EaseInOut),
            tasks: VecDeque::new(),
            scrim_color: [0.0; 4],
            panel_color: [0.0; 4],
            corner_radius: 0.0,
            content: Vec::new(),
            dismissed: false,
            now: Instant::now(),
        }
    }

    /// Pin the panel to the bottom of the screen
    pub fn layout(&mut self) {
        let intrinsic = self.content.len() as f64 * ROW_HEIGHT + PANEL_PADDING;
        let height = self.fixed_height.unwrap_or(intrinsic).min(self.screen.height);
        let frame = Rect::new(0.0, self.screen.bottom() - height, self.screen.width, height);
        debug!(
            height,
            corner_radius = self.corner_radius,
            scrim = ?self.scrim_color,
            panel = ?self.panel_color,
            "panel laid out"
        );

        self.props.panel_center_y = frame.center_y();
        self.panel = Some(frame);
    }

    fn settled(&self) -> bool {
        !self.animator.is_animating() && self.tasks.is_empty()
    }
}

impl SheetHost for DemoHost {
    type Content = String;

    fn panel_frame(&self) -> Rect {
        match self.panel {
            Some(frame) => frame.with_center_y(self.props.panel_center_y),
            None => Rect::default(),
        }
    }

    fn screen_height(&self) -> f64 {
        self.screen.height
    }

    fn set_panel_center_y(&mut self, center_y: f64) {
        self.animator.interrupt(Property::PanelCenterY);
        self.props.panel_center_y = center_y;
    }

    fn set_panel_height(&mut self, height: f64) {
        self.fixed_height = Some(height);
    }

    fn set_panel_color(&mut self, color: Color) {
        self.panel_color = color;
    }

    fn set_panel_top_corner_radius(&mut self, radius: f64) {
        self.corner_radius = radius;
    }

    fn attach_content(&mut self, content: String) {
        self.content.push(content);
    }

    fn set_scrim_color(&mut self, color: Color) {
        self.scrim_color = color;
    }

    fn set_scrim_alpha(&mut self, alpha: f64) {
        self.animator.interrupt(Property::ScrimAlpha);
        self.props.scrim_alpha = alpha;
    }

    fn animate(&mut self, ticket: AnimationTicket, duration: Duration, targets: AnimationTargets) {
        self.animator.start(ticket, duration, targets, &self.props, self.now);
    }

    fn schedule(&mut self, task: SheetTask) {
        self.tasks.push_back(task);
    }

    fn sheet_dismissed(&mut self) {
        self.dismissed = true;
    }
}

/// Everything the event loop callbacks touch
struct DemoState {
    scenario: Scenario,
    sheet: Sheet,
    host: DemoHost,
    recognizer: SheetGestureRecognizer,
    frames: Option<BufWriter<File>>,
    frame: u64,
    started: Instant,
    script_done: bool,
    done: bool,
}

impl DemoState {
    fn on_frame(&mut self, now: Instant) {
        self.host.now = now;

        let finished = self.host.animator.tick(now, &mut self.host.props);
        for ticket in finished {
            self.sheet.animation_finished(ticket, &mut self.host);
        }
        while let Some(task) = self.host.tasks.pop_front() {
            self.sheet.run_task(task, &mut self.host);
        }

        self.frame += 1;
        if let Err(e) = self.record_frame(now) {
            warn!("Failed to write frame: {}", e);
            self.frames = None;
        }

        let finished_idle = self.script_done
            && self.sheet.state() == SheetState::Idle
            && self.host.settled();
        if self.host.dismissed || finished_idle {
            self.done = true;
        }
    }

    fn on_touch(&mut self, sample: TouchSample) {
        let now = Instant::now();
        self.host.now = now;

        let gesture = match sample {
            TouchSample::Down { id, pos } => {
                let panel = self.host.panel_frame();
                self.recognizer.touch_down(id, pos, now, panel);
                None
            }
            TouchSample::Motion { id, pos } => self.recognizer.touch_motion(id, pos, now),
            TouchSample::Up { id } => self.recognizer.touch_up(id, now),
        };

        match gesture {
            Some(SheetGesture::Drag(event)) => self.sheet.handle_drag(event, &mut self.host),
            Some(SheetGesture::ScrimTap { position }) => {
                debug!(x = position.x, y = position.y, "scrim tapped");
                self.sheet.scrim_tapped(&mut self.host);
            }
            None => {}
        }
    }

    fn record_frame(&mut self, now: Instant) -> Result<()> {
        let Some(out) = self.frames.as_mut() else {
            return Ok(());
        };
        let record = FrameRecord {
            scenario: self.scenario.name(),
            frame: self.frame,
            t_ms: now.saturating_duration_since(self.started).as_secs_f64() * 1000.0,
            state: format!("{:?}", self.sheet.state()),
            panel_center_y: self.host.props.panel_center_y,
            scrim_alpha: self.host.props.scrim_alpha,
        };
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

/// Build the touch script for a scenario against the laid-out panel
fn script(scenario: Scenario, screen: Rect, panel: Rect) -> Vec<ScriptStep> {
    let start = Point::new(screen.width / 2.0, panel.top() + 24.0);
    let at = |dy: f64| Point::new(start.x, start.y + dy);
    let mut steps = vec![(Duration::from_millis(500), TouchSample::Down { id: 0, pos: start })];

    match scenario {
        Scenario::Drag => {
            // 20 units every 50ms = 400 units/s, under the default threshold
            let distance = panel.height / 2.0 + 40.0;
            let count = (distance / 20.0).ceil() as usize;
            for i in 1..=count {
                steps.push((Duration::from_millis(50), TouchSample::Motion { id: 0, pos: at(i as f64 * 20.0) }));
            }
            steps.push((Duration::from_millis(200), TouchSample::Up { id: 0 }));
        }
        Scenario::Flick => {
            for i in 1..=3 {
                steps.push((Duration::from_millis(10), TouchSample::Motion { id: 0, pos: at(i as f64 * 10.0) }));
            }
            steps.push((Duration::from_millis(2), TouchSample::Up { id: 0 }));
        }
        Scenario::Restore => {
            steps.push((Duration::from_millis(100), TouchSample::Motion { id: 0, pos: at(5.0) }));
            steps.push((Duration::from_millis(100), TouchSample::Motion { id: 0, pos: at(10.0) }));
            steps.push((Duration::from_millis(150), TouchSample::Up { id: 0 }));
        }
        Scenario::Tap => {
            let scrim = Point::new(screen.width / 2.0, (panel.top() / 2.0).max(1.0));
            steps[0].1 = TouchSample::Down { id: 0, pos: scrim };
            steps.push((Duration::from_millis(50), TouchSample::Up { id: 0 }));
        }
        Scenario::All => {}
    }
    steps
}

fn play(tx: Sender<TouchSample>, steps: Vec<ScriptStep>) {
    for (delay, sample) in steps {
        thread::sleep(delay);
        if tx.send(sample).is_err() {
            return;
        }
    }
}

/// Run one scenario to completion; returns the sheet's final state
pub fn run(
    scenario: Scenario,
    appearance: impl SheetAppearance + 'static,
    screen: Rect,
    frames: Option<BufWriter<File>>,
) -> Result<(SheetState, Option<BufWriter<File>>)> {
    info!(?scenario, "Starting scenario");

    let mut event_loop: EventLoop<DemoState> = EventLoop::try_new()?;
    let loop_handle = event_loop.handle();

    let mut host = DemoHost::new(screen);
    let mut sheet = Sheet::new(appearance);
    sheet.load(&mut host);
    for row in ["Share", "Copy link", "Open in browser", "Report"] {
        sheet.embed(&mut host, row.to_string());
    }
    sheet.appear(&mut host);
    host.layout();
    sheet.layout_changed(&mut host);

    let panel = host.panel_frame();
    let steps = script(scenario, screen, panel);

    let (tx, rx) = channel::channel();
    loop_handle
        .insert_source(rx, |event, _, state: &mut DemoState| match event {
            channel::Event::Msg(sample) => state.on_touch(sample),
            channel::Event::Closed => state.script_done = true,
        })
        .map_err(|e| anyhow!("Failed to insert touch channel: {}", e.error))?;

    loop_handle
        .insert_source(Timer::immediate(), |now, _, state: &mut DemoState| {
            state.on_frame(now);
            TimeoutAction::ToDuration(FRAME)
        })
        .map_err(|e| anyhow!("Failed to insert frame timer: {}", e.error))?;

    let player = thread::spawn(move || play(tx, steps));

    let mut state = DemoState {
        scenario,
        sheet,
        host,
        recognizer: SheetGestureRecognizer::default(),
        frames,
        frame: 0,
        started: Instant::now(),
        script_done: false,
        done: false,
    };

    while !state.done {
        event_loop
            .dispatch(Some(Duration::from_millis(1)), &mut state)
            .map_err(|e| anyhow!("Event loop error: {:?}", e))?;

        if state.started.elapsed() > SCENARIO_TIMEOUT {
            warn!(?scenario, state = ?state.sheet.state(), "Scenario timed out");
            break;
        }
    }

    // Dropping the loop closes the channel, which unblocks the player
    drop(loop_handle);
    drop(event_loop);
    if player.join().is_err() {
        warn!("Touch script thread panicked");
    }

    if let Some(out) = state.frames.as_mut() {
        out.flush()?;
    }

    info!(?scenario, state = ?state.sheet.state(), frames = state.frame, "Scenario finished");
    Ok((state.sheet.state(), state.frames))
}
