mod cli;
mod logger;
mod source;
mod visual;

use std::{
    env, fs,
    io::stdout,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
};
use keytide::{
    clock::Clock,
    sink::{AudioSink, DummyAudioSink},
    Config, Orchestrator, Palette, UserGesture, Visibility,
};
use keytide_audio::NoiseSink;
use ratatui::{
    layout::{Constraint, Layout},
    text::Line,
    widgets::{Block, Paragraph},
    DefaultTerminal, Frame,
};
use source::TerminalSource;
use tracing::{debug, warn};
use visual::TerminalVisual;

type App = Orchestrator<Box<dyn AudioSink>, TerminalVisual>;

const FRAME_TIME: Duration = Duration::from_millis(1000 / 60);
const INTENSITY_STEP: f32 = 0.1;

enum Action {
    None,
    Quit,
}

fn main() -> Result<()> {
    let args = cli::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| env::temp_dir().join("keytide.log"));
    logger::init(&log_file)?;

    let config = Config::with_preset(args.preset.into());
    let visual = TerminalVisual::new(config.visual_baseline);
    let mut app: App = Orchestrator::new(config, audio_sink(args.mute), visual)?;

    app.intensity_changed(args.intensity);
    app.palette_changed(args.palette.into());

    if let Some(path) = &args.file {
        match fs::read(path) {
            Ok(bytes) => {
                if let Err(err) = app.user_file_selected(&bytes) {
                    debug!("Playing noise instead of {}: {err}", path.display());
                }
            }
            Err(err) => warn!("Couldn't read {}: {err}", path.display()),
        }
    }

    app.start()?;

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableFocusChange)?;

    let result = run(&mut terminal, &mut app);

    app.stop();
    execute!(stdout(), DisableFocusChange)?;
    ratatui::restore();

    result
}

fn audio_sink(mute: bool) -> Box<dyn AudioSink> {
    if mute {
        return Box::new(DummyAudioSink::new());
    }

    match NoiseSink::default_device() {
        Ok(sink) => Box::new(sink),
        Err(err) => {
            warn!("Continuing without audio: {err}");
            Box::new(DummyAudioSink::unavailable())
        }
    }
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    let mut source = TerminalSource::new(Clock::new());

    loop {
        app.visual_sink_mut().advance(Instant::now());
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(FRAME_TIME)? {
            // everything which queued up since the last frame
            loop {
                if let Action::Quit = handle_event(app, &mut source, event::read()?) {
                    return Ok(());
                }

                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        app.pump(&mut source);
    }
}

fn handle_event(app: &mut App, source: &mut TerminalSource, event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if source.record(&key) {
                return Action::None;
            }

            app.on_user_gesture(UserGesture::Key);
            return handle_shortcut(app, key);
        }
        Event::Mouse(_) => app.on_user_gesture(UserGesture::Pointer),
        Event::FocusLost => app.set_visibility(Visibility::Hidden),
        Event::FocusGained => app.set_visibility(Visibility::Visible),
        _ => {}
    }

    Action::None
}

fn handle_shortcut(app: &mut App, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if ctrl => return Action::Quit,
        KeyCode::Up => app.intensity_changed(app.intensity().get() + INTENSITY_STEP),
        KeyCode::Down => app.intensity_changed(app.intensity().get() - INTENSITY_STEP),
        KeyCode::Char('r') if ctrl => {
            if app.reset_to_default_source().is_ok() {
                debug!("Back to noise");
            }
        }
        KeyCode::Char('p') if ctrl => {
            let palette = match app.palette() {
                Palette::Day => Palette::Night,
                Palette::Night => Palette::Day,
            };
            app.palette_changed(palette);
        }
        _ => {}
    }

    Action::None
}

fn draw(frame: &mut Frame, app: &App) {
    let [canvas_area, metrics_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(4)]).areas(frame.area());

    let canvas = app.visual_sink().widget(Block::bordered().title(" keytide "));
    frame.render_widget(canvas, canvas_area);

    frame.render_widget(metrics(app), metrics_area);
}

fn metrics(app: &App) -> Paragraph<'static> {
    let snapshot = app.snapshot();

    let iki = match snapshot.iki_ms() {
        Some(iki) => format!("{iki:.0} ms"),
        None => "-".to_string(),
    };

    let audio = if app.audio_sink().is_running() {
        "playing"
    } else if app.awaits_gesture() {
        "waiting for a key press"
    } else {
        "silent"
    };

    let palette = match app.palette() {
        Palette::Day => "day",
        Palette::Night => "night",
    };

    Paragraph::new(vec![
        Line::from(format!(
            "interval {iki} | {:.0} wpm | intensity {:.0}% | palette {palette} | audio {audio}",
            snapshot.wpm_10s,
            app.intensity().get() * 100.,
        )),
        Line::from("↑/↓ intensity | ctrl-p palette | ctrl-r back to noise | esc quit"),
    ])
    .block(Block::bordered())
}
