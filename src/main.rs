use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use pixelcade::app::App;
use pixelcade::config::{ArcadeConfig, Cli};
use pixelcade::error::ArcadeError;
use pixelcade::event::{Event, EventHandler};
use pixelcade::ui;

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    );
}

fn init_logging(config: &ArcadeConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ArcadeConfig::from_cli(&cli)?;
    init_logging(&config)?;

    if !io::stdout().is_tty() {
        return Err(ArcadeError::MountUnavailable.into());
    }

    // Set up panic hook to restore terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    // key releases let held keys work without the hold-time fallback
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(config.tick_rate_ms);
    let mut app = App::new(&config, event_handler.sender(), enhanced);
    log::info!(
        "pixelcade starting (tick {}ms, key releases {})",
        config.tick_rate_ms,
        if enhanced { "reported" } else { "emulated" }
    );
    if let Some(id) = config.start_game {
        app.launch(id);
    }

    let result = run(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    if enhanced {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    restore_terminal();
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next().context("event channel closed")? {
            Event::Tick => app.on_tick(std::time::Instant::now()),
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
            Event::Timer(id) => app.on_timer(id),
            Event::FocusLost => app.on_focus_lost(),
            Event::Resize => {}
        }

        if app.should_quit {
            log::info!("quitting");
            return Ok(());
        }
    }
}
