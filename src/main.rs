use catswp::app::App;
use catswp::async_loader::{BatchFetcher, CardImageManager};
use catswp::cli::{AppConfig, Args};
use catswp::config::UserConfig;
use catswp::domain::Direction;
use catswp::logging;
use catswp::source::{CataasSource, ImageSource};
use catswp::tui::{
    action_label, contains, handle_key_event, handle_mouse_event, handle_overlay_input, render,
    screen_layout, KeyAction, PointerAction, ViewState,
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::sync::Arc;
use std::{
    io,
    time::{Duration, Instant},
};
use tracing::{info, warn};

/// Poll interval while something is moving
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config: AppConfig = args.into();

    if let Some(path) = config.log_file.clone().or_else(logging::default_log_path) {
        if let Err(e) = logging::init(&path) {
            eprintln!("Warning: {}", e);
        }
    }

    if let Err(e) = run_app_with_config(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> catswp::Result<()> {
    info!(
        base_url = %config.base_url,
        batch_size = config.batch_size,
        "Starting catswp"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let source = CataasSource::new(&config.base_url, config.timeout)?;
    let source: Arc<dyn ImageSource> = Arc::new(source);
    let mut fetcher = BatchFetcher::new(
        runtime.handle().clone(),
        Arc::clone(&source),
        config.batch_size,
    );
    let mut pictures = CardImageManager::new(runtime.handle().clone(), source);
    let mut app = App::new(config.sensitivity);

    // Load user configuration
    let mut user_config = UserConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load user config");
        UserConfig::default()
    });

    start_fetch(&mut app, &mut fetcher);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(
        &mut terminal,
        &mut app,
        &mut fetcher,
        &mut pictures,
        config,
        &mut user_config,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Print the liked cats so they survive the session
    let liked = app.liked_items();
    if !liked.is_empty() {
        println!("You liked {} cat(s):", liked.len());
        for item in liked {
            println!("  {}", item.image_url);
        }
    }

    Ok(result?)
}

fn start_fetch(app: &mut App, fetcher: &mut BatchFetcher) {
    if app.reset() {
        fetcher.start();
    }
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    fetcher: &mut BatchFetcher,
    pictures: &mut CardImageManager,
    config: &AppConfig,
    user_config: &mut UserConfig,
) -> io::Result<()> {
    // Show welcome on first launch or if --welcome flag is set
    let mut view_state = if config.show_welcome || !user_config.welcome_shown {
        ViewState::Welcome
    } else {
        ViewState::Main
    };

    loop {
        if let Some(outcome) = fetcher.poll() {
            app.finish_fetch(outcome);
            let keep: Vec<&str> = app.deck().items().iter().map(|i| i.id.as_str()).collect();
            pictures.retain(&keep);
        }

        app.tick(Instant::now());

        let area = terminal
            .draw(|frame| render(frame, app, &view_state, pictures))?
            .area;

        let mut timeout = if app.is_animating() || app.is_fetching() {
            FRAME_INTERVAL
        } else {
            IDLE_INTERVAL
        };
        if let Some(due) = app.next_deadline(Instant::now()) {
            timeout = timeout.min(due);
        }

        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let keep_running = match view_state {
                    ViewState::Welcome => {
                        // Any key dismisses welcome, except an explicit quit
                        if handle_overlay_input(key) == KeyAction::Quit {
                            false
                        } else {
                            view_state = ViewState::Main;
                            user_config.welcome_shown = true;
                            if let Err(e) = user_config.save() {
                                warn!(error = %e, "Failed to save user config");
                            }
                            true
                        }
                    }
                    ViewState::Help => match handle_overlay_input(key) {
                        KeyAction::Quit => false,
                        KeyAction::Help => {
                            view_state = ViewState::Main;
                            true
                        }
                        _ => true,
                    },
                    ViewState::Main => handle_main_key(key, app, fetcher, &mut view_state),
                };
                if !keep_running {
                    break;
                }
            }
            Event::Mouse(mouse) if view_state == ViewState::Main => {
                handle_pointer(handle_mouse_event(mouse), area, app, fetcher);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Returns false when the app should exit
fn handle_main_key(
    key: KeyEvent,
    app: &mut App,
    fetcher: &mut BatchFetcher,
    view_state: &mut ViewState,
) -> bool {
    match handle_key_event(key) {
        KeyAction::Quit => return false,
        KeyAction::Like => {
            app.decide(Direction::Right, Instant::now());
        }
        KeyAction::Nope => {
            app.decide(Direction::Left, Instant::now());
        }
        KeyAction::Reset => start_fetch(app, fetcher),
        KeyAction::Open => {
            if let Some(item) = app.current_item() {
                if let Err(e) = open::that_detached(&item.image_url) {
                    warn!(url = %item.image_url, error = %e, "Failed to open cat");
                }
            }
        }
        KeyAction::Help => *view_state = ViewState::Help,
        KeyAction::None => {}
    }
    true
}

fn handle_pointer(action: PointerAction, area: Rect, app: &mut App, fetcher: &mut BatchFetcher) {
    let layout = screen_layout(area);
    match action {
        PointerAction::Down { column, row } => {
            if contains(layout.nope_button, column, row) {
                app.decide(Direction::Left, Instant::now());
            } else if contains(layout.like_button, column, row) {
                app.decide(Direction::Right, Instant::now());
            } else if action_label(&app.screen()).is_some()
                && contains(layout.action_button, column, row)
            {
                start_fetch(app, fetcher);
            } else {
                app.pointer_down(column, contains(layout.card, column, row));
            }
        }
        PointerAction::Drag { column, .. } => app.pointer_drag(column),
        PointerAction::Up { column, .. } => {
            app.pointer_up(column, Instant::now());
        }
        PointerAction::None => {}
    }
}
