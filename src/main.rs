mod app;
mod config;
mod db;
mod form;
mod idea;
mod messages;
mod ui;

use app::{App, Overlay};
use clap::{Args, Parser, Subcommand};
use config::{ConfigError, DEFAULT_TABLE, DEFAULT_TIMEOUT_SECS, StoreConfig};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use db::{IdeaStore, Supabase};
use idea::{FIELDS, FieldKey, Idea, IdeaDraft, NONE_PROVIDED};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Browse and submit game ideas stored in a Supabase table
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL", global = true)]
    url: Option<String>,

    /// Supabase anon key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true, global = true)]
    key: Option<String>,

    /// Table holding the ideas
    #[arg(long, default_value = DEFAULT_TABLE, global = true)]
    table: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    /// Log file for the TUI (one-shot commands log to stderr)
    #[arg(long, env = "IDEA_BOARD_LOG", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI gallery (default)
    Run,
    /// Print every idea
    List {
        /// Print raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one idea with all of its fields
    Show {
        /// Identifier of the idea
        id: i64,
    },
    /// Submit a new idea
    Add(AddArgs),
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    mechanics: Option<String>,
    #[arg(long)]
    story: Option<String>,
    #[arg(long)]
    art_style: Option<String>,
    #[arg(long)]
    audience: Option<String>,
    /// Unique selling point
    #[arg(long)]
    usp: Option<String>,
    #[arg(long)]
    platforms: Option<String>,
    #[arg(long)]
    scope: Option<String>,
    #[arg(long)]
    monetization: Option<String>,
    #[arg(long)]
    inspirations: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl AddArgs {
    fn into_draft(self) -> IdeaDraft {
        let mut draft = IdeaDraft::default();
        draft.set(FieldKey::Title, self.title);
        let optional = [
            (FieldKey::Genre, self.genre),
            (FieldKey::Mechanics, self.mechanics),
            (FieldKey::Story, self.story),
            (FieldKey::ArtStyle, self.art_style),
            (FieldKey::Audience, self.audience),
            (FieldKey::Usp, self.usp),
            (FieldKey::Platforms, self.platforms),
            (FieldKey::Scope, self.scope),
            (FieldKey::Monetization, self.monetization),
            (FieldKey::Inspirations, self.inspirations),
            (FieldKey::Notes, self.notes),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                draft.set(key, value);
            }
        }
        draft
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_dotenv(&std::env::current_dir()?);
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let store_config = match StoreConfig::resolve(cli.url, cli.key, cli.table, cli.timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // The TUI owns the terminal, so it logs to a file.
    let log_result = match &command {
        Commands::Run => match cli.log_file.or_else(config::default_log_path) {
            Some(path) => init_logging(Some(&path)),
            None => Ok(()),
        },
        _ => init_logging(None),
    };
    if let Err(e) = log_result {
        eprintln!("Warning: {e}");
    }

    let store: Arc<dyn IdeaStore> = Arc::new(Supabase::new(&store_config)?);
    tracing::info!(url = %store_config.url, table = %store_config.table, "using store");

    let result = match command {
        Commands::Run => run_tui(store).await,
        Commands::List { json } => run_list(store.as_ref(), json).await,
        Commands::Show { id } => run_show(store.as_ref(), id).await,
        Commands::Add(args) => run_add(store.as_ref(), args).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

/// Install the tracing subscriber. `None` logs to stderr.
fn init_logging(log_file: Option<&Path>) -> Result<(), ConfigError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("idea_board=info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

async fn run_tui(store: Arc<dyn IdeaStore>) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(store);
    app.load_ideas();

    // Init terminal
    let mut terminal = ratatui::init();
    let size = terminal.size()?;
    app.update_columns(size.width);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    ratatui::restore();
    result
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.drain_events();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll so store results show up promptly
        if crossterm::event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(width, _) => {
                    app.update_columns(width);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.overlay {
        Overlay::Form => {
            if let Some(action) = app.form.handle_key(key) {
                app.handle_form_action(action);
            }
        }
        Overlay::Detail => handle_detail_key(app, key),
        Overlay::None => handle_gallery_key(app, key),
    }
}

fn handle_gallery_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Right | KeyCode::Char('l') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Home | KeyCode::Char('g') => {
            app.selected = 0;
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.selected = app.ideas.len().saturating_sub(1);
        }
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('n') => app.open_form(),
        KeyCode::Char('r') => app.load_ideas(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::PageDown => app.scroll_page_down(),
        KeyCode::PageUp => app.scroll_page_up(),
        _ => {}
    }
}

async fn run_list(store: &dyn IdeaStore, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ideas = store.list().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ideas)?);
        return Ok(());
    }
    if ideas.is_empty() {
        println!("No ideas submitted yet.");
    }
    for idea in &ideas {
        println!("{:>6}  {}", idea.id, idea.title);
    }
    Ok(())
}

async fn run_show(store: &dyn IdeaStore, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let idea = store.get(id).await?;
    print!("{}", format_idea(&idea));
    Ok(())
}

async fn run_add(store: &dyn IdeaStore, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let draft = args.into_draft();
    if draft.title_is_blank() {
        return Err("title must not be empty".into());
    }
    let idea = store.insert(draft).await?;
    println!("Created idea {} \"{}\"", idea.id, idea.title);
    Ok(())
}

/// Plain-text rendition of the detail view.
fn format_idea(idea: &Idea) -> String {
    let mut out = format!("#{} {}\n", idea.id, idea.title);
    if let Some(created_at) = idea.created_at {
        out.push_str(&format!("Submitted {}\n", created_at.format("%Y-%m-%d %H:%M UTC")));
    }
    for spec in FIELDS.iter().filter(|s| s.key != FieldKey::Title) {
        out.push('\n');
        out.push_str(spec.label);
        out.push('\n');
        for line in idea.display_value(spec.key).unwrap_or(NONE_PROVIDED).lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
