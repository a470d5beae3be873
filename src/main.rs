use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use typeahead::command::{HELP_TEXT, SessionCommand};
use typeahead::config::{self, Config, RecentConfig};
use typeahead::recent::{FileStore, RecentSearches};
use typeahead::source::{HttpSource, SuggestionSource};
use typeahead::suggest::{PipelineSettings, SearchView, Suggester};
use typeahead::view::render_view;

/// Delay between simulated keystrokes for `--type`
const KEYSTROKE_INTERVAL: Duration = Duration::from_millis(50);

/// Search suggestions from the command line
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Debounced, cached search suggestions with recent-search history"
)]
struct Args {
    /// Type QUERY one keystroke at a time, print the settled suggestions and exit
    #[arg(long = "type", value_name = "QUERY")]
    type_query: Option<String>,

    /// Suggestion endpoint, queried as ENDPOINT?name=QUERY (overrides config)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Quiet period before a query is looked up (overrides config)
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Keep recent searches in memory for this session only
    #[arg(long)]
    no_history: bool,

    /// Print recent searches and exit
    #[arg(long)]
    recent: bool,

    /// Print each view as a JSON line instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    init_logging();

    color_eyre::install()?;

    // Load config early so flags can override it
    let config_result = config::load_config();

    let args = Args::parse();

    if let Some(warning) = &config_result.warning {
        eprintln!("Warning: {}", warning);
    }

    let mut config = config_result.config;
    apply_overrides(&mut config, &args);

    let recent = open_recent(&config.recent, args.no_history);
    if args.recent {
        print_recent(recent.entries());
        return Ok(());
    }

    let source = HttpSource::new(&config.search.endpoint)?;
    let suggester = Suggester::new(source, PipelineSettings::from_config(&config), recent);
    let output = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        match args.type_query {
            Some(query) => simulate_typing(suggester, &query, output).await,
            None => run_session(suggester, output).await,
        }
    })?;

    #[cfg(debug_assertions)]
    log::debug!("=== TYPEAHEAD DEBUG SESSION ENDED ===");

    Ok(())
}

/// Debug builds write to /tmp/typeahead-debug.log at DEBUG level; release builds
/// log to stderr only when RUST_LOG asks for it.
fn init_logging() {
    #[cfg(debug_assertions)]
    {
        use std::io::Write;

        let Ok(log_file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/typeahead-debug.log")
        else {
            return;
        };

        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .format(|buf, record| {
                use std::time::SystemTime;
                let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
                writeln!(
                    buf,
                    "[{}] [{}] {}",
                    datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            })
            .init();

        log::debug!("=== TYPEAHEAD DEBUG SESSION STARTED ===");
    }

    #[cfg(not(debug_assertions))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(endpoint) = &args.endpoint {
        config.search.endpoint = endpoint.clone();
    }
    if let Some(debounce_ms) = args.debounce_ms {
        config.search.debounce_ms = debounce_ms;
    }
}

fn open_recent(config: &RecentConfig, no_history: bool) -> RecentSearches {
    if no_history || !config.persist {
        return RecentSearches::in_memory(config.max_entries);
    }

    match FileStore::default_location() {
        Some(store) => RecentSearches::load(Box::new(store), config.max_entries),
        None => {
            log::warn!("No data directory available, recent searches will not be saved");
            RecentSearches::in_memory(config.max_entries)
        }
    }
}

async fn simulate_typing<S: SuggestionSource>(
    mut suggester: Suggester<S>,
    query: &str,
    output: OutputFormat,
) -> Result<()> {
    let mut typed = String::new();
    for ch in query.chars() {
        typed.push(ch);
        suggester.input_changed(&typed);
        tokio::time::sleep(KEYSTROKE_INTERVAL).await;
        suggester.poll_events();
    }

    suggester.settle().await;
    print_view(&suggester.view(), output)
}

/// Line-driven session: plain lines are typed into the search box, `/` lines
/// are commands. Views are printed whenever the pipeline changes them.
async fn run_session<S: SuggestionSource>(
    mut suggester: Suggester<S>,
    output: OutputFormat,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match SessionCommand::parse(&line) {
                    Ok(SessionCommand::Quit) => return Ok(()),
                    Ok(command) => apply_command(&mut suggester, command, output)?,
                    Err(message) => eprintln!("{}", message),
                }
            }
            changed = suggester.pump() => {
                if changed {
                    print_view(&suggester.view(), output)?;
                }
            }
        }
    }

    // Input closed: let the last query resolve before exiting
    suggester.settle().await;
    print_view(&suggester.view(), output)
}

fn apply_command<S: SuggestionSource>(
    suggester: &mut Suggester<S>,
    command: SessionCommand,
    output: OutputFormat,
) -> Result<()> {
    match command {
        SessionCommand::Input(text) => {
            suggester.input_changed(&text);
            // Non-blank input prints once the lookup resolves
            if suggester.phase().is_busy() {
                return Ok(());
            }
        }
        SessionCommand::Submit => {
            suggester.submit();
        }
        SessionCommand::Select(position) => {
            let Some(item) = suggester.suggestions().get(position - 1).cloned() else {
                eprintln!("No suggestion at position {}", position);
                return Ok(());
            };
            suggester.select_suggestion(&item);
        }
        SessionCommand::Down => {
            suggester.select_next();
        }
        SessionCommand::Up => {
            suggester.select_previous();
        }
        SessionCommand::Enter => suggester.confirm(),
        SessionCommand::Escape => suggester.dismiss(),
        SessionCommand::Focus => suggester.focus(),
        SessionCommand::Clear => suggester.clear(),
        SessionCommand::ShowRecent => {
            print_recent(suggester.recent().entries());
            return Ok(());
        }
        SessionCommand::ClearRecent => suggester.clear_recent(),
        SessionCommand::Help | SessionCommand::Quit => {
            println!("{}", HELP_TEXT);
            return Ok(());
        }
    }

    print_view(&suggester.view(), output)
}

fn print_view(view: &SearchView, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => println!("{}\n", render_view(view)),
        OutputFormat::Json => println!("{}", serde_json::to_string(view)?),
    }
    Ok(())
}

fn print_recent(entries: &[String]) {
    if entries.is_empty() {
        println!("No recent searches");
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        println!("{}. {}", index + 1, entry);
    }
}
