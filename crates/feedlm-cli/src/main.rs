use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use feedlm_browser::{CHROME_PATH_ENV, DEFAULT_DEBUGGING_PORT};
use feedlm_cli::{Context, OutputFormat, commands};
use feedlm_core::store::DATA_DIR_ENV;
use feedlm_core::target::{DEFAULT_NOTEBOOK_PATTERN, DEFAULT_YOUTUBE_PATTERN};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feedlm")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Feed YouTube videos into a NotebookLM notebook",
    long_about = "feedlm collects YouTube video links into a pending list, then drives the \
                  \"add source\" dialog of an open NotebookLM notebook to insert them one by one."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Directory holding the pending list, session record, config and profiles
    #[arg(long, global = true, env = DATA_DIR_ENV, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch Chrome with remote debugging enabled
    Chrome {
        /// Path to Chrome executable (auto-detected if not specified)
        #[arg(long, env = CHROME_PATH_ENV)]
        chrome_path: Option<PathBuf>,

        /// Named profile to keep the Google sign-in between runs (temporary if omitted)
        #[arg(long)]
        profile: Option<String>,

        /// Remote debugging port
        #[arg(long, default_value_t = DEFAULT_DEBUGGING_PORT)]
        port: u16,

        /// Pages to open on startup
        #[arg(value_name = "URL")]
        urls: Vec<String>,
    },

    /// Extract videos from the open YouTube playlist or watch tab
    Extract {
        /// Remote debugging port of the running Chrome
        #[arg(long, default_value_t = DEFAULT_DEBUGGING_PORT)]
        port: u16,

        /// URL pattern of the tab to read (glob or exact)
        #[arg(long, default_value = DEFAULT_YOUTUBE_PATTERN)]
        tab: String,
    },

    /// Add a video link to the pending list
    Add {
        /// Video link
        #[arg(value_name = "LINK")]
        link: String,

        /// Title shown in progress messages (defaults to the link)
        #[arg(long)]
        title: Option<String>,
    },

    /// Show the pending list
    List,

    /// Remove one video from the pending list
    Remove {
        /// Position as shown by `feedlm list` (1-based)
        #[arg(value_name = "N")]
        index: usize,
    },

    /// Empty the pending list
    Clear,

    /// Add every pending video to the open notebook
    Run {
        /// Remote debugging port of the running Chrome
        #[arg(long, default_value_t = DEFAULT_DEBUGGING_PORT)]
        port: u16,

        /// URL pattern of the notebook tab (glob or exact)
        #[arg(long, default_value = DEFAULT_NOTEBOOK_PATTERN)]
        target: String,

        /// Selector profile to use instead of the configured one (marker, attribute)
        #[arg(long)]
        selectors: Option<String>,
    },

    /// Show progress of the current or last batch
    Status {
        /// Discard a record left behind by an interrupted run
        #[arg(long)]
        clear: bool,
    },

    /// Inspect or create the driver configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  \
                            bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  \
                            bash:  feedlm completion bash >> ~/.bashrc\n  \
                            zsh:   feedlm completion zsh > ~/.zfunc/_feedlm\n  \
                            fish:  feedlm completion fish > ~/.config/fish/completions/feedlm.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration to the data directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Completion must work without a resolvable data directory.
    let ctx = || Context::new(cli.data_dir.clone(), cli.format);

    match cli.command {
        Commands::Chrome {
            chrome_path,
            profile,
            port,
            urls,
        } => commands::chrome::execute(&ctx()?, chrome_path, profile, port, urls),
        Commands::Extract { port, tab } => commands::extract::execute(&ctx()?, port, &tab),
        Commands::Add { link, title } => commands::pending::add(&ctx()?, &link, title),
        Commands::List => commands::pending::list(&ctx()?),
        Commands::Remove { index } => commands::pending::remove(&ctx()?, index),
        Commands::Clear => commands::pending::clear(&ctx()?),
        Commands::Run {
            port,
            target,
            selectors,
        } => commands::run::execute(&ctx()?, port, &target, selectors.as_deref()),
        Commands::Status { clear } => commands::status::execute(&ctx()?, clear),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(&ctx()?),
            ConfigCommands::Init { force } => commands::config::init(&ctx()?, force),
        },
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new(
            "feedlm=debug,feedlm_cli=debug,feedlm_core=debug,feedlm_driver=debug,feedlm_browser=debug",
        )
    } else {
        EnvFilter::new("feedlm=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
