use clap::{Parser, Subcommand, ValueEnum};
use lecturescribe::notes::GenerationMode;
use lecturescribe::render::ColorChoice;
use lecturescribe::store::{NoteSource, SortOrder};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lecturescribe")]
#[command(version)]
#[command(about = "Turn lecture transcripts into structured study notes")]
#[command(
    long_about = "lecturescribe - Turn lecture transcripts into structured study notes.\n\n\
    Sends a transcript to a configurable text generator, recovers summary, key points,\n\
    definitions and full notes from whatever it replies, and keeps the results in a\n\
    local note store for reading and export.\n\n\
    Examples:\n  \
    lecturescribe generate lecture.txt --title \"Arrays\"   # Generate and store notes\n  \
    lecturescribe parse reply.txt --title \"Arrays\"        # Parse a saved reply\n  \
    lecturescribe render notes.md                         # Render note markdown\n  \
    lecturescribe list                                    # List stored notes\n  \
    lecturescribe show 3f2a --tab key-points              # Read one note"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Notes file to use instead of the configured one
    #[arg(long = "store", value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Log progress to stderr (repeat for more detail)
    ///
    /// RUST_LOG takes precedence when set.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a raw generator reply into structured notes
    ///
    /// Reads the reply from FILE, or stdin when FILE is '-'.
    Parse {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Lecture title, used for fallback text and the notes heading
        #[arg(short = 't', long = "title")]
        title: String,

        #[arg(short = 'm', long = "mode", value_enum, default_value_t = ModeArg::Full)]
        mode: ModeArg,

        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,
    },

    /// Render markdown-like note text for the terminal
    Render {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// plain prints styled text, json prints the block structure
        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Print the prompt that would be sent for a transcript
    Prompt {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        transcript: PathBuf,

        #[arg(short = 't', long = "title")]
        title: String,

        #[arg(short = 'm', long = "mode", value_enum)]
        mode: Option<ModeArg>,
    },

    /// Generate notes from a transcript and add them to the store
    Generate {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        transcript: PathBuf,

        #[arg(short = 't', long = "title")]
        title: String,

        /// Prompt variant; defaults to the configured mode
        #[arg(short = 'm', long = "mode", value_enum)]
        mode: Option<ModeArg>,

        #[command(flatten)]
        origin: OriginArgs,

        /// Generator command; overrides [generation] command in the config
        ///
        /// Run through the shell with the prompt on stdin. Its stdout is the reply.
        #[arg(short = 'c', long = "command", value_name = "CMD")]
        generator: Option<String>,
    },

    /// Parse a saved generator reply and add it to the store
    Import {
        /// Raw generator reply, or '-' for stdin
        #[arg(value_hint = clap::ValueHint::FilePath)]
        reply: PathBuf,

        #[arg(short = 't', long = "title")]
        title: String,

        #[arg(short = 'm', long = "mode", value_enum, default_value_t = ModeArg::Full)]
        mode: ModeArg,

        /// Transcript the reply was generated from
        #[arg(long = "transcript", value_name = "FILE")]
        transcript: Option<PathBuf>,

        #[command(flatten)]
        origin: OriginArgs,
    },

    /// List stored notes, newest first unless sorted otherwise
    List {
        /// Only notes whose title or source info contains TEXT (case-insensitive)
        #[arg(short = 's', long = "search", value_name = "TEXT")]
        search: Option<String>,

        /// Only notes from this source
        #[arg(long = "source", value_enum)]
        source: Option<SourceArg>,

        #[arg(long = "sort", value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,

        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,
    },

    /// Show one stored note
    Show {
        /// Note id or a unique prefix of it
        id: String,

        #[arg(long = "tab", value_enum, default_value_t = Tab::Notes)]
        tab: Tab,

        #[arg(short = 'o', long = "output", default_value = "plain")]
        output: OutputFormat,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Change the title of a stored note
    Rename { id: String, title: String },

    /// Delete stored notes
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete every stored note
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Export a note as plain text
    Export {
        id: String,

        /// Output file; defaults to a name derived from the title. '-' prints to stdout.
        #[arg(long = "out", value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Show the config file location and contents
    Config {
        /// Write the default config if none exists
        #[arg(long = "init")]
        init: bool,
    },
}

/// Where a note's transcript came from.
#[derive(Debug, Clone, clap::Args)]
pub struct OriginArgs {
    #[arg(long = "source", value_enum, default_value_t = SourceArg::Audio)]
    pub source: SourceArg,

    /// File name or URL of the original recording
    #[arg(long = "source-info", value_name = "TEXT")]
    pub source_info: Option<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DisplayArgs {
    /// Override the configured color mode
    #[arg(long = "color", value_enum)]
    pub color: Option<ColorArg>,

    /// Override the configured maximum table width
    #[arg(long = "width", value_name = "COLUMNS")]
    pub width: Option<usize>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// JSON output
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Prose summary only
    Summary,
    /// All four sections
    Full,
    /// Summary, key points and definitions
    KeyConcepts,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Summary => GenerationMode::Summary,
            ModeArg::Full => GenerationMode::Full,
            ModeArg::KeyConcepts => GenerationMode::KeyConcepts,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Audio,
    Video,
    Link,
}

impl From<SourceArg> for NoteSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Audio => NoteSource::Audio,
            SourceArg::Video => NoteSource::Video,
            SourceArg::Link => NoteSource::Link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    /// Title, A to Z
    Az,
    /// Title, Z to A
    Za,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Newest => SortOrder::Newest,
            SortArg::Oldest => SortOrder::Oldest,
            SortArg::Az => SortOrder::Az,
            SortArg::Za => SortOrder::Za,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorArg {
    /// Color when stdout is a color terminal
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    /// Summary followed by the rendered full notes
    Notes,
    Transcript,
    KeyPoints,
    Definitions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_tab_and_global_store() {
        let cli = Cli::parse_from([
            "lecturescribe",
            "show",
            "3f2a",
            "--tab",
            "key-points",
            "--store",
            "/tmp/notes.json",
        ]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/notes.json")));
        match cli.command {
            Command::Show { id, tab, .. } => {
                assert_eq!(id, "3f2a");
                assert_eq!(tab, Tab::KeyPoints);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_generate_mode_is_optional() {
        let cli = Cli::parse_from(["lecturescribe", "-vv", "generate", "t.txt", "-t", "Arrays"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Generate { mode, origin, .. } => {
                assert!(mode.is_none());
                assert!(matches!(origin.source, SourceArg::Audio));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_list_filters() {
        let cli = Cli::parse_from([
            "lecturescribe",
            "list",
            "--search",
            "chem",
            "--source",
            "video",
            "--sort",
            "za",
        ]);
        match cli.command {
            Command::List {
                search,
                source,
                sort,
                ..
            } => {
                assert_eq!(search.as_deref(), Some("chem"));
                assert!(matches!(source, Some(SourceArg::Video)));
                assert_eq!(sort, SortArg::Za);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["lecturescribe", "delete"]).is_err());
    }
}
