//! # lecturescribe
//!
//! Turn lecture transcripts into structured study notes.
//!
//! ## Usage
//!
//! Generate notes with a configured model command and store them:
//! ```sh
//! lecturescribe generate lecture.txt --title "Photosynthesis" --command "llm"
//! ```
//!
//! Parse a reply you already have:
//! ```sh
//! lecturescribe parse reply.txt --title "Photosynthesis" -o json
//! ```
//!
//! Read a stored note:
//! ```sh
//! lecturescribe show 3f2a --tab definitions
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, Command, DisplayArgs, OriginArgs, OutputFormat, Tab};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail, eyre};
use lecturescribe::generate::{CommandGenerator, generate_notes};
use lecturescribe::notes::{GenerationMode, ParsedNotes, parse_response};
use lecturescribe::prompt::build_prompt;
use lecturescribe::render::{InlineSpan, RenderBlock, TerminalRenderer, render_notes};
use lecturescribe::store::{NewNote, Note, NotePatch, NoteQuery, NoteStore, SourceCounts};
use lecturescribe::{Config, export};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    init_tracing(args.verbose);

    let config = Config::load();
    let store_path = args
        .store
        .clone()
        .unwrap_or_else(|| config.store.notes_path());

    match args.command {
        Command::Parse {
            file,
            title,
            mode,
            output,
        } => {
            let reply = read_input(&file)?;
            let parsed = parse_response(&reply, &title, mode.into());
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&parsed)?),
                OutputFormat::Plain => print!("{}", parsed_to_text(&parsed)),
            }
        }

        Command::Render {
            file,
            output,
            display,
        } => {
            let text = read_input(&file)?;
            let blocks = render_notes(&text);
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&blocks)?),
                OutputFormat::Plain => print!("{}", renderer(&config, &display).render(&blocks)),
            }
        }

        Command::Prompt {
            transcript,
            title,
            mode,
        } => {
            let transcript = read_input(&transcript)?;
            let mode = mode.map(GenerationMode::from).unwrap_or(config.generation.mode);
            println!("{}", build_prompt(&transcript, &title, mode));
        }

        Command::Generate {
            transcript,
            title,
            mode,
            origin,
            generator,
        } => {
            let Some(command) = generator.or_else(|| config.generation.command.clone()) else {
                bail!(
                    "No generator command configured. Pass --command or set `command` under \
                     [generation] in {}",
                    config_path_display()
                );
            };
            let text = read_input(&transcript)?;
            let mode = mode.map(GenerationMode::from).unwrap_or(config.generation.mode);

            eprintln!("Generating {mode} notes for \"{title}\" with `{command}`...");
            let parsed = generate_notes(
                &CommandGenerator::new(command),
                &text,
                &title,
                mode,
                config.generation.retry_policy(),
            )?;

            let source_info = source_info(&origin, &transcript);
            let mut store = NoteStore::open(&store_path)?;
            let id = store.add(NewNote::from_parsed(
                parsed,
                title,
                origin.source.into(),
                source_info,
                text,
            ))?;
            store.save()?;
            println!("{id}");
        }

        Command::Import {
            reply,
            title,
            mode,
            transcript,
            origin,
        } => {
            let reply_text = read_input(&reply)?;
            let transcript_text = match &transcript {
                Some(path) => read_input(path)?,
                None => String::new(),
            };
            let parsed = parse_response(&reply_text, &title, mode.into());

            let source_info = source_info(&origin, transcript.as_deref().unwrap_or(reply.as_path()));
            let mut store = NoteStore::open(&store_path)?;
            let id = store.add(NewNote::from_parsed(
                parsed,
                title,
                origin.source.into(),
                source_info,
                transcript_text,
            ))?;
            store.save()?;
            println!("{id}");
        }

        Command::List {
            search,
            source,
            sort,
            output,
        } => {
            let store = NoteStore::open(&store_path)?;
            let query = NoteQuery {
                search,
                source: source.map(Into::into),
                sort: sort.into(),
            };
            let notes = store.query(&query);
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&notes)?),
                OutputFormat::Plain => print_note_list(&notes, store.counts()),
            }
        }

        Command::Show {
            id,
            tab,
            output,
            display,
        } => {
            let store = NoteStore::open(&store_path)?;
            let note = store.resolve(&id)?;
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(note)?),
                OutputFormat::Plain => print!("{}", show_note(note, tab, &renderer(&config, &display))),
            }
        }

        Command::Rename { id, title } => {
            let mut store = NoteStore::open(&store_path)?;
            let id = store.resolve(&id)?.id.clone();
            let patch = NotePatch {
                title: Some(title),
                ..Default::default()
            };
            let note = store.update(&id, patch)?;
            println!("Renamed {} to \"{}\"", short_id(&note.id), note.title);
            store.save()?;
        }

        Command::Delete { ids } => {
            let mut store = NoteStore::open(&store_path)?;
            let full_ids = ids
                .iter()
                .map(|id| store.resolve(id).map(|note| note.id.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            let removed = store.delete_many(&full_ids);
            store.save()?;
            println!("Deleted {removed} note(s)");
        }

        Command::Clear { yes } => {
            let mut store = NoteStore::open(&store_path)?;
            if store.is_empty() {
                println!("No notes to delete");
                return Ok(());
            }
            if !yes && !confirm(&format!("Delete all {} notes?", store.len()))? {
                println!("Aborted");
                return Ok(());
            }
            let removed = store.clear();
            store.save()?;
            println!("Deleted {removed} note(s)");
        }

        Command::Export { id, out } => {
            let store = NoteStore::open(&store_path)?;
            let note = store.resolve(&id)?;
            let text = export::to_plain_text(note);

            match out {
                Some(path) if path.as_os_str() == "-" => println!("{text}"),
                out => {
                    let path = out.unwrap_or_else(|| PathBuf::from(export::file_name(&note.title)));
                    fs::write(&path, text)
                        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
            }
        }

        Command::Config { init } => {
            let path = Config::config_path()
                .ok_or_else(|| eyre!("Could not determine config directory"))?;
            if init && !path.exists() {
                Config::default()
                    .save_to(&path)
                    .map_err(|e| eyre!("Failed to write {}: {e}", path.display()))?;
                println!("Wrote default config to {}", path.display());
            } else {
                println!("# {}", path.display());
            }
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Read a file, or all of stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("Failed to read stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()))
}

fn renderer(config: &Config, display: &DisplayArgs) -> TerminalRenderer {
    let color = display
        .color
        .map(Into::into)
        .unwrap_or(config.display.color_mode);
    let width = display.width.unwrap_or(config.display.max_table_width);
    TerminalRenderer::new(color.use_color(), width)
}

fn source_info(origin: &OriginArgs, input: &Path) -> String {
    origin.source_info.clone().unwrap_or_else(|| {
        if input.as_os_str() == "-" {
            "stdin".to_string()
        } else {
            input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        }
    })
}

fn config_path_display() -> String {
    Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "the config file".to_string())
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn print_note_list(notes: &[&Note], counts: SourceCounts) {
    if counts.total == 0 {
        println!("No notes yet. Create one with `lecturescribe generate` or `lecturescribe import`.");
        return;
    }
    println!(
        "{} notes: {} audio, {} video, {} link",
        counts.total, counts.audio, counts.video, counts.link
    );
    if notes.is_empty() {
        println!("No notes match.");
        return;
    }
    if notes.len() < counts.total {
        println!("Showing {} of {}", notes.len(), counts.total);
    }
    println!();
    for note in notes {
        println!(
            "{:<8}  {}  {:<5}  {}",
            short_id(&note.id),
            note.date.format("%Y-%m-%d"),
            note.source,
            note.title
        );
    }
}

fn parsed_to_text(parsed: &ParsedNotes) -> String {
    let bullets = |entries: &[String]| {
        entries
            .iter()
            .map(|e| format!("• {e}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "SUMMARY\n\n{}\n\nKEY POINTS\n\n{}\n\nDEFINITIONS\n\n{}\n\nFULL NOTES\n\n{}\n",
        parsed.summary,
        bullets(&parsed.key_points),
        bullets(&parsed.definitions),
        parsed.full_notes
    )
}

fn show_note(note: &Note, tab: Tab, renderer: &TerminalRenderer) -> String {
    let mut blocks = vec![
        RenderBlock::Heading {
            level: 1,
            text: note.title.clone(),
        },
        RenderBlock::Paragraph {
            spans: vec![InlineSpan::plain(format!(
                "{} · {} · {}",
                note.date.format("%B %-d, %Y"),
                note.source,
                note.source_info
            ))],
        },
        RenderBlock::Blank,
    ];

    let body = match tab {
        Tab::Notes => {
            blocks.push(RenderBlock::Label {
                text: "Summary".to_string(),
            });
            blocks.extend(render_notes(&note.summary));
            blocks.push(RenderBlock::Blank);
            blocks.extend(render_notes(&note.full_notes));
            return renderer.render(&blocks);
        }
        Tab::Transcript if note.transcript.trim().is_empty() => {
            "No transcript stored for this note.\n".to_string()
        }
        Tab::Transcript => renderer.transcript(&note.transcript),
        Tab::KeyPoints => renderer.key_points(&note.key_points),
        Tab::Definitions => renderer.definitions(&note.definitions),
    };

    let mut out = renderer.render(&blocks);
    out.push_str(&body);
    out
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
