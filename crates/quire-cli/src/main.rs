use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use quire_editor_core::{
    AttributedString, EditorError, EditorHost, FixedAdvanceMetrics, FormatAction, FormatContext,
    NoopHighlighter, Note, NoteKind, ParagraphStyler, Preferences, StandardTodoGlyphs, TextRange,
    TextStorage, TextView, apply_action, paragraph_layout,
};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(version, about = "Quire - run notes editing commands against a file", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a preferences file (TOML)
    #[arg(long, global = true, env = "QUIRE_PREFS")]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run editing commands on a note and save it
    Edit {
        /// Note file
        file: PathBuf,

        /// Selection in characters, as START..END or a caret offset
        #[arg(long, default_value = "0", value_parser = parse_selection)]
        select: TextRange,

        /// How the note's text is interpreted
        #[arg(long, value_enum, default_value_t = Kind::Markdown)]
        kind: Kind,

        /// Print the result instead of writing the file
        #[arg(long)]
        dry_run: bool,

        /// Commands to run in order, e.g. `bold`, `header:##`, `todo@4`
        #[arg(required = true)]
        commands: Vec<FormatAction>,
    },
    /// Restyle a note and print the layout of every paragraph
    Layout {
        /// Note file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Markdown,
    Rich,
    Plain,
}

impl From<Kind> for NoteKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Markdown => NoteKind::Markdown,
            Kind::Rich => NoteKind::RichText,
            Kind::Plain => NoteKind::PlainText,
        }
    }
}

/// A note backed by a file on disk; saving writes its plain text.
struct FileNote {
    path: PathBuf,
    kind: NoteKind,
    dry_run: bool,
}

impl Note for FileNote {
    fn kind(&self) -> NoteKind {
        self.kind
    }

    fn save(&self, text: &AttributedString) -> Result<(), EditorError> {
        if self.dry_run {
            return Ok(());
        }
        std::fs::write(&self.path, text.as_str()).map_err(|e| EditorError::io(&self.path, e))
    }
}

fn main() -> Result<()> {
    init_miette();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let prefs = load_preferences(cli.prefs)?;

    match cli.command {
        Commands::Edit {
            file,
            select,
            kind,
            dry_run,
            commands,
        } => edit(&prefs, file, select, kind.into(), dry_run, &commands)?,
        Commands::Layout { file } => layout(&prefs, &file)?,
    }

    Ok(())
}

fn edit(
    prefs: &Preferences,
    file: PathBuf,
    select: TextRange,
    kind: NoteKind,
    dry_run: bool,
    commands: &[FormatAction],
) -> Result<()> {
    let text = read_note(&file)?;
    let mut view = TextView::with_text(&text);
    let len = view.len_chars();
    if !view.set_selection(select) {
        return Err(EditorError::InvalidRange { range: select, len }).into_diagnostic();
    }

    let glyphs = StandardTodoGlyphs::new(prefs);
    let metrics = FixedAdvanceMetrics::default();
    let ctx = FormatContext::new(prefs, &glyphs, &metrics, &NoopHighlighter);
    let note = FileNote {
        path: file,
        kind,
        dry_run,
    };

    for action in commands {
        if action.is_markdown_only() && !kind.is_markdown() {
            tracing::warn!(command = %action, ?kind, "command only applies to markdown notes");
        }
        tracing::info!(command = %action, selection = ?view.selection(), "applying");
        apply_action(&mut view, &note, ctx, action).into_diagnostic()?;
    }

    if !kind.persists_attributes() {
        note.save(&view.buffer().attributed_string())
            .into_diagnostic()?;
    }

    if dry_run {
        print!("{}", view.content_string());
    } else {
        println!("✓ Saved {}", note.path.display());
    }
    println!("selection: {:?}", view.selection());

    Ok(())
}

fn layout(prefs: &Preferences, file: &Path) -> Result<()> {
    let text = read_note(file)?;
    let mut view = TextView::with_text(&text);
    let len = view.len_chars();

    let metrics = FixedAdvanceMetrics::default();
    let styler = ParagraphStyler::new(prefs, &metrics);
    let styled = styler.restyle(view.storage_mut(), TextRange::new(0, len));
    tracing::debug!(paragraphs = styled, "restyled");

    for paragraph in paragraph_layout(view.storage()) {
        println!("{paragraph}");
    }
    Ok(())
}

fn read_note(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| EditorError::io(path, e))
        .into_diagnostic()
}

fn load_preferences(path: Option<PathBuf>) -> Result<Preferences> {
    match path.or_else(default_prefs_path) {
        Some(path) => Preferences::load(&path).into_diagnostic(),
        None => Ok(Preferences::default()),
    }
}

/// `<config dir>/quire/preferences.toml`, if it exists.
fn default_prefs_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("quire").join("preferences.toml");
    path.exists().then_some(path)
}

/// Parse `START..END` or a single caret offset.
fn parse_selection(s: &str) -> Result<TextRange, String> {
    let offset = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid offset `{part}`: {e}"))
    };
    match s.split_once("..") {
        Some((start, end)) => Ok(TextRange::new(offset(start)?, offset(end)?)),
        None => Ok(TextRange::caret(offset(s)?)),
    }
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
