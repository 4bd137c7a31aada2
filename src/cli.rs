//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::file_reader::{FileReadConfig, DEFAULT_MAX_FILE_SIZE};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::document::serialize::{HighlightStyle, DEFAULT_HIGHLIGHT_CLASS, DEFAULT_HIGHLIGHT_TAG};
use crate::flows::batch::BatchOptions;
use crate::flows::report::CountsFormat;
use crate::flows::KeywordSource;

/// kwmark - highlight keyword occurrences in documents and count them.
#[derive(Parser, Debug)]
#[command(name = "kwmark")]
#[command(
    author,
    version,
    about,
    long_about = r#"kwmark wraps every occurrence of a set of keywords in a document with a
highlight marker and reports how often each keyword occurs.

Matching is literal and case-insensitive. Longer keywords win over shorter ones
they contain, and every character of the text belongs to at most one highlight.
Markup is never matched: only text content is searched.

Each command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools/LLMs)
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only (the annotated HTML or the matched text)

Examples:
    kwmark annotate page.html --keywords keywords.csv
    kwmark annotate page.html -k cat -k category --output page.highlighted.html
    kwmark matches notes.txt -k "C++"
    kwmark counts page.html --keywords keywords.csv --counts-format table
    kwmark batch docs --keywords keywords.csv --out-dir highlighted
"#
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root, and positional paths are\n\
interpreted relative to it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Tip: Prefer jsonl when you want stable, line-oriented output for piping and prompts."
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        long_help = "Only log errors to stderr. Results are still printed to stdout.\n\n\
RUST_LOG, when set, takes precedence."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr: keyword counts, matched runs, skipped\n\
files. RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
This is useful when manually inspecting results. Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Maximum size of an input file in bytes.
    #[arg(
        long,
        global = true,
        env = "KWMARK_MAX_FILE_SIZE",
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        value_name = "BYTES",
        long_help = "Maximum size of a document or keyword list in bytes.\n\n\
Larger files are skipped: in batch they become error items, elsewhere the\n\
command fails."
    )]
    pub max_file_size: u64,

    #[command(subcommand)]
    pub command: Commands,
}

/// Keyword sources shared by the annotating commands
#[derive(Args, Debug, Clone)]
pub struct KeywordArgs {
    /// Keyword list file (first column is used).
    #[arg(
        long,
        value_name = "FILE",
        long_help = "Keyword list file. Only the first column is used.\n\n\
The delimiter follows the extension: .csv (comma), .tsv (tab), anything else\n\
one keyword per line. Cells are trimmed, empty cells are skipped, and header\n\
cells reading \"keyword\" or \"keywords\" (any case) are ignored."
    )]
    pub keywords: Option<PathBuf>,

    /// A keyword (repeatable).
    #[arg(
        short = 'k',
        long = "keyword",
        value_name = "KEYWORD",
        long_help = "A keyword to highlight. Repeat the flag for several keywords.\n\n\
Combined with --keywords, these come after the file's keywords."
    )]
    pub keyword: Vec<String>,
}

impl KeywordArgs {
    fn into_source(self) -> KeywordSource {
        KeywordSource {
            file: self.keywords,
            inline: self.keyword,
        }
    }
}

/// Highlight marker options
#[derive(Args, Debug, Clone)]
pub struct StyleArgs {
    /// Tag of the highlight wrapper.
    #[arg(
        long,
        env = "KWMARK_HIGHLIGHT_TAG",
        default_value = DEFAULT_HIGHLIGHT_TAG,
        value_name = "TAG"
    )]
    pub highlight_tag: String,

    /// Class of the highlight wrapper.
    #[arg(
        long,
        env = "KWMARK_HIGHLIGHT_CLASS",
        default_value = DEFAULT_HIGHLIGHT_CLASS,
        value_name = "CLASS"
    )]
    pub highlight_class: String,
}

impl StyleArgs {
    fn into_style(self) -> HighlightStyle {
        HighlightStyle::new(self.highlight_tag, self.highlight_class)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Highlight keywords in a document and report per-keyword counts.
    #[command(
        long_about = "Annotate DOC and emit one document item followed by one keyword item per\n\
keyword, ranked by descending count (ties keep input order).\n\n\
The annotated HTML is the document item's excerpt, or is written to --output.\n\
.html/.htm/.xhtml/.xml files are parsed as markup (only <body> content is kept\n\
when present); any other file is read as plain text, one paragraph per\n\
blank-line-separated block.\n\n\
Examples:\n\
  kwmark annotate page.html --keywords keywords.csv\n\
  kwmark annotate page.html -k cat --output out.html --highlight-tag mark\n"
    )]
    Annotate {
        /// Document to annotate (relative to ROOT unless absolute).
        #[arg(value_name = "DOC")]
        doc: PathBuf,

        #[command(flatten)]
        keywords: KeywordArgs,

        /// Write the annotated HTML to this file.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// List every keyword occurrence without rewriting the document.
    #[command(
        long_about = "Emit one match item per occurrence that annotate would highlight, in\n\
document order. The range is a byte range within the text run named by data.run;\n\
the excerpt is the matched text with its original case.\n\n\
Examples:\n\
  kwmark matches notes.txt -k \"C++\" -k \"a.b\"\n"
    )]
    Matches {
        /// Document to search (relative to ROOT unless absolute).
        #[arg(value_name = "DOC")]
        doc: PathBuf,

        #[command(flatten)]
        keywords: KeywordArgs,
    },

    /// Print the keyword count table of a document.
    #[command(
        long_about = "Count keyword occurrences in DOC and print the two-column table directly\n\
instead of a ResultSet.\n\n\
Counts formats:\n\
- clipboard (default): JSON object with text/plain (TSV) and text/html flavours\n\
- tsv: tab-separated rows with a Keyword/Count header\n\
- html: an HTML table\n\
- table: a colored terminal table\n\n\
Examples:\n\
  kwmark counts page.html --keywords keywords.csv --counts-format tsv\n"
    )]
    Counts {
        /// Document to count in (relative to ROOT unless absolute).
        #[arg(value_name = "DOC")]
        doc: PathBuf,

        #[command(flatten)]
        keywords: KeywordArgs,

        /// Counts output format (clipboard/tsv/html/table).
        #[arg(
            long,
            default_value = "clipboard",
            value_parser = ["clipboard", "tsv", "html", "table"],
            value_name = "FORMAT"
        )]
        counts_format: String,
    },

    /// Show the keywords read from a keyword list.
    #[command(
        long_about = "Read FILE the way --keywords does and emit one keyword item per keyword.\n\n\
Use this to check what a spreadsheet export will contribute before annotating.\n\n\
Examples:\n\
  kwmark keywords keywords.csv --format md\n"
    )]
    Keywords {
        /// Keyword list file (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Annotate many documents with one keyword set.
    #[command(
        long_about = "Annotate every document under PATHs with the same keywords.\n\n\
Directories are walked recursively for .html/.htm/.xhtml/.xml/.txt/.text/.md/\n\
.markdown files, honoring .gitignore unless --no-ignore. Emits one document item\n\
per file (its counts in data), an error item for each file that cannot be read,\n\
and finally the summed keyword counts.\n\n\
Examples:\n\
  kwmark batch docs --keywords keywords.csv\n\
  kwmark batch a.html b.html -k cat --out-dir highlighted\n"
    )]
    Batch {
        /// Files or directories to annotate.
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        keywords: KeywordArgs,

        /// Write annotated copies here as <file name>.highlighted.html,
        /// e.g. docs/a.html becomes <DIR>/docs/a.html.highlighted.html.
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Include hidden files and directories (dotfiles).
        #[arg(long)]
        hidden: bool,

        /// Disable .gitignore and other ignore rules.
        #[arg(long)]
        no_ignore: bool,

        #[command(flatten)]
        style: StyleArgs,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Parse output format
    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let read_config = FileReadConfig::with_max_file_size(cli.max_file_size);

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    match cli.command {
        Commands::Annotate {
            doc,
            keywords,
            output,
            style,
        } => crate::flows::annotate::run_annotate(
            &root,
            &doc,
            &keywords.into_source(),
            output.as_deref(),
            &style.into_style(),
            &read_config,
            render_config,
        ),

        Commands::Matches { doc, keywords } => crate::flows::matches::run_matches(
            &root,
            &doc,
            &keywords.into_source(),
            &read_config,
            render_config,
        ),

        Commands::Counts {
            doc,
            keywords,
            counts_format,
        } => {
            let counts_format: CountsFormat =
                counts_format.parse().map_err(anyhow::Error::msg)?;
            crate::flows::report::run_counts(
                &root,
                &doc,
                &keywords.into_source(),
                counts_format,
                &read_config,
            )
        }

        Commands::Keywords { file } => {
            crate::flows::keywords::run_keywords(&root, &file, &read_config, render_config)
        }

        Commands::Batch {
            paths,
            keywords,
            out_dir,
            hidden,
            no_ignore,
            style,
        } => {
            let options = BatchOptions {
                out_dir,
                hidden,
                ignore: !no_ignore,
            };
            crate::flows::batch::run_batch(
                &root,
                &paths,
                &keywords.into_source(),
                &options,
                &style.into_style(),
                &read_config,
                render_config,
            )
        }
    }
}
