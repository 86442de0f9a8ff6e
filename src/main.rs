//! CLI: загружает выписки ICS за диапазон месяцев и сохраняет их в CSV или QIF.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ics_statement::{
    ColumnMapping, DEFAULT_ACCOUNT_NAME, DEFAULT_LOGIN_URL, DEFAULT_STATEMENT_URL, ExportFormat,
    Period, Portal, PortalConfig, QifMemo, QifOptions, SavedPages, StatementError, StatementReader,
    default_filename, with_extension,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "ics-statement")]
#[command(
    about = "Downloads statements from the ICS Cards website and saves them as CSV or QIF",
    long_about = None
)]
struct Cli {
    /// Login username
    #[arg(env = "ICS_USERNAME", required_unless_present = "input_dir")]
    username: Option<String>,

    /// Login password
    #[arg(
        env = "ICS_PASSWORD",
        hide_env_values = true,
        required_unless_present = "input_dir"
    )]
    password: Option<String>,

    /// Read saved pages named YYYYMM.html from this directory instead of logging in
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Statement month required, current month if omitted
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Statement year required, current year if omitted
    #[arg(short, long)]
    year: Option<i32>,

    /// Last statement month required
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    end_month: Option<u32>,

    /// Last statement year required
    #[arg(long)]
    end_year: Option<i32>,

    /// Output filename, 'yyyy-mm.<format>' if omitted
    #[arg(short, long)]
    filename: Option<PathBuf>,

    /// Output format (csv, qif)
    #[arg(short = 't', long, default_value = "qif")]
    format: ExportFormat,

    /// Account name written to the QIF header
    #[arg(long, default_value = DEFAULT_ACCOUNT_NAME)]
    account_name: String,

    /// Column used for the QIF memo line
    #[arg(long, value_enum, default_value_t = MemoSource::Currency)]
    qif_memo: MemoSource,

    /// Use fixed column positions instead of matching header labels
    #[arg(long)]
    positional_columns: bool,

    /// Accept invalid TLS certificates from the portal
    #[arg(long)]
    insecure: bool,

    /// Login form URL
    #[arg(long, default_value = DEFAULT_LOGIN_URL)]
    login_url: String,

    /// Statement page URL, the period key is appended to it
    #[arg(long, default_value = DEFAULT_STATEMENT_URL)]
    statement_url: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum MemoSource {
    Currency,
    Description,
}

impl From<MemoSource> for QifMemo {
    fn from(value: MemoSource) -> Self {
        match value {
            MemoSource::Currency => Self::Currency,
            MemoSource::Description => Self::Description,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG > --verbose > info
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(-1);
    }
}

fn run(cli: Cli) -> Result<(), StatementError> {
    let now = Period::current();
    let start = Period::new(cli.year.unwrap_or(now.year), cli.month.unwrap_or(now.month));
    let end = Period::new(
        cli.end_year.unwrap_or(start.year),
        cli.end_month.unwrap_or(start.month),
    );

    let filename = cli.filename.as_deref().map_or_else(
        || default_filename(start, end, cli.format),
        |name| with_extension(name, cli.format),
    );

    let mapping = if cli.positional_columns {
        ColumnMapping::Positional
    } else {
        ColumnMapping::Headers
    };

    let mut reader = StatementReader::new(mapping);
    let found = if let Some(dir) = cli.input_dir {
        reader.fetch_range(&mut SavedPages::new(dir), start, end)?
    } else {
        let config = PortalConfig {
            login_url: cli.login_url,
            statement_url: cli.statement_url,
            username: cli.username.unwrap_or_default(),
            password: cli.password.unwrap_or_default(),
            accept_invalid_certs: cli.insecure,
        };
        reader.fetch_range(&mut Portal::new(config), start, end)?
    };

    let totals = reader.totals();
    tracing::info!(
        found,
        out = %totals.out,
        inflow = %totals.inflow,
        unparsed = totals.unparsed,
        "all entries retrieved"
    );

    tracing::info!(path = %filename.display(), format = %cli.format, "writing output");
    let options = QifOptions {
        account_name: cli.account_name,
        memo: cli.qif_memo.into(),
    };
    let file = BufWriter::new(File::create(&filename)?);
    reader.export(file, cli.format, &options)
}
