//! CLI entrypoint.

use std::error::Error;
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use godoc_preview::{PreviewError, Previewer, Templates};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GODOC_PREVIEW_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// What to write to the output.
enum OutputFormat {
	/// Complete HTML page.
	Html,
	/// Package body fragment only.
	Body,
	/// Documentation model as JSON.
	Json,
}

#[derive(Parser)]
#[command(name = "godoc-preview", about = "Render a godoc-style preview of a single Go file", version)]
struct Cli {
	/// Go source file to preview; reads stdin when omitted or `-`
	file: Option<PathBuf>,

	/// Select the output format
	#[arg(short = 'f', long, value_enum, default_value = "html")]
	format: OutputFormat,

	/// Directory holding replacement `page.html` and `package.html` templates
	#[arg(short = 't', long, value_name = "DIR")]
	templates: Option<PathBuf>,

	/// Include unexported declarations
	#[arg(short = 'u', long, default_value_t = false)]
	unexported: bool,

	/// Write output to a file instead of stdout
	#[arg(short = 'o', long, value_name = "FILE")]
	output: Option<PathBuf>,

	/// Disable ANSI colors in CLI output
	#[arg(long, default_value_t = false)]
	no_color: bool,
}

fn main() {
	let cli = Cli::parse();
	init_logging();

	if let Err(e) = run(&cli) {
		let code = match e.downcast_ref::<PreviewError>() {
			Some(PreviewError::Assembly { .. }) => 2,
			_ => 1,
		};
		if should_color_errors(&cli) {
			eprintln!("{} {e}", "error:".red().bold());
		} else {
			eprintln!("error: {e}");
		}
		process::exit(code);
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
	let templates = match &cli.templates {
		Some(dir) => Arc::new(Templates::from_dir(dir)?),
		None => Templates::builtin()?,
	};
	let previewer = Previewer::new(templates).with_unexported(cli.unexported);

	let source = read_source(cli.file.as_ref())?;
	let rendered = match cli.format {
		OutputFormat::Html => previewer.render_preview(&source)?,
		OutputFormat::Body => previewer.render_page(&source)?.body,
		OutputFormat::Json => {
			let mut json = serde_json::to_string_pretty(&previewer.document(&source)?)?;
			json.push('\n');
			json
		}
	};

	match &cli.output {
		Some(path) => std::fs::write(path, rendered)?,
		None => {
			let mut stdout = std::io::stdout().lock();
			stdout.write_all(rendered.as_bytes())?;
			stdout.flush()?;
		}
	}
	Ok(())
}

fn read_source(file: Option<&PathBuf>) -> Result<String, Box<dyn Error>> {
	match file {
		Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
			.map_err(|e| format!("failed to read {}: {e}", path.display()).into()),
		_ => {
			let mut source = String::new();
			std::io::stdin().read_to_string(&mut source)?;
			Ok(source)
		}
	}
}

fn should_color_errors(cli: &Cli) -> bool {
	if cli.no_color {
		return false;
	}
	if std::env::var_os("NO_COLOR").is_some() {
		return false;
	}
	if std::env::var("TERM").ok().as_deref() == Some("dumb") {
		return false;
	}
	std::io::stderr().is_terminal()
}
