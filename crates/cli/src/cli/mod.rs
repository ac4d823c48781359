
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Root CLI for webpage.
#[derive(Parser, Debug)]
#[command(name = "webpage")]
#[command(about = "Inspect page settings, cookie jars and navigation requests")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: json (default) or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Manage a cookie jar file.
	Cookies(CookiesArgs),
	/// Print page properties merged with a JSON config file.
	Settings(SettingsArgs),
	/// Open a URL on a recording page and print the resulting request.
	Open(OpenArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CookiesArgs {
	/// Cookie jar file (created on first write).
	#[arg(long, global = true, value_name = "FILE", default_value = "cookies.json")]
	pub cookies_file: PathBuf,

	#[command(subcommand)]
	pub action: CookiesAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CookiesAction {
	/// List stored cookies, or those a request to --url would carry.
	List {
		#[arg(long, value_name = "URL")]
		url: Option<String>,
	},
	/// Add or replace a cookie.
	Add(AddCookieArgs),
	/// Delete every cookie with the given name.
	Delete {
		#[arg(long)]
		name: String,
	},
	/// Remove all cookies.
	Clear,
	/// Drop expired cookies.
	Purge,
}

#[derive(Args, Debug, Clone)]
pub struct AddCookieArgs {
	#[arg(long)]
	pub name: String,

	#[arg(long)]
	pub value: String,

	#[arg(long)]
	pub domain: String,

	#[arg(long, value_name = "PATH")]
	pub path: Option<String>,

	/// Expiry as Unix seconds; omit for a session cookie.
	#[arg(long, value_name = "SECS", allow_negative_numbers = true)]
	pub expires: Option<f64>,

	#[arg(long)]
	pub secure: bool,

	#[arg(long)]
	pub http_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
	/// JSON page options (`settings`, `viewportSize`, `customHeaders`, `zoomFactor`).
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
	#[arg(value_name = "URL")]
	pub url: String,

	/// HTTP method (get, post, put, delete, head, ...).
	#[arg(long, short = 'X', value_name = "METHOD")]
	pub method: Option<String>,

	/// Request body. Parsed as JSON when possible, sent as text otherwise.
	#[arg(long, short = 'd', value_name = "DATA", requires = "method")]
	pub data: Option<String>,

	/// Cookie jar to load into the page.
	#[arg(long, value_name = "FILE")]
	pub cookies_file: Option<PathBuf>,

	/// JSON page options merged over the defaults.
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,
}
