use crate::api::{self, Components};
use crate::error::ScaffoldError;
use crate::services::{ActivityLogger, Config, LocalFsStore, ScriptStore, TranslatorRecord};
use crate::templates::{basic_translator, translator_label};
use crate::tools::compare::MatchMode;
use crate::tools::extract::extract_test_cases;
use crate::ApiResponse;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scaffolded",
    version,
    about = "Run and test translator scripts against a translation server (JSON output)"
)]
pub struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args)]
struct ServerArgs {
    /// Translation server base URL [env: SCAFFOLDED_SERVER_URL]
    #[arg(long, global = true)]
    server: Option<String>,

    /// Server channel the URL is posted to [env: SCAFFOLDED_CHANNEL]
    #[arg(long, global = true)]
    channel: Option<String>,

    /// Per-request timeout in milliseconds [env: SCAFFOLDED_TIMEOUT_MS]
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Directory the server loads translators from [env: TEMP_TRANSLATORS_DIR]
    #[arg(long, global = true)]
    translators_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a translator against one URL and print the server's output
    Run(RunArgs),
    /// Run every test case embedded in a translator
    Test(TestArgs),
    /// Print the test cases embedded in a translator
    Cases { script: String },
    /// Print a new translator from the basic template
    New {
        /// translatorID to use (random UUID when omitted)
        #[arg(long)]
        id: Option<String>,
    },
    /// Manage saved translators
    #[command(subcommand)]
    Script(ScriptCmd),
    /// Show the activity log, newest first
    Logs {
        /// Only lines mentioning this text (URL, script id, ...)
        #[arg(long)]
        scope: Option<String>,
        #[arg(long)]
        errors: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Translator file, `-` for stdin, or a saved translator id
    script: String,
    url: String,
    /// Show a single returned item without its surrounding array
    #[arg(long)]
    unwrap: bool,
}

#[derive(Args)]
struct TestArgs {
    /// Translator file, `-` for stdin, or a saved translator id
    script: String,
    /// Test cases in flight at once [env: SCAFFOLDED_CONCURRENCY]
    #[arg(long)]
    concurrency: Option<usize>,
    /// Compare items without regard to object key order [env: SCAFFOLDED_IGNORE_KEY_ORDER]
    #[arg(long)]
    ignore_key_order: bool,
}

#[derive(Subcommand)]
enum ScriptCmd {
    /// Save a translator file (label read from its metadata)
    Save {
        file: String,
        /// Update this saved translator instead of creating a new one
        #[arg(long)]
        id: Option<String>,
    },
    List,
    Show { id: String },
    Delete {
        id: String,
        #[arg(long = "yes")]
        yes: bool,
    },
}

/// Parse arguments, run the command, and print a JSON envelope.
///
/// Returns `false` when the command failed or a test run had failures.
pub async fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    // Flags win over the environment; Components::from_config validates the result.
    let mut config = Config::from_env().context("reading configuration")?;
    cli.server.apply(&mut config);

    match cli.cmd {
        Command::Run(args) => {
            let components = Components::from_config(config)?;
            let script = read_script(&args.script)?;
            let result = api::run_translator(&components, &script, &args.url).await;
            Ok(match result {
                Ok(run) if args.unwrap => finish(Ok(run.display_value().clone())),
                other => finish(other),
            })
        }
        Command::Test(args) => {
            if let Some(n) = args.concurrency {
                config.concurrency = n;
            }
            if args.ignore_key_order {
                config.match_mode = MatchMode::IgnoreKeyOrder;
            }
            let components = Components::from_config(config)?;
            let script = read_script(&args.script)?;
            match api::test_translator(&components, &script).await {
                Ok(report) => {
                    let passed = report.all_passed();
                    print_json(ApiResponse::ok(report));
                    Ok(passed)
                }
                Err(e) => Ok(finish::<()>(Err(e))),
            }
        }
        Command::Cases { script } => {
            let script = read_script(&script)?;
            Ok(finish(extract_test_cases(&script)))
        }
        Command::New { id } => {
            let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            println!("{}", basic_translator(&id, chrono::Utc::now()));
            Ok(true)
        }
        Command::Script(cmd) => script_cmd(cmd),
        Command::Logs { scope, errors } => {
            let logger = ActivityLogger::new()?;
            Ok(finish(logger.read_logs(scope.as_deref(), errors)))
        }
    }
}

impl ServerArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(channel) = &self.channel {
            config.channel = channel.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(dir) = &self.translators_dir {
            config.translators_dir = dir.clone();
        }
    }
}

fn script_cmd(cmd: ScriptCmd) -> anyhow::Result<bool> {
    let store = LocalFsStore::new()?;
    Ok(match cmd {
        ScriptCmd::Save { file, id } => {
            let content = read_input(&file)?;
            let result = match id {
                Some(id) => store.update_content(&id, &content),
                None => {
                    let record = TranslatorRecord::new(translator_label(&content), content);
                    store.put(&record).map(|_| record)
                }
            };
            finish(result)
        }
        ScriptCmd::List => finish(store.list_all().map(|records| {
            records
                .into_iter()
                .map(|r| serde_json::json!({"id": r.id, "label": r.label, "updatedAt": r.updated_at}))
                .collect::<Vec<_>>()
        })),
        ScriptCmd::Show { id } => finish(
            store
                .get(&id)
                .and_then(|r| r.ok_or_else(|| ScaffoldError::NotFound(format!("translator {id}")))),
        ),
        ScriptCmd::Delete { id, yes } => {
            if !yes {
                print_json(ApiResponse::<()>::err("refusing to delete without --yes"));
                return Ok(false);
            }
            finish(store.delete(&id).map(|_| serde_json::json!({"deleted": id})))
        }
    })
}

/// Script text from a file, stdin (`-`), or the saved translator with that id.
fn read_script(input: &str) -> anyhow::Result<String> {
    if input == "-" || std::path::Path::new(input).exists() {
        return read_input(input);
    }
    let store = LocalFsStore::new()?;
    match store.get(input) {
        Ok(Some(record)) => Ok(record.content),
        _ => anyhow::bail!("no translator file or saved translator named {input:?}"),
    }
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading translator from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))
    }
}

fn finish<T: serde::Serialize>(res: crate::Result<T>) -> bool {
    match res {
        Ok(v) => {
            print_json(ApiResponse::ok(v));
            true
        }
        Err(e) => {
            print_json(ApiResponse::<()>::err(e.to_string()));
            false
        }
    }
}

fn print_json<T: serde::Serialize>(val: T) {
    match serde_json::to_string_pretty(&val) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing to JSON: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_flag_replaces_bad_environment_url() {
        let mut config = Config::from_lookup(|name| {
            (name == "SCAFFOLDED_SERVER_URL").then(|| "not a url".to_string())
        })
        .unwrap();
        let cli = Cli::parse_from([
            "scaffolded",
            "--server",
            "http://translate.example/",
            "cases",
            "a.js",
        ]);
        cli.server.apply(&mut config);

        assert_eq!(config.server_url, "http://translate.example/");
        assert!(Components::from_config(config).is_ok());
    }

    #[test]
    fn bad_environment_url_still_fails_without_flag() {
        let mut config = Config::from_lookup(|name| {
            (name == "SCAFFOLDED_SERVER_URL").then(|| "not a url".to_string())
        })
        .unwrap();
        let cli = Cli::parse_from(["scaffolded", "cases", "a.js"]);
        cli.server.apply(&mut config);

        assert!(matches!(
            Components::from_config(config),
            Err(ScaffoldError::Config(_))
        ));
    }
}
