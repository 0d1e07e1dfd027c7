//! flatconf CLI - Command-line interface for flatconf configuration files
//!
//! Usage:
//!   flatconf get app.cfg database.host
//!   flatconf dump base.cfg local.cfg --format json --resolve
//!   flatconf expand app.cfg 'connecting to $host:$port'

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use flatconf_core::{Store, StoreOptions, DEFAULT_RECURSION_LEVEL};
use std::path::PathBuf;
use std::process::ExitCode;

/// flatconf - Flat key-value configuration with variable interpolation
#[derive(Parser)]
#[command(name = "flatconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum number of interpolation passes
    #[arg(short = 'l', long, global = true, default_value_t = DEFAULT_RECURSION_LEVEL)]
    recursion_level: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a specific value from the configuration
    Get {
        /// Configuration file(s), later files override earlier ones
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Key to look up
        key: String,

        /// Print the raw value without interpolation
        #[arg(long)]
        raw: bool,

        /// Interpret the value as this type
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,

        /// Default value if key not found
        #[arg(short, long)]
        default: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Export the configuration
    Dump {
        /// Configuration file(s), later files override earlier ones
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Resolve interpolations (JSON output only, text dumps are always raw)
        #[arg(short, long)]
        resolve: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Expand a template string against the configuration
    Expand {
        /// Configuration file(s), later files override earlier ones
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Template containing $name or ${name} references
        template: String,
    },

    /// Check that configuration files can be loaded
    Check {
        /// Configuration file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ValueType {
    String,
    Int,
    Long,
    Longlong,
    Double,
    List,
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    run_from(std::env::args_os())
}

/// Run the CLI with the given arguments (the first one is the binary name)
pub fn run_from<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 2 } else { 0 };
            e.print().ok();
            return ExitCode::from(code);
        }
    };
    let options = StoreOptions::with_recursion_level(cli.recursion_level);

    match cli.command {
        Commands::Get {
            files,
            key,
            raw,
            value_type,
            default,
            format,
        } => cmd_get(&files, options, &key, raw, value_type, default, format),

        Commands::Dump {
            files,
            resolve,
            format,
            output,
        } => cmd_dump(&files, options, resolve, format, output),

        Commands::Expand { files, template } => cmd_expand(&files, options, &template),

        Commands::Check { files } => cmd_check(&files, options),
    }
}

fn load_store(files: &[PathBuf], options: StoreOptions) -> Result<Store, String> {
    if files.is_empty() {
        return Err("No configuration files specified".to_string());
    }

    // Later files override earlier ones key by key
    let mut store = Store::with_options(options);
    for file in files {
        store
            .read_from_file(file)
            .map_err(|e| format!("Failed to load {}: {}", file.display(), e))?;
    }

    Ok(store)
}

/// Render a value according to the requested type
fn render_value(store: &Store, key: &str, value_type: ValueType, format: Format) -> String {
    let json = match value_type {
        ValueType::String => serde_json::json!(store.get(key)),
        ValueType::Int => serde_json::json!(store.get_int(key, 0)),
        ValueType::Long => serde_json::json!(store.get_long(key, 0)),
        // i128 does not fit a JSON number portably
        ValueType::Longlong => serde_json::json!(store.get_long_long(key, 0).to_string()),
        ValueType::Double => serde_json::json!(store.get_double(key, 0.0)),
        ValueType::List => serde_json::json!(store.get_list(key).unwrap_or_default()),
    };

    match (format, &json) {
        (Format::Json, _) => serde_json::to_string_pretty(&json).unwrap_or_default(),
        (Format::Text, serde_json::Value::String(s)) => s.clone(),
        (Format::Text, serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        (Format::Text, other) => other.to_string(),
    }
}

fn cmd_get(
    files: &[PathBuf],
    options: StoreOptions,
    key: &str,
    raw: bool,
    value_type: ValueType,
    default: Option<String>,
    format: Format,
) -> ExitCode {
    let store = match load_store(files, options) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    if !store.contains_key(key) {
        return match default {
            Some(default_val) => {
                println!("{}", default_val);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("{}: Key '{}' not found", "Error".red(), key);
                ExitCode::from(1)
            }
        };
    }

    let output = if raw {
        let value = store.raw(key).unwrap_or_default();
        match format {
            Format::Json => serde_json::to_string_pretty(value).unwrap_or_default(),
            Format::Text => value.to_string(),
        }
    } else {
        render_value(&store, key, value_type, format)
    };

    println!("{}", output);
    ExitCode::SUCCESS
}

fn cmd_dump(
    files: &[PathBuf],
    options: StoreOptions,
    resolve: bool,
    format: Format,
    output: Option<PathBuf>,
) -> ExitCode {
    let store = match load_store(files, options) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let result = match format {
        Format::Json => store.to_json(resolve).map(|mut json| {
            json.push('\n');
            json
        }),
        Format::Text => {
            if resolve {
                eprintln!(
                    "{} --resolve is ignored for text dumps, raw values are written",
                    "!".yellow()
                );
            }
            Ok(store.dump())
        }
    };

    match result {
        Ok(content) => {
            if let Some(output_path) = output {
                if let Err(e) = std::fs::write(&output_path, &content) {
                    eprintln!("{}: {}", "Error writing file".red(), e);
                    return ExitCode::from(2);
                }
                eprintln!("{} Wrote to {}", "✓".green(), output_path.display());
            } else {
                print!("{}", content);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn cmd_expand(files: &[PathBuf], options: StoreOptions, template: &str) -> ExitCode {
    let store = match load_store(files, options) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    println!("{}", store.resolve(template));
    ExitCode::SUCCESS
}

fn cmd_check(files: &[PathBuf], options: StoreOptions) -> ExitCode {
    let mut all_valid = true;

    for file in files {
        match Store::from_file(file, options) {
            Ok(store) => {
                println!(
                    "{} {}: {} entries",
                    "✓".green(),
                    file.display(),
                    store.len()
                );
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(dir: &str, name: &str, content: &str) -> PathBuf {
        let temp_dir = std::env::temp_dir().join(dir);
        std::fs::create_dir_all(&temp_dir).unwrap();
        let path = temp_dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn sample_store() -> Store {
        Store::from_lines(
            [
                "port = 8080",
                "ratio = 0.5",
                "hosts = a, b,,c",
                "url = http://localhost:$port",
            ],
            StoreOptions::default(),
        )
    }

    #[test]
    fn test_cli_parses_get() {
        let cli = Cli::try_parse_from(["flatconf", "-l", "5", "get", "a.cfg", "b.cfg", "port"])
            .unwrap();
        assert_eq!(cli.recursion_level, 5);
        match cli.command {
            Commands::Get {
                files,
                key,
                value_type,
                format,
                ..
            } => {
                assert_eq!(files, vec![PathBuf::from("a.cfg"), PathBuf::from("b.cfg")]);
                assert_eq!(key, "port");
                assert_eq!(value_type, ValueType::String);
                assert_eq!(format, Format::Text);
            }
            _ => panic!("Expected Get"),
        }
    }

    #[test]
    fn test_cli_default_recursion_level() {
        let cli = Cli::try_parse_from(["flatconf", "check", "a.cfg"]).unwrap();
        assert_eq!(cli.recursion_level, DEFAULT_RECURSION_LEVEL);
    }

    #[test]
    fn test_render_text_values() {
        let store = sample_store();

        assert_eq!(
            render_value(&store, "url", ValueType::String, Format::Text),
            "http://localhost:8080"
        );
        assert_eq!(render_value(&store, "port", ValueType::Int, Format::Text), "8080");
        assert_eq!(render_value(&store, "ratio", ValueType::Double, Format::Text), "0.5");
        assert_eq!(
            render_value(&store, "port", ValueType::Longlong, Format::Text),
            "8080"
        );
        assert_eq!(render_value(&store, "hosts", ValueType::List, Format::Text), "a\nb\nc");
    }

    #[test]
    fn test_render_json_values() {
        let store = sample_store();

        assert_eq!(render_value(&store, "port", ValueType::Long, Format::Json), "8080");
        assert_eq!(
            render_value(&store, "url", ValueType::String, Format::Json),
            "\"http://localhost:8080\""
        );
        let list: Vec<String> =
            serde_json::from_str(&render_value(&store, "hosts", ValueType::List, Format::Json))
                .unwrap();
        assert_eq!(list, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_store_layers_files() {
        let base = write_fixture("flatconf_cli_test_layers", "base.cfg", "a = 1\nb = $a\n");
        let local = write_fixture("flatconf_cli_test_layers", "local.cfg", "a = 2\n");

        let store = load_store(&[base, local], StoreOptions::default()).unwrap();
        assert_eq!(store.get("b").as_deref(), Some("2"));

        std::fs::remove_dir_all(std::env::temp_dir().join("flatconf_cli_test_layers")).ok();
    }

    #[test]
    fn test_load_store_missing_file() {
        let err = load_store(
            &[PathBuf::from("/nonexistent/flatconf/cli.cfg")],
            StoreOptions::default(),
        )
        .unwrap_err();
        assert!(err.contains("Failed to load /nonexistent/flatconf/cli.cfg"));
    }

    #[test]
    fn test_run_exit_codes() {
        let path = write_fixture("flatconf_cli_test_run", "app.cfg", "port = 8080\n");
        let file = path.to_str().unwrap();

        assert_eq!(run_from(["flatconf", "get", file, "port"]), ExitCode::SUCCESS);
        assert_eq!(run_from(["flatconf", "get", file, "missing"]), ExitCode::from(1));
        assert_eq!(
            run_from(["flatconf", "get", file, "missing", "--default", "x"]),
            ExitCode::SUCCESS
        );
        assert_eq!(
            run_from(["flatconf", "get", "/nonexistent/flatconf/run.cfg", "port"]),
            ExitCode::from(2)
        );
        assert_eq!(run_from(["flatconf", "check", file]), ExitCode::SUCCESS);

        std::fs::remove_dir_all(std::env::temp_dir().join("flatconf_cli_test_run")).ok();
    }

    #[test]
    fn test_dump_to_output_file() {
        let path = write_fixture("flatconf_cli_test_dump", "app.cfg", "b = $a\na = 1\n");
        let out = std::env::temp_dir().join("flatconf_cli_test_dump").join("out.cfg");

        let code = cmd_dump(
            &[path],
            StoreOptions::default(),
            false,
            Format::Text,
            Some(out.clone()),
        );
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a = 1\nb = $a\n");

        std::fs::remove_dir_all(std::env::temp_dir().join("flatconf_cli_test_dump")).ok();
    }
}
