mod settings;
mod upload;

use std::path::PathBuf;

use carmin::types::{ExecutionId, PipelineId};
use carmin::CarminClient;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;
use crate::upload::upload;

#[derive(Parser)]
#[clap(
    author, version, about, long_about = None,
    propagate_version = true, disable_help_subcommand = true
)]
struct Cli {
    /// VIP REST API URL
    #[clap(long, env = "VIP_API_URL")]
    api_url: Option<String>,

    /// VIP API key
    #[clap(long, env = "VIP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// CA bundle used to verify the server certificate
    #[clap(long, env = "VIP_CERTIFICATE")]
    certificate: Option<PathBuf>,

    /// Print debug messages
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the API URL, API key and platform properties
    Info,

    /// Get an API key from VIP account credentials
    Login {
        /// Email address of the account
        #[clap(long)]
        username: String,

        #[clap(long)]
        password: String,

        /// Remember the API URL and key for later invocations
        #[clap(long)]
        save: bool,
    },

    /// List pipelines, or describe one pipeline
    Pipelines {
        /// Pipeline identifier
        id: Option<String>,
    },

    /// List the content of a remote directory
    Ls {
        path: String,

        /// Only list directories
        #[clap(long, conflicts_with = "files")]
        dirs: bool,

        /// Only list files
        #[clap(long)]
        files: bool,
    },

    /// Check whether a remote path exists
    Exists { path: String },

    /// Show properties of a remote path
    Stat { path: String },

    /// Create a remote directory
    Mkdir {
        path: String,

        /// Append a number to the name if it is taken
        #[clap(long)]
        smart: bool,
    },

    /// Delete a remote file or directory
    Rm { path: String },

    /// Upload local files and directories
    Upload {
        /// Files and directories to upload
        #[clap(required = true)]
        files: Vec<PathBuf>,

        /// Remote directory to upload to
        #[clap(short, long)]
        to: String,
    },

    /// Download a remote file
    Download { remote: String, local: PathBuf },

    /// Manage executions
    Exec {
        #[clap(subcommand)]
        command: ExecCommands,
    },
}

#[derive(Subcommand)]
enum ExecCommands {
    /// List executions
    List,

    /// Count executions
    Count,

    /// Show an execution
    Show { id: String },

    /// Launch a pipeline
    Launch {
        pipeline: String,

        /// Execution name
        #[clap(short, long, default_value_t = String::from("default"))]
        name: String,

        /// Input value as NAME=VALUE, VALUE being parsed as JSON if possible
        #[clap(short, long = "input", value_parser = parse_input)]
        inputs: Vec<(String, Value)>,
    },

    /// Print the standard output of an execution
    Stdout { id: String },

    /// Print the standard error of an execution
    Stderr { id: String },

    /// Show the results of an execution
    Results { id: String },

    /// Kill an execution
    Kill {
        id: String,

        /// Also delete the files produced by the execution
        #[clap(long)]
        delete_files: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Cli = Cli::parse();
    init_logging(args.verbose);

    let given = Settings {
        api_url: args.api_url,
        api_key: args.api_key,
        certificate: args.certificate,
    };
    let settings = Settings::load()?.overridden_by(given);
    let mut client = CarminClient::new(settings.client_config())?;

    match args.command {
        Commands::Info => {
            println!("API URL: {}", client.api_url());
            println!("API key: {}", client.api_key());
            print_json(&client.platform_info()?)
        }
        Commands::Login {
            username,
            password,
            save,
        } => {
            let key = client.api_key_from_credentials(&username, &password)?;
            if !client.set_api_key(&key)? {
                bail!("VIP did not accept the API key it returned");
            }
            if save {
                Settings {
                    api_url: Some(client.api_url().to_string()),
                    api_key: Some(key.clone()),
                    ..settings
                }
                .store()?;
            }
            println!("{}", key);
            Ok(())
        }
        Commands::Pipelines { id: None } => print_json(&client.list_pipelines()?),
        Commands::Pipelines { id: Some(id) } => {
            print_json(&client.pipeline_definition(&PipelineId::new(id))?)
        }
        Commands::Ls { path, dirs, files } => {
            let entries = if dirs {
                client.list_directories(&path)?
            } else if files {
                client.list_elements(&path)?
            } else {
                client.list_content(&path)?
            };
            print_json(&entries)
        }
        Commands::Exists { path } => {
            println!("{}", client.exists(&path)?);
            Ok(())
        }
        Commands::Stat { path } => print_json(&client.path_properties(&path)?),
        Commands::Mkdir { path, smart: true } => {
            println!("{}", client.create_dir_smart(&path)?);
            Ok(())
        }
        Commands::Mkdir { path, smart: false } => {
            expect_success(client.create_dir(&path)?, "create", &path)
        }
        Commands::Rm { path } => expect_success(client.delete_path(&path)?, "delete", &path),
        Commands::Upload { files, to } => upload(&client, &files, &to),
        Commands::Download { remote, local } => {
            expect_success(client.download(&remote, &local)?, "download", &remote)
        }
        Commands::Exec { command } => exec(&client, command),
    }
}

fn exec(client: &CarminClient, command: ExecCommands) -> Result<()> {
    match command {
        ExecCommands::List => print_json(&client.list_executions()?),
        ExecCommands::Count => {
            println!("{}", client.count_executions()?);
            Ok(())
        }
        ExecCommands::Show { id } => print_json(&client.execution_info(&ExecutionId::new(id))?),
        ExecCommands::Launch {
            pipeline,
            name,
            inputs,
        } => {
            let inputs: Map<String, Value> = inputs.into_iter().collect();
            let id = client.init_exec(&PipelineId::new(pipeline), &name, &inputs)?;
            println!("{}", id);
            Ok(())
        }
        ExecCommands::Stdout { id } => {
            print!("{}", client.execution_stdout(&ExecutionId::new(id))?);
            Ok(())
        }
        ExecCommands::Stderr { id } => {
            print!("{}", client.execution_stderr(&ExecutionId::new(id))?);
            Ok(())
        }
        ExecCommands::Results { id } => {
            print_json(&client.execution_results(&ExecutionId::new(id))?)
        }
        ExecCommands::Kill { id, delete_files } => expect_success(
            client.kill_execution(&ExecutionId::new(id.clone()), delete_files)?,
            "kill",
            &id,
        ),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "carmin=debug" } else { "carmin=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn expect_success(success: bool, action: &str, what: &str) -> Result<()> {
    if success {
        Ok(())
    } else {
        bail!("VIP refused to {} {}", action, what)
    }
}

/// Parse `NAME=VALUE`. Values which are not valid JSON are taken as strings.
fn parse_input(s: &str) -> Result<(String, Value), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid input \"{}\", expected NAME=VALUE", s))?;
    if name.is_empty() {
        return Err(format!("invalid input \"{}\", name is empty", s));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::*;
    use serde_json::json;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert()
    }

    #[rstest]
    #[case("results-directory=/vip/Home", "results-directory", json!("/vip/Home"))]
    #[case("iterations=3", "iterations", json!(3))]
    #[case("flags=[1, 2]", "flags", json!([1, 2]))]
    #[case("expr=a=b", "expr", json!("a=b"))]
    #[case("empty=", "empty", json!(""))]
    fn test_parse_input(#[case] given: &str, #[case] name: &str, #[case] value: Value) {
        assert_eq!(parse_input(given), Ok((name.to_string(), value)));
    }

    #[rstest]
    #[case("no-equals-sign")]
    #[case("=value")]
    fn test_parse_input_invalid(#[case] given: &str) {
        assert!(parse_input(given).is_err());
    }
}
