#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use owo_colors::Stream;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::repl::help_text;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::configuration::Layout;
use crate::domain::models::ExportFormat;
use crate::domain::models::ModelName;
use crate::domain::models::SessionSummary;
use crate::domain::services::Exports;
use crate::domain::services::PromptCatalog;
use crate::domain::services::Sessions;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("CHATDESK_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir().unwrap_or_default().join("chatdesk");
}

fn format_session(session: &SessionSummary) -> String {
    let updated = session
        .updated
        .map(|e| return e.to_rfc3339())
        .unwrap_or_else(|| return "never".to_string());

    let mut res = format!(
        "- (ID: {}) {updated}, Messages: {}",
        session.id, session.message_count
    );

    let line = session.preview.split('\n').next().unwrap_or_default();
    if !line.is_empty() {
        let mut line = line.to_string();
        if line.chars().count() >= 70 {
            line = format!("{}...", line.chars().take(67).collect::<String>());
        }
        res = format!("{res}, {line}");
    }

    return res;
}

async fn print_sessions_list() -> Result<()> {
    let mut sessions = Sessions::new(Layout::default().sessions_dir)
        .list()
        .await?
        .iter()
        .map(|session| {
            return format_session(session);
        })
        .collect::<Vec<String>>();

    sessions.reverse();

    if sessions.is_empty() {
        println!("There are no sessions available. You should start your first one!");
    } else {
        println!("{}", sessions.join("\n"));
    }

    return Ok(());
}

async fn print_prompts_list() -> Result<()> {
    let layout = Layout::default();
    let loaded = PromptCatalog::new(layout.prompts_dir.to_path_buf())
        .list()
        .await?;

    for skipped in &loaded.skipped {
        eprintln!(
            "{}",
            format!("Warning: {skipped}").if_supports_color(Stream::Stderr, |e| return e.yellow())
        );
    }

    if loaded.prompts.is_empty() {
        println!(
            "There are no prompts in {}. Add a .txt file to get started.",
            layout.prompts_dir.display()
        );
    } else {
        let names = loaded
            .prompts
            .iter()
            .map(|e| return e.name.to_string())
            .collect::<Vec<String>>();
        println!("{}", names.join("\n"));
    }

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn load_config_from_session(session_id: &str) -> Result<()> {
    let sessions = Sessions::new(Layout::default().sessions_dir);
    sessions.load(session_id).await?;
    Config::set(ConfigKey::SessionID, session_id);

    return Ok(());
}

/// Opens the most recently updated session.
async fn load_config_from_latest_session() -> Result<bool> {
    let sessions = Sessions::new(Layout::default().sessions_dir);
    let latest = match sessions.list().await?.pop() {
        Some(latest) => latest,
        None => {
            println!("There are no sessions available. You should start your first one!");
            return Ok(false);
        }
    };

    println!("Opening session {}", latest.id);
    load_config_from_session(&latest.id).await?;

    return Ok(true);
}

async fn export_session(matches: &ArgMatches) -> Result<()> {
    let session_id = match matches.get_one::<String>("session-id") {
        Some(session_id) => session_id,
        None => bail!("A session ID is required"),
    };

    let format = matches
        .get_one::<String>("format")
        .and_then(|e| return ExportFormat::parse(e))
        .unwrap_or_default();

    let layout = Layout::default();
    let exports = Exports::new(
        Sessions::new(layout.sessions_dir.to_path_buf()),
        layout.exports_dir.to_path_buf(),
    );
    let pending = exports.prepare(Some(session_id), format).await?;

    let destination = match matches.get_one::<String>("output") {
        Some(output) => path::PathBuf::from(output),
        None => path::PathBuf::from(&pending.file_name),
    };

    let saved = pending.save_to(&destination).await?;
    println!("Exported session {session_id} to {}", saved.display());

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    let mut cmd = Command::new("debug");
    cmd = cmd.about("Debug helpers for chatdesk")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to the debug log file. Verbosity is controlled with the RUST_LOG environment variable.")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );

    return cmd;
}

fn subcommand_export() -> Command {
    return Command::new("export")
        .about("Export a stored session to a document.")
        .arg(
            clap::Arg::new("session-id")
                .short('i')
                .long("id")
                .help("Session ID")
                .num_args(1)
                .required(true),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Destination file. Defaults to <SESSION_ID>.<EXTENSION> in the current directory.")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("format")
                .short('f')
                .long("format")
                .help(format!("Document format. [default: {}]", ExportFormat::default()))
                .num_args(1)
                .value_parser(PossibleValuesParser::new(ExportFormat::VARIANTS)),
        );
}

fn subcommand_prompts() -> Command {
    return Command::new("prompts")
        .about("Manage prompt templates.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the prompts directory path."))
        .subcommand(Command::new("list").about("List all prompts available in the prompts directory."));
}

fn subcommand_sessions_delete() -> Command {
    return Command::new("delete")
        .about("Delete one or all sessions.")
        .arg(
            clap::Arg::new("session-id")
                .short('i')
                .long("id")
                .help("Session ID")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all sessions.")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("delete-args")
                .args(["session-id", "all"])
                .required(true),
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions")
        .about("Manage past chat sessions.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the sessions directory path."))
        .subcommand(Command::new("list").about("List all previous sessions with their ids and first messages."))
        .subcommand(
            Command::new("open")
                .about("Continue a previous session by ID. Omit passing any session ID to open the most recent one.")
                .arg(
                    clap::Arg::new(ConfigKey::SessionID.to_string())
                        .short('i')
                        .long("id")
                        .help("Session ID")
                        .required(false),
                ),
        )
        .subcommand(subcommand_sessions_delete());
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start a new chat session.");
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("CHATDESK_MODEL")
        .num_args(1)
        .help(format!(
            "The initial model to chat with. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .value_parser(PossibleValuesParser::new(ModelName::VARIANTS))
        .global(true);
}

fn arg_prompt() -> Arg {
    return Arg::new(ConfigKey::Prompt.to_string())
        .short('p')
        .long(ConfigKey::Prompt.to_string())
        .env("CHATDESK_PROMPT")
        .num_args(1)
        .help("File name of the initial prompt, such as assistant.txt. Defaults to the first prompt in the prompts directory if not set.")
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return format!("CHAT {line}")
                    .if_supports_color(Stream::Stdout, |e| return e.bold())
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("chatdesk")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_export())
        .subcommand(subcommand_prompts())
        .subcommand(subcommand_sessions())
        .arg(arg_model())
        .arg(arg_prompt())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("CHATDESK_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::ApiKey.to_string())
                .long(ConfigKey::ApiKey.to_string())
                .env("OPENAI_API_KEY")
                .hide_env_values(true)
                .num_args(1)
                .help("OpenAI API key.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::OpenAiURL.to_string())
                .long(ConfigKey::OpenAiURL.to_string())
                .env("CHATDESK_OPENAI_URL")
                .num_args(1)
                .help(format!("OpenAI API URL. Can be swapped to a compatible proxy. [default: {}]", Config::default(ConfigKey::OpenAiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::DataDir.to_string())
                .long(ConfigKey::DataDir.to_string())
                .env("CHATDESK_DATA_DIR")
                .num_args(1)
                .help(format!("Directory holding prompts, chat history, exports and attachments. [default: {}]", Config::default(ConfigKey::DataDir)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("CHATDESK_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds for a model to reply before giving up. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::BackendHealthCheckTimeout.to_string())
                .long(ConfigKey::BackendHealthCheckTimeout.to_string())
                .env("CHATDESK_BACKEND_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before timing out when doing a healthcheck for the backend. [default: {}]", Config::default(ConfigKey::BackendHealthCheckTimeout)))
                .global(true),
        );
}

/// Runs one-shot subcommands. Returns true when the interactive chat should
/// start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = log_dir().join("debug.log");
                    println!("{}", log_path.display());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("export", export_matches)) => {
            Config::load(build(), vec![&matches, export_matches]).await?;
            export_session(export_matches).await?;
            return Ok(false);
        }
        Some(("prompts", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("dir", _)) => {
                    println!("{}", Layout::default().prompts_dir.display());
                }
                Some(("list", _)) => {
                    print_prompts_list().await?;
                }
                _ => {
                    subcommand_prompts().print_long_help()?;
                }
            }
            return Ok(false);
        }
        Some(("sessions", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("dir", _)) => {
                    println!("{}", Layout::default().sessions_dir.display());
                    return Ok(false);
                }
                Some(("list", _)) => {
                    print_sessions_list().await?;
                    return Ok(false);
                }
                Some(("open", open_matches)) => {
                    Config::load(build(), vec![&matches, subcmd_matches, open_matches]).await?;
                    if let Some(session_id) = open_matches.get_one::<String>("session-id") {
                        load_config_from_session(session_id).await?;
                    } else {
                        return load_config_from_latest_session().await;
                    }
                }
                Some(("delete", delete_matches)) => {
                    let sessions = Sessions::new(Layout::default().sessions_dir);
                    if let Some(session_id) = delete_matches.get_one::<String>("session-id") {
                        sessions.delete(session_id).await?;
                        println!("Deleted session {session_id}");
                    } else if delete_matches.get_flag("all") {
                        sessions.delete_all().await?;
                        println!("Deleted all sessions");
                    } else {
                        subcommand_sessions_delete().print_long_help()?;
                    }
                    return Ok(false);
                }
                _ => {
                    subcommand_sessions().print_long_help()?;
                    return Ok(false);
                }
            }
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
