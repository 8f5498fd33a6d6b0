//! Command-line login gate.
//!
//! # Responsibility
//! - Drive register/login through `quicknote_core` without any UI toolkit.
//! - Print the placeholder note view on successful login.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use quicknote_core::{
    default_log_level, flush_logging, init_logging, note_home_greeting, AuthService,
    JsonCredentialStore,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "quicknote", version, about = "Register and log in to QuickNote")]
struct Cli {
    /// Directory holding users.json
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Absolute directory for rolling log files; logging stays off when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error; only valid together with --log-dir
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new account
    Register(CredentialArgs),
    /// Verify credentials and open the note view
    Login(CredentialArgs),
}

#[derive(Args, Debug)]
struct CredentialArgs {
    username: String,

    /// Password; read from the first line of stdin when omitted
    #[arg(long)]
    password: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = run(cli);
    flush_logging();
    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let service = AuthService::new(JsonCredentialStore::in_dir(&cli.data_dir));
    match cli.command {
        Command::Register(args) => {
            let password = resolve_password(args.password, &mut std::io::stdin().lock())?;
            let user = service.register(&args.username, &password)?;
            info!("event=cli_register module=cli status=ok");
            Ok(format!("Registered `{}`.", user.username))
        }
        Command::Login(args) => {
            let password = resolve_password(args.password, &mut std::io::stdin().lock())?;
            let user = service.login(&args.username, &password)?;
            info!("event=cli_login module=cli status=ok");
            Ok(note_home_greeting(&user.username))
        }
    }
}

fn resolve_password(flag: Option<String>, input: &mut impl BufRead) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    if read == 0 {
        bail!("no password given; pass --password or pipe it on stdin");
    }
    let password = line
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line.as_str());
    Ok(password.to_string())
}
