//! nsd-control
//!
//! Command-line interface for the NSD remote-control protocol.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nsdctl::config::DEFAULT_CONTROL_SOCKET;
use nsdctl::{Command, Config, ControlClient, Reply};
use tracing_subscriber::{fmt, EnvFilter};

/// nsd-control
#[derive(Parser, Debug)]
#[command(name = "nsd-control")]
#[command(about = "Control an NSD server over its remote-control interface")]
#[command(version)]
struct Args {
    /// Control socket path, or host[:port] of the TLS interface
    #[arg(short, long, default_value = DEFAULT_CONTROL_SOCKET)]
    server: String,

    /// CA certificate the server certificate must chain to
    #[arg(long)]
    ca: Option<PathBuf>,

    /// Client certificate
    #[arg(long)]
    client_cert: Option<PathBuf>,

    /// Client private key
    #[arg(long)]
    client_key: Option<PathBuf>,

    /// Name to verify in the server certificate (defaults to the host)
    #[arg(long)]
    server_name: Option<String>,

    /// Socket read/write timeout in milliseconds (0 waits forever)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    /// Print structured replies as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stop the server
    Stop,

    /// Reload zone files from disk (all zones when none given)
    Reload { zones: Vec<String> },

    /// Reread the config file and apply patterns anew
    Repattern,

    /// Reopen the log file
    LogReopen,

    /// Show server status
    Status,

    /// Print statistics and reset the counters
    Stats,

    /// Print statistics without resetting the counters
    StatsNoreset,

    /// Add a zone with the given pattern
    Addzone { zone: String, pattern: String },

    /// Remove a zone
    Delzone { zone: String },

    /// Move a zone to another pattern
    Changezone { zone: String, pattern: String },

    /// Write zone files to disk
    Write { zones: Vec<String> },

    /// Send NOTIFY to secondaries
    Notify { zones: Vec<String> },

    /// Attempt a zone transfer
    Transfer { zones: Vec<String> },

    /// Full zone transfer, ignoring the serial
    ForceTransfer { zones: Vec<String> },

    /// Show the state of a zone
    Zonestatus { zone: String },

    /// Print the process id of the server
    Serverpid,

    /// Change the log verbosity
    Verbosity { level: i32 },

    /// Print TSIG keys
    PrintTsig { key: Option<String> },

    /// Change the secret of a TSIG key
    UpdateTsig { key: String, secret: String },

    /// Add a TSIG key
    AddTsig {
        key: String,
        secret: String,
        algorithm: Option<String>,
    },

    /// Associate a TSIG key with a zone
    AssocTsig { zone: String, key: String },

    /// Delete a TSIG key
    DelTsig { key: String },

    /// Stage a new cookie secret (128 bit, hex encoded)
    AddCookieSecret { secret: String },

    /// Drop the staging cookie secret
    DropCookieSecret,

    /// Make the staging cookie secret active
    ActivateCookieSecret,

    /// Show the cookie secrets
    PrintCookieSecrets,
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Stop => Command::Stop,
            Commands::Reload { zones } => Command::Reload { zones },
            Commands::Repattern => Command::Repattern,
            Commands::LogReopen => Command::LogReopen,
            Commands::Status => Command::Status,
            Commands::Stats => Command::Stats,
            Commands::StatsNoreset => Command::StatsNoReset,
            Commands::Addzone { zone, pattern } => Command::AddZone { zone, pattern },
            Commands::Delzone { zone } => Command::DelZone { zone },
            Commands::Changezone { zone, pattern } => Command::ChangeZone { zone, pattern },
            Commands::Write { zones } => Command::Write { zones },
            Commands::Notify { zones } => Command::Notify { zones },
            Commands::Transfer { zones } => Command::Transfer { zones },
            Commands::ForceTransfer { zones } => Command::ForceTransfer { zones },
            Commands::Zonestatus { zone } => Command::ZoneStatus { zone },
            Commands::Serverpid => Command::ServerPid,
            Commands::Verbosity { level } => Command::Verbosity { level },
            Commands::PrintTsig { key } => Command::PrintTsig { key },
            Commands::UpdateTsig { key, secret } => Command::UpdateTsig { key, secret },
            Commands::AddTsig { key, secret, algorithm } => {
                Command::AddTsig { key, secret, algorithm }
            }
            Commands::AssocTsig { zone, key } => Command::AssocTsig { zone, key },
            Commands::DelTsig { key } => Command::DelTsig { key },
            Commands::AddCookieSecret { secret } => Command::AddCookieSecret { secret },
            Commands::DropCookieSecret => Command::DropCookieSecret,
            Commands::ActivateCookieSecret => Command::ActivateCookieSecret,
            Commands::PrintCookieSecrets => Command::PrintCookieSecrets,
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with reply output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = Config::builder()
        .control_interface(&args.server)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms);
    if let Some(ca) = &args.ca {
        builder = builder.server_ca(ca);
    }
    if let Some(cert) = &args.client_cert {
        builder = builder.client_cert(cert);
    }
    if let Some(key) = &args.client_key {
        builder = builder.client_key(key);
    }
    if let Some(name) = &args.server_name {
        builder = builder.tls_server_name(name);
    }
    let config = builder.build();

    let command = Command::from(args.command);
    if !command.is_implemented() {
        eprintln!("error: {} is not implemented", command.verb());
        return ExitCode::FAILURE;
    }

    let mut client = match ControlClient::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!("Failed to connect to {}: {}", config.control_interface, e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = client.execute(command);

    // Close on every path, even when the command failed
    if let Err(e) = client.close() {
        tracing::warn!("Failed to close control connection: {}", e);
    }

    match result {
        Ok(reply) => match print_reply(&reply, args.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_reply(reply: &Reply, json: bool) -> serde_json::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reply)?);
    } else {
        print!("{}", reply);
    }
    Ok(())
}
