use std::{net::IpAddr, path::PathBuf};

use clap::Parser;

use crate::error::ErrorVerbosity;

/// Every option can also be set through its environment variable.
/// Options given here take precedence over the configuration file.
#[derive(Debug, Default, Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[clap(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Address to listen on.
    #[clap(long, env = "HOST")]
    pub host: Option<IpAddr>,

    /// Port to listen on.
    #[clap(long, env = "PORT")]
    pub port: Option<u16>,

    /// URL of the archive JSON file.
    #[clap(long, env = "UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Directory holding the landing page and its assets.
    #[clap(long, env = "PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,

    /// How much detail error responses carry.
    #[clap(long, env = "ERROR_VERBOSITY", value_enum)]
    pub error_verbosity: Option<ErrorVerbosity>,

    /// Log every response body at trace level.
    #[clap(long, env = "TRACE_RESPONSE_BODY")]
    pub trace_response_body: Option<bool>,
}
