#![allow(missing_docs, clippy::print_stdout)]
use anyhow::{Context, Result, bail};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use odp_client::{OdpClient, OdpConfig, OdpError, Pagination};

const HELP: &str = "\
List the metadata records of an ODP institution

USAGE:
  list-records <INSTITUTION> [OPTIONS]

OPTIONS:
  -o, --offset N   number of records to skip [default: 0]
  -l, --limit N    maximum number of records [default: 100]
      --insecure   do not verify TLS certificates
  -h, --help       print this help

The connection settings are read from ODP_PUBLIC_API, OAUTH2_SERVER,
OAUTH2_CLIENT_ID, OAUTH2_CLIENT_SECRET and OAUTH2_SCOPE.
";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = AppArgs::parse().context("parsing arguments")? else {
        print!("{HELP}");
        return Ok(());
    };

    let config = OdpConfig::from_env()
        .context("reading the ODP configuration")?
        .with_verify_tls(!args.insecure);
    let client = OdpClient::new(config)?;

    info!(
        institution = %args.institution,
        pagination = ?args.pagination,
        "listing metadata records"
    );
    match client
        .list_metadata_records(&args.institution, args.pagination)
        .await
    {
        Ok(records) => {
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Err(error @ OdpError::Client { .. }) => {
            bail!("{error}\n{:#}", error.error_detail())
        }
        Err(error) => Err(error.into()),
    }
}

#[derive(Debug)]
struct AppArgs {
    institution: String,
    pagination: Pagination,
    insecure: bool,
}

impl AppArgs {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = pico_args::Arguments::from_env();
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let defaults = Pagination::default();
        let offset = pargs
            .opt_value_from_str(["-o", "--offset"])
            .context("parsing offset argument")?;
        let limit = pargs
            .opt_value_from_str(["-l", "--limit"])
            .context("parsing limit argument")?;
        let insecure = pargs.contains("--insecure");
        let institution = pargs
            .free_from_str()
            .context("missing institution argument")?;

        let result = Self {
            institution,
            pagination: Pagination::new(
                offset.unwrap_or(defaults.offset),
                limit.unwrap_or(defaults.limit),
            ),
            insecure,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(Some(result))
    }
}
