//! Export task entry point for workflow orchestrators.
//!
//! Runs one SOQL export and prints the destination path on stdout. Any
//! pipeline error exits nonzero, which is what a host scheduler treats
//! as task failure.
//!
//! ```sh
//! export SF_INSTANCE_URL='https://na1.salesforce.com'
//! export SF_ACCESS_TOKEN='00D...'
//! sf-extract --out /tmp/accounts.csv \
//!     --params "2020-01-01,2020-01-02" \
//!     "SELECT Id, Name FROM Account WHERE SystemModstamp >= %s AND SystemModstamp <= %s"
//! ```

use sf_extract_client::{Credentials, SalesforceClient, SalesforceCredentials};
use sf_extract_query::Extractor;
use std::path::PathBuf;

struct TaskArgs {
    soql: String,
    params: Vec<String>,
    out: Option<PathBuf>,
    include_headers: bool,
    include_deleted: bool,
}

fn usage() -> ! {
    eprintln!("Usage: sf-extract [OPTIONS] SOQL");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out PATH        Destination file (default: a generated temp file)");
    eprintln!("  --params LIST     Comma-delimited positional parameters for %s markers");
    eprintln!("  --no-headers      Omit the header row");
    eprintln!("  --no-deleted      Skip deleted/archived records (query instead of queryAll)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SF_INSTANCE_URL   Salesforce instance URL");
    eprintln!("  SF_ACCESS_TOKEN   Session access token");
    eprintln!("  SF_API_VERSION    API version (optional)");
    std::process::exit(1);
}

/// Parse the command line; `None` means the invocation is malformed and
/// the usage message should be shown.
fn parse_args(mut args: impl Iterator<Item = String>) -> Option<TaskArgs> {
    let mut soql = None;
    let mut params = Vec::new();
    let mut out = None;
    let mut include_headers = true;
    let mut include_deleted = true;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out = Some(PathBuf::from(args.next()?)),
            "--params" => match args.next() {
                Some(list) if !list.is_empty() => {
                    params = list.split(',').map(str::to_string).collect();
                }
                _ => return None,
            },
            "--no-headers" => include_headers = false,
            "--no-deleted" => include_deleted = false,
            "--help" | "-h" => return None,
            _ if soql.is_none() => soql = Some(arg),
            _ => return None,
        }
    }

    Some(TaskArgs {
        soql: soql?,
        params,
        out,
        include_headers,
        include_deleted,
    })
}

fn temp_destination() -> PathBuf {
    let file = tempfile::Builder::new()
        .prefix("sf-extract")
        .suffix(".csv")
        .tempfile()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create temporary file: {e}");
            std::process::exit(1);
        });
    // Keep the file around after the handle is dropped; the caller owns it.
    file.into_temp_path().keep().unwrap_or_else(|e| {
        eprintln!("Error: failed to persist temporary file: {e}");
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let task = parse_args(std::env::args().skip(1)).unwrap_or_else(|| usage());

    let creds = SalesforceCredentials::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let client = SalesforceClient::new(creds.instance_url(), creds.access_token())
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create client: {e}");
            std::process::exit(1);
        })
        .with_api_version(creds.api_version());

    let destination = task.out.unwrap_or_else(temp_destination);

    let extractor = Extractor::new(client).include_deleted(task.include_deleted);
    match extractor
        .export(&task.soql, &task.params, &destination, task.include_headers)
        .await
    {
        Ok(path) => println!("{}", path.display()),
        Err(e) => {
            eprintln!("Error: export failed: {e}");
            std::process::exit(1);
        }
    }
}
