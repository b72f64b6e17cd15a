//! ftclient - requests a listing or a file from an ftserver

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;

use ftserver::FtClient;
use ftserver::cli::ClientCli;
use ftserver::error::ClientError;
use ftserver::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ClientCli::parse();
    setup_logging();

    if let Err(message) = args.validate() {
        bail!(message);
    }

    let client = FtClient::new(args.host.clone(), args.server_port).with_protocol(args.protocol);

    match &args.get {
        None => {
            println!(
                "Receiving directory structure from {}:{}",
                args.host, args.data_port
            );
            for name in client.list(args.data_port).await? {
                println!("{}", name);
            }
        }
        Some(filename) => {
            let target = Path::new(filename)
                .file_name()
                .map(Path::new)
                .context("Requested name has no file component")?;
            if target.exists() && !args.force {
                bail!(
                    "{} already exists, pass --force to overwrite it",
                    target.display()
                );
            }

            match client.get(filename, args.data_port).await {
                Ok(content) => {
                    println!(
                        "Receiving '{}' from {}:{}",
                        filename, args.host, args.data_port
                    );
                    tokio::fs::write(target, content)
                        .await
                        .with_context(|| format!("Failed to save {}", target.display()))?;
                    println!("File Transfer Complete");
                }
                Err(ClientError::FileNotFound(_)) => {
                    println!("{}:{} says File not found", args.host, args.data_port);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
