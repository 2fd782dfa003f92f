//! Chart CLI commands.

use std::path::PathBuf;

use clap::Args;

use chartdb::api::{ChartHeader, ChartRecord};
use chartdb::client::{ChartClient, ReqwestTransport};
use chartdb::config::ConfigFile;

use crate::error::CliError;

/// Build a client from the config file, refusing to continue when
/// secure transport is unavailable.
fn connect() -> Result<ChartClient<ReqwestTransport>, CliError> {
    let config = ConfigFile::load()?;
    tracing::debug!(url = %config.service.base_url, "Loaded service configuration");
    let client = ChartClient::from_config(config.client_config());
    if client.ssl_lib_missing() {
        return Err(CliError::SslMissing);
    }
    Ok(client)
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Force a fresh remote listing, bypassing the local cache
    #[arg(long)]
    pub refresh: bool,

    /// Include tombstoned (deleted) charts
    #[arg(long)]
    pub deleted: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn list(args: ListArgs) -> Result<(), CliError> {
    let client = connect()?;
    let headers = if args.refresh {
        client.refresh_chart_headers()?
    } else {
        client.get_all_chart_headers()?
    };

    let headers: Vec<ChartHeader> = headers
        .into_iter()
        .filter(|h| args.deleted || !h.deleted)
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&headers)
            .map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    for header in &headers {
        println!(
            "{:>8}  {}  {:<5} {}{}",
            header.id,
            header.last_changed.format("%Y-%m-%d"),
            header.language,
            header.name,
            if header.curated { "  [curated]" } else { "" }
        );
    }
    println!("{} charts", headers.len());
    Ok(())
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Chart id
    pub id: i64,

    /// Bypass the transport response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Print the chart XML body instead of the metadata
    #[arg(long)]
    pub xml: bool,

    /// Write the preview image to this file
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Emit JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs) -> Result<(), CliError> {
    let client = connect()?;
    let record = client.get_chart_by_id(args.id, args.no_cache)?;

    if let Some(ref path) = args.image {
        std::fs::write(path, &record.image)?;
        println!("Wrote preview image to {}", path.display());
    }

    if args.xml {
        println!("{}", record.chart_xml);
    } else if args.json {
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", json);
    } else {
        let header = &record.header;
        println!("Chart #{}: {}", header.id, header.name);
        println!("  Description:  {}", header.description);
        println!("  Language:     {}", header.language);
        println!("  Min version:  {}", header.min_version);
        println!("  Last changed: {}", header.last_changed);
        println!("  Creator:      {} <{}>", record.creator_nick, record.creator_email);
        println!("  Curated:      {}", header.curated);
        println!("  Deleted:      {}", header.deleted);
        println!("  Image:        {} bytes", record.image.len());
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Chart name
    #[arg(long)]
    pub name: String,

    /// Free-text description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Source language tag
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Minimum compatible application version
    #[arg(long, default_value = "")]
    pub min_version: String,

    /// Creator display name
    #[arg(long, default_value = "")]
    pub nick: String,

    /// Creator contact address
    #[arg(long, default_value = "")]
    pub email: String,

    /// File holding the chart XML body
    #[arg(long, value_name = "FILE")]
    pub xml: PathBuf,

    /// Optional preview image file
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

pub fn publish(args: PublishArgs) -> Result<(), CliError> {
    let chart_xml = std::fs::read_to_string(&args.xml)?;
    let image = match args.image {
        Some(ref path) => std::fs::read(path)?,
        None => Vec::new(),
    };

    let record = ChartRecord {
        header: ChartHeader {
            name: args.name,
            description: args.description,
            language: args.language,
            min_version: args.min_version,
            ..ChartHeader::default()
        },
        chart_xml,
        image,
        creator_nick: args.nick,
        creator_email: args.email,
    };

    let client = connect()?;
    client.post_chart(&record)?;
    println!("Published; the server assigns the id, re-list to see it.");
    Ok(())
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Chart id
    pub id: i64,

    /// New chart name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// File holding the new chart XML body
    #[arg(long, value_name = "FILE")]
    pub xml: Option<PathBuf>,

    /// New preview image file
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

pub fn update(args: UpdateArgs) -> Result<(), CliError> {
    let client = connect()?;

    // Fetch the current record fresh, overlay the changed fields.
    let mut record = client.get_chart_by_id(args.id, true)?;
    if let Some(name) = args.name {
        record.header.name = name;
    }
    if let Some(description) = args.description {
        record.header.description = description;
    }
    if let Some(ref path) = args.xml {
        record.chart_xml = std::fs::read_to_string(path)?;
    }
    if let Some(ref path) = args.image {
        record.image = std::fs::read(path)?;
    }

    client.put_chart(&record)?;
    println!("Updated chart #{}", args.id);
    Ok(())
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Chart id
    pub id: i64,
}

pub fn delete(args: DeleteArgs) -> Result<(), CliError> {
    let client = connect()?;
    client.delete_chart_by_id(args.id)?;
    println!("Deleted chart #{}", args.id);
    Ok(())
}

#[derive(Debug, Args)]
pub struct CurateArgs {
    /// Chart id
    pub id: i64,

    /// Clear the curated flag instead of setting it
    #[arg(long)]
    pub off: bool,
}

pub fn curate(args: CurateArgs) -> Result<(), CliError> {
    let client = connect()?;
    let status = !args.off;
    client.curate_chart_by_id(args.id, status)?;
    println!(
        "Chart #{} is now {}",
        args.id,
        if status { "curated" } else { "not curated" }
    );
    Ok(())
}

pub fn show_config() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    println!("Config file:  {}", ConfigFile::default_path().display());
    println!("Service URL:  {}", config.service.base_url);
    println!("User:         {}", config.service.user);
    println!("Timeout:      {}s", config.service.timeout_secs);
    println!("Cache dir:    {}", config.cache.directory.display());
    Ok(())
}
