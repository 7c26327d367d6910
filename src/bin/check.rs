use anyhow::bail;
use clap::Parser;
use projectify::cli;
use projectify::db;
use projectify::store::MongoStore;
use projectify::verify;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = cli::ConnArgs::parse();
    let client = db::conn(args.as_config()).await?;
    let store = MongoStore::new(&client, &args.database);

    let report = verify::verify(&store).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.ok() {
        bail!("database does not match the post-update schema");
    }
    Ok(())
}
