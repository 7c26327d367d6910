use clap::Parser;
use projectify::cli;
use projectify::db;
use projectify::store::MongoStore;
use projectify::update;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // install global collector configured based on RUST_LOG env var.
    tracing_subscriber::fmt::init();

    let args = cli::ConnArgs::parse();
    let client = db::conn(args.as_config()).await?;
    let store = MongoStore::new(&client, &args.database);

    update::apply(&store).await?;
    info!(database = args.database.as_str(), "update applied");

    Ok(())
}
