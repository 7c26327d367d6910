use mongodb::{bson::doc, options::ClientOptions, Client};

pub struct Config<'a> {
    pub app_name: Option<&'a str>,

    pub username: &'a str,
    pub password: &'a str,
    pub database: &'a str,
    pub host: &'a str,
    pub port: u32,
}

impl Config<'_> {
    fn url(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port,
        )
    }
}

/// Returns new mongodb Client handle.
///
/// Pings the target database so that a bad address or bad credentials
/// surface here and not halfway through the update.
pub async fn conn(cfg: Config<'_>) -> anyhow::Result<Client> {
    let mut client_options = ClientOptions::parse(cfg.url()).await?;
    client_options.app_name = cfg.app_name.map(|s| s.to_string());

    let client = Client::with_options(client_options)?;
    client
        .database(cfg.database)
        .run_command(doc! {"ping": 1}, None)
        .await?;

    Ok(client)
}
