use clap::Parser;

use crate::db;

/// Connection flags shared by the apply and check binaries.
#[derive(Parser, Debug, Clone)]
pub struct ConnArgs {
    #[clap(long, default_value = "localhost")]
    pub host: String,

    #[clap(long, default_value_t = 27017)]
    pub port: u32,

    #[clap(long)]
    pub username: String,

    #[clap(long)]
    pub password: String,

    /// Database the update runs against.
    #[clap(long)]
    pub database: String,

    /// Reported to the server as the connecting application's name.
    #[clap(long)]
    pub app_name: Option<String>,
}

impl ConnArgs {
    pub fn as_config(&self) -> db::Config<'_> {
        db::Config {
            app_name: self.app_name.as_deref(),
            username: &self.username,
            password: &self.password,
            database: &self.database,
            host: &self.host,
            port: self.port,
        }
    }
}
