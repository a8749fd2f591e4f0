use clap::Parser;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;

use crate::RentalResult;

/// Console front-end for the video game rental store.
#[derive(Debug, Clone, Parser)]
#[command(name = "game-rental", version, about, long_about = None)]
pub struct Args {
    /// Database name
    pub dbname: String,

    /// Database port
    pub port: u16,

    /// Database user
    pub user: String,

    /// Database host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Database password
    #[arg(long, env = "PGPASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Full connection URL; takes precedence over the positional arguments
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

impl Args {
    pub fn connect_options(&self) -> RentalResult<PgConnectOptions> {
        if let Some(url) = &self.database_url {
            return Ok(PgConnectOptions::from_str(url)?);
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.dbname)
            .username(&self.user)
            .password(&self.password))
    }

    /// Connection target without credentials, for logs.
    pub fn describe(&self) -> String {
        match &self.database_url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("postgres://{}:{}/{}", self.host, self.port, self.dbname),
        }
    }
}
