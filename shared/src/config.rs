use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub mail: MailConfig,
    pub venue: VenueConfig,
    pub notification: NotificationConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        // .env があれば読み込む（無くてもよい）
        let _ = dotenvy::dotenv();

        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST").context("DATABASE_HOST is not set")?,
            port: env::var("DATABASE_PORT")
                .context("DATABASE_PORT is not set")?
                .parse()
                .context("DATABASE_PORT must be a port number")?,
            username: env::var("DATABASE_USERNAME").context("DATABASE_USERNAME is not set")?,
            password: env::var("DATABASE_PASSWORD").context("DATABASE_PASSWORD is not set")?,
            database: env::var("DATABASE_NAME").context("DATABASE_NAME is not set")?,
        };
        let redis = RedisConfig {
            host: env::var("REDIS_HOST").context("REDIS_HOST is not set")?,
            port: env::var("REDIS_PORT")
                .context("REDIS_PORT is not set")?
                .parse()
                .context("REDIS_PORT must be a port number")?,
        };
        // メール送信は任意。未設定ならログ出力のみの通知になる
        let mail = MailConfig {
            service_account_key: env::var("GMAIL_SERVICE_ACCOUNT_KEY").ok(),
            sender: env::var("GMAIL_SENDER").ok(),
        };
        let venue = VenueConfig {
            legacy_fallback: parse_flag(env::var("VENUE_LEGACY_FALLBACK").ok().as_deref(), true),
        };

        let notification = NotificationConfig {
            queue_capacity: env::var("NOTIFICATION_QUEUE_CAPACITY")
                .ok()
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("NOTIFICATION_QUEUE_CAPACITY must be a positive number")?
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
        };

        Ok(Self {
            database,
            redis,
            mail,
            venue,
            notification,
        })
    }
}

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        Some("1") | Some("true") | Some("yes") => true,
        Some("0") | Some("false") | Some("no") => false,
        _ => default,
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    pub service_account_key: Option<String>,
    pub sender: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct VenueConfig {
    /// 担当者情報を持たない旧レコードをメイン会場の候補に含めるかどうか
    pub legacy_fallback: bool,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            legacy_fallback: true,
        }
    }
}

const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct NotificationConfig {
    /// 送信待ちの通知をいくつまで保持するか。溢れた分は破棄してログに残す
    pub queue_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
