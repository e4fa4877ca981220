pub mod toml_config;

pub use toml_config::{AppConfig, KeysConfig, ServerConfig, UpstreamConfig};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "krishi-mitra")]
#[command(about = "Agricultural advisory API: crop scoring, disease lookup, weather, news and storefront")]
pub struct CliConfig {
    #[arg(long, help = "Socket address to listen on (overrides the config file)")]
    pub bind: Option<String>,

    #[arg(long, short = 'c', help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定檔、環境變數與命令列參數
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env(),
        };
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        Ok(config)
    }
}
