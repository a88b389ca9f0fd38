use crate::config::toml_config::{LeadStoreType, TomlConfig};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "customs-office-resolver")]
#[command(about = "Resolve the customs office responsible for a tracking code")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Tracking code to resolve
    #[arg(short, long, conflicts_with = "query")]
    pub tracking: Option<String>,

    /// Confirmation page query string, e.g. "tracking=BR1&amount=26.71"
    #[arg(short, long)]
    pub query: Option<String>,

    /// Look up a state code directly instead of a tracking code
    #[arg(short, long, conflicts_with_all = ["tracking", "query"])]
    pub state: Option<String>,

    /// Override resolver.default_state
    #[arg(long)]
    pub default_state: Option<String>,

    /// Read leads from this CSV file (overrides lead_store)
    #[arg(long)]
    pub leads_csv: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(state) = &self.default_state {
            config.resolver.default_state = Some(state.clone());
            tracing::info!("Default state overridden to: {}", state);
        }

        if let Some(path) = &self.leads_csv {
            config.lead_store.r#type = LeadStoreType::Csv;
            config.lead_store.path = Some(path.clone());
            tracing::info!("Lead store overridden to CSV file: {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_parse_cli_args() {
        let cli = CliConfig::parse_from([
            "customs-office-resolver",
            "--tracking",
            "BR123",
            "--default-state",
            "rj",
            "--leads-csv",
            "leads.csv",
            "--format",
            "json",
        ]);
        assert_eq!(cli.tracking.as_deref(), Some("BR123"));
        assert_eq!(cli.format, OutputFormat::Json);

        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.default_state(), "rj");
        assert_eq!(config.lead_store.r#type, LeadStoreType::Csv);
        assert_eq!(config.lead_store.path.as_deref(), Some("leads.csv"));
    }

    #[test]
    fn test_state_conflicts_with_tracking() {
        let result = CliConfig::try_parse_from([
            "customs-office-resolver",
            "--tracking",
            "BR123",
            "--state",
            "SP",
        ]);
        assert!(result.is_err());
    }
}
