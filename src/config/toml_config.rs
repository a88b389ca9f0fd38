use crate::adapters::{ConfiguredLeadStore, CsvLeadStore, HttpLeadStore, InMemoryLeadStore};
use crate::app::upsell::{ExpressUpsell, DEFAULT_UPSELL_AMOUNTS};
use crate::core::dataset::{OfficeDataset, DEFAULT_STATE_CODE};
use crate::core::hint::LeadStateHint;
use crate::core::resolver::OfficeResolver;
use crate::core::ConfigProvider;
use crate::domain::model::StateCode;
use crate::utils::error::{ResolverError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

static ENV_VAR_REG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

pub type ConfiguredResolver = OfficeResolver<LeadStateHint<ConfiguredLeadStore>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub resolver: ResolverSection,
    #[serde(default)]
    pub lead_store: LeadStoreConfig,
    #[serde(default)]
    pub upsell: UpsellConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverSection {
    pub default_state: Option<String>,
    pub dataset_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStoreType {
    #[default]
    Memory,
    Csv,
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadStoreConfig {
    #[serde(default)]
    pub r#type: LeadStoreType,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsellConfig {
    pub amounts: Option<Vec<u32>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ResolverError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ResolverError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LEADS_ENDPOINT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_REG
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(state) = &self.resolver.default_state {
            StateCode::parse(state)?;
        }

        if let Some(path) = &self.resolver.dataset_path {
            validation::validate_file_extension("resolver.dataset_path", path, &["toml"])?;
        }

        match self.lead_store.r#type {
            LeadStoreType::Memory => {}
            LeadStoreType::Csv => {
                let path = validation::validate_required_field("lead_store.path", &self.lead_store.path)?;
                validation::validate_file_extension("lead_store.path", path, &["csv"])?;
            }
            LeadStoreType::Http => {
                let endpoint =
                    validation::validate_required_field("lead_store.endpoint", &self.lead_store.endpoint)?;
                validation::validate_url("lead_store.endpoint", endpoint)?;
            }
        }

        if let Some(timeout) = self.lead_store.timeout_seconds {
            validation::validate_positive_number("lead_store.timeout_seconds", timeout, 1)?;
        }

        if let Some(amounts) = &self.upsell.amounts {
            ExpressUpsell::new(amounts)?;
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.lead_store.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    /// 載入資料集，並套用設定中的預設州別
    pub fn load_dataset(&self) -> Result<Arc<OfficeDataset>> {
        let dataset = match &self.resolver.dataset_path {
            Some(path) => {
                tracing::info!("Loading office dataset from: {}", path);
                Arc::new(OfficeDataset::from_file(path)?)
            }
            None => OfficeDataset::builtin(),
        };

        if let Some(state) = &self.resolver.default_state {
            if StateCode::parse(state)? != *dataset.default_state() {
                return Ok(Arc::new(dataset.with_default_state(state)?));
            }
        }
        Ok(dataset)
    }

    pub fn build_lead_store(&self) -> Result<ConfiguredLeadStore> {
        let store = match self.lead_store.r#type {
            LeadStoreType::Memory => ConfiguredLeadStore::Memory(InMemoryLeadStore::new()),
            LeadStoreType::Csv => {
                let path = validation::validate_required_field("lead_store.path", &self.lead_store.path)?;
                ConfiguredLeadStore::Csv(CsvLeadStore::from_path(path)?)
            }
            LeadStoreType::Http => {
                let endpoint =
                    validation::validate_required_field("lead_store.endpoint", &self.lead_store.endpoint)?;
                ConfiguredLeadStore::Http(HttpLeadStore::new(endpoint.clone(), self.timeout())?)
            }
        };
        Ok(store)
    }

    pub fn build_resolver(&self) -> Result<ConfiguredResolver> {
        let dataset = self.load_dataset()?;
        let store = self.build_lead_store()?;
        tracing::debug!(
            "Resolver ready: {} offices, default state {}, lead store {:?}",
            dataset.len(),
            dataset.default_state(),
            self.lead_store.r#type
        );
        Ok(OfficeResolver::new(dataset, LeadStateHint::new(store)))
    }

    pub fn build_upsell(&self) -> Result<ExpressUpsell> {
        ExpressUpsell::new(self.upsell_amounts())
    }
}

impl ConfigProvider for TomlConfig {
    fn default_state(&self) -> &str {
        self.resolver.default_state.as_deref().unwrap_or(DEFAULT_STATE_CODE)
    }

    fn dataset_path(&self) -> Option<&str> {
        self.resolver.dataset_path.as_deref()
    }

    fn upsell_amounts(&self) -> &[u32] {
        self.upsell.amounts.as_deref().unwrap_or(DEFAULT_UPSELL_AMOUNTS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_state(), DEFAULT_STATE_CODE);
        assert_eq!(config.lead_store.r#type, LeadStoreType::Memory);
        assert_eq!(config.upsell_amounts(), DEFAULT_UPSELL_AMOUNTS);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[resolver]
default_state = "RJ"

[lead_store]
type = "http"
endpoint = "https://leads.example.com/api/leads"
timeout_seconds = 3

[upsell]
amounts = [19]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_state(), "RJ");
        assert_eq!(config.lead_store.r#type, LeadStoreType::Http);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.upsell_amounts(), &[19]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_LEADS_ENDPOINT", "https://test.leads.com/find");

        let toml_content = r#"
[lead_store]
type = "http"
endpoint = "${TEST_LEADS_ENDPOINT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.lead_store.endpoint.as_deref(),
            Some("https://test.leads.com/find")
        );

        std::env::remove_var("TEST_LEADS_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let cases = [
            "[resolver]\ndefault_state = \"SAO\"\n",
            "[resolver]\ndataset_path = \"offices.json\"\n",
            "[lead_store]\ntype = \"csv\"\n",
            "[lead_store]\ntype = \"http\"\nendpoint = \"invalid-url\"\n",
            "[lead_store]\ntimeout_seconds = 0\n",
            "[upsell]\namounts = []\n",
        ];
        for toml_content in cases {
            let config = TomlConfig::from_toml_str(toml_content).unwrap();
            assert!(config.validate().is_err(), "accepted: {}", toml_content);
        }
    }

    #[test]
    fn test_unknown_lead_store_type_fails_to_parse() {
        assert!(TomlConfig::from_toml_str("[lead_store]\ntype = \"redis\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[resolver]\ndefault_state = \"mg\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        let dataset = config.load_dataset().unwrap();
        assert_eq!(dataset.default_state().as_str(), "MG");
    }

    #[test]
    fn test_default_state_must_exist_in_dataset() {
        let config = TomlConfig::from_toml_str("[resolver]\ndefault_state = \"ZZ\"\n").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.load_dataset().is_err());
    }
}
