use crate::domain::model::{OfficeRecord, StateCode};
use crate::utils::error::{ResolverError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// State whose office is returned whenever resolution cannot pick one.
pub const DEFAULT_STATE_CODE: &str = "SP";

/// Receita Federal national helpline, shared by every unit.
const RECEITA_PHONE: &str = "146";

/// (state, office name, address)
const BUILTIN_OFFICES: &[(&str, &str, &str)] = &[
    ("AC", "Alfândega da Receita Federal em Rio Branco", "Rio Branco - AC, Brasil"),
    ("AL", "Alfândega da Receita Federal em Maceió", "Porto de Maceió, Maceió - AL, Brasil"),
    ("AM", "Alfândega da Receita Federal no Porto de Manaus", "Porto de Manaus, Manaus - AM, Brasil"),
    ("AP", "Alfândega da Receita Federal em Macapá", "Porto de Santana, Macapá - AP, Brasil"),
    ("BA", "Alfândega da Receita Federal no Porto de Salvador", "Porto de Salvador, Salvador - BA, Brasil"),
    ("CE", "Alfândega da Receita Federal no Porto de Fortaleza", "Porto do Mucuripe, Fortaleza - CE, Brasil"),
    ("DF", "Alfândega da Receita Federal em Brasília", "Aeroporto Internacional de Brasília, Brasília - DF, Brasil"),
    ("ES", "Alfândega da Receita Federal no Porto de Vitória", "Porto de Vitória, Vitória - ES, Brasil"),
    ("GO", "Alfândega da Receita Federal em Goiânia", "Goiânia - GO, Brasil"),
    ("MA", "Alfândega da Receita Federal em São Luís", "Porto do Itaqui, São Luís - MA, Brasil"),
    ("MG", "Alfândega da Receita Federal em Belo Horizonte", "Aeroporto Internacional de Confins, Confins - MG, Brasil"),
    ("MS", "Alfândega da Receita Federal em Campo Grande", "Campo Grande - MS, Brasil"),
    ("MT", "Alfândega da Receita Federal em Cuiabá", "Cuiabá - MT, Brasil"),
    ("PA", "Alfândega da Receita Federal no Porto de Belém", "Porto de Belém, Belém - PA, Brasil"),
    ("PB", "Alfândega da Receita Federal em João Pessoa", "Porto de Cabedelo, Cabedelo - PB, Brasil"),
    ("PE", "Alfândega da Receita Federal no Porto de Recife", "Porto do Recife, Recife - PE, Brasil"),
    ("PI", "Alfândega da Receita Federal em Teresina", "Teresina - PI, Brasil"),
    ("PR", "Alfândega da Receita Federal em Curitiba", "Aeroporto Afonso Pena, São José dos Pinhais - PR, Brasil"),
    ("RJ", "Alfândega da Receita Federal no Porto do Rio de Janeiro", "Porto do Rio de Janeiro, Rio de Janeiro - RJ, Brasil"),
    ("RN", "Alfândega da Receita Federal em Natal", "Porto de Natal, Natal - RN, Brasil"),
    ("RO", "Alfândega da Receita Federal em Porto Velho", "Porto Velho - RO, Brasil"),
    ("RR", "Alfândega da Receita Federal em Boa Vista", "Boa Vista - RR, Brasil"),
    ("RS", "Alfândega da Receita Federal em Porto Alegre", "Aeroporto Salgado Filho, Porto Alegre - RS, Brasil"),
    ("SC", "Alfândega da Receita Federal em Florianópolis", "Florianópolis - SC, Brasil"),
    ("SE", "Alfândega da Receita Federal em Aracaju", "Aracaju - SE, Brasil"),
    ("SP", "Alfândega da Receita Federal em São Paulo", "Aeroporto Internacional de Guarulhos, Guarulhos - SP, Brasil"),
    ("TO", "Alfândega da Receita Federal em Palmas", "Palmas - TO, Brasil"),
];

static BUILTIN: LazyLock<Arc<OfficeDataset>> = LazyLock::new(|| {
    let records = BUILTIN_OFFICES
        .iter()
        .map(|(state, name, address)| OfficeRecord {
            name: name.to_string(),
            phone: RECEITA_PHONE.to_string(),
            address: address.to_string(),
            state: StateCode::parse(state).unwrap(),
        })
        .collect();
    Arc::new(OfficeDataset::from_records(records, DEFAULT_STATE_CODE).unwrap())
});

/// Static table of customs offices keyed by state code.
///
/// Always holds an office for its default state, so [`OfficeDataset::nearest`]
/// is total.
#[derive(Debug, Clone)]
pub struct OfficeDataset {
    offices: HashMap<StateCode, OfficeRecord>,
    default_state: StateCode,
}

#[derive(Debug, Serialize, Deserialize)]
struct DatasetFile {
    default_state: Option<String>,
    offices: Vec<OfficeRecord>,
}

impl OfficeDataset {
    /// The table shipped with the crate, one office per UF.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    pub fn from_records(records: Vec<OfficeRecord>, default_state: &str) -> Result<Self> {
        let default_state = StateCode::parse(default_state)?;
        let mut offices = HashMap::with_capacity(records.len());

        for record in records {
            record.validate()?;
            let state = record.state.clone();
            if offices.insert(state.clone(), record).is_some() {
                return Err(ResolverError::DatasetError {
                    message: format!("duplicate office for state {}", state),
                });
            }
        }

        if !offices.contains_key(&default_state) {
            return Err(ResolverError::DatasetError {
                message: format!("no office for default state {}", default_state),
            });
        }

        Ok(Self {
            offices,
            default_state,
        })
    }

    /// 從 TOML 檔案載入資料集
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 解析 `[[offices]]` 表格，`default_state` 未設定時使用 SP
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DatasetFile =
            toml::from_str(content).map_err(|e| ResolverError::ConfigValidationError {
                field: "offices".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        let default_state = file.default_state.as_deref().unwrap_or(DEFAULT_STATE_CODE);
        Self::from_records(file.offices, default_state)
    }

    /// Same records with a different default state.
    pub fn with_default_state(&self, default_state: &str) -> Result<Self> {
        Self::from_records(self.offices.values().cloned().collect(), default_state)
    }

    pub fn get(&self, state: &StateCode) -> Option<&OfficeRecord> {
        self.offices.get(state)
    }

    pub fn default_state(&self) -> &StateCode {
        &self.default_state
    }

    pub fn default_office(&self) -> &OfficeRecord {
        // from_records refuses datasets without the default state
        &self.offices[&self.default_state]
    }

    /// Exact match on the state code, or the default office.
    pub fn nearest(&self, state: &str) -> &OfficeRecord {
        StateCode::parse(state)
            .ok()
            .and_then(|code| self.get(&code))
            .unwrap_or_else(|| self.default_office())
    }

    pub fn states(&self) -> Vec<&StateCode> {
        let mut states: Vec<_> = self.offices.keys().collect();
        states.sort();
        states
    }

    pub fn len(&self) -> usize {
        self.offices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }
}
