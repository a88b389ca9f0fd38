use crate::adapters::memory::InMemoryLeadStore;
use crate::domain::model::Lead;
use crate::domain::ports::LeadStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io::Read;
use std::path::Path;

/// Leads exported to a CSV file, loaded once at startup.
///
/// Expected header: `tracking,name,email,telephone,cpf,city,state,created_at`.
/// `city`, `state` and `created_at` may be left empty.
#[derive(Debug, Clone)]
pub struct CsvLeadStore {
    inner: InMemoryLeadStore,
}

impl CsvLeadStore {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(&path)?;
        let store = Self::from_reader(file)?;
        tracing::info!(
            "Loaded {} leads from {}",
            store.inner.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let leads = csv_reader
            .deserialize::<Lead>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            inner: InMemoryLeadStore::from_leads(leads),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl LeadStore for CsvLeadStore {
    async fn find_by_tracking(&self, tracking: &str) -> Result<Option<Lead>> {
        self.inner.find_by_tracking(tracking).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEADS_CSV: &str = "\
tracking,name,email,telephone,cpf,city,state,created_at
BR100,Ana Souza,ana@example.com,21988887777,11122233344,Niterói,RJ,2025-03-01T12:00:00Z
BR200, João Lima ,joao@example.com,31977776666,55566677788,,,
";

    #[tokio::test]
    async fn test_parse_leads_csv() {
        let store = CsvLeadStore::from_reader(LEADS_CSV.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);

        let ana = store.find_by_tracking("BR100").await.unwrap().unwrap();
        assert_eq!(ana.state.as_deref(), Some("RJ"));
        assert_eq!(ana.city.as_deref(), Some("Niterói"));
        assert!(ana.created_at.is_some());

        let joao = store.find_by_tracking("BR200").await.unwrap().unwrap();
        assert_eq!(joao.name, "João Lima");
        assert_eq!(joao.state, None);
        assert_eq!(joao.created_at, None);

        assert!(store.find_by_tracking("BR300").await.unwrap().is_none());
    }

    #[test]
    fn test_malformed_csv_is_an_error() {
        let bad = "tracking,name\nBR1,Ana\n";
        assert!(CsvLeadStore::from_reader(bad.as_bytes()).is_err());
    }
}
