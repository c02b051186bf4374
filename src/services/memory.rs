use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::filters::matches_case_filter;
use crate::models::{Case, CaseFilter, Gear, MatchRecord};

use super::{CaseCatalog, GearCatalog, MatchRepository, RepositoryError};

/// Catalog and match store held in process memory
///
/// Cases keep their insertion order so query results are deterministic.
#[derive(Default)]
pub struct InMemoryCatalog {
    gear: RwLock<HashMap<String, Gear>>,
    cases: RwLock<Vec<Case>>,
    records: RwLock<HashMap<(String, String), MatchRecord>>,
}

impl InMemoryCatalog {
    pub fn new(gear: Vec<Gear>, cases: Vec<Case>) -> Self {
        Self {
            gear: RwLock::new(gear.into_iter().map(|g| (g.id.clone(), g)).collect()),
            cases: RwLock::new(cases),
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert_gear(&self, gear: Gear) {
        self.gear.write().await.insert(gear.id.clone(), gear);
    }

    /// Add a case, replacing any existing case with the same id
    pub async fn insert_case(&self, case: Case) {
        let mut cases = self.cases.write().await;
        match cases.iter_mut().find(|existing| existing.id == case.id) {
            Some(existing) => *existing = case,
            None => cases.push(case),
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn get_match_record(&self, gear_id: &str, case_id: &str) -> Option<MatchRecord> {
        self.records
            .read()
            .await
            .get(&(gear_id.to_string(), case_id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl GearCatalog for InMemoryCatalog {
    async fn get_gear_by_id(&self, id: &str) -> Result<Option<Gear>, RepositoryError> {
        Ok(self.gear.read().await.get(id).cloned())
    }
}

#[async_trait]
impl CaseCatalog for InMemoryCatalog {
    async fn query_cases(&self, filter: &CaseFilter) -> Result<Vec<Case>, RepositoryError> {
        let cases = self.cases.read().await;
        Ok(cases
            .iter()
            .filter(|case| matches_case_filter(case, filter))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MatchRepository for InMemoryCatalog {
    async fn upsert_match_record(&self, record: &MatchRecord) -> Result<(), RepositoryError> {
        let key = (record.gear_id.clone(), record.case_id.clone());
        self.records.write().await.insert(key, record.clone());
        Ok(())
    }

    async fn list_match_records(&self, gear_id: &str) -> Result<Vec<MatchRecord>, RepositoryError> {
        let records = self.records.read().await;
        let mut found: Vec<MatchRecord> = records
            .values()
            .filter(|record| record.gear_id == gear_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }
}
