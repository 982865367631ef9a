use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::database::{Company, CompanyStore, RepositoryError};
use crate::filter::{Attribute, FilterCriteria, FilterError};
use crate::geo::{CountryLookup, GeoError};

/// In-memory company store with the same error contract as the Postgres one
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<i32, Company>>,
    next_id: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row with a fixed id, as a fixture
    pub fn with_row(self, company: Company) -> Self {
        self.rows.lock().unwrap().insert(company.id, company);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn attribute<'a>(company: &'a Company, attribute: Attribute) -> Option<&'a str> {
        match attribute {
            Attribute::Name => company.name.as_deref(),
            Attribute::Code => company.code.as_deref(),
            Attribute::Country => company.country.as_deref(),
            Attribute::Website => company.website.as_deref(),
            Attribute::Phone => company.phone.as_deref(),
        }
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Company>, RepositoryError> {
        let mut wanted = Vec::with_capacity(criteria.len());
        for (key, value) in criteria.iter() {
            let attribute =
                Attribute::parse(key).ok_or_else(|| FilterError::UnknownAttribute(key.to_string()))?;
            wanted.push((attribute, value.to_string()));
        }

        let companies: Vec<Company> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|company| {
                wanted
                    .iter()
                    .all(|(attribute, value)| Self::attribute(company, *attribute) == Some(value.as_str()))
            })
            .cloned()
            .collect();

        if companies.is_empty() {
            return Err(RepositoryError::NotFound("companies not found".to_string()));
        }
        Ok(companies)
    }

    async fn get(&self, id: i32) -> Result<Company, RepositoryError> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("company with id {} not found", id)))
    }

    async fn create(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let mut id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        while rows.contains_key(&id) {
            id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        }
        let company = company.with_id(id);
        rows.insert(id, company.clone());
        Ok(company)
    }

    async fn update(&self, company: &Company) -> Result<(), RepositoryError> {
        match self.rows.lock().unwrap().get_mut(&company.id) {
            Some(row) => {
                *row = company.clone();
                Ok(())
            }
            None => Err(RepositoryError::Conflict(format!(
                "failed to update company with id {}: no such row",
                company.id
            ))),
        }
    }

    async fn delete(&self, company: &Company) -> Result<(), RepositoryError> {
        match self.rows.lock().unwrap().remove(&company.id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::Conflict(format!(
                "failed to delete company with id {}: no such row",
                company.id
            ))),
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Country lookup answering from a fixed table; unknown addresses fail
#[derive(Default)]
pub struct StaticLookup {
    countries: HashMap<IpAddr, String>,
    calls: AtomicUsize,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ip: &str, country: &str) -> Self {
        let ip: IpAddr = ip.parse().expect("fixture IP");
        self.countries.insert(ip, country.to_string());
        self
    }

    /// Number of lookups performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CountryLookup for StaticLookup {
    async fn country_name(&self, ip: IpAddr) -> Result<String, GeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.countries.get(&ip).cloned().ok_or_else(|| GeoError::Empty {
            url: format!("static://{}/country_name", ip),
        })
    }
}

/// Company with every business attribute set from `tag`
pub fn sample_company(id: i32, tag: &str) -> Company {
    Company {
        id,
        name: Some(format!("Test{}", tag)),
        code: Some(format!("TST{}", tag)),
        country: Some("TT".to_string()),
        website: Some("NA".to_string()),
        phone: Some(tag.to_string()),
    }
}
