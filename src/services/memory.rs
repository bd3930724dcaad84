use crate::core::catalog::{AGE_FIELD, BREED_FIELD, SEX_FIELD};
use crate::core::filters::{compare_documents, matches_predicate};
use crate::models::{AgeSummary, BreedCount, Document, SexCount, SortSpec, StructuredPredicate};
use crate::services::store::{clamp_limit, AnimalStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// In-process store over a fixed list of documents
///
/// Used for local runs from a JSON export and as the store in tests.
/// Documents keep their insertion order, which is the sort tie-break.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<Document>,
}

impl MemoryStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Build from JSON values; every value must be an object
    pub fn from_values(values: Vec<Value>) -> Result<Self, StoreError> {
        let documents = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(document) => Ok(document),
                other => Err(StoreError::InvalidSeed(format!(
                    "entry {} is not an object: {}",
                    index, other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(documents))
    }

    /// Load a JSON array of documents from disk
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let values: Vec<Value> = serde_json::from_str(&raw)?;
        let store = Self::from_values(values)?;

        tracing::info!(
            "Loaded {} documents from {}",
            store.len(),
            path.as_ref().display()
        );

        Ok(store)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matching<'a>(
        &'a self,
        predicate: &'a StructuredPredicate,
    ) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents
            .iter()
            .filter(move |document| matches_predicate(document, predicate))
    }

    /// Group matching documents by a text field; non-text values share the null key
    fn group_counts(&self, predicate: &StructuredPredicate, field: &str) -> Vec<(Option<String>, u64)> {
        let mut counts: HashMap<Option<String>, u64> = HashMap::new();
        for document in self.matching(predicate) {
            let key = document.get(field).and_then(Value::as_str).map(str::to_string);
            *counts.entry(key).or_insert(0) += 1;
        }

        let mut groups: Vec<_> = counts.into_iter().collect();
        groups.sort_by(|(a_key, a_count), (b_key, b_count)| {
            b_count.cmp(a_count).then_with(|| match (a_key, b_key) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
        });
        groups
    }
}

#[async_trait]
impl AnimalStore for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }

    async fn fetch_page(
        &self,
        predicate: &StructuredPredicate,
        sort: &[SortSpec],
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError> {
        let mut matched: Vec<&Document> = self.matching(predicate).collect();
        if !sort.is_empty() {
            matched.sort_by(|a, b| compare_documents(a, b, sort));
        }

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(clamp_limit(limit) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, predicate: &StructuredPredicate) -> Result<u64, StoreError> {
        Ok(self.matching(predicate).count() as u64)
    }

    async fn breed_counts(
        &self,
        predicate: &StructuredPredicate,
    ) -> Result<Vec<BreedCount>, StoreError> {
        Ok(self
            .group_counts(predicate, BREED_FIELD)
            .into_iter()
            .map(|(breed, count)| BreedCount { breed, count })
            .collect())
    }

    async fn sex_counts(
        &self,
        predicate: &StructuredPredicate,
    ) -> Result<Vec<SexCount>, StoreError> {
        Ok(self
            .group_counts(predicate, SEX_FIELD)
            .into_iter()
            .map(|(sex_upon_outcome, count)| SexCount {
                sex_upon_outcome,
                count,
            })
            .collect())
    }

    async fn age_summary(
        &self,
        predicate: &StructuredPredicate,
    ) -> Result<Option<AgeSummary>, StoreError> {
        let ages: Vec<f64> = self
            .matching(predicate)
            .filter_map(|document| match document.get(AGE_FIELD) {
                Some(Value::Number(n)) => n.as_f64(),
                _ => None,
            })
            .collect();

        if ages.is_empty() {
            return Ok(None);
        }

        let min_weeks = ages.iter().copied().fold(f64::INFINITY, f64::min);
        let max_weeks = ages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg_weeks = ages.iter().sum::<f64>() / ages.len() as f64;

        Ok(Some(AgeSummary {
            min_weeks,
            max_weeks,
            avg_weeks,
        }))
    }
}
