//! In-memory patient repository holding sealed rows.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{PatientRepository, PatientRepositoryError};
use crate::domain::{NewPatientRecord, PatientId, PatientRecord};

use super::{SEQUENCE_EXHAUSTED, Table};

#[derive(Debug, Default)]
pub struct MemoryPatientRepository {
    table: RwLock<Table<PatientRecord>>,
}

impl MemoryPatientRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientRepository for MemoryPatientRepository {
    async fn insert(
        &self,
        patient: NewPatientRecord,
    ) -> Result<PatientRecord, PatientRepositoryError> {
        let mut table = self.table.write().await;
        let raw_id = table
            .allocate()
            .ok_or_else(|| PatientRepositoryError::query(SEQUENCE_EXHAUSTED))?;
        let id =
            PatientId::new(raw_id).map_err(|err| PatientRepositoryError::query(err.to_string()))?;
        let record = PatientRecord {
            id,
            profile: patient.profile,
            sealed: patient.sealed,
            created_at: patient.created_at,
            updated_at: None,
        };
        table.put(raw_id, record.clone());
        Ok(record)
    }

    async fn find_by_id(
        &self,
        id: PatientId,
    ) -> Result<Option<PatientRecord>, PatientRepositoryError> {
        Ok(self.table.read().await.get(id.get()).cloned())
    }

    async fn list(&self) -> Result<Vec<PatientRecord>, PatientRepositoryError> {
        Ok(self.table.read().await.rows().cloned().collect())
    }

    async fn replace(&self, record: PatientRecord) -> Result<bool, PatientRepositoryError> {
        let mut table = self.table.write().await;
        match table.get_mut(record.id.get()) {
            Some(row) => {
                *row = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: PatientId) -> Result<bool, PatientRepositoryError> {
        Ok(self.table.write().await.remove(id.get()))
    }

    async fn find_first_by_name(
        &self,
        fragment: &str,
    ) -> Result<Option<PatientRecord>, PatientRepositoryError> {
        Ok(self
            .table
            .read()
            .await
            .rows()
            .find(|record| record.profile.name_contains(fragment))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cipher::EncryptedField;
    use crate::domain::{PatientProfile, SealedDetails};
    use chrono::{DateTime, NaiveDate};
    use rstest::rstest;

    fn new_record(first: &str, last: &str) -> NewPatientRecord {
        let opaque = |byte: u8| EncryptedField::from_bytes(vec![byte; 40]);
        NewPatientRecord {
            profile: PatientProfile {
                first_name: first.to_owned(),
                last_name: last.to_owned(),
                date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1).expect("valid date"),
            },
            sealed: SealedDetails {
                contact_number: opaque(1),
                email: opaque(2),
                medical_history: None,
            },
            created_at: DateTime::from_timestamp(0, 0).expect("epoch"),
        }
    }

    #[rstest]
    #[case("ada", Some(1))]
    #[case("LOVE", Some(1))]
    #[case("hop", Some(2))]
    #[case("turing", None)]
    #[tokio::test]
    async fn name_search_returns_lowest_id_match(
        #[case] fragment: &str,
        #[case] expected: Option<i64>,
    ) {
        let repo = MemoryPatientRepository::new();
        repo.insert(new_record("Ada", "Lovelace")).await.expect("insert");
        repo.insert(new_record("Grace", "Hopper")).await.expect("insert");
        repo.insert(new_record("Adaline", "Hope")).await.expect("insert");

        let found = repo.find_first_by_name(fragment).await.expect("search");

        assert_eq!(found.map(|record| record.id.get()), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn replace_of_missing_row_reports_false() {
        let repo = MemoryPatientRepository::new();
        let record = repo.insert(new_record("Ada", "Lovelace")).await.expect("insert");
        assert!(repo.delete(record.id).await.expect("delete"));

        assert!(!repo.replace(record).await.expect("replace"));
    }
}
