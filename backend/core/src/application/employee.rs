// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::training::parse_people;
use crate::domain::caller::Caller;
use crate::domain::employee::{Employee, EmployeeGuid, TrainingRole};
use crate::domain::events::ChangeEvent;
use crate::domain::field::{EmployeeField, FieldEntry};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::{EmployeeRepository, RepositoryError};
use crate::domain::training::{TrainingId, TrainingRef};

/// Employee directory operations.
///
/// Guids coming from callers are normalized before every lookup, so
/// `"ab12"` and `"AB12"` address the same record.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn add(&self, caller: &Caller, employee: Employee) -> ServiceResult<Employee>;
    async fn update(&self, caller: &Caller, employee: Employee) -> ServiceResult<Option<Employee>>;
    async fn update_field(
        &self,
        caller: &Caller,
        guid: &str,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>>;
    async fn get_employee(&self, caller: &Caller, guid: &str) -> ServiceResult<Option<Employee>>;
    async fn get_all(&self, caller: &Caller, page: PageRequest) -> ServiceResult<Page<Employee>>;
    async fn search(&self, caller: &Caller, term: &str, page: PageRequest) -> ServiceResult<Page<Employee>>;
    async fn delete(&self, caller: &Caller, guid: &str) -> ServiceResult<bool>;
    async fn add_training_to(
        &self,
        caller: &Caller,
        guids: &[String],
        training: &TrainingRef,
        role: TrainingRole,
    ) -> ServiceResult<usize>;
    async fn update_training_name(
        &self,
        caller: &Caller,
        training_id: TrainingId,
        name: &str,
    ) -> ServiceResult<usize>;
}

pub struct StandardEmployeeService {
    repository: Arc<dyn EmployeeRepository>,
}

impl StandardEmployeeService {
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl EmployeeService for StandardEmployeeService {
    async fn add(&self, _caller: &Caller, employee: Employee) -> ServiceResult<Employee> {
        match self.repository.insert(employee).await {
            Ok(employee) => {
                info!(guid = %employee.guid, "Employee added");
                Ok(employee)
            }
            Err(RepositoryError::Conflict(guid)) => Err(ServiceError::DuplicateResource(format!(
                "Employee {} already exist",
                guid
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, _caller: &Caller, mut employee: Employee) -> ServiceResult<Option<Employee>> {
        employee.guid = EmployeeGuid::normalized(employee.guid.as_str());
        let Some(existing) = self.repository.find_by_guid(&employee.guid).await? else {
            return Ok(None);
        };
        // Training history is derived from training lifecycle, never replaced wholesale
        employee.trainings_imparted = existing.trainings_imparted;
        employee.trainings_attended = existing.trainings_attended;
        Ok(Some(self.repository.save(employee).await?))
    }

    async fn update_field(
        &self,
        _caller: &Caller,
        guid: &str,
        entry: FieldEntry,
    ) -> ServiceResult<Option<ChangeEvent>> {
        let guid = EmployeeGuid::normalized(guid);
        let field = parse_employee_field(&entry)?;
        let name = field.name();
        if !self.repository.update_field(&guid, field).await? {
            debug!(guid = %guid, field = name, "Employee patch not applied");
            return Ok(None);
        }
        Ok(Some(ChangeEvent::EmployeeUpdated {
            guid,
            field: name.to_string(),
        }))
    }

    async fn get_employee(&self, _caller: &Caller, guid: &str) -> ServiceResult<Option<Employee>> {
        Ok(self
            .repository
            .find_by_guid(&EmployeeGuid::normalized(guid))
            .await?)
    }

    async fn get_all(&self, _caller: &Caller, page: PageRequest) -> ServiceResult<Page<Employee>> {
        Ok(self.repository.find_all(&page).await?)
    }

    async fn search(&self, _caller: &Caller, term: &str, page: PageRequest) -> ServiceResult<Page<Employee>> {
        Ok(self.repository.search(term, &page).await?)
    }

    async fn delete(&self, _caller: &Caller, guid: &str) -> ServiceResult<bool> {
        Ok(self.repository.delete(&EmployeeGuid::normalized(guid)).await?)
    }

    async fn add_training_to(
        &self,
        _caller: &Caller,
        guids: &[String],
        training: &TrainingRef,
        role: TrainingRole,
    ) -> ServiceResult<usize> {
        let guids: Vec<EmployeeGuid> = guids.iter().map(|g| EmployeeGuid::normalized(g)).collect();
        Ok(self.repository.add_training(&guids, training, role).await?)
    }

    async fn update_training_name(
        &self,
        _caller: &Caller,
        training_id: TrainingId,
        name: &str,
    ) -> ServiceResult<usize> {
        let reference = TrainingRef {
            id: training_id,
            name: name.to_string(),
        };
        Ok(self.repository.rename_training(&reference).await?)
    }
}

fn parse_employee_field(entry: &FieldEntry) -> ServiceResult<EmployeeField> {
    if entry.is("name") {
        return match entry.value_text() {
            Some(name) if !name.trim().is_empty() => Ok(EmployeeField::Name(name)),
            _ => Err(ServiceError::InvalidOperation("Employee name cannot be empty".to_string())),
        };
    }
    if entry.is("email") {
        return Ok(EmployeeField::Email(entry.value_text()));
    }
    if entry.is("managers") {
        return Ok(EmployeeField::Managers(parse_people(entry)?));
    }
    Err(ServiceError::InvalidOperation(format!(
        "Field {} can't be updated",
        entry.name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryEmployeeRepository;

    fn service() -> StandardEmployeeService {
        StandardEmployeeService::new(Arc::new(InMemoryEmployeeRepository::new()))
    }

    fn caller() -> Caller {
        Caller::admin("ADMIN", "Root")
    }

    #[tokio::test]
    async fn test_lookup_normalizes_guid() {
        let service = service();
        service.add(&caller(), Employee::new("AB12", "Kim")).await.unwrap();

        let found = service.get_employee(&caller(), " ab12 ").await.unwrap();
        assert_eq!(found.map(|e| e.name), Some("Kim".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_guid_rejected() {
        let service = service();
        service.add(&caller(), Employee::new("AB12", "Kim")).await.unwrap();

        let err = service
            .add(&caller(), Employee::new("AB12", "Kim again"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateResource(_)));
    }

    #[tokio::test]
    async fn test_update_field_reports_normalized_guid() {
        let service = service();
        service.add(&caller(), Employee::new("AB12", "Kim")).await.unwrap();

        let change = service
            .update_field(&caller(), "ab12", FieldEntry::new("email", "kim@example.com"))
            .await
            .unwrap();

        assert_eq!(
            change,
            Some(ChangeEvent::EmployeeUpdated {
                guid: EmployeeGuid::normalized("AB12"),
                field: "email".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_training_history_survives_update() {
        let service = service();
        let mut kim = Employee::new("AB12", "Kim");
        kim.trainings_attended.insert(TrainingId(4), "Async Rust".to_string());
        service.add(&caller(), kim).await.unwrap();

        let updated = service
            .update(&caller(), Employee::new("ab12", "Kim Lee"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Kim Lee");
        assert_eq!(updated.trainings_attended.len(), 1);
    }

    #[tokio::test]
    async fn test_add_training_and_rename() {
        let service = service();
        service.add(&caller(), Employee::new("AB12", "Kim")).await.unwrap();
        let reference = TrainingRef {
            id: TrainingId(9),
            name: "Tokio".to_string(),
        };

        let matched = service
            .add_training_to(&caller(), &["ab12".to_string(), "NOPE".to_string()], &reference, TrainingRole::Attended)
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let renamed = service
            .update_training_name(&caller(), TrainingId(9), "Tokio deep dive")
            .await
            .unwrap();
        assert_eq!(renamed, 1);

        let kim = service.get_employee(&caller(), "AB12").await.unwrap().unwrap();
        assert_eq!(
            kim.trainings_attended.get(&TrainingId(9)).map(String::as_str),
            Some("Tokio deep dive")
        );
    }
}
