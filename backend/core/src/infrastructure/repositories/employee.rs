// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::query::{list_page, search_page};
use crate::domain::employee::{Employee, EmployeeGuid, TrainingRole};
use crate::domain::field::EmployeeField;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::{EmployeeRepository, RepositoryError};
use crate::domain::training::TrainingRef;

/// Employees keyed by normalized guid
#[derive(Clone, Default)]
pub struct InMemoryEmployeeRepository {
    employees: Arc<RwLock<BTreeMap<EmployeeGuid, Employee>>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn insert(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut employees = self.employees.write();
        if employees.contains_key(&employee.guid) {
            return Err(RepositoryError::Conflict(employee.guid.to_string()));
        }
        employees.insert(employee.guid.clone(), employee.clone());
        Ok(employee)
    }

    async fn save(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        self.employees
            .write()
            .insert(employee.guid.clone(), employee.clone());
        Ok(employee)
    }

    async fn find_by_guid(&self, guid: &EmployeeGuid) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.employees.read().get(guid).cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Employee>, RepositoryError> {
        let employees: Vec<Employee> = self.employees.read().values().cloned().collect();
        Ok(list_page(employees, page))
    }

    async fn search(&self, term: &str, page: &PageRequest) -> Result<Page<Employee>, RepositoryError> {
        let employees: Vec<Employee> = self.employees.read().values().cloned().collect();
        Ok(search_page(employees, term, page))
    }

    async fn delete(&self, guid: &EmployeeGuid) -> Result<bool, RepositoryError> {
        Ok(self.employees.write().remove(guid).is_some())
    }

    async fn update_field(&self, guid: &EmployeeGuid, field: EmployeeField) -> Result<bool, RepositoryError> {
        let mut employees = self.employees.write();
        let Some(employee) = employees.get_mut(guid) else {
            return Ok(false);
        };
        match field {
            EmployeeField::Name(name) => employee.name = name,
            EmployeeField::Email(email) => employee.email = email,
            EmployeeField::Managers(managers) => employee.managers = managers,
        }
        Ok(true)
    }

    async fn add_training(
        &self,
        employees: &[EmployeeGuid],
        training: &TrainingRef,
        role: TrainingRole,
    ) -> Result<usize, RepositoryError> {
        let mut store = self.employees.write();
        let mut updated = 0;
        for guid in employees {
            if let Some(employee) = store.get_mut(guid) {
                employee
                    .trainings_mut(role)
                    .insert(training.id, training.name.clone());
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn rename_training(&self, training: &TrainingRef) -> Result<usize, RepositoryError> {
        let mut store = self.employees.write();
        let mut renamed = 0;
        for employee in store.values_mut() {
            if !employee.references_training(training.id) {
                continue;
            }
            for role in [TrainingRole::Imparted, TrainingRole::Attended] {
                if let Some(name) = employee.trainings_mut(role).get_mut(&training.id) {
                    name.clone_from(&training.name);
                }
            }
            renamed += 1;
        }
        Ok(renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::training::TrainingId;

    #[tokio::test]
    async fn test_rename_touches_only_referencing_employees() {
        let repository = InMemoryEmployeeRepository::new();
        let mut ada = Employee::new("G1", "Ada");
        ada.trainings_attended.insert(TrainingId(3), "Old".to_string());
        repository.insert(ada).await.unwrap();
        repository.insert(Employee::new("G2", "Bob")).await.unwrap();

        let renamed = repository
            .rename_training(&TrainingRef {
                id: TrainingId(3),
                name: "New".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(renamed, 1);

        let bob = repository
            .find_by_guid(&EmployeeGuid::normalized("g2"))
            .await
            .unwrap()
            .unwrap();
        assert!(bob.trainings_attended.is_empty());
    }

    #[tokio::test]
    async fn test_search_by_email() {
        let repository = InMemoryEmployeeRepository::new();
        repository
            .insert(Employee::new("G1", "Ada").with_email("ada@example.com"))
            .await
            .unwrap();
        repository.insert(Employee::new("G2", "Bob")).await.unwrap();

        let page = repository.search("example.com", &PageRequest::new(0, 5)).await.unwrap();
        assert_eq!(page.total_elements, 1);
    }
}
