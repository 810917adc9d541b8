//! In-memory record store for panel tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use entity::{
    Department, DepartmentPayload, Employee, EmployeePayload, Record, RecordId,
};
use platform_api::{ApiError, ApiResult, RecordSource, RecordStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    List,
    Create,
    Update(RecordId),
    Delete(RecordId),
}

pub trait Materialize: Record {
    fn materialize(id: RecordId, payload: &Self::Payload) -> Self;
}

impl Materialize for Department {
    fn materialize(id: RecordId, payload: &DepartmentPayload) -> Self {
        Department {
            id,
            name: payload.name.clone(),
            head_of_department: payload.head_of_department.clone(),
        }
    }
}

impl Materialize for Employee {
    fn materialize(id: RecordId, payload: &EmployeePayload) -> Self {
        Employee {
            id,
            name: payload.name.clone(),
            salary: Some(payload.salary),
            department_id: Some(payload.department_id.clone()),
            manager_id: Some(payload.manager_id.clone()),
            date_of_joining: Some(payload.date_of_joining),
            designation: payload.designation.clone(),
            department: None,
        }
    }
}

struct Inner<R> {
    records: Vec<R>,
    calls: Vec<Call>,
    next_id: i64,
    fail_next: Option<ApiError>,
}

pub struct MemoryStore<R> {
    inner: Mutex<Inner<R>>,
}

impl<R: Materialize> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl<R: Materialize> MemoryStore<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: records.len() as i64 + 100,
                records,
                calls: Vec::new(),
                fail_next: None,
            }),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn records(&self) -> Vec<R> {
        self.lock().records.clone()
    }

    pub fn fail_next(&self, err: ApiError) {
        self.lock().fail_next = Some(err);
    }

    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: Call) -> Result<MutexGuard<'_, Inner<R>>, ApiError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        match inner.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(inner),
        }
    }
}

#[async_trait]
impl<R: Materialize> RecordSource<R> for MemoryStore<R> {
    async fn list(&self) -> ApiResult<Vec<R>> {
        Ok(self.record(Call::List)?.records.clone())
    }
}

#[async_trait]
impl<R: Materialize> RecordStore<R> for MemoryStore<R> {
    async fn create(&self, payload: &R::Payload) -> ApiResult<Option<R>> {
        let mut inner = self.record(Call::Create)?;
        let id = RecordId::Number(inner.next_id);
        inner.next_id += 1;
        let record = R::materialize(id, payload);
        inner.records.push(record.clone());
        Ok(Some(record))
    }

    async fn update(&self, id: &RecordId, payload: &R::Payload) -> ApiResult<Option<R>> {
        let mut inner = self.record(Call::Update(id.clone()))?;
        let slot = inner
            .records
            .iter_mut()
            .find(|r| r.id().same_as(id))
            .ok_or_else(|| ApiError::status(404, "not found"))?;
        *slot = R::materialize(id.clone(), payload);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &RecordId) -> ApiResult<()> {
        let mut inner = self.record(Call::Delete(id.clone()))?;
        let before = inner.records.len();
        inner.records.retain(|r| !r.id().same_as(id));
        if inner.records.len() == before {
            return Err(ApiError::status(404, "not found"));
        }
        Ok(())
    }
}
