//! In-memory repository for engagement lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::engagement::{
    domain::{EngagementTask, PatientId, TaskId},
    ports::{
        EngagementTaskRepository, EngagementTaskRepositoryError, EngagementTaskRepositoryResult,
    },
};

/// Thread-safe in-memory engagement task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngagementTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, EngagementTask>,
    patient_index: HashMap<PatientId, Vec<TaskId>>,
}

impl InMemoryEngagementTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> EngagementTaskRepositoryError {
    EngagementTaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn tasks_for_patient(state: &InMemoryTaskState, patient_id: PatientId) -> Vec<EngagementTask> {
    state
        .patient_index
        .get(&patient_id)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.tasks.get(id).cloned())
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl EngagementTaskRepository for InMemoryEngagementTaskRepository {
    async fn add(&self, task: &EngagementTask) -> EngagementTaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(EngagementTaskRepositoryError::DuplicateTask(task.id()));
        }

        state
            .patient_index
            .entry(task.patient_id())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &EngagementTask) -> EngagementTaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(EngagementTaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: TaskId,
    ) -> EngagementTaskRepositoryResult<Option<EngagementTask>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn for_patient(
        &self,
        patient_id: PatientId,
    ) -> EngagementTaskRepositoryResult<Vec<EngagementTask>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(tasks_for_patient(&state, patient_id))
    }

    async fn for_patients(
        &self,
        patient_ids: &[PatientId],
    ) -> EngagementTaskRepositoryResult<Vec<EngagementTask>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut seen: Vec<PatientId> = Vec::new();
        let mut tasks = Vec::new();
        for patient_id in patient_ids {
            if seen.contains(patient_id) {
                continue;
            }
            seen.push(*patient_id);
            tasks.extend(tasks_for_patient(&state, *patient_id));
        }
        Ok(tasks)
    }
}
