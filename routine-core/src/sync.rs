//! Sync Dispatcher
//!
//! Pushes draft changes to a [`RemoteStore`] in two modes:
//!
//! - **Full submit**: routine header first, then every exercise creation,
//!   update and deletion as one concurrent batch. Every operation runs to
//!   completion. The operations the server confirmed are folded into the
//!   snapshot (created exercises take their server IDs) and the rest stay
//!   pending, so a retry sends only what is still missing.
//! - **Optimistic**: the draft is mutated first and the affected days are
//!   pushed right away. On failure the draft goes back to its pre-mutation
//!   state and the snapshot is re-fetched.

use crate::diff::ChangeSet;
use crate::draft::DraftStore;
use crate::error::{CoreError, CoreResult};
use crate::remote::{RemoteError, RemoteStore};
use crate::types::{ExerciseFields, ExerciseId, RoutineSnapshot};
use crate::validation::{FieldViolation, ValidationError, validate_routine};
use futures::future::join_all;
use serde::Serialize;
use shared::{Day, Routine, RoutineCreate, RoutineUpdate};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a successful full submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitReport {
    pub routine_id: i64,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// What the server confirmed out of one pushed change-set
#[derive(Debug, Default)]
struct PushOutcome {
    /// Transient identity and server ID of each created exercise
    created: Vec<(ExerciseId, i64)>,
    /// Persisted IDs whose update or deletion went through
    confirmed: Vec<i64>,
    failed: usize,
    /// First failure, in creation, update, deletion order
    error: Option<RemoteError>,
}

impl PushOutcome {
    fn fail(&mut self, err: RemoteError) {
        self.failed += 1;
        self.error.get_or_insert(err);
    }
}

/// Reject updates clearing a weight the server already holds
///
/// The server skips `null` on update, so the cleared weight would never be
/// stored.
fn ensure_pushable(set: &ChangeSet) -> CoreResult<()> {
    let violations: Vec<FieldViolation> = set
        .updates
        .iter()
        .filter(|c| {
            c.exercise.weight.is_none() && c.previous.as_ref().is_some_and(|p| p.weight.is_some())
        })
        .map(|c| FieldViolation {
            field: "weight",
            message: format!("weight of exercise {} cannot be cleared once saved", c.id),
        })
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations }.into())
    }
}

/// Applies change-sets against a remote store
#[derive(Clone)]
pub struct SyncDispatcher {
    store: Arc<dyn RemoteStore>,
}

impl std::fmt::Debug for SyncDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncDispatcher").finish_non_exhaustive()
    }
}

impl SyncDispatcher {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    // ========== Loading ==========

    /// Routine headers, all of them or those whose name contains `search`
    pub async fn list_routines(&self, search: Option<&str>) -> CoreResult<Vec<Routine>> {
        let routines = match search {
            Some(name) => self.store.search_routines(name).await?,
            None => self.store.list_routines().await?,
        };
        debug!(count = routines.len(), ?search, "Routines listed");
        Ok(routines)
    }

    /// Fresh draft of routine `id` from the server (last writer wins)
    pub async fn reload(&self, id: i64) -> CoreResult<DraftStore> {
        let detail = self.store.get_routine_detail(id).await?;
        DraftStore::load(&detail)
    }

    /// Re-read the server into the snapshot, keeping the draft
    ///
    /// Returns the change-set the next submit would push.
    pub async fn reconcile(&self, draft: &mut DraftStore) -> CoreResult<ChangeSet> {
        let id = draft.routine_id().ok_or(CoreError::NotPersisted)?;
        let snapshot = self.fetch_snapshot(id).await?;
        draft.refresh_snapshot(snapshot);
        let set = draft.change_set();
        debug!(routine_id = id, pending = set.len(), "Snapshot reconciled");
        Ok(set)
    }

    pub async fn delete_routine(&self, id: i64) -> CoreResult<()> {
        self.store.delete_routine(id).await?;
        info!(routine_id = id, "Routine deleted");
        Ok(())
    }

    // ========== Full submit ==========

    /// Create or update the routine, then push the whole change-set
    ///
    /// A newly created routine keeps its server ID even when the exercise
    /// batch fails, so a retry updates it instead of creating it again.
    /// Exercises the server confirmed before the failure keep their new
    /// state as well.
    pub async fn submit(&self, draft: &mut DraftStore) -> CoreResult<SubmitReport> {
        let header = draft.header().clone();
        validate_routine(&header.name, header.description.as_deref())?;
        let set = draft.change_set();
        ensure_pushable(&set)?;

        let routine_id = match header.id {
            Some(id) => {
                // Empty string clears; the server skips `null`
                let payload = RoutineUpdate {
                    name: header.name.clone(),
                    description: Some(header.description.clone().unwrap_or_default()),
                };
                self.store.update_routine(id, &payload).await?;
                id
            }
            None => {
                let payload = RoutineCreate {
                    name: header.name.clone(),
                    description: header.description.clone(),
                };
                let routine = self.store.create_routine(&payload).await?;
                debug!(routine_id = routine.id, "Routine created");
                draft.assign_routine(&routine);
                routine.id
            }
        };

        let outcome = self.push(routine_id, &set).await;
        draft.assign_ids(&outcome.created);
        match outcome.error {
            None => {
                draft.commit();
                let report = SubmitReport {
                    routine_id,
                    created: set.creations.len(),
                    updated: set.updates.len(),
                    deleted: set.deletions.len(),
                };
                info!(
                    routine_id,
                    created = report.created,
                    updated = report.updated,
                    deleted = report.deleted,
                    "Routine submitted"
                );
                Ok(report)
            }
            Some(err) => {
                let mut settled = outcome.confirmed;
                settled.extend(outcome.created.iter().map(|(_, id)| *id));
                draft.commit_exercises(&settled);
                warn!(
                    routine_id,
                    settled = settled.len(),
                    failed = outcome.failed,
                    error = %err,
                    "Submit partially applied"
                );
                Err(err.into())
            }
        }
    }

    // ========== Optimistic mutations ==========

    /// Reorder `day` locally and push the new indices
    pub async fn reorder(
        &self,
        draft: &mut DraftStore,
        day: Day,
        ordering: &[ExerciseId],
    ) -> CoreResult<()> {
        self.apply_optimistic(draft, |d| {
            d.reorder_day(day, ordering)?;
            Ok(vec![day])
        })
        .await?;
        info!(routine_id = ?draft.routine_id(), %day, "Day reordered");
        Ok(())
    }

    /// Edit one exercise and push it (plus any renumbering) right away
    pub async fn update_now(
        &self,
        draft: &mut DraftStore,
        id: &ExerciseId,
        fields: ExerciseFields,
        day: Option<Day>,
    ) -> CoreResult<()> {
        self.apply_optimistic(draft, |d| {
            let old_day = d.get(id).map(|e| e.day).ok_or(CoreError::NotFound(*id))?;
            let new_day = d.update_exercise(id, fields, day)?.day;
            Ok(vec![old_day, new_day])
        })
        .await
    }

    /// Delete one exercise and push it (plus the renumbered day) right away
    pub async fn remove_now(&self, draft: &mut DraftStore, id: &ExerciseId) -> CoreResult<()> {
        self.apply_optimistic(draft, |d| {
            let removed = d.remove_exercise(id)?;
            Ok(vec![removed.day])
        })
        .await
    }

    /// checkpoint → mutate → push affected days → acknowledge or restore
    ///
    /// `mutate` returns the days it touched. Creations are never pushed here;
    /// unsaved exercises wait for the next full submit.
    async fn apply_optimistic<F>(&self, draft: &mut DraftStore, mutate: F) -> CoreResult<()>
    where
        F: FnOnce(&mut DraftStore) -> CoreResult<Vec<Day>>,
    {
        let routine_id = draft.routine_id().ok_or(CoreError::NotPersisted)?;
        let checkpoint = draft.checkpoint();
        let days = mutate(draft)?;

        let mut set = draft.change_set();
        set.retain_days(&days);
        set.creations.clear();
        if let Err(err) = ensure_pushable(&set) {
            draft.restore(checkpoint);
            return Err(err);
        }

        if let Some(err) = self.push(routine_id, &set).await.error {
            warn!(routine_id, error = %err, "Optimistic update failed, rolling back");
            draft.restore(checkpoint);
            match self.fetch_snapshot(routine_id).await {
                Ok(snapshot) => draft.refresh_snapshot(snapshot),
                Err(refetch) => warn!(
                    routine_id,
                    error = %refetch,
                    "Could not re-fetch routine after rollback"
                ),
            }
            return Err(err.into());
        }

        let touched: Vec<i64> = set
            .updates
            .iter()
            .map(|c| c.id)
            .chain(set.deletions.iter().filter_map(|e| e.id.persisted()))
            .collect();
        draft.commit_exercises(&touched);
        debug!(routine_id, pushed = touched.len(), "Optimistic update acknowledged");
        Ok(())
    }

    // ========== Remote plumbing ==========

    async fn fetch_snapshot(&self, id: i64) -> CoreResult<RoutineSnapshot> {
        let detail = self.store.get_routine_detail(id).await?;
        RoutineSnapshot::try_from(&detail)
    }

    /// Issue every operation of `set` concurrently and collect each result
    async fn push(&self, routine_id: i64, set: &ChangeSet) -> PushOutcome {
        let store = self.store.as_ref();

        let creations = join_all(set.creations.iter().map(|entry| async move {
            let created = store.create_exercise(&entry.to_create(routine_id)).await?;
            Ok::<_, RemoteError>((entry.id, created.id))
        }));
        let updates = join_all(set.updates.iter().map(|change| async move {
            let payload = change.exercise.to_update(routine_id);
            store.update_exercise(change.id, &payload).await.map(|_| change.id)
        }));
        let deletions = join_all(
            set.deletions
                .iter()
                .filter_map(|entry| entry.id.persisted())
                .map(|id| async move { store.delete_exercise(id).await.map(|()| id) }),
        );

        let (creations, updates, deletions) = futures::join!(creations, updates, deletions);

        let mut outcome = PushOutcome::default();
        for result in creations {
            match result {
                Ok(pair) => outcome.created.push(pair),
                Err(err) => outcome.fail(err),
            }
        }
        for result in updates.into_iter().chain(deletions) {
            match result {
                Ok(id) => outcome.confirmed.push(id),
                Err(err) => outcome.fail(err),
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryStore, RemoteCall};
    use crate::remote::RemoteErrorKind;

    fn create_test_dispatcher() -> (Arc<MemoryStore>, SyncDispatcher) {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = SyncDispatcher::new(store.clone());
        (store, dispatcher)
    }

    async fn create_test_routine(dispatcher: &SyncDispatcher) -> DraftStore {
        let mut draft = DraftStore::new("Pierna", None);
        for name in ["A", "B", "C"] {
            draft
                .add_exercise(Day::Monday, ExerciseFields::new(name, 3, 10))
                .unwrap();
        }
        draft
            .add_exercise(Day::Friday, ExerciseFields::new("D", 4, 6))
            .unwrap();
        dispatcher.submit(&mut draft).await.unwrap();
        draft
    }

    fn ids_by_name(draft: &DraftStore, day: Day) -> Vec<(String, ExerciseId)> {
        draft
            .day(day)
            .iter()
            .map(|e| (e.name.clone(), e.id))
            .collect()
    }

    #[tokio::test]
    async fn test_submit_creates_routine_then_exercises() {
        let (store, dispatcher) = create_test_dispatcher();
        let draft = create_test_routine(&dispatcher).await;

        let calls = store.calls();
        assert_eq!(calls[0], RemoteCall::CreateRoutine);
        assert_eq!(calls.len(), 5);
        assert!(!draft.is_dirty());
        assert!(draft.exercises().iter().all(|e| !e.id.is_transient()));
        let routine_id = draft.routine_id().unwrap();
        assert_eq!(store.exercises_of(routine_id).len(), 4);
    }

    #[tokio::test]
    async fn test_submit_edit_flow_pushes_only_diff() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        store.clear_calls();

        let b = ids_by_name(&draft, Day::Monday)[1].1;
        draft.remove_exercise(&b).unwrap();
        let report = dispatcher.submit(&mut draft).await.unwrap();

        assert_eq!(report.deleted, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 0);
        assert_eq!(store.calls()[0], RemoteCall::UpdateRoutine(report.routine_id));
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_snapshot() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        draft
            .add_exercise(Day::Sunday, ExerciseFields::new("E", 3, 10))
            .unwrap();
        store.fail_on(RemoteCall::CreateExercise("E".to_string()), "Error interno del servidor");

        let err = dispatcher.submit(&mut draft).await.unwrap_err();
        assert!(!err.is_local());
        assert_eq!(err.to_string(), "Error interno del servidor");
        assert!(draft.is_dirty());
        assert_eq!(draft.change_set().creations.len(), 1);

        let report = dispatcher.submit(&mut draft).await.unwrap();
        assert_eq!(report.created, 1);
    }

    #[tokio::test]
    async fn test_submit_retry_does_not_duplicate_created_exercises() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = DraftStore::new("Pecho", None);
        for name in ["A", "B"] {
            draft
                .add_exercise(Day::Monday, ExerciseFields::new(name, 3, 10))
                .unwrap();
        }
        store.fail_on(RemoteCall::CreateExercise("B".to_string()), "boom");

        assert!(dispatcher.submit(&mut draft).await.is_err());
        let a = ids_by_name(&draft, Day::Monday)[0].1;
        assert!(!a.is_transient());
        let pending = draft.change_set();
        assert_eq!(pending.creations.len(), 1);
        assert_eq!(pending.creations[0].name, "B");
        assert!(pending.updates.is_empty());

        let report = dispatcher.submit(&mut draft).await.unwrap();
        assert_eq!(report.created, 1);
        let routine_id = draft.routine_id().unwrap();
        let rows: Vec<(String, Option<u32>)> = store
            .exercises_of(routine_id)
            .into_iter()
            .map(|e| (e.name, e.order))
            .collect();
        assert_eq!(
            rows,
            vec![("A".to_string(), Some(1)), ("B".to_string(), Some(2))]
        );
        assert!(dispatcher.reconcile(&mut draft).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_retry_skips_confirmed_deletion() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        let d = ids_by_name(&draft, Day::Friday)[0].1;
        draft.remove_exercise(&d).unwrap();
        draft
            .add_exercise(Day::Sunday, ExerciseFields::new("E", 3, 10))
            .unwrap();
        store.fail_on(RemoteCall::CreateExercise("E".to_string()), "boom");

        assert!(dispatcher.submit(&mut draft).await.is_err());
        assert!(draft.change_set().deletions.is_empty());

        store.clear_calls();
        let report = dispatcher.submit(&mut draft).await.unwrap();
        assert_eq!(report.deleted, 0);
        assert!(!store.calls().contains(&RemoteCall::DeleteExercise(d.persisted().unwrap())));
        assert!(!draft.is_dirty());
    }

    #[tokio::test]
    async fn test_submit_clears_description_and_notes() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = DraftStore::new("Espalda", Some("Tirones".to_string()));
        draft
            .add_exercise(
                Day::Tuesday,
                ExerciseFields::new("Remo", 3, 10).with_notes("agarre prono"),
            )
            .unwrap();
        dispatcher.submit(&mut draft).await.unwrap();
        let routine_id = draft.routine_id().unwrap();

        draft.set_details("Espalda", None).unwrap();
        let remo = ids_by_name(&draft, Day::Tuesday)[0].1;
        draft
            .update_exercise(&remo, ExerciseFields::new("Remo", 3, 10), None)
            .unwrap();
        dispatcher.submit(&mut draft).await.unwrap();
        assert!(!draft.is_dirty());

        let reloaded = dispatcher.reload(routine_id).await.unwrap();
        assert_eq!(reloaded.header().description, None);
        assert_eq!(reloaded.get(&remo).unwrap().notes, None);
        assert_eq!(store.exercises_of(routine_id)[0].notes.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_clearing_saved_weight_is_rejected() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = DraftStore::new("Hombro", None);
        draft
            .add_exercise(
                Day::Thursday,
                ExerciseFields::new("Press militar", 4, 8).with_weight(30.0),
            )
            .unwrap();
        dispatcher.submit(&mut draft).await.unwrap();
        let press = ids_by_name(&draft, Day::Thursday)[0].1;
        store.clear_calls();

        let err = dispatcher
            .update_now(&mut draft, &press, ExerciseFields::new("Press militar", 4, 8), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref v) if v.has_field("weight")));
        assert_eq!(draft.get(&press).unwrap().weight, Some(30.0));

        draft
            .update_exercise(&press, ExerciseFields::new("Press militar", 4, 8), None)
            .unwrap();
        let err = dispatcher.submit(&mut draft).await.unwrap_err();
        assert!(err.is_local());
        assert!(store.calls().is_empty());
        assert!(draft.is_dirty());
    }

    #[tokio::test]
    async fn test_list_and_search_routines() {
        let (_store, dispatcher) = create_test_dispatcher();
        create_test_routine(&dispatcher).await;
        let mut other = DraftStore::new("Torso", None);
        dispatcher.submit(&mut other).await.unwrap();

        assert_eq!(dispatcher.list_routines(None).await.unwrap().len(), 2);
        let found = dispatcher.list_routines(Some("pier")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Pierna");
    }

    #[tokio::test]
    async fn test_submit_keeps_created_routine_id_on_failure() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = DraftStore::new("Nueva", None);
        draft
            .add_exercise(Day::Monday, ExerciseFields::new("A", 3, 10))
            .unwrap();
        store.fail_on(RemoteCall::CreateExercise("A".to_string()), "boom");

        assert!(dispatcher.submit(&mut draft).await.is_err());
        let id = draft.routine_id().unwrap();
        store.clear_calls();
        dispatcher.submit(&mut draft).await.unwrap();
        assert_eq!(store.calls()[0], RemoteCall::UpdateRoutine(id));
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_name_locally() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = DraftStore::new("  ", None);
        let err = dispatcher.submit(&mut draft).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reorder_pushes_only_that_day() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        store.clear_calls();

        let monday = ids_by_name(&draft, Day::Monday);
        let ordering = [monday[2].1, monday[0].1, monday[1].1];
        dispatcher
            .reorder(&mut draft, Day::Monday, &ordering)
            .await
            .unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| matches!(c, RemoteCall::UpdateExercise(_))));
        assert!(!draft.is_dirty());
    }

    #[tokio::test]
    async fn test_reorder_failure_restores_order() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        let monday = ids_by_name(&draft, Day::Monday);
        let c_id = monday[2].1.persisted().unwrap();
        store.fail_with(
            RemoteCall::UpdateExercise(c_id),
            RemoteError::transport("connection reset"),
        );

        let ordering = [monday[2].1, monday[0].1, monday[1].1];
        let err = dispatcher
            .reorder(&mut draft, Day::Monday, &ordering)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Remote(RemoteError { kind: RemoteErrorKind::Transport, .. })
        ));
        assert_eq!(ids_by_name(&draft, Day::Monday), monday);
    }

    #[tokio::test]
    async fn test_reorder_requires_persisted_routine() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = DraftStore::new("Local", None);
        let err = dispatcher
            .reorder(&mut draft, Day::Monday, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotPersisted));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cross_day_reorder_is_local_error() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        store.clear_calls();
        let friday = ids_by_name(&draft, Day::Friday);
        let err = dispatcher
            .reorder(&mut draft, Day::Monday, &[friday[0].1])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ReorderRejected(_)));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_now_moves_day() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        store.clear_calls();

        let a = ids_by_name(&draft, Day::Monday)[0].1;
        dispatcher
            .update_now(&mut draft, &a, ExerciseFields::new("A", 5, 5), Some(Day::Friday))
            .await
            .unwrap();

        // A moved plus B and C renumbered
        assert_eq!(store.calls().len(), 3);
        assert_eq!(draft.get(&a).unwrap().order, 2);
        assert!(!draft.is_dirty());
    }

    #[tokio::test]
    async fn test_remove_now_leaves_unsaved_work_pending() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        draft
            .add_exercise(Day::Monday, ExerciseFields::new("Nuevo", 3, 10))
            .unwrap();
        store.clear_calls();

        let a = ids_by_name(&draft, Day::Monday)[0].1;
        dispatcher.remove_now(&mut draft, &a).await.unwrap();

        assert!(store.calls().contains(&RemoteCall::DeleteExercise(a.persisted().unwrap())));
        let pending = draft.change_set();
        assert_eq!(pending.creations.len(), 1);
        assert!(pending.updates.is_empty());
        assert!(pending.deletions.is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_picks_up_remote_changes() {
        let (store, dispatcher) = create_test_dispatcher();
        let mut draft = create_test_routine(&dispatcher).await;
        let routine_id = draft.routine_id().unwrap();
        let d = ids_by_name(&draft, Day::Friday)[0].1;

        let mut payload = draft.get(&d).unwrap().to_update(routine_id);
        payload.series = 9;
        store
            .update_exercise(d.persisted().unwrap(), &payload)
            .await
            .unwrap();

        let pending = dispatcher.reconcile(&mut draft).await.unwrap();
        assert_eq!(pending.updates.len(), 1);
        assert_eq!(pending.updates[0].changes[0].field, "series");
        assert_eq!(draft.get(&d).unwrap().series, 4);

        dispatcher.submit(&mut draft).await.unwrap();
        assert_eq!(store.exercises_of(routine_id)[3].series, Some(4));
    }

    #[tokio::test]
    async fn test_reload_and_delete() {
        let (_store, dispatcher) = create_test_dispatcher();
        let draft = create_test_routine(&dispatcher).await;
        let id = draft.routine_id().unwrap();

        let reloaded = dispatcher.reload(id).await.unwrap();
        assert_eq!(reloaded.exercises().len(), 4);
        assert!(!reloaded.is_dirty());

        dispatcher.delete_routine(id).await.unwrap();
        let err = dispatcher.reload(id).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Remote(RemoteError { kind: RemoteErrorKind::NotFound, .. })
        ));
    }
}
