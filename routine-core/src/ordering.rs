//! Day-scoped ordering
//!
//! Order indices are scoped to one day and always form `1..n` once a
//! mutation is committed to the draft. Everything here works on the flat
//! exercise list; a day's sequence is the projection of its entries sorted
//! by `order`.

use crate::error::{CoreError, CoreResult};
use crate::types::{DraftExercise, ExerciseId};
use shared::Day;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Sort key where `0` (unset on load) sorts after every real position
fn position_key(order: u32) -> (bool, u32) {
    (order == 0, order)
}

/// Index the next appended entry of `day` receives
pub fn next_order(exercises: &[DraftExercise], day: Day) -> u32 {
    exercises.iter().filter(|e| e.day == day).count() as u32 + 1
}

/// Renumber `day` to `1..n`, keeping the current relative order
///
/// Ties keep their position in the flat list.
pub fn renumber_day(exercises: &mut [DraftExercise], day: Day) {
    let mut positions: Vec<usize> = (0..exercises.len())
        .filter(|&i| exercises[i].day == day)
        .collect();
    positions.sort_by_key(|&i| position_key(exercises[i].order));

    for (rank, i) in positions.into_iter().enumerate() {
        exercises[i].order = rank as u32 + 1;
    }
}

/// Renumber every day
pub fn normalize(exercises: &mut [DraftExercise]) {
    for day in Day::ALL {
        renumber_day(exercises, day);
    }
}

/// Whether `day` currently holds exactly `1..n`
pub fn is_contiguous(exercises: &[DraftExercise], day: Day) -> bool {
    let mut orders: Vec<u32> = exercises
        .iter()
        .filter(|e| e.day == day)
        .map(|e| e.order)
        .collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(i, &o)| o == i as u32 + 1)
}

/// Assign `1..n` to `day` following `ordering`
///
/// `ordering` must be a permutation of the day's current entries. Anything
/// else (an entry from another day, an unknown or repeated id, a missing
/// entry) is rejected and nothing is changed.
pub fn apply_ordering(
    exercises: &mut [DraftExercise],
    day: Day,
    ordering: &[ExerciseId],
) -> CoreResult<()> {
    let members: HashSet<ExerciseId> = exercises
        .iter()
        .filter(|e| e.day == day)
        .map(|e| e.id)
        .collect();

    let mut ranks: HashMap<ExerciseId, u32> = HashMap::with_capacity(ordering.len());
    for (i, id) in ordering.iter().enumerate() {
        if !members.contains(id) {
            let reason = match exercises.iter().find(|e| e.id == *id) {
                Some(other) => format!("exercise {id} belongs to {}, not {day}", other.day),
                None => format!("exercise {id} is not in the draft"),
            };
            return Err(CoreError::ReorderRejected(reason));
        }
        if ranks.insert(*id, i as u32 + 1).is_some() {
            return Err(CoreError::ReorderRejected(format!(
                "exercise {id} is listed more than once"
            )));
        }
    }
    if ranks.len() != members.len() {
        return Err(CoreError::ReorderRejected(format!(
            "ordering lists {} of the {} exercises on {day}",
            ranks.len(),
            members.len()
        )));
    }

    for entry in exercises.iter_mut().filter(|e| e.day == day) {
        if let Some(&rank) = ranks.get(&entry.id) {
            entry.order = rank;
        }
    }
    Ok(())
}

/// Move the entry at `index` to the end of `new_day`, closing the gap it
/// leaves behind
pub fn move_to_day(exercises: &mut [DraftExercise], index: usize, new_day: Day) {
    let old_day = exercises[index].day;
    if old_day == new_day {
        return;
    }
    let order = next_order(exercises, new_day);
    exercises[index].day = new_day;
    exercises[index].order = order;
    renumber_day(exercises, old_day);
}

/// Entries of `day` in sequence
pub fn day_sequence(exercises: &[DraftExercise], day: Day) -> Vec<&DraftExercise> {
    let mut entries: Vec<&DraftExercise> = exercises.iter().filter(|e| e.day == day).collect();
    entries.sort_by_key(|e| position_key(e.order));
    entries
}

/// Grouped view: days in week order, entries in sequence; empty days omitted
pub fn group_by_day(exercises: &[DraftExercise]) -> BTreeMap<Day, Vec<&DraftExercise>> {
    let mut grouped: BTreeMap<Day, Vec<&DraftExercise>> = BTreeMap::new();
    for entry in exercises {
        grouped.entry(entry.day).or_default().push(entry);
    }
    for entries in grouped.values_mut() {
        entries.sort_by_key(|e| position_key(e.order));
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExerciseFields, TransientId};

    fn create_test_exercise(id: i64, day: Day, order: u32) -> DraftExercise {
        DraftExercise::from_fields(
            ExerciseId::Persisted(id),
            day,
            order,
            ExerciseFields::new(format!("ex-{id}"), 3, 10),
        )
    }

    fn orders_of(exercises: &[DraftExercise], day: Day) -> Vec<(i64, u32)> {
        day_sequence(exercises, day)
            .into_iter()
            .map(|e| (e.id.persisted().unwrap(), e.order))
            .collect()
    }

    #[test]
    fn test_next_order_appends() {
        let exercises = vec![
            create_test_exercise(1, Day::Monday, 1),
            create_test_exercise(2, Day::Monday, 2),
            create_test_exercise(3, Day::Friday, 1),
        ];
        assert_eq!(next_order(&exercises, Day::Monday), 3);
        assert_eq!(next_order(&exercises, Day::Friday), 2);
        assert_eq!(next_order(&exercises, Day::Sunday), 1);
    }

    #[test]
    fn test_renumber_closes_gaps_stably() {
        let mut exercises = vec![
            create_test_exercise(1, Day::Monday, 5),
            create_test_exercise(2, Day::Monday, 2),
            create_test_exercise(3, Day::Tuesday, 7),
            create_test_exercise(4, Day::Monday, 9),
        ];
        renumber_day(&mut exercises, Day::Monday);
        assert_eq!(orders_of(&exercises, Day::Monday), vec![(2, 1), (1, 2), (4, 3)]);
        assert_eq!(exercises[2].order, 7);
    }

    #[test]
    fn test_unset_order_goes_last() {
        let mut exercises = vec![
            create_test_exercise(1, Day::Monday, 0),
            create_test_exercise(2, Day::Monday, 2),
            create_test_exercise(3, Day::Monday, 1),
        ];
        normalize(&mut exercises);
        assert_eq!(orders_of(&exercises, Day::Monday), vec![(3, 1), (2, 2), (1, 3)]);
        assert!(is_contiguous(&exercises, Day::Monday));
    }

    #[test]
    fn test_is_contiguous() {
        let mut exercises = vec![
            create_test_exercise(1, Day::Monday, 1),
            create_test_exercise(2, Day::Monday, 3),
        ];
        assert!(!is_contiguous(&exercises, Day::Monday));
        exercises[1].order = 2;
        assert!(is_contiguous(&exercises, Day::Monday));
        assert!(is_contiguous(&exercises, Day::Sunday));
    }

    #[test]
    fn test_apply_ordering_permutation() {
        let mut exercises = vec![
            create_test_exercise(1, Day::Monday, 1),
            create_test_exercise(2, Day::Monday, 2),
            create_test_exercise(3, Day::Monday, 3),
        ];
        let ordering = [
            ExerciseId::Persisted(3),
            ExerciseId::Persisted(1),
            ExerciseId::Persisted(2),
        ];
        apply_ordering(&mut exercises, Day::Monday, &ordering).unwrap();
        assert_eq!(orders_of(&exercises, Day::Monday), vec![(3, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_apply_ordering_rejects_cross_day() {
        let mut exercises = vec![
            create_test_exercise(1, Day::Monday, 1),
            create_test_exercise(2, Day::Tuesday, 1),
        ];
        let before = exercises.clone();
        let err = apply_ordering(
            &mut exercises,
            Day::Monday,
            &[ExerciseId::Persisted(2), ExerciseId::Persisted(1)],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ReorderRejected(_)));
        assert_eq!(exercises, before);
    }

    #[test]
    fn test_apply_ordering_rejects_partial_and_duplicates() {
        let mut exercises = vec![
            create_test_exercise(1, Day::Monday, 1),
            create_test_exercise(2, Day::Monday, 2),
        ];
        let before = exercises.clone();
        assert!(apply_ordering(&mut exercises, Day::Monday, &[ExerciseId::Persisted(2)]).is_err());
        assert!(
            apply_ordering(
                &mut exercises,
                Day::Monday,
                &[ExerciseId::Persisted(1), ExerciseId::Persisted(1)]
            )
            .is_err()
        );
        assert!(
            apply_ordering(
                &mut exercises,
                Day::Monday,
                &[ExerciseId::Persisted(1), ExerciseId::Transient(TransientId(9))]
            )
            .is_err()
        );
        assert_eq!(exercises, before);
    }

    #[test]
    fn test_move_to_day() {
        let mut exercises = vec![
            create_test_exercise(1, Day::Monday, 1),
            create_test_exercise(2, Day::Monday, 2),
            create_test_exercise(3, Day::Monday, 3),
            create_test_exercise(4, Day::Thursday, 1),
        ];
        move_to_day(&mut exercises, 0, Day::Thursday);
        assert_eq!(orders_of(&exercises, Day::Monday), vec![(2, 1), (3, 2)]);
        assert_eq!(orders_of(&exercises, Day::Thursday), vec![(4, 1), (1, 2)]);
    }

    #[test]
    fn test_move_to_same_day_is_noop() {
        let mut exercises = vec![
            create_test_exercise(1, Day::Monday, 1),
            create_test_exercise(2, Day::Monday, 2),
        ];
        move_to_day(&mut exercises, 0, Day::Monday);
        assert_eq!(orders_of(&exercises, Day::Monday), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_group_by_day_week_order() {
        let exercises = vec![
            create_test_exercise(1, Day::Sunday, 1),
            create_test_exercise(2, Day::Monday, 2),
            create_test_exercise(3, Day::Monday, 1),
        ];
        let grouped = group_by_day(&exercises);
        let days: Vec<Day> = grouped.keys().copied().collect();
        assert_eq!(days, vec![Day::Monday, Day::Sunday]);
        let monday: Vec<u32> = grouped[&Day::Monday].iter().map(|e| e.order).collect();
        assert_eq!(monday, vec![1, 2]);
    }
}
