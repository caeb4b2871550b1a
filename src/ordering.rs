//! Total orders over filaments used to scan them deterministically.
//!
//! Each comparator looks at one key only. Sorting helpers use a stable sort,
//! so filaments with equal keys keep their input order. Handles are resolved
//! to their representatives before comparison.

use crate::arena::FilamentArena;
use crate::error::{FilamentError, Result};
use crate::filament::{Filament, FilamentId};
use std::cmp::Ordering;

/// Ascending first covered coordinate.
pub fn by_start(a: &Filament, b: &Filament) -> Result<Ordering> {
    Ok(a.start_coord()?.cmp(&b.start_coord()?))
}

/// Ascending last covered coordinate.
pub fn by_stop(a: &Filament, b: &Filament) -> Result<Ordering> {
    Ok(a.stop_coord()?.cmp(&b.stop_coord()?))
}

/// Ascending distance from the reference axis. Both distances must be set.
pub fn by_ref_distance(a: &Filament, b: &Filament) -> Result<Ordering> {
    let da = ref_distance(a)?;
    let db = ref_distance(b)?;
    Ok(da.total_cmp(&db))
}

fn ref_distance(filament: &Filament) -> Result<f64> {
    filament
        .ref_distance()
        .ok_or(FilamentError::RefDistanceUnset {
            filament: filament.id(),
        })
}

/// Sorts `ids` by `key` under `cmp`, after checking that every key is
/// available.
fn sort_by_key<K, F, C>(
    arena: &FilamentArena,
    ids: &mut [FilamentId],
    key: F,
    cmp: C,
) -> Result<()>
where
    F: Fn(&Filament) -> Result<K>,
    C: Fn(&K, &K) -> Ordering,
{
    let mut keyed = Vec::with_capacity(ids.len());
    for &id in ids.iter() {
        keyed.push((key(arena.get(id)?)?, id));
    }
    keyed.sort_by(|a, b| cmp(&a.0, &b.0));
    for (slot, (_, id)) in ids.iter_mut().zip(keyed) {
        *slot = id;
    }
    Ok(())
}

pub fn sort_by_start(arena: &FilamentArena, ids: &mut [FilamentId]) -> Result<()> {
    sort_by_key(arena, ids, Filament::start_coord, i32::cmp)
}

pub fn sort_by_stop(arena: &FilamentArena, ids: &mut [FilamentId]) -> Result<()> {
    sort_by_key(arena, ids, Filament::stop_coord, i32::cmp)
}

/// Fails with [`FilamentError::RefDistanceUnset`] before touching `ids` when
/// any filament lacks a reference distance.
pub fn sort_by_ref_distance(arena: &FilamentArena, ids: &mut [FilamentId]) -> Result<()> {
    sort_by_key(arena, ids, ref_distance, f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Scale;
    use crate::section::{Orientation, Run, Section, SectionId};
    use std::sync::Arc;

    fn arena_with(spans: &[(i32, usize)]) -> (FilamentArena, Vec<FilamentId>) {
        let mut arena = FilamentArena::new(Scale::new(20.0, 4.0).expect("scale"));
        let ids = spans
            .iter()
            .enumerate()
            .map(|(i, &(first, len))| {
                let section = Section::new(
                    SectionId(i as u32),
                    Orientation::Horizontal,
                    first,
                    vec![Run::new(10 * i as i32, 4); len],
                );
                arena.seed(Arc::new(section)).expect("seed")
            })
            .collect();
        (arena, ids)
    }

    #[test]
    fn start_order_is_stable_on_ties() {
        let (arena, ids) = arena_with(&[(30, 10), (10, 5), (30, 2), (0, 50)]);
        let mut sorted = ids.clone();
        sort_by_start(&arena, &mut sorted).expect("all filaments have members");
        assert_eq!(sorted, vec![ids[3], ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn stop_order() {
        let (arena, ids) = arena_with(&[(0, 10), (5, 2), (0, 50)]);
        let mut sorted = ids.clone();
        sort_by_stop(&arena, &mut sorted).expect("all filaments have members");
        assert_eq!(sorted, vec![ids[1], ids[0], ids[2]]);
        let a = arena.get(ids[0]).expect("a");
        let b = arena.get(ids[1]).expect("b");
        assert_eq!(by_stop(a, b), Ok(Ordering::Greater));
        assert_eq!(by_start(a, b), Ok(Ordering::Less));
    }

    #[test]
    fn distance_order_requires_every_distance() {
        let (mut arena, ids) = arena_with(&[(0, 10), (0, 10), (0, 10)]);
        arena.set_ref_distance(ids[0], 12.0).expect("set");
        arena.set_ref_distance(ids[2], -4.0).expect("set");
        let mut sorted = ids.clone();
        assert_eq!(
            sort_by_ref_distance(&arena, &mut sorted),
            Err(FilamentError::RefDistanceUnset { filament: ids[1] })
        );
        assert_eq!(sorted, ids, "failed sort must leave input untouched");

        arena.set_ref_distance(ids[1], 3.0).expect("set");
        sort_by_ref_distance(&arena, &mut sorted).expect("distances set");
        assert_eq!(sorted, vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn distance_sort_agrees_with_comparator_on_signed_zero() {
        let (mut arena, ids) = arena_with(&[(0, 10), (0, 10)]);
        arena.set_ref_distance(ids[0], 0.0).expect("set");
        arena.set_ref_distance(ids[1], -0.0).expect("set");
        let a = arena.get(ids[0]).expect("a");
        let b = arena.get(ids[1]).expect("b");
        assert_eq!(by_ref_distance(a, b), Ok(Ordering::Greater));
        let mut sorted = ids.clone();
        sort_by_ref_distance(&arena, &mut sorted).expect("distances set");
        assert_eq!(sorted, vec![ids[1], ids[0]]);
    }
}
