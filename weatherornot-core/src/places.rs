//! Per-user favourite places.
//!
//! Each user's places carry a dense, 0-based `order`. Every mutation keeps
//! that invariant and, for a file-backed store, is written straight back to
//! disk.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ServiceError;
use crate::model::WeatherReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub u64);

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is asking. Saved places are only reachable with a user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<UserId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn for_user(user: impl Into<String>) -> Self {
        Self { user: Some(UserId(user.into())) }
    }

    pub fn user(&self) -> Result<&UserId, ServiceError> {
        self.user
            .as_ref()
            .ok_or_else(|| ServiceError::Auth("Sign in to manage saved places".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlace {
    pub id: PlaceId,
    pub user_id: UserId,
    pub name: String,
    /// Temperature when the place was saved, °F.
    pub temperature_f: Option<i32>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub order: usize,
    pub created_at: DateTime<Utc>,
}

/// What gets stored when a place is added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPlace {
    pub name: String,
    pub temperature_f: Option<i32>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl NewPlace {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Snapshot of a report's current conditions.
    pub fn from_report(report: &WeatherReport) -> Self {
        Self {
            name: report.location.name.clone(),
            temperature_f: Some(report.current.temperature_f()),
            description: Some(report.current.description.clone()),
            icon: Some(report.current.icon_category().icon().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    next_id: u64,
    places: Vec<SavedPlace>,
}

#[derive(Debug, Default)]
pub struct SavedPlaces {
    data: StoreData,
    path: Option<PathBuf>,
}

impl SavedPlaces {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store at `path`; a missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read places file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse places file: {}", path.display()))?
        } else {
            StoreData::default()
        };

        Ok(Self { data, path: Some(path) })
    }

    /// Writes `data` out, then makes it current. A failed write leaves the
    /// store as it was.
    fn commit(&mut self, data: StoreData) -> Result<(), ServiceError> {
        if let Some(path) = &self.path {
            write_json(path, &data).map_err(ServiceError::Server)?;
        }
        self.data = data;
        Ok(())
    }

    /// The user's places, by order.
    pub fn list(&self, session: &Session) -> Result<Vec<&SavedPlace>, ServiceError> {
        let user = session.user()?;
        let mut places: Vec<&SavedPlace> =
            self.data.places.iter().filter(|p| &p.user_id == user).collect();
        places.sort_by_key(|p| p.order);
        Ok(places)
    }

    fn count_for(&self, user: &UserId) -> usize {
        self.data.places.iter().filter(|p| &p.user_id == user).count()
    }

    pub fn add(&mut self, session: &Session, place: NewPlace) -> Result<SavedPlace, ServiceError> {
        let user = session.user()?.clone();
        let name = place.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("Place name is required".to_string()));
        }

        if self.data.places.iter().any(|p| p.user_id == user && p.name == name) {
            return Err(ServiceError::Validation("Place already saved".to_string()));
        }

        let mut data = self.data.clone();
        data.next_id += 1;
        let saved = SavedPlace {
            id: PlaceId(data.next_id),
            order: self.count_for(&user),
            user_id: user,
            name: name.to_string(),
            temperature_f: place.temperature_f,
            description: place.description,
            icon: place.icon,
            created_at: Utc::now(),
        };

        data.places.push(saved.clone());
        self.commit(data)?;
        tracing::info!(user = %saved.user_id, id = %saved.id, name = %saved.name, "saved place added");

        Ok(saved)
    }

    pub fn remove(&mut self, session: &Session, id: PlaceId) -> Result<SavedPlace, ServiceError> {
        let user = session.user()?.clone();
        let index = self
            .data
            .places
            .iter()
            .position(|p| p.id == id && p.user_id == user)
            .ok_or_else(|| ServiceError::NotFound(format!("Saved place {id}")))?;

        let mut data = self.data.clone();
        let removed = data.places.remove(index);
        for place in data.places.iter_mut().filter(|p| p.user_id == user) {
            if place.order > removed.order {
                place.order -= 1;
            }
        }

        self.commit(data)?;
        tracing::info!(user = %user, id = %id, "saved place removed");

        Ok(removed)
    }

    /// Sets each place's order to its position in `ids`.
    ///
    /// `ids` must name every one of the user's places exactly once.
    pub fn reorder(&mut self, session: &Session, ids: &[PlaceId]) -> Result<(), ServiceError> {
        let user = session.user()?.clone();

        let owned: HashSet<PlaceId> =
            self.data.places.iter().filter(|p| p.user_id == user).map(|p| p.id).collect();
        let requested: HashSet<PlaceId> = ids.iter().copied().collect();

        if requested.len() != ids.len() || requested != owned {
            return Err(ServiceError::Validation(
                "Order must list each saved place exactly once".to_string(),
            ));
        }

        let mut data = self.data.clone();
        for place in data.places.iter_mut().filter(|p| p.user_id == user) {
            if let Some(position) = ids.iter().position(|id| *id == place.id) {
                place.order = position;
            }
        }

        self.commit(data)?;
        tracing::info!(user = %user, count = ids.len(), "saved places reordered");

        Ok(())
    }
}

fn write_json(path: &Path, data: &StoreData) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(data).context("Failed to serialize saved places")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write places file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(store: &SavedPlaces, session: &Session) -> Vec<(String, usize)> {
        store
            .list(session)
            .expect("list")
            .into_iter()
            .map(|p| (p.name.clone(), p.order))
            .collect()
    }

    fn store_with(session: &Session, names: &[&str]) -> (SavedPlaces, Vec<PlaceId>) {
        let mut store = SavedPlaces::in_memory();
        let ids = names
            .iter()
            .map(|name| store.add(session, NewPlace::named(*name)).expect("add").id)
            .collect();
        (store, ids)
    }

    #[test]
    fn anonymous_session_is_rejected() {
        let mut store = SavedPlaces::in_memory();
        let anon = Session::anonymous();

        assert!(matches!(store.list(&anon), Err(ServiceError::Auth(_))));
        assert!(matches!(store.add(&anon, NewPlace::named("Paris")), Err(ServiceError::Auth(_))));
        assert!(matches!(store.remove(&anon, PlaceId(1)), Err(ServiceError::Auth(_))));
        assert!(matches!(store.reorder(&anon, &[]), Err(ServiceError::Auth(_))));
    }

    #[test]
    fn add_appends_with_next_order() {
        let alice = Session::for_user("alice");
        let (store, _) = store_with(&alice, &["Paris", "Tokyo", "Cairo"]);

        assert_eq!(
            orders(&store, &alice),
            vec![("Paris".into(), 0), ("Tokyo".into(), 1), ("Cairo".into(), 2)]
        );
    }

    #[test]
    fn duplicate_name_is_rejected_per_user() {
        let alice = Session::for_user("alice");
        let bob = Session::for_user("bob");
        let (mut store, _) = store_with(&alice, &["Paris"]);

        let err = store.add(&alice, NewPlace::named("Paris")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: Place already saved");

        let bobs = store.add(&bob, NewPlace::named("Paris")).expect("other user may save it");
        assert_eq!(bobs.order, 0);
    }

    #[test]
    fn blank_name_is_rejected() {
        let alice = Session::for_user("alice");
        let mut store = SavedPlaces::in_memory();
        assert!(matches!(store.add(&alice, NewPlace::named("  ")), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn remove_keeps_orders_dense() {
        let alice = Session::for_user("alice");
        let (mut store, ids) = store_with(&alice, &["A", "B", "C", "D"]);

        let removed = store.remove(&alice, ids[1]).expect("remove");
        assert_eq!(removed.name, "B");
        assert_eq!(
            orders(&store, &alice),
            vec![("A".into(), 0), ("C".into(), 1), ("D".into(), 2)]
        );
    }

    #[test]
    fn remove_of_unknown_or_foreign_place_is_not_found() {
        let alice = Session::for_user("alice");
        let bob = Session::for_user("bob");
        let (mut store, ids) = store_with(&alice, &["A"]);

        assert!(matches!(store.remove(&alice, PlaceId(999)), Err(ServiceError::NotFound(_))));
        assert!(matches!(store.remove(&bob, ids[0]), Err(ServiceError::NotFound(_))));
        assert_eq!(store.list(&alice).expect("list").len(), 1);
    }

    #[test]
    fn reorder_assigns_positions() {
        let alice = Session::for_user("alice");
        let (mut store, ids) = store_with(&alice, &["A", "B", "C"]);

        store.reorder(&alice, &[ids[2], ids[0], ids[1]]).expect("reorder");
        assert_eq!(
            orders(&store, &alice),
            vec![("C".into(), 0), ("A".into(), 1), ("B".into(), 2)]
        );
    }

    #[test]
    fn reorder_requires_a_permutation() {
        let alice = Session::for_user("alice");
        let (mut store, ids) = store_with(&alice, &["A", "B", "C"]);

        for bad in [
            vec![ids[0], ids[1]],
            vec![ids[0], ids[0], ids[1]],
            vec![ids[0], ids[1], PlaceId(999)],
            vec![ids[0], ids[1], ids[2], PlaceId(999)],
        ] {
            let err = store.reorder(&alice, &bad).unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{bad:?}");
        }

        assert_eq!(
            orders(&store, &alice),
            vec![("A".into(), 0), ("B".into(), 1), ("C".into(), 2)]
        );
    }

    #[test]
    fn file_store_survives_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data").join("places.json");
        let alice = Session::for_user("alice");

        {
            let mut store = SavedPlaces::load(&path).expect("load empty");
            store.add(&alice, NewPlace::named("Paris")).expect("add");
            let tokyo = store.add(&alice, NewPlace::named("Tokyo")).expect("add");
            store.add(&alice, NewPlace::named("Cairo")).expect("add");
            store.remove(&alice, tokyo.id).expect("remove");
        }

        let mut store = SavedPlaces::load(&path).expect("reload");
        assert_eq!(orders(&store, &alice), vec![("Paris".into(), 0), ("Cairo".into(), 1)]);

        // ids keep increasing after a reload
        let next = store.add(&alice, NewPlace::named("Oslo")).expect("add");
        assert_eq!(next.id, PlaceId(4));
        assert_eq!(next.order, 2);
    }

    #[test]
    fn failed_write_leaves_the_store_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let alice = Session::for_user("alice");
        let (mut store, ids) = store_with(&alice, &["A", "B", "C"]);
        let before = orders(&store, &alice);

        // a regular file where the data directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").expect("write");
        store.path = Some(blocker.join("places.json"));

        let err = store.add(&alice, NewPlace::named("D")).unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(matches!(store.remove(&alice, ids[0]), Err(ServiceError::Server(_))));
        assert!(matches!(
            store.reorder(&alice, &[ids[2], ids[1], ids[0]]),
            Err(ServiceError::Server(_))
        ));

        assert_eq!(orders(&store, &alice), before);
        assert_eq!(store.data.next_id, 3);
    }

    #[test]
    fn corrupt_file_fails_to_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("places.json");
        fs::write(&path, "not json").expect("write");

        let err = SavedPlaces::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse places file"));
    }
}
