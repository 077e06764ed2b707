//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::sync::Arc;

use shelterdash_core::prelude::AnimalRecord;
use shelterdash_io::memory_store::MemoryCollection;
use shelterdash_io::RecordStore;

pub fn dog(name: &str, breed: &str, sex: &str, age_weeks: f64) -> AnimalRecord {
    AnimalRecord {
        name: Some(name.into()),
        animal_type: Some("Dog".into()),
        breed: Some(breed.into()),
        sex_upon_outcome: Some(sex.into()),
        age_upon_outcome_in_weeks: Some(age_weeks),
        location_lat: Some(30.3),
        location_long: Some(-97.7),
        ..Default::default()
    }
}

/// A small shelter: one match per rescue category plus near misses.
pub fn shelter() -> Vec<AnimalRecord> {
    vec![
        dog("Nessie", "Newfoundland", "Intact Female", 52.0),
        dog("Lab", "Labrador Retriever Mix", "Spayed Female", 52.0),
        dog("Shep", "German Shepherd", "Intact Male", 60.0),
        dog("Fifi", "Poodle", "Intact Male", 60.0),
        dog("Hound", "Bloodhound", "Intact Male", 250.0),
        dog("Pup", "Siberian Husky", "Intact Male", 10.0),
    ]
}

pub fn memory_store(records: Vec<AnimalRecord>) -> RecordStore {
    RecordStore::new(Arc::new(MemoryCollection::with_records(records)))
}

/// Fresh, existing directory under the system temp dir.
pub fn temp_root(name: &str) -> String {
    let mut dir = std::env::temp_dir();
    dir.push(format!("shelterdash-it-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create temp root");
    dir.to_string_lossy().to_string()
}

pub fn names(rows: &[AnimalRecord]) -> Vec<&str> {
    rows.iter().filter_map(|r| r.name.as_deref()).collect()
}
