//! Registry generation and its on-disk form.

use kiosk_core::{
    config::GeneratorConfig,
    engine::KioskPipeline,
    registry::RegistryGenerator,
    rng::{RngBank, StreamSlot},
    store::{DirStore, KioskStore, METADATA_FILE, USER_PIN_FILE},
};
use std::collections::HashSet;

#[test]
fn user_ids_and_pins_have_the_documented_shape() {
    let config = GeneratorConfig::default();
    let mut rng = RngBank::new(11).for_stream(StreamSlot::Registry);
    let registries = RegistryGenerator::new(&config).generate(&mut rng);

    for reg in &registries {
        for user in &reg.users {
            assert_eq!(user.user_id.len(), 9, "{}", user.user_id);
            assert!(user.user_id.starts_with("708"));
            assert!(user.user_id.bytes().all(|b| b.is_ascii_digit()));
            assert_eq!(user.pin.len(), 4, "{}", user.pin);
            assert!(user.pin.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}

#[test]
fn kiosks_are_distinct_sorted_and_sized_within_config() {
    let config = GeneratorConfig::default();
    let mut rng = RngBank::new(12).for_stream(StreamSlot::Registry);
    let registries = RegistryGenerator::new(&config).generate(&mut rng);

    assert_eq!(registries.len(), config.kiosk_count);
    let ids: Vec<&str> = registries.iter().map(|r| r.kiosk_id()).collect();
    let distinct: HashSet<&&str> = ids.iter().collect();
    assert_eq!(distinct.len(), ids.len(), "duplicate kiosk IDs: {ids:?}");
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "not sorted: {ids:?}");
    assert!(ids.iter().all(|id| id.len() == 4));

    for reg in &registries {
        assert!((4..=6).contains(&reg.kiosk.num_clients));
        assert!((50..=100).contains(&reg.users.len()));
        let user_ids: Vec<&str> = reg.users.iter().map(|u| u.user_id.as_str()).collect();
        assert!(user_ids.windows(2).all(|w| w[0] < w[1]), "users not sorted and unique");
    }
}

#[test]
fn every_kiosk_id_is_used_when_the_space_is_full() {
    let config = GeneratorConfig {
        kiosk_count: 10_000,
        min_users_per_kiosk: 0,
        max_users_per_kiosk: 0,
        ..GeneratorConfig::default()
    };
    let mut rng = RngBank::new(13).for_stream(StreamSlot::Registry);
    let ids = RegistryGenerator::new(&config).generate_kiosk_ids(&mut rng);
    assert_eq!(ids.first().map(String::as_str), Some("0000"));
    assert_eq!(ids.last().map(String::as_str), Some("9999"));
}

#[test]
fn registry_files_round_trip_through_the_directory_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = KioskPipeline::new(
        GeneratorConfig::default_test(),
        DirStore::open(dir.path()),
        Some(21),
    )
    .unwrap();
    let written = pipeline.generate_registry().unwrap();

    let store = DirStore::open(dir.path());
    let listed = store.list_kiosks().unwrap();
    assert_eq!(listed.len(), written.len());

    for reg in &written {
        let kiosk_dir = store.kiosk_dir(reg.kiosk_id());
        let meta = std::fs::read_to_string(kiosk_dir.join(METADATA_FILE)).unwrap();
        assert_eq!(
            meta,
            format!("Kiosk_ID,Num_Clients\n{},{}\n", reg.kiosk_id(), reg.kiosk.num_clients)
        );
        let users = std::fs::read_to_string(kiosk_dir.join(USER_PIN_FILE)).unwrap();
        assert!(users.starts_with("User_ID,PIN\n"));
        assert_eq!(users.lines().count(), reg.users.len() + 1);

        assert_eq!(&store.load_registry(reg.kiosk_id()).unwrap(), reg);
    }
}

#[test]
fn regenerating_the_registry_is_safe() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::default_test();

    let mut first = KioskPipeline::new(config.clone(), DirStore::open(dir.path()), Some(1)).unwrap();
    first.generate_registry().unwrap();
    let mut second = KioskPipeline::new(config, DirStore::open(dir.path()), Some(1)).unwrap();
    let again = second.generate_registry().unwrap();

    let store = DirStore::open(dir.path());
    for reg in &again {
        assert_eq!(&store.load_registry(reg.kiosk_id()).unwrap(), reg);
    }
}
