//! Integration tests for the image store.

mod common;

use assert_matches::assert_matches;
use common::{mean_channel_delta, solid_rgb, solid_rgba, TestHarness};
use pixvault::store::{validate_id, StoreError};

#[test]
fn round_trip_is_visually_equivalent() {
    let h = TestHarness::new();
    let original = solid_rgb(100, 100, [200, 30, 30]);

    h.store.put("cat1", &original).unwrap();
    let restored = h.store.get("cat1").unwrap().expect("cat1 should be stored");

    assert_eq!(restored.width(), 100);
    assert_eq!(restored.height(), 100);
    let delta = mean_channel_delta(&original, &restored);
    assert!(delta < 3.0, "lossy round trip drifted too far: {delta}");
}

#[test]
fn saving_the_same_image_twice_is_idempotent() {
    let h = TestHarness::new();
    let img = solid_rgb(64, 48, [10, 200, 120]);

    h.store.put("pic", &img).unwrap();
    let first = std::fs::read(h.store.entry_path("pic").unwrap()).unwrap();
    h.store.put("pic", &img).unwrap();
    let second = std::fs::read(h.store.entry_path("pic").unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn overwrite_is_last_write_wins() {
    let h = TestHarness::new();
    h.store
        .put("slot", &solid_rgb(50, 50, [255, 0, 0]))
        .unwrap();
    h.store
        .put("slot", &solid_rgb(50, 50, [0, 0, 255]))
        .unwrap();

    let restored = h.store.get("slot").unwrap().unwrap().to_rgb8();
    let pixel = restored.get_pixel(25, 25);
    assert!(
        pixel.0[2] > 200 && pixel.0[0] < 60,
        "expected blue after overwrite, got {:?}",
        pixel
    );

    let entries = h.store.list().unwrap();
    assert_eq!(entries.len(), 1, "overwrite must not add a second record");
}

#[test]
fn get_on_missing_id_is_none_not_error() {
    let h = TestHarness::new();
    assert_matches!(h.store.get("missing"), Ok(None));
}

#[test]
fn empty_id_is_rejected_before_any_write() {
    let h = TestHarness::new();
    let img = solid_rgb(10, 10, [1, 2, 3]);

    assert_matches!(h.store.put("", &img), Err(StoreError::EmptyId));
    assert!(
        !h.vault_dir().exists(),
        "rejected id must not create the vault directory"
    );
}

#[test]
fn path_escaping_ids_are_rejected() {
    let h = TestHarness::new();
    let img = solid_rgb(10, 10, [1, 2, 3]);

    for id in [".", "..", "a/b", "a\\b", "nul\0byte"] {
        assert_matches!(
            h.store.put(id, &img),
            Err(StoreError::InvalidId { .. }),
            "id {:?} should be rejected",
            id
        );
    }
    assert!(!h.vault_dir().exists());
}

#[test]
fn corrupt_entry_is_a_decode_error() {
    let h = TestHarness::new();
    h.store.put("ok", &solid_rgb(8, 8, [9, 9, 9])).unwrap();
    std::fs::write(h.vault_dir().join("bad"), b"not an image at all").unwrap();

    assert_matches!(h.store.get("bad"), Err(StoreError::Decode { .. }));
    // Still distinct from a record that simply is not there.
    assert_matches!(h.store.get("gone"), Ok(None));
}

#[test]
fn truncated_jpeg_is_a_decode_error() {
    let h = TestHarness::new();
    h.store.put("photo", &solid_rgb(32, 32, [80, 80, 80])).unwrap();

    let path = h.store.entry_path("photo").unwrap();
    let data = std::fs::read(&path).unwrap();
    std::fs::write(&path, &data[..20]).unwrap();

    assert_matches!(h.store.get("photo"), Err(StoreError::Decode { .. }));
}

#[test]
fn alpha_sources_are_flattened() {
    let h = TestHarness::new();
    let rgba = solid_rgba(20, 20, [0, 255, 0, 128]);

    h.store.put("greenish", &rgba).unwrap();
    let restored = h.store.get("greenish").unwrap().unwrap();
    assert!(!restored.color().has_alpha());
}

#[test]
fn saved_red_square_retrieves_red() {
    let h = TestHarness::new();
    h.store
        .put("cat1", &solid_rgb(100, 100, [255, 0, 0]))
        .unwrap();

    let restored = h.store.get("cat1").unwrap().unwrap().to_rgb8();
    let center = restored.get_pixel(50, 50);
    assert!(center.0[0] > 200, "red channel too low: {:?}", center);
    assert!(
        center.0[1] < 60 && center.0[2] < 60,
        "not visually red: {:?}",
        center
    );
}

#[test]
fn list_reflects_store_contents() {
    let h = TestHarness::new();
    assert!(h.store.list().unwrap().is_empty());

    h.store.put("b-side", &solid_rgb(4, 4, [0, 0, 0])).unwrap();
    h.store
        .put("a-side", &solid_rgb(6, 2, [255, 255, 255]))
        .unwrap();

    let entries = h.store.list().unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["a-side", "b-side"]);
    assert!(entries.iter().all(|e| e.bytes > 0));
    assert!(entries.iter().all(|e| e.modified.is_some()));
}

#[test]
fn lower_quality_still_round_trips() {
    let h = TestHarness::with_quality(40);
    let original = solid_rgb(30, 30, [120, 60, 180]);

    h.store.put("rough", &original).unwrap();
    let restored = h.store.get("rough").unwrap().unwrap();
    let delta = mean_channel_delta(&original, &restored);
    assert!(delta < 12.0, "quality 40 drifted too far: {delta}");
}

#[test]
fn contains_and_entry_path_validate_ids() {
    let h = TestHarness::new();

    assert!(!h.store.contains("nope").unwrap());
    assert_matches!(h.store.contains(""), Err(StoreError::EmptyId));
    assert_matches!(h.store.entry_path("a/b"), Err(StoreError::InvalidId { .. }));
    assert_matches!(validate_id("fine-id.jpg"), Ok(()));
}
