//! Integration tests for the equalizer graph and preset store
//!
//! These tests exercise the control surface end to end through the public API.

use std::sync::{Arc, Mutex, Once};
use tonearm_audio::{
    ActivePreset, AudioEffect, EqualizerGraph, Preset, PresetError, PresetSink, PresetStore, BAND_COUNT,
};

// ===== Test Helpers =====

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

fn graph() -> EqualizerGraph {
    init_tracing();
    EqualizerGraph::default()
}

#[derive(Clone, Default)]
struct MemorySink {
    stored: Arc<Mutex<Vec<Preset>>>,
}

impl PresetSink for MemorySink {
    fn store(&self, presets: &[Preset]) {
        *self.stored.lock().unwrap() = presets.to_vec();
    }
}

// ===== Band Control =====

#[test]
fn test_starts_flat() {
    let eq = graph();
    assert_eq!(eq.get_bands(), [0.0; BAND_COUNT]);
    assert_eq!(eq.active_preset(), ActivePreset::Named("flat".to_string()));
}

#[test]
fn test_set_band_clamps() {
    let mut eq = graph();

    eq.set_band(2, 15.0);
    assert_eq!(eq.get_bands()[2], 12.0);

    eq.set_band(0, -40.0);
    assert_eq!(eq.get_bands()[0], -12.0);
}

#[test]
fn test_set_band_out_of_range_is_noop() {
    let mut eq = graph();
    eq.apply_preset("jazz");
    let before = eq.get_bands();

    eq.set_band(7, 3.0);
    eq.set_band(BAND_COUNT, 3.0);
    assert_eq!(eq.get_bands(), before);
}

#[test]
fn test_get_bands_returns_exact_values() {
    let mut eq = graph();
    eq.set_bands(&[1.5, -0.5, 3.0, -7.5, 0.0, 11.5]);
    assert_eq!(eq.get_bands(), [1.5, -0.5, 3.0, -7.5, 0.0, 11.5]);
}

#[test]
fn test_set_bands_ignores_extra_values() {
    let mut eq = graph();
    eq.set_bands(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 9.0, 9.0]);
    assert_eq!(eq.get_bands(), [1.0; BAND_COUNT]);
}

#[test]
fn test_reset_flattens() {
    let mut eq = graph();
    eq.apply_preset("classical");
    eq.set_band(5, -6.0);

    eq.reset();
    assert_eq!(eq.get_bands(), [0.0; BAND_COUNT]);
    assert_eq!(eq.active_preset().name(), "flat");
}

// ===== Presets =====

#[test]
fn test_apply_builtin_presets() {
    let mut eq = graph();

    assert!(eq.apply_preset("rock"));
    assert_eq!(eq.get_bands(), [4.0, 2.0, -2.0, -2.0, 2.0, 4.0]);

    assert!(eq.apply_preset("pop"));
    assert_eq!(eq.get_bands(), [0.0, 2.0, 4.0, 2.0, 0.0, -2.0]);

    assert!(eq.apply_preset("jazz"));
    assert_eq!(eq.get_bands(), [3.0, 2.0, 0.0, 2.0, 3.0, 4.0]);

    assert!(eq.apply_preset("classical"));
    assert_eq!(eq.get_bands(), [0.0, 0.0, 2.0, 4.0, 2.0, 0.0]);
    assert_eq!(eq.active_preset().name(), "classical");
}

#[test]
fn test_unknown_preset_is_ignored() {
    let mut eq = graph();
    eq.apply_preset("rock");

    assert!(!eq.apply_preset("does-not-exist"));
    assert!(!eq.apply_preset("Rock"));
    assert_eq!(eq.get_bands(), [4.0, 2.0, -2.0, -2.0, 2.0, 4.0]);
    assert_eq!(eq.active_preset().name(), "rock");
}

#[test]
fn test_manual_edit_becomes_custom() {
    let mut eq = graph();
    eq.apply_preset("rock");
    eq.set_band(3, 1.0);
    assert_eq!(eq.active_preset(), ActivePreset::Custom);

    // Editing back to the preset's values makes it active again
    eq.set_band(3, -2.0);
    assert_eq!(eq.active_preset().name(), "rock");
}

#[test]
fn test_builtin_names_cannot_be_saved() {
    let mut eq = graph();
    assert_eq!(
        eq.save_user_preset("pop"),
        Err(PresetError::NameConflict("pop".to_string()))
    );
    assert!(eq.presets().user_presets().is_empty());
}

#[test]
fn test_save_then_delete_user_preset() {
    let mut eq = graph();
    eq.set_bands(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    eq.save_user_preset("MyMix").unwrap();
    let names: Vec<&str> = eq.presets().user_names().collect();
    assert_eq!(names, vec!["MyMix"]);
    assert_eq!(eq.active_preset().name(), "MyMix");

    assert_eq!(
        eq.save_user_preset("MyMix"),
        Err(PresetError::NameConflict("MyMix".to_string()))
    );

    assert!(eq.delete_user_preset("MyMix"));
    assert!(eq.presets().user_presets().is_empty());
}

#[test]
fn test_user_preset_round_trip() {
    let mut eq = graph();
    eq.set_bands(&[-3.0, 0.5, 0.0, 2.5, -1.0, 7.0]);
    eq.save_user_preset("Evening").unwrap();

    eq.reset();
    assert!(eq.apply_preset("Evening"));
    assert_eq!(eq.get_bands(), [-3.0, 0.5, 0.0, 2.5, -1.0, 7.0]);
}

#[test]
fn test_deleting_active_preset_falls_back_to_flat() {
    let mut eq = graph();
    eq.set_bands(&[5.0; BAND_COUNT]);
    eq.save_user_preset("Loud").unwrap();
    assert_eq!(eq.active_preset().name(), "Loud");

    assert!(eq.delete_user_preset("Loud"));
    assert_eq!(eq.get_bands(), [0.0; BAND_COUNT]);
    assert_eq!(eq.active_preset().name(), "flat");
}

#[test]
fn test_delete_trims_name() {
    let mut eq = graph();
    eq.set_bands(&[3.0; BAND_COUNT]);
    eq.save_user_preset(" Mix ").unwrap();
    assert_eq!(eq.active_preset().name(), "Mix");

    assert!(eq.delete_user_preset(" Mix "));
    assert!(eq.presets().user_presets().is_empty());
    assert_eq!(eq.get_bands(), [0.0; BAND_COUNT]);
}

#[test]
fn test_deleting_inactive_preset_keeps_gains() {
    let mut eq = graph();
    eq.set_bands(&[5.0; BAND_COUNT]);
    eq.save_user_preset("Loud").unwrap();

    eq.apply_preset("rock");
    assert!(eq.delete_user_preset("Loud"));
    assert_eq!(eq.get_bands(), [4.0, 2.0, -2.0, -2.0, 2.0, 4.0]);
}

#[test]
fn test_builtin_presets_cannot_be_deleted() {
    let mut eq = graph();
    eq.apply_preset("rock");
    assert!(!eq.delete_user_preset("rock"));
    assert_eq!(eq.active_preset().name(), "rock");
}

#[test]
fn test_sink_receives_user_presets() {
    init_tracing();
    let sink = MemorySink::default();
    let mut eq = EqualizerGraph::new(PresetStore::new().with_sink(Box::new(sink.clone())));

    eq.set_bands(&[2.0; BAND_COUNT]);
    eq.save_user_preset("  Padded  ").unwrap();

    let stored = sink.stored.lock().unwrap().clone();
    assert_eq!(stored, vec![Preset::new("Padded", [2.0; BAND_COUNT])]);
}

#[test]
fn test_reloading_user_presets() {
    let mut eq = graph();
    eq.set_bands(&[1.0; BAND_COUNT]);
    eq.save_user_preset("Old").unwrap();

    eq.load_user_presets(vec![Preset::new("New", [3.0; BAND_COUNT])]);
    let names: Vec<&str> = eq.presets().user_names().collect();
    assert_eq!(names, vec!["New"]);
    assert_eq!(eq.active_preset(), ActivePreset::Custom);

    assert!(eq.apply_preset("New"));
    assert_eq!(eq.get_bands(), [3.0; BAND_COUNT]);
}

// ===== Processing =====

#[test]
fn test_processor_follows_graph() {
    let mut eq = graph();
    let mut processor = eq.processor();
    let mut buffer = vec![0.0f32; 128];

    eq.apply_preset("rock");
    processor.process(&mut buffer, 44100);
    assert_eq!(processor.applied_gains(), [4.0, 2.0, -2.0, -2.0, 2.0, 4.0]);

    eq.reset();
    processor.process(&mut buffer, 44100);
    assert_eq!(processor.applied_gains(), [0.0; BAND_COUNT]);
    assert_eq!(processor.name(), "Equalizer");
}

#[test]
fn test_boost_raises_level() {
    let mut eq = graph();
    let mut processor = eq.processor();
    eq.set_band(3, 12.0);

    let sample_rate = 48000;
    let mut buffer: Vec<f32> = (0..sample_rate)
        .flat_map(|i| {
            let t = i as f32 / sample_rate as f32;
            let s = 0.1 * (2.0 * std::f32::consts::PI * 1000.0 * t).sin();
            [s, s]
        })
        .collect();
    processor.process(&mut buffer, sample_rate as u32);

    // Peak over the settled second half
    let peak = buffer[buffer.len() / 2..]
        .iter()
        .fold(0.0f32, |acc, &s| acc.max(s.abs()));
    assert!(peak > 0.3, "peak {} should be boosted ~4x", peak);
    assert!(buffer.iter().all(|s| s.is_finite()));
}
