use super::*;
use crate::audio::backend::{BackendOp, MemoryBackend};

fn mixer() -> (LayerMixer<MemoryBackend>, MemoryBackend) {
    let backend = MemoryBackend::new();
    (LayerMixer::new(backend.clone(), FadeDefaults::default()), backend)
}

fn bgm(src: &str) -> EventSet {
    EventSet {
        bgm: vec![SoundEvent::new(src)],
        ..EventSet::default()
    }
}

fn sfx(event: SoundEvent) -> EventSet {
    EventSet {
        sfx: vec![event],
        ..EventSet::default()
    }
}

fn plays(backend: &MemoryBackend) -> usize {
    backend
        .log()
        .iter()
        .filter(|op| matches!(op, BackendOp::Play { .. }))
        .count()
}

#[test]
fn layer_defaults_and_overrides() {
    let d = FadeDefaults::default();
    assert_eq!(d.for_layer(LayerKind::Background), FadeSpec::both(500.0));
    assert_eq!(d.resolve(LayerKind::Effect, &SoundEvent::new("a")), FadeSpec::both(200.0));
    assert_eq!(d.for_layer(LayerKind::Speech), FadeSpec::both(100.0));

    let ev = SoundEvent {
        fade_in: Some(50.0),
        ..SoundEvent::new("a")
    };
    assert_eq!(
        d.resolve(LayerKind::Effect, &ev),
        FadeSpec {
            fade_in: 50.0,
            fade_out: 200.0
        }
    );
}

#[test]
fn resolved_cue_fills_layer_defaults() {
    let fades = FadeDefaults::default();
    let cue = ResolvedCue::new(LayerKind::Background, &SoundEvent::new("t.mp3"), &fades);
    assert_eq!(cue.key.as_str(), "bgm-t.mp3");
    assert!(cue.looped);
    assert_eq!(cue.volume, 1.0);
    assert_eq!(cue.delay_ms, 0.0);
    assert!(!cue.restart);

    let cue = ResolvedCue::new(LayerKind::Speech, &SoundEvent::new("line.ogg"), &fades);
    assert!(!cue.looped);
}

#[test]
fn delayed_start_then_linear_fade_in() {
    let (mut m, backend) = mixer();
    m.apply_panel(
        0,
        &sfx(SoundEvent {
            delay: Some(100.0),
            ..SoundEvent::new("hit.wav")
        }),
    );
    assert!(m.is_active(LayerKind::Effect, "sfx-hit.wav"));
    assert_eq!(m.pending_timers(), 1);

    m.tick(50.0);
    assert!(backend.playing("sfx-hit.wav").is_empty());
    m.tick(50.0);
    let playing = backend.playing("sfx-hit.wav");
    assert_eq!(playing.len(), 1);
    assert_eq!(playing[0].volume, 0.0);

    m.tick(100.0);
    assert!((backend.playing("sfx-hit.wav")[0].volume - 0.5).abs() < 1e-9);
    m.tick(100.0);
    assert_eq!(backend.playing("sfx-hit.wav")[0].volume, 1.0);
}

#[test]
fn restart_replaces_the_instance() {
    let (mut m, backend) = mixer();
    let ev = SoundEvent {
        restart: Some(true),
        ..SoundEvent::new("hit.wav")
    };
    m.apply_panel(0, &sfx(ev.clone()));
    m.tick(0.0);
    m.tick(200.0);

    m.apply_panel(1, &sfx(ev));
    assert_eq!(m.active_keys(LayerKind::Effect).len(), 1);
    assert_eq!(m.releasing_count(), 1);
    m.tick(0.0);
    m.tick(200.0);

    assert_eq!(m.releasing_count(), 0);
    assert_eq!(backend.playing("sfx-hit.wav").len(), 1);
    let instances = backend.instances();
    assert_eq!(instances.len(), 2);
    assert!(instances[0].stopped);
    assert!(instances[1].playing);
}

#[test]
fn effect_without_restart_is_left_alone() {
    let (mut m, backend) = mixer();
    m.apply_panel(0, &sfx(SoundEvent::new("rain.wav")));
    m.tick(0.0);
    m.apply_panel(1, &sfx(SoundEvent::new("rain.wav")));
    m.tick(0.0);
    assert_eq!(backend.instances().len(), 1);
    assert_eq!(plays(&backend), 1);
}

#[test]
fn background_carries_forward_and_is_recorded() {
    let (mut m, backend) = mixer();
    m.apply_panel(0, &bgm("x.mp3"));
    m.tick(0.0);
    m.apply_panel(1, &EventSet::default());
    assert!(m.is_active(LayerKind::Background, "bgm-x.mp3"));
    assert_eq!(m.recorded_background(1), Some(&[SoundEvent::new("x.mp3")][..]));

    m.apply_panel(0, &EventSet::default());
    assert!(m.is_active(LayerKind::Background, "bgm-x.mp3"));
    assert_eq!(backend.instances().len(), 1);
}

#[test]
fn moving_back_to_an_unvisited_panel_silences_background() {
    let (mut m, _backend) = mixer();
    m.apply_panel(0, &bgm("x.mp3"));
    m.apply_panel(2, &bgm("y.mp3"));
    m.apply_panel(1, &EventSet::default());
    assert!(m.active_keys(LayerKind::Background).is_empty());
    assert_eq!(m.recorded_background(1), Some(&[][..]));
}

#[test]
fn background_volume_change_cross_fades_same_instance() {
    let (mut m, backend) = mixer();
    m.apply_panel(0, &bgm("x.mp3"));
    m.tick(0.0);
    m.tick(500.0);
    assert_eq!(backend.playing("bgm-x.mp3")[0].volume, 1.0);

    let quieter = EventSet {
        bgm: vec![SoundEvent {
            volume: Some(0.5),
            ..SoundEvent::new("x.mp3")
        }],
        ..EventSet::default()
    };
    m.apply_panel(1, &quieter);
    m.tick(250.0);
    assert!((backend.playing("bgm-x.mp3")[0].volume - 0.75).abs() < 1e-9);
    m.tick(250.0);
    assert_eq!(backend.playing("bgm-x.mp3")[0].volume, 0.5);
    assert_eq!(backend.instances().len(), 1);
}

#[test]
fn cancelled_delayed_start_never_plays() {
    let (mut m, backend) = mixer();
    m.apply_panel(
        0,
        &sfx(SoundEvent {
            delay: Some(500.0),
            ..SoundEvent::new("late.wav")
        }),
    );
    m.tick(100.0);
    m.apply_panel(1, &EventSet::default());
    assert_eq!(m.pending_timers(), 0);
    assert!(m.active_keys(LayerKind::Effect).is_empty());
    assert_eq!(m.releasing_count(), 0);

    m.tick(1000.0);
    assert_eq!(plays(&backend), 0);
}

#[test]
fn missing_asset_is_reported_and_released() {
    let backend = MemoryBackend::with_missing([SoundKey::new(LayerKind::Speech, "gone.ogg")]);
    let mut m = LayerMixer::new(backend, FadeDefaults::default());
    m.apply_panel(
        0,
        &EventSet {
            tts: vec![SoundEvent::new("gone.ogg")],
            ..EventSet::default()
        },
    );
    m.tick(0.0);

    let faults = m.take_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].key.as_str(), "tts-gone.ogg");
    assert!(matches!(faults[0].error, PanelflowError::Audio(_)));
    assert!(m.active_keys(LayerKind::Speech).is_empty());
    assert!(m.take_faults().is_empty());
}

#[test]
fn duration_schedules_a_fading_stop() {
    let (mut m, backend) = mixer();
    m.apply_panel(
        0,
        &sfx(SoundEvent {
            duration: Some(300.0),
            fade_out: Some(100.0),
            ..SoundEvent::new("door.wav")
        }),
    );
    m.tick(0.0);
    assert_eq!(m.pending_timers(), 1);
    m.tick(300.0);
    assert!(m.active_keys(LayerKind::Effect).is_empty());
    assert_eq!(m.releasing_count(), 1);
    assert_eq!(backend.playing("sfx-door.wav").len(), 1);
    m.tick(100.0);
    assert!(backend.playing("sfx-door.wav").is_empty());
}

#[test]
fn dispose_stops_everything_and_ignores_later_calls() {
    let (mut m, backend) = mixer();
    m.apply_panel(0, &bgm("x.mp3"));
    m.tick(0.0);
    m.apply_panel(1, &bgm("y.mp3"));
    m.tick(0.0);
    assert_eq!(m.releasing_count(), 1);

    m.dispose();
    assert!(!m.is_alive());
    assert!(backend.instances().iter().all(|i| !i.playing));
    assert_eq!(m.pending_timers(), 0);

    let before = backend.log().len();
    m.apply_panel(2, &bgm("z.mp3"));
    m.tick(1000.0);
    m.dispose();
    assert_eq!(backend.log().len(), before);
}

#[test]
fn zero_duration_means_no_scheduled_stop() {
    let (mut m, backend) = mixer();
    m.apply_panel(
        0,
        &sfx(SoundEvent {
            duration: Some(0.0),
            ..SoundEvent::new("wind.wav")
        }),
    );
    for _ in 0..100 {
        m.tick(16.0);
    }

    assert_eq!(m.pending_timers(), 0);
    assert!(m.is_active(LayerKind::Effect, "sfx-wind.wav"));
    let playing = backend.playing("sfx-wind.wav");
    assert_eq!(playing.len(), 1);
    assert_eq!(playing[0].volume, 1.0);
    assert!(
        !backend
            .log()
            .iter()
            .any(|op| matches!(op, BackendOp::Stop { .. }))
    );
}
