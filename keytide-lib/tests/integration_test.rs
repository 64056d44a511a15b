use std::{thread, time::Duration};

use keytide::{
    clock::Clock,
    sink::{AudioSink, DummyAudioSink, DummyVisualSink},
    source::{DummyKeySource, HookSource},
    AudioParams, Config, LifecycleState, Orchestrator, Visibility,
};

fn orchestrator() -> Orchestrator<DummyAudioSink, DummyVisualSink> {
    Orchestrator::new(Config::default(), DummyAudioSink::new(), DummyVisualSink::new()).unwrap()
}

#[test]
fn general() {
    let mut orchestrator = orchestrator();
    orchestrator.start().unwrap();

    let mut source = DummyKeySource::new((0..20).map(|i| i as f64 * 80.));
    orchestrator.pump(&mut source);

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.last_iki_ms, Some(80.));
    assert!(snapshot.wpm_10s > 0.);

    let update = orchestrator.audio_sink().last_update().unwrap();
    assert_eq!(update.gain.target, 0.18);
    assert_eq!(update.cutoff_hz.target, 800.);
    assert_eq!(update.breath_hz, 0.07);

    let visual = orchestrator.visual_sink().last_params().unwrap();
    assert_eq!(visual.detail, 0.6);
    assert_eq!(visual.saturation, 0.6);
}

#[test]
fn everything_stays_within_safety_ranges() {
    let mut orchestrator = orchestrator();
    orchestrator.start().unwrap();

    let ikis = [0., 3., 10_000., 80., 1., 499., 501., 250.];

    let mut ts = 0.;
    for (i, iki) in ikis.iter().cycle().take(64).enumerate() {
        ts += iki;
        orchestrator.intensity_changed((i % 5) as f32 / 4.);
        orchestrator.on_key_event(ts);

        if let Some(update) = orchestrator.audio_sink().last_update() {
            assert!(update.params().is_safe());
        }

        if let Some(visual) = orchestrator.visual_sink().last_params() {
            for value in [visual.speed, visual.detail, visual.saturation] {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}

#[test]
fn hidden_and_back() {
    let mut orchestrator = orchestrator();
    orchestrator.start().unwrap();
    orchestrator.on_key_event(0.);
    orchestrator.on_key_event(500.);

    orchestrator.set_visibility(Visibility::Hidden);
    orchestrator.on_key_event(1000.);

    let sink = orchestrator.audio_sink();
    assert_eq!(sink.visibility_gain(), 0.5);
    assert_eq!(sink.last_update().unwrap().gain.target, 0.28);

    orchestrator.set_visibility(Visibility::Visible);
    assert_eq!(orchestrator.audio_sink().visibility_gain(), 1.);
}

#[test]
fn zero_intensity_ignores_typing() {
    let mut orchestrator = orchestrator();
    orchestrator.start().unwrap();
    orchestrator.intensity_changed(0.);

    for ts in [0., 50., 900., 1000.] {
        orchestrator.on_key_event(ts);
        if let Some(update) = orchestrator.audio_sink().last_update() {
            assert_eq!(update.params(), AudioParams::BASELINE);
        }
    }
}

#[test]
fn hook_thread_drives_orchestrator() {
    let clock = Clock::new();
    let (mut source, handle) = HookSource::new(clock);

    let mut orchestrator = orchestrator();
    orchestrator.start().unwrap();

    thread::spawn(move || {
        for _ in 0..3 {
            handle.key_down();
            thread::sleep(Duration::from_millis(40));
        }
    })
    .join()
    .unwrap();

    orchestrator.pump(&mut source);

    let snapshot = orchestrator.snapshot();
    assert!(snapshot.last_iki_ms.unwrap() >= 39.);
    assert!(orchestrator.visual_sink().last_params().is_some());
}

#[test]
fn stop_and_restart() {
    let mut orchestrator = orchestrator();
    orchestrator.start().unwrap();
    orchestrator.on_key_event(0.);
    orchestrator.on_key_event(100.);

    orchestrator.stop();
    assert_eq!(orchestrator.state(), LifecycleState::Stopped);
    assert!(!orchestrator.audio_sink().is_running());

    orchestrator.start().unwrap();
    assert!(orchestrator.audio_sink().is_running());
    assert_eq!(orchestrator.snapshot().last_key_at, None);
}
