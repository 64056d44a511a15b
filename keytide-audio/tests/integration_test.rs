use keytide::{
    mapping::{AudioMapper, AudioMapping},
    sink::DummyVisualSink,
    AudioUpdate, Config, Orchestrator,
};
use keytide_audio::{AudioError, Synth};

const RATE: u32 = 16_000;

fn rms_after(update: AudioUpdate, seconds: usize) -> f32 {
    let mut synth = Synth::with_seed(RATE, 99);
    synth.set_params(&update);

    let mut buffer = vec![0.; RATE as usize * seconds];
    synth.render(&mut buffer, 1);

    let tail = &buffer[buffer.len() / 2..];
    (tail.iter().map(|s| s * s).sum::<f32>() / tail.len() as f32).sqrt()
}

#[test]
fn slow_typing_is_louder() {
    let mut mapper = AudioMapper::new(AudioMapping::default());
    let fast = mapper.map(Some(80.)).unwrap();

    mapper.reset();
    let slow = mapper.map(Some(500.)).unwrap();

    assert!(rms_after(fast, 4) < rms_after(slow, 4));
}

#[test]
fn rejected_files_are_reported() {
    let mut synth = Synth::new(RATE);
    let err = synth.load_source(&[0; 64]).unwrap_err();

    assert!(matches!(err, AudioError::Decode(_)));
    assert!(matches!(
        keytide::Error::from(err),
        keytide::Error::UnsupportedSource(_)
    ));
}

#[test]
fn works_as_orchestrator_output() {
    // the synth as a sink without a device
    struct Offline(Synth, bool);

    impl keytide::sink::AudioSink for Offline {
        fn start(&mut self) -> Result<(), keytide::Error> {
            self.1 = true;
            Ok(())
        }

        fn stop(&mut self) {
            self.1 = false;
        }

        fn is_running(&self) -> bool {
            self.1
        }

        fn set_params(&mut self, update: &AudioUpdate) {
            self.0.set_params(update);
        }

        fn set_visibility_gain(&mut self, scalar: f32) {
            self.0.set_visibility_gain(scalar);
        }

        fn reset_source(&mut self) {
            self.0.reset_source();
        }

        fn load_source(&mut self, bytes: &[u8]) -> Result<(), keytide::Error> {
            self.0.load_source(bytes)?;
            Ok(())
        }
    }

    let mut orchestrator = Orchestrator::new(
        Config::default(),
        Offline(Synth::with_seed(RATE, 3), false),
        DummyVisualSink::new(),
    )
    .unwrap();
    orchestrator.start().unwrap();

    for ts in [0., 500., 1000.] {
        orchestrator.on_key_event(ts);
    }

    let Offline(synth, _) = orchestrator.audio_sink();
    assert_eq!(synth.targets().gain, 0.28);
    assert_eq!(synth.targets().cutoff_hz, 2200.);

    assert!(matches!(
        orchestrator.user_file_selected(b"nope"),
        Err(keytide::Error::UnsupportedSource(_))
    ));
}
