use polykeys::{
    AppConfig, KeyLayout, KeyboardEngine, PhysicalKeyEvent, Polysynth, Voice, VoiceEngine,
    key_frequency,
};

#[derive(Default)]
struct RecordingVoice {
    starts: usize,
    stops: usize,
    pitch: f64,
}

impl Voice for RecordingVoice {
    fn start(&mut self) {
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn pitch(&self) -> f64 {
        self.pitch
    }

    fn set_pitch(&mut self, hz: f64) {
        self.pitch = hz;
    }
}

struct RecordingEngine(Vec<RecordingVoice>);

impl VoiceEngine for RecordingEngine {
    type Voice = RecordingVoice;

    fn voices(&self) -> &[RecordingVoice] {
        &self.0
    }

    fn voices_mut(&mut self) -> &mut [RecordingVoice] {
        &mut self.0
    }
}

fn recording_keyboard() -> KeyboardEngine<RecordingEngine> {
    let config = AppConfig::default();
    let layout = KeyLayout::from_config(&config.keyboard).unwrap();
    let voices = (0..config.synth.num_voices)
        .map(|_| RecordingVoice::default())
        .collect();
    KeyboardEngine::new(layout, RecordingEngine(voices)).unwrap()
}

#[test]
fn pressing_a_plays_middle_c_on_voice_zero() {
    let mut keyboard = recording_keyboard();

    let slot = keyboard.layout().slot_by_code(65).unwrap();
    assert_eq!(slot.index, 0);
    assert_eq!(slot.key_number, 40);
    assert_eq!(slot.assigned_frequency_hz, key_frequency(40));
    assert!((keyboard.engine().voices()[0].pitch - 261.63).abs() < 0.01);

    assert!(keyboard.handle_physical_key(PhysicalKeyEvent::press(65)));
    assert!(keyboard.is_sounding(0));
    assert_eq!(keyboard.engine().voices()[0].starts, 1);

    assert!(keyboard.handle_physical_key(PhysicalKeyEvent::release(65)));
    assert!(!keyboard.is_sounding(0));
    let voice = &keyboard.engine().voices()[0];
    assert_eq!((voice.starts, voice.stops), (1, 1));

    let others = &keyboard.engine().voices()[1..];
    assert!(others.iter().all(|v| v.starts == 0 && v.stops == 0));
}

#[test]
fn held_key_with_auto_repeat_starts_once() {
    let mut keyboard = recording_keyboard();
    keyboard.handle_physical_key(PhysicalKeyEvent::press(222));
    for _ in 0..10 {
        keyboard.handle_physical_key(PhysicalKeyEvent::repeat(222));
    }
    keyboard.handle_physical_key(PhysicalKeyEvent::release(222));

    let voice = &keyboard.engine().voices()[17];
    assert_eq!((voice.starts, voice.stops), (1, 1));
}

#[test]
fn rapid_press_release_pairs_stay_serialized() {
    let mut keyboard = recording_keyboard();
    for _ in 0..3 {
        keyboard.handle_physical_key(PhysicalKeyEvent::press(87));
        keyboard.handle_physical_key(PhysicalKeyEvent::release(87));
    }
    let voice = &keyboard.engine().voices()[1];
    assert_eq!((voice.starts, voice.stops), (3, 3));
}

#[test]
fn polysynth_sounds_while_key_is_held() {
    let config = AppConfig::default();
    let layout = KeyLayout::from_config(&config.keyboard).unwrap();
    let (synth, mut renderer) = Polysynth::offline(&config.synth, 48_000.0);
    let mut keyboard = KeyboardEngine::new(layout, synth).unwrap();

    let mut buffer = vec![0.0f32; 4800 * 2];
    keyboard.handle_physical_key(PhysicalKeyEvent::press(65));
    renderer.render(&mut buffer, 2);
    assert!(buffer.iter().any(|s| s.abs() > 0.0));
    assert_eq!(renderer.active_voices(), 1);

    keyboard.handle_physical_key(PhysicalKeyEvent::release(65));
    for _ in 0..5 {
        renderer.render(&mut buffer, 2);
    }
    assert_eq!(renderer.active_voices(), 0);
    assert!(buffer.iter().all(|&s| s == 0.0));
}

#[test]
fn octave_shift_reaches_the_synth_voices() {
    let config = AppConfig::default();
    let layout = KeyLayout::from_config(&config.keyboard).unwrap();
    let (synth, _renderer) = Polysynth::offline(&config.synth, 48_000.0);
    let mut keyboard = KeyboardEngine::new(layout, synth).unwrap();

    let before = keyboard.engine().voices()[0].pitch();
    keyboard.increase_octave();
    assert_eq!(keyboard.engine().voices()[0].pitch(), before * 2.0);
    keyboard.decrease_octave();
    assert_eq!(keyboard.engine().voices()[0].pitch(), before);
}
