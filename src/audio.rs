//! Audio system driven by simulation events
//!
//! Procedurally described sound effects - no external files needed!
//! The manager turns `GameEvent`s into tone descriptions and hands them to
//! whatever backend the host provides. Without a backend it is a no-op.

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// Frequency curve over a tone's lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pitch {
    Constant(f32),
    /// Hard switch from `from` to `to` after `at` seconds
    Step { from: f32, to: f32, at: f32 },
    /// Exponential glide across the whole tone
    Exponential { from: f32, to: f32 },
    /// Linear glide across the whole tone
    Linear { from: f32, to: f32 },
    /// Linear up to `peak` at `at` seconds, then back to `from` by `2 * at`
    Bounce { from: f32, peak: f32, at: f32 },
}

/// One oscillator voice with a decaying gain envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub pitch: Pitch,
    /// Delay from the trigger, in seconds
    pub start_secs: f32,
    pub duration: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
}

impl Tone {
    /// Frequency `t` seconds after this tone starts
    pub fn frequency_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, self.duration);
        let progress = if self.duration > 0.0 {
            t / self.duration
        } else {
            1.0
        };
        match self.pitch {
            Pitch::Constant(hz) => hz,
            Pitch::Step { from, to, at } => {
                if t < at {
                    from
                } else {
                    to
                }
            }
            Pitch::Exponential { from, to } => from * (to / from).powf(progress),
            Pitch::Linear { from, to } => from + (to - from) * progress,
            Pitch::Bounce { from, peak, at } => {
                if t <= at {
                    from + (peak - from) * (t / at)
                } else {
                    let back = ((t - at) / at).min(1.0);
                    peak + (from - peak) * back
                }
            }
        }
    }
}

const fn voice(waveform: Waveform, pitch: Pitch, duration: f32, gain: f32) -> Tone {
    Tone {
        waveform,
        pitch,
        start_secs: 0.0,
        duration,
        gain,
    }
}

const fn arpeggio_note(hz: f32, start_secs: f32, duration: f32) -> Tone {
    Tone {
        waveform: Waveform::Sine,
        pitch: Pitch::Constant(hz),
        start_secs,
        duration,
        gain: 0.3,
    }
}

const fn bass_note(hz: f32) -> Tone {
    voice(Waveform::Sawtooth, Pitch::Constant(hz), 0.2, 0.05)
}

const JUMP_TONES: [Tone; 1] = [voice(
    Waveform::Sine,
    Pitch::Exponential {
        from: 150.0,
        to: 600.0,
    },
    0.1,
    0.3,
)];
const COIN_TONES: [Tone; 1] = [voice(
    Waveform::Sine,
    Pitch::Step {
        from: 1200.0,
        to: 1600.0,
        at: 0.05,
    },
    0.1,
    0.3,
)];
const DIE_TONES: [Tone; 1] = [voice(
    Waveform::Sawtooth,
    Pitch::Exponential {
        from: 300.0,
        to: 50.0,
    },
    0.5,
    0.5,
)];
const SHIELD_TONES: [Tone; 1] = [voice(
    Waveform::Square,
    Pitch::Bounce {
        from: 400.0,
        peak: 600.0,
        at: 0.1,
    },
    0.3,
    0.1,
)];
const PORTAL_TONES: [Tone; 1] = [voice(
    Waveform::Sine,
    Pitch::Linear {
        from: 800.0,
        to: 400.0,
    },
    0.3,
    0.2,
)];
// C5 E5 G5 C6
const WIN_TONES: [Tone; 4] = [
    arpeggio_note(523.25, 0.0, 0.1),
    arpeggio_note(659.25, 0.1, 0.1),
    arpeggio_note(783.99, 0.2, 0.2),
    arpeggio_note(1046.50, 0.4, 0.6),
];

/// Background loop: C3 C3 Eb3 Eb3 F3 F3 G3 G3
pub const MELODY: [Tone; 8] = [
    bass_note(130.81),
    bass_note(130.81),
    bass_note(155.56),
    bass_note(155.56),
    bass_note(174.61),
    bass_note(174.61),
    bass_note(196.00),
    bass_note(196.00),
];

/// One melody note every 250 ms at 60 fps
pub const FRAMES_PER_NOTE: u32 = 15;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Coin collected
    Coin,
    /// Run ended
    Die,
    /// Shield picked up or spent
    Shield,
    /// Gravity portal entered
    Portal,
    /// Target score reached
    Win,
}

impl SoundEffect {
    /// Map a simulation event to its sound, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump => Some(Self::Jump),
            GameEvent::Coin => Some(Self::Coin),
            GameEvent::Die => Some(Self::Die),
            GameEvent::Shield => Some(Self::Shield),
            GameEvent::Portal => Some(Self::Portal),
            GameEvent::Win => Some(Self::Win),
            _ => None,
        }
    }

    pub fn tones(self) -> &'static [Tone] {
        match self {
            Self::Jump => &JUMP_TONES,
            Self::Coin => &COIN_TONES,
            Self::Die => &DIE_TONES,
            Self::Shield => &SHIELD_TONES,
            Self::Portal => &PORTAL_TONES,
            Self::Win => &WIN_TONES,
        }
    }
}

/// Output backend (Web Audio, cpal, a test recorder, ...)
pub trait AudioSink {
    /// Start the given voices now, each delayed by its `start_secs`
    fn play(&mut self, tones: &[Tone], volume: f32);

    /// Cut any voices still sounding
    fn stop_all(&mut self) {}
}

/// Frame-clocked sequencer for the background loop
#[derive(Debug, Clone, Default)]
pub struct MusicLoop {
    playing: bool,
    note_index: usize,
    frames_until_next: u32,
}

impl MusicLoop {
    /// Start from the first note; no-op if already playing
    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.note_index = 0;
        self.frames_until_next = 0;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance one frame, returning the note due now
    pub fn update(&mut self) -> Option<Tone> {
        if !self.playing {
            return None;
        }
        if self.frames_until_next > 0 {
            self.frames_until_next -= 1;
            return None;
        }
        let note = MELODY[self.note_index % MELODY.len()];
        self.note_index += 1;
        self.frames_until_next = FRAMES_PER_NOTE - 1;
        Some(note)
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music: MusicLoop,
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn AudioSink>>) -> Self {
        if sink.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music: MusicLoop::default(),
        }
    }

    /// Manager with no backend (headless runs)
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn music_playing(&self) -> bool {
        self.music.is_playing()
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// React to the events drained from the simulation this frame
    pub fn handle(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::MusicStart => self.music.start(),
                GameEvent::MusicStop => {
                    self.music.stop();
                    if let Some(sink) = &mut self.sink {
                        sink.stop_all();
                    }
                }
                _ => {
                    if let Some(effect) = SoundEffect::from_event(event) {
                        self.play(effect);
                    }
                }
            }
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = &mut self.sink else { return };
        sink.play(effect.tones(), vol);
    }

    /// Advance the music clock by one frame
    pub fn update(&mut self) {
        let Some(note) = self.music.update() else {
            return;
        };
        let vol = self.effective_volume(self.music_volume);
        if vol <= 0.0 {
            return;
        }
        if let Some(sink) = &mut self.sink {
            sink.play(&[note], vol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder {
        played: Rc<RefCell<Vec<(Vec<Tone>, f32)>>>,
        stops: Rc<RefCell<u32>>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, tones: &[Tone], volume: f32) {
            self.played.borrow_mut().push((tones.to_vec(), volume));
        }

        fn stop_all(&mut self) {
            *self.stops.borrow_mut() += 1;
        }
    }

    fn manager() -> (AudioManager, Recorder) {
        let recorder = Recorder::default();
        (AudioManager::new(Some(Box::new(recorder.clone()))), recorder)
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::from_event(&GameEvent::Jump), Some(SoundEffect::Jump));
        assert_eq!(SoundEffect::from_event(&GameEvent::Win), Some(SoundEffect::Win));
        assert_eq!(SoundEffect::from_event(&GameEvent::ScoreChanged(3)), None);
        assert_eq!(SoundEffect::from_event(&GameEvent::MusicStart), None);
    }

    #[test]
    fn test_win_arpeggio() {
        let tones = SoundEffect::Win.tones();
        let freqs: Vec<f32> = tones.iter().map(|t| t.frequency_at(0.0)).collect();
        assert_eq!(freqs, vec![523.25, 659.25, 783.99, 1046.50]);
        assert_eq!(tones[3].start_secs, 0.4);
        assert_eq!(tones[3].duration, 0.6);
    }

    #[test]
    fn test_pitch_curves() {
        let jump = SoundEffect::Jump.tones()[0];
        assert_eq!(jump.frequency_at(0.0), 150.0);
        assert!((jump.frequency_at(0.1) - 600.0).abs() < 0.01);

        let coin = SoundEffect::Coin.tones()[0];
        assert_eq!(coin.frequency_at(0.04), 1200.0);
        assert_eq!(coin.frequency_at(0.06), 1600.0);

        let shield = SoundEffect::Shield.tones()[0];
        assert!((shield.frequency_at(0.1) - 600.0).abs() < 0.01);
        assert!((shield.frequency_at(0.25) - 400.0).abs() < 0.01);

        let portal = SoundEffect::Portal.tones()[0];
        assert!((portal.frequency_at(0.15) - 600.0).abs() < 0.01);
    }

    #[test]
    fn test_effects_reach_sink() {
        let (mut audio, recorder) = manager();
        audio.handle(&[GameEvent::Jump, GameEvent::ScoreChanged(1), GameEvent::Coin]);
        let played = recorder.played.borrow();
        assert_eq!(played.len(), 2);
        assert_eq!(played[0].0, SoundEffect::Jump.tones().to_vec());
        assert!((played[0].1 - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let (mut audio, recorder) = manager();
        audio.set_muted(true);
        audio.handle(&[GameEvent::MusicStart, GameEvent::Die]);
        for _ in 0..60 {
            audio.update();
        }
        assert!(recorder.played.borrow().is_empty());
    }

    #[test]
    fn test_music_loop_timing() {
        let (mut audio, recorder) = manager();
        audio.handle(&[GameEvent::MusicStart]);
        for _ in 0..FRAMES_PER_NOTE * 8 {
            audio.update();
        }
        let played = recorder.played.borrow();
        assert_eq!(played.len(), 8);
        let notes: Vec<f32> = played.iter().map(|(t, _)| t[0].frequency_at(0.0)).collect();
        assert_eq!(notes[0], 130.81);
        assert_eq!(notes[2], 155.56);
        assert_eq!(notes[7], 196.00);
    }

    #[test]
    fn test_music_stop() {
        let (mut audio, recorder) = manager();
        audio.handle(&[GameEvent::MusicStart]);
        audio.update();
        audio.handle(&[GameEvent::MusicStop]);
        assert!(!audio.music_playing());
        for _ in 0..60 {
            audio.update();
        }
        assert_eq!(recorder.played.borrow().len(), 1);
        assert_eq!(*recorder.stops.borrow(), 1);
    }

    #[test]
    fn test_music_start_is_idempotent() {
        let mut music = MusicLoop::default();
        music.start();
        assert!(music.update().is_some());
        music.start();
        assert!(music.update().is_none());
    }

    #[test]
    fn test_disabled_manager_is_noop() {
        let mut audio = AudioManager::disabled();
        audio.handle(&[GameEvent::MusicStart, GameEvent::Jump]);
        audio.update();
        assert!(audio.music_playing());
    }
}
