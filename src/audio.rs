//! Audio system
//!
//! Procedurally generated sound effects - no external files needed! The game
//! only ever asks for three cues through [`AudioCue`]; on the web they are
//! synthesized with the Web Audio API, elsewhere they are silent.

use crate::sim::GameEvent;

/// The sounds the game can ask for. Implementations must never fail loudly:
/// a missing or locked audio device means silence, not an error.
pub trait AudioCue {
    fn jump(&self);
    fn score(&self);
    fn crash(&self);

    /// Master volume, 0.0 - 1.0
    fn set_volume(&self, _volume: f32) {}

    /// Unlock output; browsers only allow this from a user gesture
    fn resume(&self) {}

    /// Play the cue matching a simulation event, if it has one
    fn play_event(&self, event: GameEvent) {
        match event {
            GameEvent::Jump => self.jump(),
            GameEvent::Score => self.score(),
            GameEvent::Crash => self.crash(),
            GameEvent::NewHighScore(_) => {}
        }
    }
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioCue for SilentAudio {
    fn jump(&self) {}
    fn score(&self) {}
    fn crash(&self) {}
}

/// Web Audio when the browser provides it, silence otherwise
#[cfg(target_arch = "wasm32")]
pub fn for_platform(volume: f32) -> Box<dyn AudioCue> {
    match WebAudio::new(volume) {
        Some(audio) => Box::new(audio),
        None => {
            log::warn!("Failed to create AudioContext - audio disabled");
            Box::new(SilentAudio)
        }
    }
}

/// Native builds have no audio backend
#[cfg(not(target_arch = "wasm32"))]
pub fn for_platform(_volume: f32) -> Box<dyn AudioCue> {
    Box::new(SilentAudio)
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::AudioCue;

    /// Web Audio synthesizer with a shared master gain
    pub struct WebAudio {
        ctx: AudioContext,
        master: GainNode,
    }

    impl WebAudio {
        /// `None` when no context can be created (e.g. outside a secure context)
        pub fn new(volume: f32) -> Option<Self> {
            let ctx = AudioContext::new().ok()?;
            let master = ctx.create_gain().ok()?;
            master.gain().set_value(volume.clamp(0.0, 1.0));
            master.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(Self { ctx, master })
        }

        /// Create an oscillator routed through its own gain into the master
        fn create_osc(
            ctx: &AudioContext,
            master: &GainNode,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;

            Some((osc, gain))
        }

        /// One oscillator sweeping `from` -> `to` Hz while its gain decays
        fn sweep(
            &self,
            osc_type: OscillatorType,
            from: f32,
            to: Option<f32>,
            peak: f32,
            duration: f64,
        ) {
            // Browsers keep the context suspended until a user gesture
            self.resume();
            let ctx = &self.ctx;
            let Some((osc, gain)) = Self::create_osc(ctx, &self.master, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(from, t).ok();
            if let Some(to) = to {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + duration)
                    .ok();
            }
            gain.gain().set_value_at_time(peak, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + duration).ok();
        }
    }

    impl AudioCue for WebAudio {
        fn set_volume(&self, volume: f32) {
            self.master.gain().set_value(volume.clamp(0.0, 1.0));
        }

        fn resume(&self) {
            if self.ctx.state() == AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
        }

        /// Rising chirp
        fn jump(&self) {
            self.sweep(OscillatorType::Sine, 400.0, Some(600.0), 1.0, 0.1);
        }

        /// Short high ping
        fn score(&self) {
            self.sweep(OscillatorType::Sine, 1200.0, None, 0.5, 0.15);
        }

        /// Falling buzz
        fn crash(&self) {
            self.sweep(OscillatorType::Sawtooth, 150.0, Some(50.0), 1.0, 0.3);
        }
    }
}
