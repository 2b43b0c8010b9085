//! Built-in procedural music, used when no audio file is given.

use glicol::Engine;

use super::source::SampleSource;
use crate::error::AudioError;
use crate::params::audio_constants::BLOCK_SIZE;

/// Glicol composition: a plucked bass line under a filtered lead, so both
/// bands have something to react to
pub const GLICOL_COMPOSITION: &str = r#"
~gate: speed 2.0 >> seq 60 _60 _~a 48
~a: choose 48 48 48 72 0 0 0
~amp: ~gate >> envperc 0.001 0.1
~pit: ~gate >> mul 261.63
~lead: saw ~pit >> mul ~amp >> lpf ~mod 5.0 >> mul 0.1
~mod: sin 0.2 >> mul 1300 >> add 1500
~kick: speed 4.0 >> seq 60 >> bd 0.2 >> mul 0.6
o: mix ~lead ~kick >> plate 0.1
"#;

/// Glicol engine rendered block by block into a mono stream
pub struct SynthSource {
    engine: Engine<BLOCK_SIZE>,
    block: [f32; BLOCK_SIZE],
    cursor: usize,
}

impl SynthSource {
    pub fn new(sample_rate: u32) -> Result<Self, AudioError> {
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate as usize);
        engine.update_with_code(GLICOL_COMPOSITION);
        engine
            .update()
            .map_err(|e| AudioError::Synthesis(format!("{:?}", e)))?;

        Ok(Self {
            engine,
            block: [0.0; BLOCK_SIZE],
            cursor: BLOCK_SIZE,
        })
    }

    fn render_block(&mut self) {
        let (buffers, _) = self.engine.next_block(vec![]);
        for i in 0..BLOCK_SIZE {
            self.block[i] = 0.5 * (buffers[0][i] + buffers[1][i]);
        }
        self.cursor = 0;
    }
}

impl SampleSource for SynthSource {
    fn next_sample(&mut self) -> f32 {
        if self.cursor == BLOCK_SIZE {
            self.render_block();
        }
        let sample = self.block[self.cursor];
        self.cursor += 1;
        sample
    }
}
