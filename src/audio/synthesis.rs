//! Ambient bed: a glicol drone that sits under the interaction voices.

use glicol::Engine;

use crate::error::AudioError;
use crate::params::audio_constants::BLOCK_SIZE;

/// Glicol composition (slow swelling drone with a filtered pad)
pub const AMBIENT_COMPOSITION: &str = r#"
~swell: sin 0.05 >> mul 0.5 >> add 0.5
~drone: sin 55 >> mul ~swell >> mul 0.12
~cut: sin 0.1 >> mul 300 >> add 500
~pad: saw 82.4 >> lpf ~cut 2.0 >> mul 0.04
o: mix ~drone ~pad >> plate 0.2
"#;

type BlockFn = Box<dyn FnMut(&mut [f32; BLOCK_SIZE], &mut [f32; BLOCK_SIZE]) + Send>;

/// Block-based stereo source, read one frame at a time
pub struct AmbientBed {
    render_block: BlockFn,
    left: [f32; BLOCK_SIZE],
    right: [f32; BLOCK_SIZE],
    /// Next unread frame in the current block
    cursor: usize,
}

impl AmbientBed {
    /// Start the glicol engine on the ambient composition
    pub fn glicol(sample_rate_hz: u32) -> Result<Self, AudioError> {
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate_hz as usize);
        engine.update_with_code(AMBIENT_COMPOSITION);
        engine
            .update()
            .map_err(|e| AudioError::Engine(format!("{:?}", e)))?;

        Ok(Self::from_fn(move |left, right| {
            let (buffers, _) = engine.next_block(vec![]);
            for i in 0..BLOCK_SIZE {
                left[i] = buffers[0][i];
                right[i] = buffers[1][i];
            }
        }))
    }

    /// Wrap any block renderer as a bed
    pub fn from_fn<F>(render_block: F) -> Self
    where
        F: FnMut(&mut [f32; BLOCK_SIZE], &mut [f32; BLOCK_SIZE]) + Send + 'static,
    {
        Self {
            render_block: Box::new(render_block),
            left: [0.0; BLOCK_SIZE],
            right: [0.0; BLOCK_SIZE],
            cursor: BLOCK_SIZE,
        }
    }

    /// Next stereo frame, rendering a new block when the current one is used up
    pub fn next_frame(&mut self) -> (f32, f32) {
        if self.cursor >= BLOCK_SIZE {
            (self.render_block)(&mut self.left, &mut self.right);
            self.cursor = 0;
        }
        let frame = (self.left[self.cursor], self.right[self.cursor]);
        self.cursor += 1;
        frame
    }
}

impl std::fmt::Debug for AmbientBed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientBed")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bed_renders_blocks_on_demand() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let rendered = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&rendered);
        let mut bed = AmbientBed::from_fn(move |left, right| {
            let n = counter.fetch_add(1, Ordering::SeqCst) as f32;
            left.fill(n);
            right.fill(-n);
        });

        for i in 0..(BLOCK_SIZE * 2 + 1) {
            let (l, r) = bed.next_frame();
            let expected = (i / BLOCK_SIZE) as f32;
            assert_eq!(l, expected);
            assert_eq!(r, -expected);
        }
        assert_eq!(rendered.load(Ordering::SeqCst), 3);
    }
}
