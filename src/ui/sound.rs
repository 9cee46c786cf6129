/// Sound engine: the mechanical click of the flaps, via rodio.
///
/// The click sample is generated as an in-memory WAV buffer at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink, one
/// detached sink per click so simultaneous flaps overlap naturally.
///
/// Builds without the "sound" feature get a stub engine whose every
/// call is a no-op.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffer for the flap click.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_click: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            let sfx_click = Arc::new(make_wav(&gen_click()));
            Some(SoundEngine { _stream: stream, handle, sfx_click })
        }

        /// One flap click. Errors are swallowed; sound never interrupts
        /// the animation.
        pub fn play_click(&self) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(self.sfx_click.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }

    /// The click: a quiet 900 Hz square-wave tick with a fast exponential
    /// decay, 30 ms long. Quiet on purpose; a full page of cells plays
    /// dozens of these per second.
    fn gen_click() -> Vec<f32> {
        let duration = 0.03;
        let gain = 0.05;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let wave = (t * 900.0 * 2.0 * std::f32::consts::PI).sin();
                let square = if wave >= 0.0 { 1.0 } else { -1.0 };
                // exponential ramp from `gain` down to near silence
                let env = gain * 0.002_f32.powf(i as f32 / n as f32);
                square * env
            })
            .collect()
    }

    /// Wrap mono f32 samples into a 16-bit PCM WAV byte buffer that
    /// rodio's decoder accepts.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        const CHANNELS: u16 = 1;
        const BITS: u16 = 16;
        let data_size = (samples.len() * 2) as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // uncompressed PCM
        buf.extend_from_slice(&CHANNELS.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        let byte_rate = SAMPLE_RATE * CHANNELS as u32 * BITS as u32 / 8;
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&(CHANNELS * BITS / 8).to_le_bytes()); // block align
        buf.extend_from_slice(&BITS.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Stub engine for builds without the "sound" feature
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }
    pub fn play_click(&self) {}
}
