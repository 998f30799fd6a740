//! Audio normalization: decode an uploaded container to mono 16 kHz f32 PCM.
//!
//! Decoding is blocking work; callers wrap it in `spawn_blocking`. The upload
//! is persisted into a scoped temp dir that is removed on drop, on success
//! and failure alike.

use std::borrow::Cow;
use std::path::Path;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::probe::Hint;

use crate::error::{VoiceError, VoiceResult};

/// Sample rate the recognizer expects (Whisper standard).
pub const STT_SAMPLE_RATE: u32 = 16_000;

/// Normalized waveform: mono f32 at [`STT_SAMPLE_RATE`].
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    /// Clip length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Persist uploaded bytes into a scoped temp dir and decode them into a
/// normalized clip. The extension from the client filename feeds the format
/// probe as a hint; the temp dir (and the stored upload) is gone once this
/// returns.
pub fn decode_upload(data: &[u8], file_name: &str) -> VoiceResult<AudioClip> {
    let dir = tempfile::tempdir()?;
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let stored = if ext.is_empty() {
        dir.path().join("upload")
    } else {
        dir.path().join(format!("upload.{ext}"))
    };
    std::fs::write(&stored, data)?;
    decode_file(&stored)
}

/// Decode any supported container/codec at `path` into a normalized clip.
pub fn decode_file(path: &Path) -> VoiceResult<AudioClip> {
    let src = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &Default::default(), &Default::default())
        .map_err(|e| VoiceError::Decode(format!("unsupported or corrupt audio: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| VoiceError::Decode("no decodable audio track found".to_string()))?;
    let track_id = track.id;
    let source_rate = track.codec_params.sample_rate.unwrap_or(0);
    if source_rate == 0 {
        return Err(VoiceError::Decode("source sample rate unknown".to_string()));
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| VoiceError::Decode(format!("unsupported codec: {}", e)))?;

    let mut mono = Vec::new();
    while let Ok(packet) = format.next_packet() {
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder
            .decode(&packet)
            .map_err(|e| VoiceError::Decode(format!("decode failed: {}", e)))?;
        match decoded {
            AudioBufferRef::F32(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::F64(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::U8(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::U16(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::U24(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::U32(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::S8(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::S16(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::S24(buf) => mix_to_mono(&mut mono, buf),
            AudioBufferRef::S32(buf) => mix_to_mono(&mut mono, buf),
        }
    }

    if mono.is_empty() {
        return Err(VoiceError::Decode("no audio frames decoded".to_string()));
    }

    let samples = resample_to_stt_rate(mono, source_rate);
    Ok(AudioClip {
        samples,
        sample_rate: STT_SAMPLE_RATE,
    })
}

/// Average all channels of one decoded buffer into the mono accumulator,
/// converting whatever sample format the codec produced to f32.
fn mix_to_mono<T>(out: &mut Vec<f32>, buf: Cow<AudioBuffer<T>>)
where
    T: symphonia::core::sample::Sample,
    f32: FromSample<T>,
{
    let channels = buf.spec().channels.count();
    if channels == 0 {
        return;
    }
    if channels == 1 {
        out.extend(buf.chan(0).iter().map(|v| f32::from_sample(*v)));
        return;
    }
    for i in 0..buf.frames() {
        let mut acc = 0.0f32;
        for ch in 0..channels {
            acc += f32::from_sample(buf.chan(ch)[i]);
        }
        out.push(acc / channels as f32);
    }
}

/// Nearest-index resample to [`STT_SAMPLE_RATE`].
fn resample_to_stt_rate(mono: Vec<f32>, from_rate: u32) -> Vec<f32> {
    if from_rate == STT_SAMPLE_RATE {
        return mono;
    }
    let out_len = (mono.len() as u64 * STT_SAMPLE_RATE as u64 / from_rate as u64) as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let src_idx = (i as f64 * from_rate as f64 / STT_SAMPLE_RATE as f64) as usize;
        if src_idx >= mono.len() {
            break;
        }
        out.push(mono[src_idx]);
    }
    out
}
