//! Local file decoding with Symphonia
//!
//! Packets are decoded on demand into a small queue of interleaved stereo
//! `f32` samples at the output device rate. Every sample format Symphonia
//! produces goes through the same interleaving path; only the normalization
//! differs per format. Mono is duplicated to both channels and anything with
//! more than two channels keeps its front pair.

use crate::error::{AudioError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

/// Decoded output is always interleaved stereo
const OUTPUT_CHANNELS: usize = 2;

/// Streaming decoder for one audio file
pub struct LocalAudioSource {
    path: PathBuf,
    source_sample_rate: u32,
    target_sample_rate: u32,

    format_reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    time_base: TimeBase,

    /// Ready-to-play samples at the target rate
    buffer: VecDeque<f32>,

    resampler: Option<SincFixedIn<f32>>,
    /// Source-rate samples waiting for a full resampler chunk
    pending: Vec<f32>,

    samples_read: usize,
    total_duration: Duration,
    is_eof: bool,
}

impl LocalAudioSource {
    /// Open and probe `path`, preparing to decode at `target_sample_rate`
    ///
    /// Only the container header is read here; audio is decoded lazily by
    /// `read_samples`.
    pub fn open(path: impl AsRef<Path>, target_sample_rate: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_error = |message: String| AudioError::Open {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(&path).map_err(|e| open_error(e.to_string()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| open_error(e.to_string()))?;

        let format_reader = probed.format;

        let track = format_reader
            .default_track()
            .ok_or_else(|| AudioError::UnsupportedFormat("no audio track".into()))?;

        let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
        let track_id = track.id;
        let time_base = track
            .codec_params
            .time_base
            .unwrap_or(TimeBase::new(1, sample_rate));

        // Unknown length reads as zero
        let total_duration = track
            .codec_params
            .n_frames
            .map(|frames| Duration::from_secs_f64(frames as f64 / f64::from(sample_rate)))
            .unwrap_or(Duration::ZERO);

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

        let resampler = if sample_rate == target_sample_rate {
            None
        } else {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            };

            // 0.1 second chunks
            let chunk_frames = (sample_rate as usize / 10).max(1);

            let resampler = SincFixedIn::<f32>::new(
                f64::from(target_sample_rate) / f64::from(sample_rate),
                2.0,
                params,
                chunk_frames,
                OUTPUT_CHANNELS,
            )
            .map_err(|e| AudioError::ResampleError(e.to_string()))?;

            Some(resampler)
        };

        tracing::debug!(
            "Opened {} ({} Hz -> {} Hz, {:?})",
            path.display(),
            sample_rate,
            target_sample_rate,
            total_duration
        );

        Ok(Self {
            path,
            source_sample_rate: sample_rate,
            target_sample_rate,
            format_reader,
            decoder,
            track_id,
            time_base,
            buffer: VecDeque::new(),
            resampler,
            pending: Vec::new(),
            samples_read: 0,
            total_duration,
            is_eof: false,
        })
    }

    /// Fill `output` with interleaved stereo samples
    ///
    /// Returns the number of samples written; the rest of `output` is
    /// silence. Zero means the file is exhausted.
    pub fn read_samples(&mut self, output: &mut [f32]) -> Result<usize> {
        while self.buffer.len() < output.len() && !self.is_eof {
            self.decode_next_packet()?;
        }

        let available = self.buffer.len().min(output.len());
        for (slot, sample) in output.iter_mut().zip(self.buffer.drain(..available)) {
            *slot = sample;
        }
        output[available..].fill(0.0);

        self.samples_read += available;
        Ok(available)
    }

    /// Jump to `position` (clamped to the track length when known)
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let position = if self.total_duration > Duration::ZERO {
            position.min(self.total_duration)
        } else {
            position
        };

        let seek_ts = self.time_base.calc_timestamp(position.into());

        self.format_reader
            .seek(
                SeekMode::Accurate,
                SeekTo::TimeStamp {
                    ts: seek_ts,
                    track_id: self.track_id,
                },
            )
            .map_err(|e| AudioError::SeekError(e.to_string()))?;

        self.decoder.reset();
        if let Some(resampler) = self.resampler.as_mut() {
            resampler.reset();
        }

        self.buffer.clear();
        self.pending.clear();
        self.is_eof = false;

        let frames = (position.as_secs_f64() * f64::from(self.target_sample_rate)) as usize;
        self.samples_read = frames * OUTPUT_CHANNELS;

        Ok(())
    }

    /// Playhead, derived from samples handed out so far
    pub fn position(&self) -> Duration {
        let frames = self.samples_read / OUTPUT_CHANNELS;
        Duration::from_secs_f64(frames as f64 / f64::from(self.target_sample_rate))
    }

    /// Track length, or zero if the container does not say
    pub fn duration(&self) -> Duration {
        self.total_duration
    }

    /// All samples have been decoded and read
    pub fn is_finished(&self) -> bool {
        self.is_eof && self.buffer.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output sample rate
    pub fn sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// The file's own sample rate
    pub fn source_sample_rate(&self) -> u32 {
        self.source_sample_rate
    }

    fn decode_next_packet(&mut self) -> Result<()> {
        let packet = match self.format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return self.finish();
            }
            Err(SymphoniaError::ResetRequired) => return self.finish(),
            Err(e) => return Err(AudioError::DecodeError(e.to_string())),
        };

        if packet.track_id() != self.track_id {
            return Ok(());
        }

        let samples = match self.decoder.decode(&packet) {
            Ok(decoded) => convert_to_f32_interleaved(decoded),
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt packet: skip it and keep going
                tracing::warn!("Skipping undecodable packet in {}: {}", self.path.display(), e);
                return Ok(());
            }
            Err(e) => return Err(AudioError::DecodeError(e.to_string())),
        };

        self.push_samples(samples, false)
    }

    fn finish(&mut self) -> Result<()> {
        self.is_eof = true;
        self.push_samples(Vec::new(), true)
    }

    /// Queue decoded samples, resampling in whole chunks
    ///
    /// With `flush`, the partial chunk left over at end of file is
    /// resampled too.
    fn push_samples(&mut self, samples: Vec<f32>, flush: bool) -> Result<()> {
        let Some(resampler) = self.resampler.as_mut() else {
            self.buffer.extend(samples);
            return Ok(());
        };

        self.pending.extend(samples);

        loop {
            let needed = resampler.input_frames_next();
            if self.pending.len() / OUTPUT_CHANNELS < needed {
                break;
            }

            let chunk: Vec<f32> = self.pending.drain(..needed * OUTPUT_CHANNELS).collect();
            let resampled = resampler
                .process(&deinterleave(&chunk), None)
                .map_err(|e| AudioError::ResampleError(e.to_string()))?;
            interleave_into(&resampled, &mut self.buffer);
        }

        if flush && !self.pending.is_empty() {
            let planar = deinterleave(&std::mem::take(&mut self.pending));
            let resampled = resampler
                .process_partial(Some(planar.as_slice()), None)
                .map_err(|e| AudioError::ResampleError(e.to_string()))?;
            interleave_into(&resampled, &mut self.buffer);
        }

        Ok(())
    }
}

fn deinterleave(samples: &[f32]) -> Vec<Vec<f32>> {
    let mut planar = vec![Vec::with_capacity(samples.len() / OUTPUT_CHANNELS); OUTPUT_CHANNELS];
    for frame in samples.chunks_exact(OUTPUT_CHANNELS) {
        for (channel, sample) in planar.iter_mut().zip(frame) {
            channel.push(*sample);
        }
    }
    planar
}

fn interleave_into(planar: &[Vec<f32>], out: &mut VecDeque<f32>) {
    let frames = planar.first().map_or(0, Vec::len);
    for frame in 0..frames {
        for channel in planar {
            out.push_back(channel[frame]);
        }
    }
}

/// Interleave a planar buffer of any sample type into stereo f32
fn interleave_to_stereo_f32<T, F>(buf: &symphonia::core::audio::AudioBuffer<T>, normalize: F) -> Vec<f32>
where
    T: symphonia::core::sample::Sample,
    F: Fn(T) -> f32,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    let mut output = Vec::with_capacity(frames * OUTPUT_CHANNELS);

    let left = buf.chan(0);
    let right = if channels > 1 { buf.chan(1) } else { left };

    for (l, r) in left.iter().zip(right).take(frames) {
        output.push(normalize(*l));
        output.push(normalize(*r));
    }

    output
}

/// Convert any decoded buffer to normalized interleaved stereo f32
fn convert_to_f32_interleaved(decoded: AudioBufferRef<'_>) -> Vec<f32> {
    match decoded {
        AudioBufferRef::F32(buf) => interleave_to_stereo_f32(&buf, |s| s),
        AudioBufferRef::F64(buf) => interleave_to_stereo_f32(&buf, |s| s as f32),

        AudioBufferRef::S8(buf) => interleave_to_stereo_f32(&buf, |s| f32::from(s) / f32::from(i8::MAX)),
        AudioBufferRef::S16(buf) => interleave_to_stereo_f32(&buf, |s| f32::from(s) / f32::from(i16::MAX)),
        AudioBufferRef::S24(buf) => interleave_to_stereo_f32(&buf, |s| s.inner() as f32 / 8388607.0),
        AudioBufferRef::S32(buf) => interleave_to_stereo_f32(&buf, |s| s as f32 / i32::MAX as f32),

        AudioBufferRef::U8(buf) => {
            interleave_to_stereo_f32(&buf, |s| (f32::from(s) / f32::from(u8::MAX)) * 2.0 - 1.0)
        }
        AudioBufferRef::U16(buf) => {
            interleave_to_stereo_f32(&buf, |s| (f32::from(s) / f32::from(u16::MAX)) * 2.0 - 1.0)
        }
        AudioBufferRef::U24(buf) => {
            interleave_to_stereo_f32(&buf, |s| (s.inner() as f32 / 16777215.0) * 2.0 - 1.0)
        }
        AudioBufferRef::U32(buf) => {
            interleave_to_stereo_f32(&buf, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deinterleave_then_interleave() {
        let samples = vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let planar = deinterleave(&samples);

        assert_eq!(planar[0], vec![0.1, 0.2, 0.3]);
        assert_eq!(planar[1], vec![-0.1, -0.2, -0.3]);

        let mut out = VecDeque::new();
        interleave_into(&planar, &mut out);
        assert_eq!(out.into_iter().collect::<Vec<_>>(), samples);
    }

    #[test]
    fn open_missing_file_fails() {
        let result = LocalAudioSource::open("/nonexistent/track.wav", 44100);
        assert!(matches!(result, Err(AudioError::Open { .. })));
    }
}
