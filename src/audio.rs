use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::AudioConfig;

pub const BACKGROUND_TRACK: &str = "bgmusic.wav";

/// Fire-and-forget music playback. Implementations log failures instead of
/// returning them, so starting a game never depends on audio.
pub trait AudioService {
    fn play(&mut self, track: &str, looping: bool);
    fn stop(&mut self);
}

#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioService for SilentAudio {
    fn play(&mut self, track: &str, looping: bool) {
        debug!("Audio disabled, not playing {track} (looping: {looping})");
    }

    fn stop(&mut self) {}
}

fn embedded_track(track: &str) -> Option<&'static [u8]> {
    match track {
        BACKGROUND_TRACK => Some(include_bytes!("../assets/bgmusic.wav")),
        _ => None,
    }
}

/// Reads a track from the asset directory, falling back to the built-in copy.
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
fn track_bytes(track: &str, dir: Option<&Path>) -> Option<Vec<u8>> {
    if let Some(dir) = dir {
        match std::fs::read(dir.join(track)) {
            Ok(bytes) => return Some(bytes),
            Err(e) => debug!("No {track} in {}: {e}", dir.display()),
        }
    }
    embedded_track(track).map(<[u8]>::to_vec)
}

#[cfg(feature = "audio")]
mod device {
    use std::{
        io::Cursor,
        path::{Path, PathBuf},
    };

    use color_eyre::eyre::Result;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::{info, warn};

    use super::{track_bytes, AudioService};

    pub struct RodioAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sink: Option<Sink>,
        dir: Option<PathBuf>,
    }

    impl RodioAudio {
        pub fn new(dir: Option<&Path>) -> Result<Self> {
            let (stream, handle) = OutputStream::try_default()?;
            Ok(Self { _stream: stream, handle, sink: None, dir: dir.map(Path::to_path_buf) })
        }

        fn try_play(&mut self, track: &str, looping: bool) -> Result<()> {
            let bytes = track_bytes(track, self.dir.as_deref())
                .ok_or_else(|| color_eyre::eyre::eyre!("unknown track {track}"))?;
            let source = Decoder::new(Cursor::new(bytes))?;
            let sink = Sink::try_new(&self.handle)?;
            if looping {
                sink.append(source.repeat_infinite());
            } else {
                sink.append(source);
            }
            sink.play();
            self.sink = Some(sink);
            Ok(())
        }
    }

    impl AudioService for RodioAudio {
        fn play(&mut self, track: &str, looping: bool) {
            self.stop();
            match self.try_play(track, looping) {
                Ok(()) => info!("Playing {track}"),
                Err(e) => warn!("Failed to play {track}: {e:#}"),
            }
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }
    }
}

#[cfg(feature = "audio")]
pub use device::RodioAudio;

/// Picks the audio backend for this build and configuration.
pub fn build_audio(config: &AudioConfig, dir: Option<&Path>) -> Box<dyn AudioService> {
    if !config.enabled {
        info!("Audio disabled by configuration");
        return Box::new(SilentAudio);
    }

    #[cfg(feature = "audio")]
    {
        match RodioAudio::new(dir) {
            Ok(audio) => return Box::new(audio),
            Err(e) => warn!("No audio output device, continuing silently: {e:#}"),
        }
    }

    #[cfg(not(feature = "audio"))]
    {
        let _ = dir;
        warn!("Built without the `audio` feature, continuing silently");
    }

    Box::new(SilentAudio)
}
