use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use crate::show::cue::{Cue, CuePlayer};

const CLIP_EXTENSIONS: [&str; 4] = ["ogg", "mp3", "wav", "flac"];

/// Cue player backed by the default audio output. One sink per cue; the tick
/// sink is kept across pauses so resuming continues the loop.
pub struct RodioCuePlayer {
    cue_dir: PathBuf,
    // Dropping the stream silences every sink; held for the player's lifetime.
    output: Option<(OutputStream, OutputStreamHandle)>,
    sinks: HashMap<Cue, Sink>,
}

impl RodioCuePlayer {
    pub fn new(cue_dir: &Path) -> Self {
        let output = OutputStream::try_default().ok();
        if output.is_none() {
            warn!("audio output unavailable; cues disabled");
        }
        Self {
            cue_dir: cue_dir.to_path_buf(),
            output,
            sinks: HashMap::new(),
        }
    }

    fn clip_path(&self, cue: Cue) -> Option<PathBuf> {
        CLIP_EXTENSIONS
            .iter()
            .map(|ext| self.cue_dir.join(format!("{}.{ext}", cue.file_stem())))
            .find(|path| path.exists())
    }

    fn open_sink(&self, cue: Cue) -> Option<Sink> {
        let (_, handle) = self.output.as_ref()?;
        let Some(path) = self.clip_path(cue) else {
            debug!(cue = cue.file_stem(), dir = %self.cue_dir.display(), "no clip for cue");
            return None;
        };
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                debug!(?err, path = %path.display(), "failed opening cue clip");
                return None;
            }
        };
        let decoder = match Decoder::new(BufReader::new(file)) {
            Ok(decoder) => decoder,
            Err(err) => {
                debug!(?err, path = %path.display(), "failed decoding cue clip");
                return None;
            }
        };
        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(err) => {
                warn!(?err, "failed to create audio sink");
                return None;
            }
        };
        if cue.loops() {
            sink.append(decoder.buffered().repeat_infinite());
        } else {
            sink.append(decoder);
        }
        Some(sink)
    }

    /// Swap the sink of a looping cue for a new one at the clip start, keeping
    /// its speed, volume and paused state.
    fn restart_loop(&mut self, cue: Cue) {
        let Some(old) = self.sinks.get(&cue) else {
            return;
        };
        let (speed, volume, paused) = (old.speed(), old.volume(), old.is_paused());
        let Some(fresh) = self.open_sink(cue) else {
            return;
        };
        fresh.set_speed(speed);
        fresh.set_volume(volume);
        if paused {
            fresh.pause();
        }
        if let Some(old) = self.sinks.insert(cue, fresh) {
            old.stop();
        }
    }
}

impl CuePlayer for RodioCuePlayer {
    fn play(&mut self, cue: Cue) {
        if cue.loops() {
            if let Some(sink) = self.sinks.get(&cue) {
                sink.play();
                return;
            }
        }
        // One-shot clips restart from the top on every play.
        if let Some(sink) = self.open_sink(cue) {
            sink.play();
            self.sinks.insert(cue, sink);
        }
    }

    fn pause(&mut self, cue: Cue) {
        if let Some(sink) = self.sinks.get(&cue) {
            sink.pause();
        }
    }

    fn set_rate(&mut self, cue: Cue, rate: f32) {
        if let Some(sink) = self.sinks.get(&cue) {
            sink.set_speed(rate.max(0.1));
        }
    }

    fn set_volume(&mut self, cue: Cue, volume: f32) {
        if let Some(sink) = self.sinks.get(&cue) {
            sink.set_volume(volume.clamp(0.0, 2.0));
        }
    }

    fn seek(&mut self, cue: Cue, seconds: f32) {
        let Some(sink) = self.sinks.get(&cue) else {
            return;
        };
        match sink.try_seek(Duration::from_secs_f32(seconds.max(0.0))) {
            Ok(()) => {}
            // A buffered repeat cannot seek; rewind by starting a fresh loop.
            Err(err) if cue.loops() => {
                debug!(?err, cue = cue.file_stem(), "seek unsupported, restarting loop");
                self.restart_loop(cue);
            }
            Err(err) => debug!(?err, cue = cue.file_stem(), "seek unsupported"),
        }
    }
}
