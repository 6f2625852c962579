use super::MediaBackend;
use anyhow::{Result, anyhow};
use crossbeam_channel::{Sender, bounded};
use log::debug;
use rodio::{Decoder, OutputStreamBuilder, Sink, Source, mixer::Mixer};
use std::{fs::File, io::BufReader, path::Path, thread, time::Duration};

/// Plays through the default output device.
///
/// The output stream lives on its own thread and is dropped when the backend
/// is. Each loaded track gets a fresh `Sink`; the previous one is stopped
/// and dropped first.
pub struct RodioBackend {
    mixer: Mixer,
    sink: Option<Sink>,
    duration: Option<Duration>,
    volume: f32,
    _shutdown: Sender<()>,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let (mixer_tx, mixer_rx) = bounded::<Result<Mixer>>(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        thread::Builder::new()
            .name("melodex-output".into())
            .spawn(move || match OutputStreamBuilder::open_default_stream() {
                Ok(mut stream) => {
                    stream.log_on_drop(false);
                    let _ = mixer_tx.send(Ok(stream.mixer().clone()));
                    // Blocks until the backend (and its sender) is dropped
                    let _ = shutdown_rx.recv();
                    debug!("Closing output stream");
                }
                Err(e) => {
                    let _ = mixer_tx.send(Err(anyhow!("Cannot open output stream: {e}")));
                }
            })?;

        let mixer = mixer_rx.recv()??;

        Ok(RodioBackend {
            mixer,
            sink: None,
            duration: None,
            volume: 1.0,
            _shutdown: shutdown_tx,
        })
    }
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.stop();

        let source = decode(path)?;
        let duration = source.total_duration();

        let sink = Sink::connect_new(&self.mixer);
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(source);

        self.sink = Some(sink);
        self.duration = duration;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
    }

    fn seek(&mut self, pos: Duration) -> Result<()> {
        let sink = self.sink.as_ref().ok_or_else(|| anyhow!("Nothing loaded"))?;
        sink.try_seek(pos).map_err(|e| anyhow!("Seek failed: {e}"))
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level;
        if let Some(sink) = &self.sink {
            sink.set_volume(level);
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map(Sink::get_pos).unwrap_or_default()
    }

    fn track_ended(&self) -> bool {
        self.sink.as_ref().is_some_and(Sink::empty)
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_byte_len(len)
        .with_seekable(true);

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let hint = match ext.to_lowercase().as_str() {
            "adif" | "adts" => "aac".to_string(),
            "caf" => "audio/x-caf".to_string(),
            "m4a" | "m4b" | "m4p" | "m4r" | "mp4" => "audio/mp4".to_string(),
            "bit" | "mpga" => "mp3".to_string(),
            "mka" | "mkv" => "audio/matroska".to_string(),
            "oga" | "ogm" | "ogv" | "ogx" | "spx" => "audio/ogg".to_string(),
            "wave" => "wav".to_string(),
            other => other.to_string(),
        };
        builder = builder.with_hint(&hint);
    }

    Ok(builder.build()?)
}
