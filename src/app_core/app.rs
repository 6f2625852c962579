use crate::{
    Database, Library, Settings, get_readable_duration,
    domain::{Dimension, SongInfo},
    player::{MediaBackend, PlayerHandle, RodioBackend, SessionState, SilentBackend},
    shell::{self, Action, HELP, PlaySource},
};
use anyhow::{Result, anyhow};
use log::{info, warn};
use std::{
    io::{self, Write},
    sync::Arc,
};

pub struct Melodex {
    library: Library,
    player: PlayerHandle,
    settings: Settings,
}

impl Melodex {
    /// Open the catalog, restore the saved volume, and bring up audio output.
    /// Without an output device playback falls back to a silent backend.
    pub fn new(settings: Settings) -> Result<Self> {
        let db = Database::open(&settings.database_path)?;
        let library = Library::new(db, settings.audio_root.clone());

        let backend: Box<dyn MediaBackend> = match RodioBackend::new() {
            Ok(backend) => Box::new(backend),
            Err(e) => {
                warn!("Audio output unavailable, continuing without sound: {e}");
                Box::new(SilentBackend::new())
            }
        };

        let app = Self::with_backend(library, backend, settings);
        app.player.spawn_monitor()?;
        Ok(app)
    }

    pub fn with_backend(library: Library, backend: Box<dyn MediaBackend>, settings: Settings) -> Self {
        let volume = library.load_volume().unwrap_or(settings.default_volume);
        let player = PlayerHandle::new(backend, Arc::new(library.clone()), volume);

        Melodex {
            library,
            player,
            settings,
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn player(&self) -> &PlayerHandle {
        &self.player
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stdout = io::stdout();

        info!(
            "Catalog at {}, audio root {}",
            self.settings.database_path.display(),
            self.settings.audio_root.display()
        );
        writeln!(stdout, "melodex - type \"help\" for commands")?;

        // MAIN ROUTINE
        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;

            let Some(line) = shell::next_line(&mut input)? else {
                break;
            };

            match shell::parse_line(&line) {
                Ok(Some(Action::Quit)) => break,
                Ok(Some(action)) => {
                    if let Err(e) = self.handle_action(action, &mut stdout) {
                        writeln!(stdout, "Error: {e}")?;
                    }
                }
                Ok(None) => (),
                Err(e) => writeln!(stdout, "{e}")?,
            }
        }

        self.shutdown();
        Ok(())
    }

    fn shutdown(&mut self) {
        self.player.stop();
        if let Err(e) = self.library.save_volume(self.player.volume()) {
            warn!("Could not save volume: {e}");
        }
        info!("Goodbye");
    }
}

impl Melodex {
    #[rustfmt::skip]
    pub fn handle_action(&mut self, action: Action, out: &mut dyn Write) -> Result<()> {
        match action {
            // Catalog
            Action::Add(song)               => {
                let id = self.library.add_song(song)?;
                writeln!(out, "Added song {id}")?;
            }
            Action::Update(id, song)        => {
                self.library.update_song(id, &song)?;
                writeln!(out, "Updated song {id}")?;
            }
            Action::Delete(id)              => self.delete_song(id, out)?,
            Action::Import(path)            => {
                let report = self.library.import_csv(&path)?;
                writeln!(out, "Imported {} songs, {} failed", report.added, report.failed)?;
            }
            Action::Show(id)                => self.show_song(id, out)?,

            // Queries
            Action::FindTitle(title)        => {
                let ids = self.library.find_ids_by_title(&title)?;
                self.print_songs(&ids, out)?;
            }
            Action::Search(query)           => {
                for hit in self.library.search(&query)? {
                    writeln!(out, "{}", hit.display_line())?;
                }
            }
            Action::Category(dim, value)    => {
                let ids = self.library.find_ids_by_category(dim, &value)?;
                self.print_songs(&ids, out)?;
            }
            Action::ListDimension(dim)      => self.list_dimension(dim, out)?,

            // Player
            Action::Start { source, shuffle } => self.start(source, shuffle, out)?,
            Action::QuickPlay               => self.quick_play(out)?,
            Action::Resume                  => self.player.play(),
            Action::Pause                   => self.player.pause(),
            Action::TogglePause             => self.player.toggle_playback(),
            Action::Stop                    => self.player.stop(),
            Action::PlayNext                => self.step(true, out)?,
            Action::PlayPrev                => self.step(false, out)?,
            Action::Seek(secs)              => {
                if !self.player.seek(secs) {
                    writeln!(out, "Cannot seek right now")?;
                }
            }
            Action::Volume(level)           => {
                self.player.set_volume(level);
                writeln!(out, "Volume {:.0}%", self.player.volume() * 100.0)?;
            }
            Action::Status                  => self.print_status(out)?,

            Action::Help                    => writeln!(out, "{HELP}")?,
            Action::Quit                    => (),
        }
        Ok(())
    }
}

// =============
//    CATALOG
// =============
impl Melodex {
    fn delete_song(&mut self, id: i64, out: &mut dyn Write) -> Result<()> {
        // Deleting the track that is playing ends the session
        if self.player.current_id() == Some(id) {
            self.player.stop();
        }
        self.library.delete_song(id)?;
        writeln!(out, "Deleted song {id}")?;
        Ok(())
    }

    fn show_song(&self, id: i64, out: &mut dyn Write) -> Result<()> {
        let song = self
            .library
            .resolve_song(id)?
            .ok_or_else(|| anyhow!("No song with id {id}"))?;

        writeln!(out, "{}", song.display_line())?;
        writeln!(out, "  Language: {}", song.language)?;
        writeln!(out, "  Genre:    {}", song.genre)?;
        writeln!(out, "  Rating:   {:.1}", song.rating)?;
        writeln!(out, "  File:     {}", song.file_name)?;
        Ok(())
    }

    fn print_songs(&self, ids: &[i64], out: &mut dyn Write) -> Result<()> {
        if ids.is_empty() {
            writeln!(out, "No matching songs")?;
        }
        for &id in ids {
            if let Some(song) = self.library.resolve_song(id)? {
                writeln!(out, "{}", song.display_line())?;
            }
        }
        Ok(())
    }

    /// Always reads the current values; nothing is cached between listings
    fn list_dimension(&self, dim: Dimension, out: &mut dyn Write) -> Result<()> {
        let names = self.library.list_dimension_values(dim)?;
        writeln!(out, "{} ({})", dim.table(), names.len())?;
        for name in names {
            writeln!(out, "  {name}")?;
        }
        Ok(())
    }
}

// ============
//    PLAYER
// ============
impl Melodex {
    fn start(&mut self, source: PlaySource, shuffle: bool, out: &mut dyn Write) -> Result<()> {
        let ids = match source {
            PlaySource::All => self.library.list_all_song_ids()?,
            PlaySource::Ids(ids) => ids,
            PlaySource::Category(dim, value) => self.library.find_ids_by_category(dim, &value)?,
        };

        self.start_session(ids, 0, shuffle, out)
    }

    fn quick_play(&mut self, out: &mut dyn Write) -> Result<()> {
        match self.library.quick_play_selection()? {
            Some((ids, start)) => self.start_session(ids, start, true, out),
            None => {
                writeln!(out, "The catalog is empty")?;
                Ok(())
            }
        }
    }

    fn start_session(
        &mut self,
        ids: Vec<i64>,
        start: usize,
        shuffle: bool,
        out: &mut dyn Write,
    ) -> Result<()> {
        if ids.is_empty() {
            writeln!(out, "No songs to play")?;
            return Ok(());
        }

        match self.player.start(ids, start, shuffle) {
            true => {
                self.player.play();
                self.print_now_playing(out)
            }
            false => {
                writeln!(out, "None of those songs could be played")?;
                Ok(())
            }
        }
    }

    fn step(&mut self, forward: bool, out: &mut dyn Write) -> Result<()> {
        let moved = match forward {
            true => self.player.next(),
            false => self.player.previous(),
        };

        match moved {
            true => self.print_now_playing(out),
            false if self.player.state() == SessionState::Stopped => {
                writeln!(out, "Playback stopped")?;
                Ok(())
            }
            false => {
                writeln!(out, "Nothing is playing")?;
                Ok(())
            }
        }
    }

    fn print_now_playing(&self, out: &mut dyn Write) -> Result<()> {
        if let Some(song) = self.player.status().song {
            writeln!(out, "Now playing {}", song.display_line())?;
        }
        Ok(())
    }

    fn print_status(&self, out: &mut dyn Write) -> Result<()> {
        let status = self.player.status();

        match (&status.song, status.position) {
            (Some(song), Some(pos)) => {
                let total = status
                    .duration
                    .map(get_readable_duration)
                    .unwrap_or_else(|| "?".to_string());

                writeln!(out, "{:?}: {}", status.state, song.display_line())?;
                writeln!(
                    out,
                    "  {} / {}  track {} of {}",
                    get_readable_duration(status.elapsed),
                    total,
                    pos + 1,
                    status.length
                )?;
            }
            _ => writeln!(out, "{:?}", status.state)?,
        }
        writeln!(out, "  Volume {:.0}%", status.volume * 100.0)?;
        Ok(())
    }
}
