use super::{Action, PlaySource};
use crate::domain::{Dimension, NewSong, SongUpdate};
use anyhow::{Context, Result, anyhow, bail};
use std::io::BufRead;

const FIELD_SEPARATOR: char = '|';

/// Read one line of input. `None` at end of input.
pub fn next_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

/// Turn a command line into an [`Action`]. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Action>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    let action = match command.to_lowercase().as_str() {
        "add" => Action::Add(parse_new_song(rest)?),
        "update" => {
            let (id, fields) = rest
                .split_once(FIELD_SEPARATOR)
                .ok_or_else(|| anyhow!("Usage: update <id> | <title> | <artist> | <language> | <genre> | <rating>"))?;
            let song = parse_new_song(fields)?;
            if !song.file_name.is_empty() {
                bail!("The file path cannot be changed after a song is added");
            }
            Action::Update(parse_id(id)?, SongUpdate::from(song))
        }
        "delete" | "rm" => Action::Delete(parse_id(rest)?),
        "import" => Action::Import(required(rest, "import <file.csv>")?.into()),
        "show" => Action::Show(parse_id(rest)?),

        "find" => Action::FindTitle(required(rest, "find <title>")?.to_string()),
        "search" | "s" => Action::Search(required(rest, "search <text>")?.to_string()),
        "category" | "cat" => {
            let (dim, value) = parse_category(rest)?;
            Action::Category(dim, value)
        }
        "list" | "ls" => Action::ListDimension(required(rest, "list <dimension>")?.parse()?),

        "play" if rest.is_empty() => Action::Resume,
        "play" => Action::Start {
            source: parse_source(rest)?,
            shuffle: false,
        },
        "shuffle" => Action::Start {
            source: match rest.is_empty() {
                true => PlaySource::All,
                false => parse_source(rest)?,
            },
            shuffle: true,
        },
        "quick" => Action::QuickPlay,
        "resume" => Action::Resume,
        "pause" => Action::Pause,
        "toggle" | "p" => Action::TogglePause,
        "stop" => Action::Stop,
        "next" | "n" => Action::PlayNext,
        "prev" | "previous" => Action::PlayPrev,
        "seek" => Action::Seek(parse_timestamp(required(rest, "seek <secs | m:ss>")?)?),
        "vol" | "volume" => {
            let percent = required(rest, "vol <0-100>")?
                .parse::<f32>()
                .with_context(|| format!("Invalid volume \"{rest}\""))?;
            Action::Volume(percent / 100.0)
        }
        "status" => Action::Status,

        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => bail!("Unknown command \"{other}\", try \"help\""),
    };

    Ok(Some(action))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    match rest.is_empty() {
        true => Err(anyhow!("Usage: {usage}")),
        false => Ok(rest),
    }
}

fn parse_id(s: &str) -> Result<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .with_context(|| format!("Invalid song id \"{s}\""))
}

fn parse_new_song(fields: &str) -> Result<NewSong> {
    let parts: Vec<&str> = fields.split(FIELD_SEPARATOR).map(str::trim).collect();
    if !(5..=6).contains(&parts.len()) {
        bail!("Expected <title> | <artist> | <language> | <genre> | <rating> [| <path>]");
    }

    let rating = parts[4]
        .parse::<f64>()
        .with_context(|| format!("Invalid rating \"{}\"", parts[4]))?;

    let song = NewSong::new(parts[0], parts[1], parts[2], parts[3], rating);
    Ok(match parts.get(5) {
        Some(path) => song.with_file(*path),
        None => song,
    })
}

fn parse_category(rest: &str) -> Result<(Dimension, String)> {
    let (dim, value) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("Usage: category <artist|language|genre> <value>"))?;

    Ok((dim.parse()?, value.trim().to_string()))
}

fn parse_source(rest: &str) -> Result<PlaySource> {
    if rest.eq_ignore_ascii_case("all") {
        return Ok(PlaySource::All);
    }

    let first = rest.split_whitespace().next().unwrap_or_default();
    if first.parse::<i64>().is_ok() {
        let ids = rest
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(parse_id)
            .collect::<Result<Vec<_>>>()?;
        return Ok(PlaySource::Ids(ids));
    }

    let (dim, value) = parse_category(rest)?;
    Ok(PlaySource::Category(dim, value))
}

/// `90`, `90.5` or `1:30`
fn parse_timestamp(s: &str) -> Result<f64> {
    let parsed = match s.split_once(':') {
        Some((mins, secs)) => {
            let mins = mins.parse::<u32>().ok();
            let secs = secs.parse::<f64>().ok();
            mins.zip(secs).map(|(m, s)| m as f64 * 60.0 + s)
        }
        None => s.parse::<f64>().ok(),
    };

    parsed.ok_or_else(|| anyhow!("Invalid timestamp \"{s}\""))
}
