use super::Library;
use crate::{
    domain::NewSong,
    error::{CatalogError, CatalogResult},
};
use log::{info, warn};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

const FIELD_COUNT: usize = 6;

/// Outcome of a batch import
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub failed: usize,
}

impl Library {
    /// Import comma separated records, one song per record.
    ///
    /// Records are validated and committed independently: a malformed line
    /// or a failed insert counts as a failure and the batch carries on.
    pub fn import_batch<I, S>(&self, records: I) -> ImportReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ImportReport::default();

        for (line_no, record) in records.into_iter().enumerate() {
            let record = record.as_ref();

            let song = match parse_record(record) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Skipping line {}: {e} ({record:?})", line_no + 1);
                    report.failed += 1;
                    continue;
                }
            };

            match self.add_song(song) {
                Ok(_) => report.added += 1,
                Err(_) => report.failed += 1,
            }
        }

        info!(
            "Import finished: {} added, {} failed",
            report.added, report.failed
        );
        report
    }

    /// Read `path` line by line and hand the lines to [`Library::import_batch`].
    pub fn import_csv<P: AsRef<Path>>(&self, path: P) -> CatalogResult<ImportReport> {
        let file = File::open(path.as_ref())?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<String>, _>>()?;

        Ok(self.import_batch(lines))
    }
}

/// `title,artist[ - featured],language,genre,rating,reserved`
///
/// The returned song has no file name; the library's default path rule
/// applies.
pub(crate) fn parse_record(line: &str) -> CatalogResult<NewSong> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != FIELD_COUNT {
        return Err(CatalogError::validation(format!(
            "expected {FIELD_COUNT} fields, found {}",
            parts.len()
        )));
    }

    let title = parts[0].trim();
    let artist = primary_artist(parts[1]);
    let rating = parts[4]
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .ok_or_else(|| CatalogError::validation(format!("bad rating \"{}\"", parts[4].trim())))?;

    Ok(NewSong::new(
        title,
        artist,
        parts[2].trim(),
        parts[3].trim(),
        rating,
    ))
}

/// `"Primary - Featured"` keeps only the text before the first hyphen
fn primary_artist(field: &str) -> &str {
    match field.split_once('-') {
        Some((primary, _)) => primary.trim(),
        None => field.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{database::Database, domain::Dimension};
    use std::io::Write;

    fn library() -> Library {
        Library::new(Database::open_in_memory().unwrap(), "data/audiofiles")
    }

    #[test]
    fn parses_a_well_formed_record() {
        let song = parse_record(" Perfect , Ed Sheeran - Beyoncé ,english,POP, 4.5 ,ignored").unwrap();

        assert_eq!(song.title, "Perfect");
        assert_eq!(song.artist, "Ed Sheeran");
        assert_eq!(song.language, "english");
        assert_eq!(song.genre, "POP");
        assert_eq!(song.rating, 4.5);
        assert!(song.file_name.is_empty());
    }

    #[test]
    fn rejects_wrong_field_count_and_bad_rating() {
        assert!(matches!(parse_record("a,b,c,d,5"), Err(CatalogError::Validation(_))));
        assert!(matches!(parse_record("a,b,c,d,5,x,y"), Err(CatalogError::Validation(_))));
        assert!(matches!(parse_record(""), Err(CatalogError::Validation(_))));
        assert!(matches!(parse_record("a,b,c,d,five,x"), Err(CatalogError::Validation(_))));
        assert!(matches!(parse_record("a,b,c,d,NaN,x"), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn batch_skips_bad_lines_and_keeps_going() {
        let lib = library();
        let report = lib.import_batch([
            "Halo,Beyoncé,English,Pop,4.8,x",
            "broken line",
            "Titanium,David Guetta - Sia,English,EDM,4.2,x",
            "Bad Rating,Someone,English,Pop,high,x",
            "Tum Hi Ho,Arijit Singh,Hindi,Romantic,4.9,x",
        ]);

        assert_eq!(report, ImportReport { added: 3, failed: 2 });
        assert_eq!(
            lib.list_dimension_values(Dimension::Artist).unwrap(),
            vec!["Arijit Singh", "Beyoncé", "David Guetta"]
        );

        let id = lib.find_ids_by_title("titanium").unwrap()[0];
        let record = lib.resolve_song(id).unwrap().unwrap();
        assert_eq!(
            Path::new(&record.file_name),
            Path::new("data/audiofiles").join("Titanium.mp3")
        );
    }

    #[test]
    fn imports_from_file() {
        let lib = library();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "One,U2,English,Rock,4.0,x").unwrap();
        writeln!(file, "Two,U2,English,Rock,3.0").unwrap();

        let report = lib.import_csv(file.path()).unwrap();
        assert_eq!(report, ImportReport { added: 1, failed: 1 });
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let lib = library();
        let err = lib.import_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
