use super::{Database, queries::*};
use crate::{
    domain::{Dimension, SearchHit, SongRecord, format_text},
    error::CatalogResult,
};
use rusqlite::OptionalExtension;

/// Ranking bucket of a title search hit. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum MatchTier {
    /// Title opens with the query as a whole word
    Prefix,
    /// Query appears as a whole word after a space
    Word,
    /// Title opens with the query, which ends mid-word
    PartialPrefix,
    /// Any other substring hit
    Substring,
}

impl Database {
    pub fn find_ids_by_title(&mut self, title: &str) -> CatalogResult<Vec<i64>> {
        let canonical = format_text(title);
        if canonical.is_empty() {
            return Ok(Vec::new());
        }

        let ids = self
            .conn
            .prepare_cached(FIND_IDS_BY_TITLE)?
            .query_map([canonical], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    /// Song ids whose `dim` name matches `value`, ignoring case
    pub fn find_ids_by_category(&mut self, dim: Dimension, value: &str) -> CatalogResult<Vec<i64>> {
        let canonical = format_text(value);
        if canonical.is_empty() {
            return Ok(Vec::new());
        }

        let ids = self
            .conn
            .prepare_cached(songs_by_dimension(dim))?
            .query_map([canonical], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    /// Substring search over titles, ordered for typeahead display.
    ///
    /// Hits are bucketed by [`MatchTier`]; inside a bucket shorter titles come
    /// first, then titles are compared alphabetically, then by id.
    pub fn search_by_title_like(&mut self, query: &str) -> CatalogResult<Vec<SearchHit>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare_cached(SEARCH_CANDIDATES)?;
        let rows = stmt.query_map([], |row| {
            Ok(SearchHit {
                id: row.get("id")?,
                title: row.get("title")?,
                artist: row.get("artist")?,
            })
        })?;

        let mut ranked = Vec::new();
        for row in rows {
            let hit = row?;
            if let Some(tier) = match_tier(&hit.title.to_lowercase(), &query) {
                ranked.push((tier, hit.title.chars().count(), hit));
            }
        }

        ranked.sort_by(|a, b| {
            (a.0, a.1, &a.2.title, a.2.id).cmp(&(b.0, b.1, &b.2.title, b.2.id))
        });

        Ok(ranked.into_iter().map(|(_, _, hit)| hit).collect())
    }

    pub fn resolve_song(&mut self, id: i64) -> CatalogResult<Option<SongRecord>> {
        let record = self
            .conn
            .prepare_cached(RESOLVE_SONG)?
            .query_row([id], |row| {
                Ok(SongRecord {
                    id: row.get("id")?,
                    title: row.get("title")?,
                    artist: row.get("artist")?,
                    language: row.get("language")?,
                    genre: row.get("genre")?,
                    rating: row.get("rating")?,
                    file_name: row.get("file_name")?,
                })
            })
            .optional()?;

        Ok(record)
    }

    /// Every name stored for `dim`, ascending. Always a fresh read.
    pub fn list_dimension_values(&mut self, dim: Dimension) -> CatalogResult<Vec<String>> {
        let names = self
            .conn
            .prepare_cached(dimension_names(dim))?
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(names)
    }

    pub fn list_all_song_ids(&mut self) -> CatalogResult<Vec<i64>> {
        let ids = self
            .conn
            .prepare_cached(GET_ALL_IDS)?
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    pub fn count_dimension_rows(&mut self, dim: Dimension) -> CatalogResult<usize> {
        let count: i64 = self
            .conn
            .query_row(count_dimension(dim), [], |row| row.get(0))?;

        Ok(count as usize)
    }
}

/// Both arguments are expected lowercased.
pub(crate) fn match_tier(title: &str, query: &str) -> Option<MatchTier> {
    if query.is_empty() || !title.contains(query) {
        return None;
    }

    let ends_on_boundary = |start: usize| {
        title[start + query.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric())
    };

    let is_prefix = title.starts_with(query);
    if is_prefix && ends_on_boundary(0) {
        return Some(MatchTier::Prefix);
    }

    let after_space = title
        .match_indices(query)
        .any(|(idx, _)| idx > 0 && title[..idx].ends_with(' ') && ends_on_boundary(idx));

    match (after_space, is_prefix) {
        (true, _) => Some(MatchTier::Word),
        (false, true) => Some(MatchTier::PartialPrefix),
        (false, false) => Some(MatchTier::Substring),
    }
}
