use crate::error::CatalogError;
use std::{fmt, str::FromStr};

/// One of the three classification axes of a song. Each axis is backed by
/// its own de-duplicated name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Artist,
    Language,
    Genre,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Artist, Dimension::Language, Dimension::Genre];

    pub fn table(&self) -> &'static str {
        match self {
            Dimension::Artist => "artists",
            Dimension::Language => "languages",
            Dimension::Genre => "genres",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Artist => "artist",
            Dimension::Language => "language",
            Dimension::Genre => "genre",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Dimension {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artist" | "artists" => Ok(Dimension::Artist),
            "language" | "languages" => Ok(Dimension::Language),
            "genre" | "genres" => Ok(Dimension::Genre),
            other => Err(CatalogError::validation(format!(
                "unknown category \"{other}\" (expected artist, language or genre)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_singular_and_plural_keys() {
        assert_eq!("Artist".parse::<Dimension>().unwrap(), Dimension::Artist);
        assert_eq!("languages".parse::<Dimension>().unwrap(), Dimension::Language);
        assert_eq!(" GENRE ".parse::<Dimension>().unwrap(), Dimension::Genre);
    }

    #[test]
    fn unknown_key_is_a_validation_failure() {
        let err = "album".parse::<Dimension>().unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn maps_to_backing_table() {
        for dim in Dimension::ALL {
            assert!(dim.table().starts_with(dim.label()));
        }
    }
}
