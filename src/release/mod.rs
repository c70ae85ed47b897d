//! Album records flowing through the pipeline
//!
//! Discovery produces `CandidateRecord`s; enrichment turns each one into an
//! `EnrichedRecord` by attaching the release date read from the album page.

/// An album entry parsed from one row of the catalog search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Band name
    pub band: String,

    /// Album title
    pub album: String,

    /// Genre as listed by the catalog
    pub genre: String,

    /// Record label (empty when the catalog omits it)
    pub label: String,

    /// Absolute URL of the album page, if the row linked to one
    pub detail_url: Option<String>,
}

impl CandidateRecord {
    /// Attaches a release date, consuming the candidate
    pub fn enrich(self, release_date: impl Into<String>) -> EnrichedRecord {
        EnrichedRecord {
            band: self.band,
            album: self.album,
            genre: self.genre,
            label: self.label,
            detail_url: self.detail_url,
            release_date: release_date.into(),
        }
    }
}

/// A candidate with its release date resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub band: String,
    pub album: String,
    pub genre: String,
    pub label: String,
    pub detail_url: Option<String>,

    /// Release date as printed on the album page, or empty if unknown
    pub release_date: String,
}

/// Column headers of the report table, in order
pub const REPORT_COLUMNS: [&str; 5] = [
    "Band",
    "Record Name",
    "Genre",
    "Release Date",
    "Record Label",
];

impl EnrichedRecord {
    /// Projects the record onto the report columns
    pub fn columns(&self) -> [&str; 5] {
        [
            &self.band,
            &self.album,
            &self.genre,
            &self.release_date,
            &self.label,
        ]
    }
}
