//! Request descriptors consumed by the transport.

/// Identifies one remote resource. Clients build these; only the transport
/// knows how they map onto URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum ApiRequest {
    /// Remote configuration document.
    Configuration,
    /// Backdrop image at the given path.
    BackdropImage {
        /// Image path as returned by the catalog (e.g. `/abc.jpg`).
        path: String,
    },
    /// Poster image at the given path.
    PosterImage {
        /// Image path as returned by the catalog (e.g. `/abc.jpg`).
        path: String,
    },
    /// One page of the movie listing.
    MovieListing {
        /// 1-based page number.
        page: u32,
    },
    /// Full movie genre catalog.
    GenreList,
    /// Detail record of one movie.
    MovieDetail {
        /// Movie identifier.
        id: String,
    },
    /// One page of free-text search results.
    Search {
        /// Search text.
        query: String,
        /// 1-based page number.
        page: u32,
    },
}

impl ApiRequest {
    /// Returns `true` for image downloads (served from the image CDN).
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::BackdropImage { .. } | Self::PosterImage { .. })
    }

    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::BackdropImage { .. } => "backdrop image",
            Self::PosterImage { .. } => "poster image",
            Self::MovieListing { .. } => "movie listing",
            Self::GenreList => "genre list",
            Self::MovieDetail { .. } => "movie detail",
            Self::Search { .. } => "movie search",
        }
    }
}
