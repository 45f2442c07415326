#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed payload{}: {reason}", tile_suffix(.position))]
    MalformedPayload { position: Option<i64>, reason: String },

    #[error("no map pieces to render: whole-map bounds are undefined")]
    EmptyTileSet,

    #[error("invalid viewport: width {width}, height {height} (both must be positive)")]
    InvalidViewport { width: i64, height: i64 },

    #[error("canvas too large: {width}x{height} pixels")]
    CanvasTooLarge { width: u64, height: u64 },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("tile store error: {0}")]
    Store(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("worker pool error: {0}")]
    WorkerPool(String),

    #[error("io error: {0}")]
    Io(String),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload { position: None, reason: reason.into() }
    }

    /// Attach the packed tile position to a payload error that lacks one.
    pub fn at_position(self, packed: i64) -> Self {
        match self {
            Self::MalformedPayload { position: None, reason } => {
                Self::MalformedPayload { position: Some(packed), reason }
            }
            other => other,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e.to_string())
    }
}

fn tile_suffix(position: &Option<i64>) -> String {
    position.map(|p| format!(" for tile {p:#x}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
