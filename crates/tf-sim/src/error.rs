/// Convenience result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while loading definitions or running the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// An actor definition name was not found.
    #[error("unknown actor definition: {0}")]
    UnknownActor(String),

    /// A weapon definition name was not found.
    #[error("unknown weapon definition: {0}")]
    UnknownWeapon(String),

    /// A map definition name was not found.
    #[error("unknown map definition: {0}")]
    UnknownMap(String),

    /// A map layout used a glyph no tile definition claims.
    #[error("map '{map}' uses undefined tile glyph '{glyph}' at column {column}, row {row}")]
    UnknownTileGlyph {
        /// The map being built.
        map: String,
        /// The unrecognised glyph.
        glyph: char,
        /// Column in the layout text.
        column: usize,
        /// Row in the layout text.
        row: usize,
    },

    /// A map layout is empty or ragged.
    #[error("invalid map '{map}': {reason}")]
    InvalidMap {
        /// The map being built.
        map: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two definitions of the same kind share a name (or glyph, for tiles).
    #[error("duplicate {kind} definition: {name}")]
    DuplicateDefinition {
        /// Which table the duplicate was found in.
        kind: &'static str,
        /// The repeated name.
        name: String,
    },

    /// Every actor slot is occupied.
    #[error("actor slots exhausted ({0} live actors)")]
    SlotsExhausted(usize),

    /// The map has nowhere to put a player.
    #[error("map '{0}' has no player starts")]
    NoPlayerStart(String),

    /// A player index did not name a player controller.
    #[error("no player with index {0}")]
    UnknownPlayer(usize),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The definitions file is not valid JSON for the expected schema.
    #[error("failed to parse definitions: {0}")]
    Parse(#[from] serde_json::Error),
}
