//! Sync strategy used by `outpost watch`.

/// How local changes reach the instance on each watch iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Two-way reconciliation (`unison`), newer copy wins.
    Bidirectional,
    /// One-way mirror from local to remote (`rsync`).
    OneWayPush,
}

impl SyncStrategy {
    /// Strategy to fall back to when this one fails, if any.
    ///
    /// The downgrade is one-way: `OneWayPush` has no fallback.
    #[must_use]
    pub fn fallback(self) -> Option<Self> {
        match self {
            Self::Bidirectional => Some(Self::OneWayPush),
            Self::OneWayPush => None,
        }
    }

    /// Short name used in progress messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Bidirectional => "sync",
            Self::OneWayPush => "push",
        }
    }
}

/// Line prefixes unison prints while propagating, on either stream.
///
/// With `-terse` these are the only lines that mean something moved; status
/// chatter ("Nothing to do", "Looking for changes") and ssh warnings are not.
const UNISON_CHANGE_MARKERS: [&str; 4] = ["[BGN]", "[END]", "[CONFLICT]", "Propagating updates"];

impl SyncStrategy {
    /// Whether a finished run transferred anything.
    ///
    /// `rsync --itemize-changes` prints one stdout line per transferred file
    /// and nothing else. `unison` reports propagation on stderr, so both
    /// streams are scanned for its change markers.
    #[must_use]
    pub fn reports_changes(self, stdout: &str, stderr: &str) -> bool {
        match self {
            Self::OneWayPush => stdout.lines().any(|line| !line.trim().is_empty()),
            Self::Bidirectional => stdout.lines().chain(stderr.lines()).any(|line| {
                let line = line.trim_start();
                UNISON_CHANGE_MARKERS
                    .iter()
                    .any(|marker| line.starts_with(marker))
            }),
        }
    }
}
