#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    TogglePause,
    /// Shorten the refresh interval.
    SpeedUp,
    /// Lengthen the refresh interval.
    SlowDown,
    None,
}
