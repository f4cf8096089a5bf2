/// Seconds between displayed-progress ticks.
pub const TICK_INTERVAL: f32 = 0.02;

/// Percentage added per tick while catching up to the real progress.
pub const CATCH_UP_STEP: f32 = 5.0;

/// Fraction of the remaining gap closed per tick when far behind.
pub const CATCH_UP_RATIO: f32 = 0.2;

/// Minimum percentage added per tick even when the real progress stalls.
pub const MIN_INCREMENT: f32 = 0.15;

/// Displayed progress never passes this until loading has really finished.
pub const HOLD_CEILING: f32 = 99.0;

/// Seconds between reaching 100% and signalling ready.
pub const SETTLE_DELAY: f32 = 0.5;

/// Seconds after which ready is forced even if assets never finish.
pub const MAX_WAIT: f32 = 12.0;

/// Seconds between loading progress notifications to the host.
pub const NOTIFY_INTERVAL: f32 = 0.1;

/// Path of the site content manifest, relative to the asset root.
pub const CONTENT_MANIFEST_PATH: &str = "content/site.json";
