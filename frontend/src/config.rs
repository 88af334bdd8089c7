//! Build-time settings and the constants shared by the pages.

/// Backend base URL, overridable at build time (`MAINTRACK_API_URL=… trunk build`).
pub const API_BASE_URL: &str = match option_env!("MAINTRACK_API_URL") {
    Some(url) => url,
    None => "http://localhost:8080/api",
};

/// Console log level: everything in debug builds, `Info` and above otherwise.
pub const fn log_level(debug_build: bool) -> log::Level {
    if debug_build {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

/* local storage keys owned by the session store */
pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const USER_ID_KEY: &str = "userId";

/// Lifetime of a transient notice.
pub const NOTICE_MS: u32 = 6_000;

/// Free-text filters only kick in from this many characters.
pub const SEARCH_MIN_LEN: usize = 2;

pub const AUDIT_PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];
pub const AUDIT_DEFAULT_PAGE_SIZE: usize = 10;

/// Weeks shown by the preventive maintenance grid.
pub const WEEKS_PER_YEAR: u32 = 52;

/// Upper bound on the units of one BOM line.
pub const MAX_BOM_UNITS: u32 = 10_000;
