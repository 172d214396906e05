//! User-facing media sync texts.

pub const DISABLED: &str = "Media syncing disabled.";
pub const STARTING: &str = "Media sync starting...";
pub const ABORTING: &str = "Media sync aborting...";
pub const ABORTED: &str = "Media sync aborted.";
pub const FAILED: &str = "Media sync failed.";
pub const COMPLETE: &str = "Media sync complete.";

pub const AUTH_FAILED: &str = "AnkiWeb ID or password was incorrect; please try again.";
pub const SERVER_ERROR: &str = "AnkiWeb encountered a problem. Please try again in a few minutes.";
pub const MEDIA_CHECK_REQUIRED: &str = "Please use the Tools>Check Media menu option.";
pub const RESYNC_REQUIRED: &str =
    "Please sync again, and post on the support forum if this message keeps appearing.";
pub const CHECK_CONNECTION: &str = "Syncing failed; please check your internet connection.";

pub fn unexpected_error(detail: &str) -> String {
    format!("Unexpected error: {detail}")
}

pub fn connection_error(detail: &str) -> String {
    format!("{CHECK_CONNECTION}\n\nDetailed error: {detail}")
}

pub fn media_database_error(detail: &str) -> String {
    format!("Problem accessing the media database: {detail}")
}
