// User-facing text for the inline message region and the welcome banner.
// Every string the user can see is defined here.

pub const NOT_AUTHENTICATED: &str = "Not authenticated. Please log in.";

/// Shown on success when the service does not supply its own message.
pub const DEFAULT_SUCCESS: &str = "Resume generated successfully!";

/// Shown on a failure status when the service does not supply an error.
pub const DEFAULT_FAILURE: &str = "Failed to generate resume. Please try again.";

pub const NETWORK_FAILURE: &str = "An unexpected network error occurred. Please try again later.";

pub const DOWNLOAD_LINK_TEXT: &str = "Download Resume Here";

pub fn welcome(local_part: &str) -> String {
    format!("Welcome, {local_part}! Build Your Professional Resume")
}
