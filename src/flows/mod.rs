pub mod reset;

use crate::client::LaunchClient;
use crate::notice::Notice;

pub use reset::{ResetFlow, ResetPress, ResetState};

pub const BACKGROUND_RESET_NOTICE: &str = "Successfully reverted to the default background.";

/// Reverts the menu background and reports the outcome as a notice.
pub fn revert_background(client: &LaunchClient) -> Notice {
    match client.reset_background() {
        Ok(_) => Notice::success(BACKGROUND_RESET_NOTICE),
        Err(err) => Notice::from(&err),
    }
}
