use crate::{error, management::TokenManager, success};

pub async fn logout() {
    let manager = TokenManager::from_config();
    if let Err(e) = manager.clear().await {
        error!("Cannot clear stored token. Err: {}", e);
    }

    success!("Session token cleared.");
}
