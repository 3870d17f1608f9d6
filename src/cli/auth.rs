use crate::{
    error, info,
    management::TokenManager,
    spotify::auth::{CallbackServer, login},
    success,
};

pub async fn auth() {
    let manager = TokenManager::from_config();

    match manager.current().await {
        Ok(Some(_)) => {
            info!("Already authorized. Run spotdash logout to authorize again.");
            return;
        }
        Ok(None) => {}
        Err(e) => error!("Cannot read stored token. Err: {}", e),
    }

    let server = match CallbackServer::start(manager.authorize_url().to_string()) {
        Ok(server) => server,
        Err(e) => error!("Cannot start callback server. Err: {}", e),
    };

    match login(&manager, &server).await {
        Ok(Some(_)) => success!("Authorization successful!"),
        Ok(None) => error!("Authorization failed or timed out."),
        Err(e) => error!("Cannot authorize. Err: {}", e),
    }
}
