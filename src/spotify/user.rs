use reqwest::Method;

use crate::{
    error::Result,
    spotify::SpotifyClient,
    types::{UserInfo, UserProfileResponse},
};

pub async fn current_user(client: &SpotifyClient, token: &str) -> Result<UserInfo> {
    let response = client.call(Method::GET, "me", &[], token, None).await?;
    let profile = response.json::<UserProfileResponse>().await?;

    Ok(UserInfo {
        display_name: profile
            .display_name
            .unwrap_or_else(|| "userName".to_string()),
        id: profile.id,
        uri: profile.uri,
    })
}
