use super::*;

const LOGIN_FAILED_MESSAGE: &str = "incorrect username or password";

impl UserService {
    /// Verifies a username and password, as used by session sign-in.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> AppResult<UserRecord> {
        let Some(user) = self.user_repository.find_by_username(username.trim()).await? else {
            // Keep response time close to the known-user path.
            let _ = self.password_hasher.hash_password(password);
            return Err(login_failed());
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            tracing::warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(login_failed());
        }

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "login rejected: inactive account");
            return Err(login_failed());
        }

        Ok(user)
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<IssuedAccessToken> {
        let user = self.verify_credentials(username, password).await?;

        let (access_token, token_hash) = generate_token()?;
        let expires_at = Utc::now() + self.access_token_ttl;
        self.access_token_repository
            .store_token(user.id, &token_hash, expires_at)
            .await?;

        tracing::info!(user_id = %user.id, "issued access token");
        Ok(IssuedAccessToken {
            access_token,
            expires_at,
            user,
        })
    }

    /// Revokes a bearer token. Unknown tokens are ignored.
    pub async fn logout(&self, raw_token: &str) -> AppResult<()> {
        if self
            .access_token_repository
            .revoke_token(&hash_token(raw_token))
            .await?
        {
            tracing::info!("revoked access token");
        }

        Ok(())
    }
}

fn login_failed() -> AppError {
    AppError::Unauthenticated(LOGIN_FAILED_MESSAGE.to_owned())
}
