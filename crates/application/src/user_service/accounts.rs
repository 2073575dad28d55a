use super::*;

struct ValidatedProfile {
    username: String,
    email: String,
    full_name: String,
}

fn validate_profile(username: &str, email: &str, full_name: &str) -> AppResult<ValidatedProfile> {
    Ok(ValidatedProfile {
        username: Username::new(username)?.into(),
        email: EmailAddress::new(email)?.into(),
        full_name: normalize_full_name(full_name)?,
    })
}

impl UserService {
    /// Lists users, newest first.
    pub async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        self.user_repository.list_users().await
    }

    /// Returns one user.
    pub async fn get_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    /// Finds a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_username(username.trim()).await
    }

    /// Creates a user with a hashed password.
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<UserRecord> {
        let profile = validate_profile(&input.username, &input.email, &input.full_name)?;
        validate_password(&input.password)?;
        self.ensure_unique(&profile, None).await?;

        let user = UserRecord {
            id: UserId::new(),
            username: profile.username,
            email: profile.email,
            full_name: profile.full_name,
            password_hash: self.password_hasher.hash_password(&input.password)?,
            is_active: input.is_active,
            manager_id: None,
            created_at: Utc::now(),
        };
        self.user_repository.create_user(user.clone()).await?;

        tracing::info!(user_id = %user.id, username = user.username.as_str(), "created user");
        Ok(user)
    }

    /// Replaces a user's profile fields and optionally the password.
    pub async fn update_user(&self, user_id: UserId, input: UpdateUserInput) -> AppResult<UserRecord> {
        let existing = self.get_user(user_id).await?;
        let profile = validate_profile(&input.username, &input.email, &input.full_name)?;
        self.ensure_unique(&profile, Some(user_id)).await?;

        let password_hash = match input.password.as_deref().filter(|password| !password.is_empty()) {
            Some(password) => {
                validate_password(password)?;
                self.password_hasher.hash_password(password)?
            }
            None => existing.password_hash.clone(),
        };

        let user = UserRecord {
            username: profile.username,
            email: profile.email,
            full_name: profile.full_name,
            password_hash,
            is_active: input.is_active,
            ..existing
        };
        self.store(user).await
    }

    /// Activates or deactivates an account.
    pub async fn set_user_active(&self, user_id: UserId, is_active: bool) -> AppResult<UserRecord> {
        let existing = self.get_user(user_id).await?;
        let user = self
            .store(UserRecord {
                is_active,
                ..existing
            })
            .await?;

        tracing::info!(user_id = %user_id, is_active, "changed account status");
        Ok(user)
    }

    /// Maps a user to a line manager, or clears the mapping.
    pub async fn assign_manager(
        &self,
        user_id: UserId,
        manager_id: Option<UserId>,
    ) -> AppResult<UserRecord> {
        let existing = self.get_user(user_id).await?;

        if let Some(manager_id) = manager_id {
            if manager_id == user_id {
                return Err(AppError::Validation(
                    "a user cannot manage themselves".to_owned(),
                ));
            }

            if self.user_repository.find_by_id(manager_id).await?.is_none() {
                return Err(AppError::ParentNotFound(format!(
                    "manager '{manager_id}' does not exist"
                )));
            }
        }

        self.store(UserRecord {
            manager_id,
            ..existing
        })
        .await
    }

    /// Deletes a user; reports lose their manager mapping.
    pub async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        if !self.user_repository.delete_user(user_id).await? {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        tracing::info!(user_id = %user_id, "deleted user");
        Ok(())
    }

    async fn store(&self, user: UserRecord) -> AppResult<UserRecord> {
        if !self.user_repository.update_user(user.clone()).await? {
            return Err(AppError::NotFound(format!("user '{}' does not exist", user.id)));
        }

        Ok(user)
    }

    async fn ensure_unique(
        &self,
        profile: &ValidatedProfile,
        exclude: Option<UserId>,
    ) -> AppResult<()> {
        if let Some(holder) = self
            .user_repository
            .find_by_username(&profile.username)
            .await?
            && Some(holder.id) != exclude
        {
            return Err(AppError::AlreadyExists("username already exists".to_owned()));
        }

        if let Some(holder) = self.user_repository.find_by_email(&profile.email).await?
            && Some(holder.id) != exclude
        {
            return Err(AppError::AlreadyExists("email already exists".to_owned()));
        }

        Ok(())
    }
}
