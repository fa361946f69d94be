//! Profile pages, photo uploads, streak and weekly counters for the signed-in user.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{achievement::AchievementRepository, user::UserRepository, user_course::UserCourseRepository},
    error::AppError,
    model::{
        progress::rounded_mean,
        user::{ProfileStats, UpdateUserParams, User, WeeklyStats},
    },
    service::media::MediaStore,
};

/// Uploaded image as received from the multipart body.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require_user(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Loads the user together with their learning counters.
    ///
    /// # Returns
    /// - `Ok((User, ProfileStats))` - Profile and counters
    /// - `Err(AppError::NotFound)` - The user no longer exists
    pub async fn profile(&self, user_id: i32) -> Result<(User, ProfileStats), AppError> {
        let user = self.require_user(user_id).await?;

        let courses = UserCourseRepository::new(self.db).find_by_user(user_id).await?;
        let achievements_count = AchievementRepository::new(self.db)
            .count_by_user(user_id)
            .await?;

        let completions: Vec<f64> = courses
            .iter()
            .map(|c| c.completion_percentage as f64)
            .collect();

        let stats = ProfileStats {
            total_courses: courses.len() as u64,
            hours_learned: user.total_hours_learned,
            achievements_count,
            average_score: rounded_mean(&completions),
        };

        Ok((user, stats))
    }

    /// Updates name, phone, location and bio. Absent fields are left untouched.
    pub async fn update_profile(
        &self,
        user_id: i32,
        full_name: Option<String>,
        phone: Option<String>,
        location: Option<String>,
        bio: Option<String>,
    ) -> Result<User, AppError> {
        if full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::BadRequest("Full name cannot be empty".to_string()));
        }

        UserRepository::new(self.db)
            .update(
                user_id,
                UpdateUserParams {
                    full_name: full_name.map(|n| n.trim().to_string()),
                    phone,
                    location,
                    bio,
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Stores a new profile photo and records its URL as the avatar.
    ///
    /// # Returns
    /// - `Ok(String)` - Public URL of the uploaded photo
    /// - `Err(AppError::NotFound)` - The user no longer exists
    /// - `Err(AppError::InternalError)` - The upload failed
    pub async fn upload_photo(
        &self,
        user_id: i32,
        upload: PhotoUpload,
        media: &MediaStore,
    ) -> Result<String, AppError> {
        self.require_user(user_id).await?;

        let url = media
            .upload_profile_photo(user_id, upload.bytes, upload.file_name, upload.content_type)
            .await
            .map_err(|e| {
                tracing::error!("Profile photo upload for user {} failed: {}", user_id, e);
                AppError::InternalError("Failed to upload photo".to_string())
            })?;

        UserRepository::new(self.db)
            .update(
                user_id,
                UpdateUserParams {
                    avatar: Some(url.clone()),
                    ..Default::default()
                },
            )
            .await?;

        Ok(url)
    }

    pub async fn streak(&self, user_id: i32) -> Result<User, AppError> {
        self.require_user(user_id).await
    }

    pub async fn weekly_stats(&self, user_id: i32) -> Result<WeeklyStats, AppError> {
        Ok(self.require_user(user_id).await?.weekly_stats)
    }

    pub async fn set_weekly_stats(
        &self,
        user_id: i32,
        stats: WeeklyStats,
    ) -> Result<WeeklyStats, AppError> {
        let user = UserRepository::new(self.db)
            .set_weekly_stats(user_id, stats)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.weekly_stats)
    }
}
