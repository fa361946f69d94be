//! Progress aggregation helpers.
//!
//! Everything here is pure arithmetic over already-loaded rows; the progress service
//! gathers the rows and shapes the overview.

use crate::model::progress::{CertificateStatusDto, SkillDto};

/// Hours of study that count as full engagement.
const ENGAGEMENT_FULL_HOURS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLevel {
    pub label: &'static str,
    pub percent: i32,
}

/// Skill band for an overall percentage.
pub fn skill_level(percent: f64) -> SkillLevel {
    if !percent.is_finite() || percent <= 0.0 {
        return SkillLevel {
            label: "Beginner",
            percent: 0,
        };
    }
    let label = if percent < 40.0 {
        "Beginner"
    } else if percent < 70.0 {
        "Intermediate"
    } else if percent < 90.0 {
        "Advanced"
    } else {
        "Expert"
    };
    SkillLevel {
        label,
        percent: percent.round() as i32,
    }
}

/// Engagement percentage from learning hours, clamped to [0, 100].
pub fn engagement_percent(hours: f64) -> i32 {
    ((hours / ENGAGEMENT_FULL_HOURS) * 100.0).round().clamp(0.0, 100.0) as i32
}

/// Rounded mean, 0 for an empty set.
pub fn rounded_mean(values: &[f64]) -> i32 {
    if values.is_empty() {
        return 0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).round() as i32
}

pub fn skills(
    avg_completion: i32,
    avg_score: i32,
    learning_hours: f64,
    overall: &SkillLevel,
) -> Vec<SkillDto> {
    let skill = |name: &str, percent: i32, color: &str| SkillDto {
        name: name.to_string(),
        percent,
        color: color.to_string(),
    };

    vec![
        skill("Course Progress", avg_completion, "#1b65d4"),
        skill("Quiz Performance", avg_score, "#2db88e"),
        skill("Engagement", engagement_percent(learning_hours), "#4acb9a"),
        skill("Overall Skill", overall.percent, "#27c5aa"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateStatus {
    Pending,
    Available,
    Downloaded,
}

impl CertificateStatus {
    pub fn of(completion_percentage: i32, downloaded: bool) -> Self {
        match (completion_percentage >= 100, downloaded) {
            (false, _) => Self::Pending,
            (true, false) => Self::Available,
            (true, true) => Self::Downloaded,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Available => "Available",
            Self::Downloaded => "Downloaded",
        }
    }
}

pub fn certificate_status_dto(
    user_course: &crate::server::model::user_course::UserCourse,
    title: Option<String>,
) -> CertificateStatusDto {
    let status = CertificateStatus::of(
        user_course.completion_percentage,
        user_course.certificate_downloaded_at.is_some(),
    );
    CertificateStatusDto {
        id: user_course.id,
        course_id: user_course.course_id,
        title: title.unwrap_or_else(|| "Course".to_string()),
        enrolled_at: user_course.enrollment_date,
        status: status.as_str().to_string(),
    }
}

/// File name offered for a certificate download.
pub fn certificate_file_name(course_title: &str) -> String {
    let safe: String = course_title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_Certificate.pdf", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_bands() {
        assert_eq!(skill_level(0.0), SkillLevel { label: "Beginner", percent: 0 });
        assert_eq!(skill_level(39.6).label, "Beginner");
        assert_eq!(skill_level(40.0).label, "Intermediate");
        assert_eq!(skill_level(70.0).label, "Advanced");
        assert_eq!(skill_level(90.0), SkillLevel { label: "Expert", percent: 90 });
    }

    #[test]
    fn engagement_is_clamped() {
        assert_eq!(engagement_percent(25.0), 50);
        assert_eq!(engagement_percent(120.0), 100);
        assert_eq!(engagement_percent(0.0), 0);
    }

    #[test]
    fn certificate_status_follows_completion_and_download() {
        assert_eq!(CertificateStatus::of(80, false), CertificateStatus::Pending);
        assert_eq!(CertificateStatus::of(100, false), CertificateStatus::Available);
        assert_eq!(CertificateStatus::of(100, true), CertificateStatus::Downloaded);
    }

    #[test]
    fn certificate_file_name_replaces_symbols() {
        assert_eq!(certificate_file_name("Rust 101: Intro"), "Rust_101__Intro_Certificate.pdf");
    }
}
