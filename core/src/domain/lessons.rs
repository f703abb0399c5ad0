//! # Courses and lessons
//!
//! The API returns a course's lessons under either `video_lessons` or
//! `videos`, with `title`/`name` and `video_url`/`video` used
//! interchangeably and media paths relative to the storage host. Everything
//! is normalized into [`Course`] and [`Lesson`] here, once, so nothing past
//! this module ever checks which shape it got.

use log::{debug, info};
use shared::{Course, Lesson, RawCourse, RawLesson};
use std::sync::Arc;

use crate::io::rest::{ApiError, BrainBridgeApi};

/// Join a media path onto the media base URL. Absolute URLs pass through.
pub fn resolve_media_url(media_base_url: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;

    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        return Some(path.to_string());
    }

    Some(format!(
        "{}/{}",
        media_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

/// Ordered lessons of `course`, taken from whichever lesson list is non-empty
pub fn normalize_lessons(course: &RawCourse, media_base_url: &str) -> Vec<Lesson> {
    let raw: &[RawLesson] = [&course.video_lessons, &course.videos]
        .into_iter()
        .flatten()
        .find(|lessons| !lessons.is_empty())
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut lessons: Vec<Lesson> = raw
        .iter()
        .enumerate()
        .map(|(index, lesson)| normalize_lesson(lesson, index, media_base_url))
        .collect();

    // Stable: lessons without an explicit position keep their list order
    lessons.sort_by_key(|lesson| lesson.position);
    lessons
}

fn normalize_lesson(raw: &RawLesson, index: usize, media_base_url: &str) -> Lesson {
    let position = raw.position.unwrap_or(index as u32 + 1);
    let title = [&raw.title, &raw.name]
        .into_iter()
        .flatten()
        .map(|t| t.trim())
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Lesson {}", position));
    let source = raw.video_url.as_deref().or(raw.video.as_deref());

    Lesson {
        id: raw.id,
        title,
        video_url: resolve_media_url(media_base_url, source),
        duration_seconds: raw.duration,
        position,
    }
}

pub fn normalize_course(raw: RawCourse, media_base_url: &str) -> Course {
    let lessons = normalize_lessons(&raw, media_base_url);
    debug!("Normalized course {} with {} lessons", raw.id, lessons.len());

    Course {
        id: raw.id,
        thumbnail_url: resolve_media_url(media_base_url, raw.thumbnail.as_deref()),
        title: raw.title,
        description: raw.description,
        price: raw.price,
        teacher: raw.teacher,
        subject: raw.subject,
        lessons,
    }
}

/// Course catalogue access; every course leaving this service is normalized
#[derive(Clone)]
pub struct CourseService {
    api: Arc<dyn BrainBridgeApi>,
    media_base_url: String,
}

impl CourseService {
    pub fn new(api: Arc<dyn BrainBridgeApi>, media_base_url: impl Into<String>) -> Self {
        Self {
            api,
            media_base_url: media_base_url.into(),
        }
    }

    pub async fn list_public_courses(&self) -> Result<Vec<Course>, ApiError> {
        let courses = self.api.get_public_courses().await?;
        Ok(self.normalize_all(courses))
    }

    pub async fn get_public_course(&self, course_id: i64) -> Result<Course, ApiError> {
        let course = self.api.get_public_course(course_id).await?;
        Ok(normalize_course(course, &self.media_base_url))
    }

    /// Courses owned by the signed-in teacher
    pub async fn list_my_courses(&self) -> Result<Vec<Course>, ApiError> {
        let courses = self.api.get_courses().await?;
        Ok(self.normalize_all(courses))
    }

    pub async fn delete_course(&self, course_id: i64) -> Result<(), ApiError> {
        self.api.delete_course(course_id).await?;
        info!("Deleted course {}", course_id);
        Ok(())
    }

    fn normalize_all(&self, courses: Vec<RawCourse>) -> Vec<Course> {
        courses
            .into_iter()
            .map(|course| normalize_course(course, &self.media_base_url))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    const MEDIA: &str = "https://cdn.example.com/storage/";

    fn raw_lesson(id: i64, title: Option<&str>, position: Option<u32>) -> RawLesson {
        RawLesson {
            id,
            title: title.map(str::to_string),
            name: None,
            video_url: None,
            video: None,
            duration: None,
            position,
        }
    }

    fn raw_course(id: i64) -> RawCourse {
        RawCourse {
            id,
            title: format!("Course {}", id),
            description: None,
            thumbnail: None,
            price: None,
            teacher: None,
            subject: None,
            video_lessons: None,
            videos: None,
        }
    }

    #[test]
    fn test_resolve_media_url() {
        assert_eq!(
            resolve_media_url(MEDIA, Some("/videos/a.mp4")).as_deref(),
            Some("https://cdn.example.com/storage/videos/a.mp4")
        );
        assert_eq!(
            resolve_media_url(MEDIA, Some("https://youtube.com/x")).as_deref(),
            Some("https://youtube.com/x")
        );
        assert_eq!(resolve_media_url(MEDIA, Some("  ")), None);
        assert_eq!(resolve_media_url(MEDIA, None), None);
    }

    #[test]
    fn test_lessons_fall_back_to_videos_when_primary_list_is_empty() {
        let mut course = raw_course(1);
        course.video_lessons = Some(vec![]);
        let mut lesson = raw_lesson(10, None, None);
        lesson.name = Some("Intro".to_string());
        lesson.video = Some("videos/intro.mp4".to_string());
        course.videos = Some(vec![lesson]);

        let lessons = normalize_lessons(&course, MEDIA);

        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].title, "Intro");
        assert_eq!(
            lessons[0].video_url.as_deref(),
            Some("https://cdn.example.com/storage/videos/intro.mp4")
        );
        assert_eq!(lessons[0].position, 1);
    }

    #[test]
    fn test_lessons_are_ordered_by_position() {
        let mut course = raw_course(1);
        course.video_lessons = Some(vec![
            raw_lesson(1, Some("Third"), Some(3)),
            raw_lesson(2, Some("First"), Some(1)),
            raw_lesson(3, None, Some(2)),
        ]);

        let lessons = normalize_lessons(&course, MEDIA);
        let titles: Vec<&str> = lessons.iter().map(|l| l.title.as_str()).collect();

        assert_eq!(titles, vec!["First", "Lesson 2", "Third"]);
    }

    #[test]
    fn test_course_without_lessons() {
        let course = normalize_course(raw_course(4), MEDIA);
        assert!(course.lessons.is_empty());
        assert_eq!(course.thumbnail_url, None);
    }

    #[tokio::test]
    async fn test_service_normalizes_courses() {
        let api = Arc::new(FakeApi::new());
        let mut course = raw_course(7);
        course.thumbnail = Some("thumbs/7.png".to_string());
        course.videos = Some(vec![raw_lesson(1, Some("Only"), None)]);
        api.courses.lock().unwrap().push(course);

        let service = CourseService::new(api.clone(), MEDIA);
        let courses = service.list_public_courses().await.unwrap();

        assert_eq!(courses.len(), 1);
        assert_eq!(
            courses[0].thumbnail_url.as_deref(),
            Some("https://cdn.example.com/storage/thumbs/7.png")
        );
        assert_eq!(courses[0].lessons[0].title, "Only");

        let single = service.get_public_course(7).await.unwrap();
        assert_eq!(single, courses[0]);
    }

    #[tokio::test]
    async fn test_delete_course() {
        let api = Arc::new(FakeApi::new());
        api.courses.lock().unwrap().push(raw_course(3));
        let service = CourseService::new(api.clone(), MEDIA);

        service.delete_course(3).await.unwrap();
        assert_eq!(*api.deleted_courses.lock().unwrap(), vec![3]);
        assert!(service.list_my_courses().await.unwrap().is_empty());

        let err = service.delete_course(3).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found");
    }
}
