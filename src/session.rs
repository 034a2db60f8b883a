use std::sync::{Arc, RwLock};

/// Source of the currently selected course.
pub trait SessionProvider {
    fn course_id(&self) -> Option<i64>;
}

impl<T: SessionProvider + ?Sized> SessionProvider for Arc<T> {
    fn course_id(&self) -> Option<i64> {
        (**self).course_id()
    }
}

/// In-memory session holding the active course.
#[derive(Debug, Default)]
pub struct CourseSession {
    course_id: RwLock<Option<i64>>,
}

impl CourseSession {
    pub fn new(course_id: Option<i64>) -> Self {
        Self {
            course_id: RwLock::new(course_id),
        }
    }

    pub fn set_course(&self, course_id: i64) {
        *self.course_id.write().unwrap_or_else(|e| e.into_inner()) = Some(course_id);
    }

    pub fn clear(&self) {
        *self.course_id.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl SessionProvider for CourseSession {
    fn course_id(&self) -> Option<i64> {
        *self.course_id.read().unwrap_or_else(|e| e.into_inner())
    }
}
