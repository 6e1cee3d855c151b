//! Use case implementations.

mod add_course_use_case;
mod get_course_use_case;
mod login_use_case;
mod remove_courses_use_case;

pub use add_course_use_case::AddCourseUseCase;
pub use get_course_use_case::GetCourseUseCase;
pub use login_use_case::LoginUseCase;
pub use remove_courses_use_case::RemoveCoursesUseCase;
