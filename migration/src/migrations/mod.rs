pub mod m202606100001_create_users;
pub mod m202606100002_create_students;
pub mod m202606100003_create_student_evaluators;
pub mod m202606100004_create_course_coordinators;
pub mod m202606180001_create_rubrics;
pub mod m202606180002_create_criteria;
pub mod m202607020001_create_student_marks;
pub mod m202607020002_create_grades;
pub mod m202607020003_create_student_grades;
