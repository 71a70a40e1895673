//! OpenAPI documents, one per service.
//!
//! Each service serves only its own document under `/swagger-ui` and
//! `/scalar`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use eadmin_core::PageMeta;
use eadmin_models::auth::{
    AuthResponse, AuthUserResponse, AuthorizeResponse, LoginRequest, RegisterRequest,
    VerifyResponse,
};
use eadmin_models::common::{ErrorResponse, HealthResponse};
use eadmin_models::employment::{
    CreateJobDto, HireResponse, Interview, InterviewStatus, InterviewsPage, Job, JobApplication,
    JobApplicationsPage, JobsPage, ScheduleInterviewDto, UpdateJobDto,
};
use eadmin_models::university::{
    Course, CourseRegistration, CourseRegistrationsPage, CoursesPage, CreateCourseDto,
    CreateExamDto, CreateProgramDto, EnterGradeDto, Exam, ExamRegistration,
    ExamRegistrationsPage, ExamsPage, GradeResponse, Program, ProgramsPage, UpdateCourseDto,
    UpdateExamDto,
};
use eadmin_models::users::{
    Candidate, CandidatesPage, CreateCandidateDto, CreateEmployeeDto, CreateProfessorDto,
    CreateStudentDto, EmployedResponse, Employee, EmployeesPage, GraduationResponse,
    IndicesRequest, IndicesResponse, Professor, ProfessorsPage, Student, StudentAvgGrade,
    StudentListItem, StudentStatus, StudentsPage, UpdateCandidateDto, UpdateEmployeeDto,
    UpdateProfessorDto, UpdateStudentDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::verify,
        crate::modules::auth::controller::verify_head,
        crate::modules::auth::controller::authorize,
        crate::modules::health::health,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            AuthUserResponse,
            VerifyResponse,
            AuthorizeResponse,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token verification"),
        (name = "Health", description = "Liveness probe")
    ),
    info(
        title = "eAdministration Auth API",
        version = "0.1.0",
        description = "Issues and verifies the bearer tokens every eAdministration service accepts."
    )
)]
pub struct AuthApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::professors::controller::create_professor,
        crate::modules::professors::controller::get_professors,
        crate::modules::professors::controller::get_professor_by_email,
        crate::modules::professors::controller::get_professor,
        crate::modules::professors::controller::update_professor,
        crate::modules::professors::controller::delete_professor,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student_by_email,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::verify_graduation,
        crate::modules::students::controller::get_all_indices,
        crate::modules::students::controller::get_avg_grades,
        crate::modules::programs::controller::create_program,
        crate::modules::programs::controller::get_programs,
        crate::modules::programs::controller::get_program,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::register_for_course,
        crate::modules::courses::controller::get_my_registrations,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::get_exams,
        crate::modules::exams::controller::get_exam,
        crate::modules::exams::controller::update_exam,
        crate::modules::exams::controller::delete_exam,
        crate::modules::exams::controller::register_for_exam,
        crate::modules::exams::controller::get_my_registrations,
        crate::modules::exams::controller::enter_grade,
        crate::modules::exams::controller::get_exam_registrations,
        crate::modules::health::health,
    ),
    components(
        schemas(
            Professor,
            CreateProfessorDto,
            UpdateProfessorDto,
            ProfessorsPage,
            Student,
            StudentStatus,
            StudentListItem,
            CreateStudentDto,
            UpdateStudentDto,
            StudentsPage,
            GraduationResponse,
            IndicesRequest,
            IndicesResponse,
            StudentAvgGrade,
            Program,
            CreateProgramDto,
            ProgramsPage,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            CoursesPage,
            CourseRegistration,
            CourseRegistrationsPage,
            Exam,
            CreateExamDto,
            UpdateExamDto,
            ExamsPage,
            ExamRegistration,
            ExamRegistrationsPage,
            EnterGradeDto,
            GradeResponse,
            PageMeta,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Professors", description = "Professor records"),
        (name = "Students", description = "Student records, graduation and grade averages"),
        (name = "Programs", description = "Study programs"),
        (name = "Courses", description = "Courses and course registrations"),
        (name = "Exams", description = "Exams, exam registrations and grading"),
        (name = "Health", description = "Liveness probe")
    ),
    info(
        title = "eAdministration University API",
        version = "0.1.0",
        description = "Student records, courses, exams and grading."
    )
)]
pub struct UniversityApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::employees::controller::create_employee,
        crate::modules::employees::controller::get_employees,
        crate::modules::employees::controller::get_employee_by_email,
        crate::modules::employees::controller::get_employee,
        crate::modules::employees::controller::update_employee,
        crate::modules::employees::controller::delete_employee,
        crate::modules::employees::controller::quit_job,
        crate::modules::employees::controller::is_employed,
        crate::modules::employees::controller::get_university_professors,
        crate::modules::candidates::controller::create_candidate,
        crate::modules::candidates::controller::get_candidates,
        crate::modules::candidates::controller::get_candidate_by_email,
        crate::modules::candidates::controller::get_candidate,
        crate::modules::candidates::controller::update_candidate,
        crate::modules::candidates::controller::delete_candidate,
        crate::modules::candidates::controller::get_university_indices,
        crate::modules::jobs::controller::create_job,
        crate::modules::jobs::controller::get_jobs,
        crate::modules::jobs::controller::get_job,
        crate::modules::jobs::controller::update_job,
        crate::modules::jobs::controller::delete_job,
        crate::modules::jobs::controller::apply_for_job,
        crate::modules::jobs::controller::get_job_candidates,
        crate::modules::job_applications::controller::get_job_applications,
        crate::modules::job_applications::controller::delete_job_application,
        crate::modules::interviews::controller::schedule_interview,
        crate::modules::interviews::controller::get_interviews,
        crate::modules::interviews::controller::delete_interview,
        crate::modules::interviews::controller::accept_interview,
        crate::modules::interviews::controller::reject_interview,
        crate::modules::interviews::controller::hire_candidate,
        crate::modules::health::health,
    ),
    components(
        schemas(
            Employee,
            CreateEmployeeDto,
            UpdateEmployeeDto,
            EmployeesPage,
            EmployedResponse,
            Candidate,
            CreateCandidateDto,
            UpdateCandidateDto,
            CandidatesPage,
            Job,
            CreateJobDto,
            UpdateJobDto,
            JobsPage,
            JobApplication,
            JobApplicationsPage,
            Interview,
            InterviewStatus,
            ScheduleInterviewDto,
            InterviewsPage,
            HireResponse,
            Professor,
            ProfessorsPage,
            IndicesResponse,
            StudentAvgGrade,
            PageMeta,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employees", description = "Employees and leaving a job"),
        (name = "Candidates", description = "Job candidates"),
        (name = "Jobs", description = "Job postings and applications"),
        (name = "Job Applications", description = "Submitted job applications"),
        (name = "Interviews", description = "Interview scheduling, rejection and hiring"),
        (name = "Health", description = "Liveness probe")
    ),
    info(
        title = "eAdministration Employment Office API",
        version = "0.1.0",
        description = "Employees, candidates, jobs, applications and interviews."
    )
)]
pub struct EmploymentApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
