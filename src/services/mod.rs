pub mod ai_reply;
pub mod ai_service;
pub mod canned_service;
pub mod collaborators;
pub mod grading_service;
pub mod interview_service;
pub mod session_service;
