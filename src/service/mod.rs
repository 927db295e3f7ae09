pub mod calendar_service;
pub mod nl_service;
pub mod scheduling_service;
