pub mod task_service;

pub use task_service::TaskService;

#[cfg(test)]
mod task_service_test;
