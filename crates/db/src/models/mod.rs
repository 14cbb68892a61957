pub mod job_log;
