pub mod workflow_service;
