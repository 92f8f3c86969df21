//! Business logic: estimates, workflow navigation, status polling and the
//! service that ties the API calls together.

pub mod estimates;
pub mod navigation;
pub mod poller;
pub mod services;
